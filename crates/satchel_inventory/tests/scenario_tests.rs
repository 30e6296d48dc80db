//! Scenario tests for satchel_inventory
//!
//! End-to-end flows a player triggers from the UI, run against containers
//! built from configuration and definitions loaded from the host format.

use satchel_inventory::prelude::*;
use satchel_inventory::weight;

const ITEMS: &str = r#"{
    "water": {"name":"water","label":"Water","weight":500,"type":"item","stackLimits":5,"isUseable":true},
    "bandage": {"name":"bandage","label":"Bandage","weight":50,"type":"item","stackLimits":10,"isUseable":true,"closeInventory":true},
    "phone": {"name":"phone","label":"Phone","weight":200,"type":"item","isUnique":true},
    "cap": {"name":"cap","label":"Cap","weight":100,"type":"item"},
    "beanie": {"name":"beanie","label":"Beanie","weight":100,"type":"item"},
    "sneakers": {"name":"sneakers","label":"Sneakers","weight":800,"type":"item"}
}"#;

struct Session {
    registry: ItemRegistry,
    ids: IdGenerator,
    inventory: Inventory,
    hotbar: Hotbar,
    equipment: EquipmentState,
}

impl Session {
    fn new(config: &str) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let config = SatchelConfig::from_toml_str(config).unwrap();
        Self {
            registry: ItemRegistry::from_json_str(ITEMS).unwrap(),
            ids: IdGenerator::starting_at(1),
            inventory: config.inventory(),
            hotbar: config.hotbar(),
            equipment: config.equipment(),
        }
    }

    fn def(&self, name: &str) -> &ItemDefinition {
        self.registry.get(name).unwrap()
    }

    fn give(&mut self, name: &str, quantity: u32, metadata: Option<ItemMetadata>) -> AddOutcome<Inventory> {
        let out = self.inventory.add(
            self.def(name),
            quantity,
            metadata,
            &self.hotbar,
            &self.registry,
            &self.ids,
        );
        self.inventory = out.state.clone();
        out
    }
}

fn clothing(slot: EquipmentSlot, drawable: i32) -> ItemMetadata {
    ClothingMetadata::for_slot(slot, drawable, 0).into()
}

#[test]
fn scenario_stack_limit_boundary() {
    let mut session = Session::new("inventory_slots = 3");
    session.give("bandage", 10, None);
    session.give("bandage", 10, None);
    assert!(session.inventory.slots().find_first_empty() == Some(2));

    let out = session.give("water", 6, None);
    assert_eq!(out.placed, 5);
    assert_eq!(out.unplaced, 1);
    assert_eq!(session.inventory.get(2).unwrap().quantity, 5);

    let mut session = Session::new("inventory_slots = 4");
    session.give("bandage", 20, None);
    let out = session.give("water", 6, None);
    assert!(out.is_complete());
    assert_eq!(session.inventory.get(2).unwrap().quantity, 5);
    assert_eq!(session.inventory.get(3).unwrap().quantity, 1);
}

#[test]
fn scenario_partial_give_back() {
    let mut session = Session::new("inventory_slots = 3");
    session.give("bandage", 20, None);
    session.hotbar = session.hotbar.set_slots(vec![Some(Stack::new(StackId::from_raw(900), "water", 7))]);

    let tc = TransferCoordinator::new(&session.registry, &session.ids);
    let out = tc.give_back(&session.hotbar, 0, &session.inventory, 7, session.def("water"));

    assert!(out.is_success());
    assert_eq!(out.moved, 5);
    assert_eq!(out.dest.get(2).unwrap().quantity, 5);
    assert_eq!(out.source.get(0).unwrap().quantity, 2);
    assert_eq!(out.source.get(0).unwrap().id, StackId::from_raw(900));
}

#[test]
fn scenario_split_merge_round_trip() {
    let mut session = Session::new("");
    session.give("bandage", 8, None);
    let original = session.inventory.clone();

    let split = original.split(0, 3, &session.ids).state;
    assert_eq!(split.get(0).unwrap().quantity, 5);
    assert_eq!(split.get(1).unwrap().quantity, 3);

    let merged = split.merge(1, 0, session.def("bandage")).state;
    assert_eq!(merged, original);
}

#[test]
fn scenario_equip_with_replace() {
    let mut session = Session::new("inventory_slots = 4");
    session.give("cap", 1, Some(clothing(EquipmentSlot::Hat, 4)));
    session.give("beanie", 1, Some(clothing(EquipmentSlot::Hat, 9)));
    let tc = TransferCoordinator::new(&session.registry, &session.ids);

    let out = tc.equip_from_inventory(&session.inventory, 0, &session.equipment, EquipmentSlot::Hat, false, &session.hotbar);
    assert!(out.is_success());
    let (inventory, equipment) = (out.inventory, out.equipment);
    assert!(inventory.get(0).is_none());

    let blocked = tc.equip_from_inventory(&inventory, 1, &equipment, EquipmentSlot::Hat, false, &session.hotbar);
    assert_eq!(blocked.error, Some(InventoryError::SlotOccupied));
    assert_eq!(blocked.equipment, equipment);
    assert_eq!(blocked.inventory, inventory);

    let forced = tc.equip_from_inventory(&inventory, 1, &equipment, EquipmentSlot::Hat, true, &session.hotbar);
    assert!(forced.is_success());
    assert_eq!(forced.equipment.get(EquipmentSlot::Hat).unwrap().item_name, "beanie");
    assert_eq!(forced.replaced.as_ref().unwrap().item_name, "cap");
    assert!(forced.inventory.has_item("cap"));
    assert!(!forced.inventory.has_item("beanie"));
}

#[test]
fn scenario_equip_errors_by_key() {
    let mut session = Session::new("");
    session.give("bandage", 1, None);
    session.give("sneakers", 1, Some(clothing(EquipmentSlot::Shoes, 2)));
    let bandage = session.inventory.get(0).unwrap().clone();
    let sneakers = session.inventory.get(1).unwrap().clone();
    let equipment = &session.equipment;

    assert_eq!(equipment.equip_named(&bandage, "hat", false).error, Some(InventoryError::NotClothingItem));
    assert_eq!(equipment.equip_named(&sneakers, "boots", false).error, Some(InventoryError::InvalidSlot));
    assert_eq!(equipment.equip_named(&sneakers, "hat", false).error, Some(InventoryError::SlotMismatch));
    assert_eq!(equipment.unequip_named("boots").error, Some(InventoryError::InvalidSlot));
    assert_eq!(equipment.unequip_named("shoes").error, Some(InventoryError::ItemNotFound));

    let error = equipment.equip_named(&sneakers, "hat", false).error.unwrap();
    assert_eq!(error.code(), "SLOT_MISMATCH");
    assert!(error.is_equipment_error());
}

#[test]
fn scenario_undress_into_inventory() {
    let mut session = Session::new("inventory_slots = 3");
    session.give("cap", 1, Some(clothing(EquipmentSlot::Hat, 4)));
    session.give("sneakers", 1, Some(clothing(EquipmentSlot::Shoes, 2)));
    let tc = TransferCoordinator::new(&session.registry, &session.ids);

    let hat = tc.equip_from_inventory(&session.inventory, 0, &session.equipment, EquipmentSlot::Hat, false, &session.hotbar);
    let shoes = tc.equip_from_inventory(&hat.inventory, 1, &hat.equipment, EquipmentSlot::Shoes, false, &session.hotbar);
    assert!(shoes.is_success());
    assert!(shoes.inventory.slots().is_empty());
    assert_eq!(shoes.equipment.equipped_count(), 2);

    let weight_dressed = shoes.inventory.weight(&session.registry);
    let all = tc.clear_equipment_to_inventory(&shoes.equipment, &shoes.inventory, &session.hotbar);
    assert!(all.is_success());
    assert_eq!(all.items.len(), 2);
    assert_eq!(all.equipment, EquipmentState::new());
    assert_eq!(all.inventory.weight(&session.registry), weight_dressed + 900);
}

#[test]
fn scenario_hotbar_use_and_refill() {
    let mut session = Session::new("");
    session.give("bandage", 12, None);
    let tc = TransferCoordinator::new(&session.registry, &session.ids);
    let bandage = session.def("bandage");
    assert!(bandage.is_usable());
    assert!(bandage.closes_container_on_use());

    let out = tc.assign(&session.inventory, 0, &session.hotbar, 0, 10, bandage);
    assert_eq!(out.moved, 10);
    let (inventory, hotbar) = (out.source, out.dest);

    let used = tc.consume(&hotbar, 0, 4);
    assert_eq!(used.consumed, 4);

    let refill = tc.assign(&inventory, 1, &used.state, 0, 2, bandage);
    assert_eq!(refill.moved, 2);
    assert_eq!(refill.dest.get(0).unwrap().quantity, 8);
    assert!(refill.source.slots().is_empty());
}

#[test]
fn scenario_weight_cap_and_labels() {
    let mut session = Session::new("max_weight = 2000");
    let out = session.give("water", 5, None);
    assert_eq!(out.placed, 4);
    assert_eq!(weight::format_weight_range(session.inventory.weight(&session.registry), 2_000), "2.0kg / 2.0kg");
    assert_eq!(weight::weight_percentage(session.inventory.weight(&session.registry), 2_000), 100.0);

    let out = session.give("bandage", 1, None);
    assert_eq!(out.error, Some(InventoryError::Overweight));

    let renamed = session.inventory.set_custom_label(0, "Spring water");
    assert_eq!(renamed.state.get(0).unwrap().custom_label(), Some("Spring water"));
}

#[test]
fn scenario_state_round_trips_through_json() {
    let mut session = Session::new("");
    session.give("cap", 1, Some(clothing(EquipmentSlot::Hat, 4)));
    session.give("water", 3, None);

    let json = serde_json::to_string(&session.inventory).unwrap();
    let back: Inventory = serde_json::from_str(&json).unwrap();
    assert_eq!(back, session.inventory);
    assert!(back.get(0).unwrap().metadata.as_ref().unwrap().as_clothing().is_some());
}
