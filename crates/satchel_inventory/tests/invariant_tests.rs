//! Invariant tests for satchel_inventory
//!
//! Properties that must hold for every sequence of requests: items are never
//! duplicated or lost, and a rejected request never changes anything.

use satchel_inventory::prelude::*;

const ITEMS: &str = r#"{
    "water": {"name":"water","label":"Water","weight":500,"type":"item","stackLimits":5,"isUseable":true},
    "bread": {"name":"bread","label":"Bread","weight":100,"type":"item","stackLimits":10},
    "cash": {"name":"cash","label":"Cash","weight":0,"type":"item","stackLimits":false},
    "phone": {"name":"phone","label":"Phone","weight":200,"type":"item","isUnique":true},
    "pistol": {"name":"pistol","label":"Pistol","weight":1500,"type":"weapon","isUnique":true}
}"#;

fn init() -> ItemRegistry {
    let _ = env_logger::builder().is_test(true).try_init();
    ItemRegistry::from_json_str(ITEMS).unwrap()
}

fn def<'a>(registry: &'a ItemRegistry, name: &str) -> &'a ItemDefinition {
    registry.get(name).unwrap()
}

fn total(name: &str, inventory: &Inventory, hotbar: &Hotbar, ground: &Ground) -> u64 {
    inventory.total_quantity(name) + hotbar.total_quantity(name) + ground.total_quantity(name)
}

fn assert_no_empty_stacks<S: SlotStore>(container: &S) {
    for (_, stack) in container.slots().items() {
        assert!(stack.quantity >= 1, "zero-quantity stack {:?}", stack);
    }
}

/// INVARIANT: Moves between containers conserve quantity
#[test]
fn invariant_transfers_conserve_quantity() {
    let registry = init();
    let ids = IdGenerator::new();
    let tc = TransferCoordinator::new(&registry, &ids);

    let mut inventory = Inventory::new(6);
    let mut hotbar = Hotbar::default();
    let mut ground = Ground::new(4);
    inventory = inventory
        .add(def(&registry, "water"), 13, None, &hotbar, &registry, &ids)
        .state;
    ground = ground.add(def(&registry, "water"), 4, None, &ids).state;
    let before = total("water", &inventory, &hotbar, &ground);
    assert_eq!(before, 17);

    // Deterministic walk over every transfer kind, including ones that fail
    for step in 0..40usize {
        let a = (step * 5) % 6;
        let b = (step * 7) % 5;
        let qty = (step % 4) as u32 + 1;
        match step % 6 {
            0 => {
                let out = tc.assign(&inventory, a, &hotbar, b, qty, def(&registry, "water"));
                inventory = out.source;
                hotbar = out.dest;
            }
            1 => {
                let out = tc.give_back(&hotbar, b, &inventory, qty, def(&registry, "water"));
                hotbar = out.source;
                inventory = out.dest;
            }
            2 => {
                let out = tc.swap_across(&inventory, a, &hotbar, b);
                inventory = out.source;
                hotbar = out.dest;
            }
            3 => {
                let out = tc.drop_to_ground(&inventory, a, &ground, qty);
                inventory = out.source;
                ground = out.dest;
            }
            4 => {
                let out = tc.pick_up(&ground, step % 4, &inventory, &hotbar, qty);
                ground = out.source;
                inventory = out.dest;
            }
            _ => {
                inventory = inventory.split(a, qty, &ids).state;
                inventory = inventory.merge(a, (a + 1) % 6, def(&registry, "water")).state;
                hotbar = hotbar.swap(b, (b + 2) % 5).state;
            }
        }

        assert_eq!(total("water", &inventory, &hotbar, &ground), before, "step {}", step);
        assert_no_empty_stacks(&inventory);
        assert_no_empty_stacks(&hotbar);
        assert_no_empty_stacks(&ground);
    }
}

/// INVARIANT: Only consume and remove reduce quantity, by what they report
#[test]
fn invariant_sinks_reduce_by_reported_amount() {
    let registry = init();
    let ids = IdGenerator::new();
    let tc = TransferCoordinator::new(&registry, &ids);

    let hotbar = Hotbar::default()
        .add(def(&registry, "bread"), 4, None, &Inventory::default(), &ids)
        .state;
    let out = tc.consume(&hotbar, 0, 3);
    assert_eq!(out.consumed, 3);
    assert_eq!(out.state.total_quantity("bread"), 1);

    let out = tc.consume(&out.state, 0, 3);
    assert_eq!(out.consumed, 1);
    assert_eq!(out.state.total_quantity("bread"), 0);
}

/// INVARIANT: Rejected requests return their input unchanged
#[test]
fn invariant_rejections_are_identity() {
    let registry = init();
    let ids = IdGenerator::new();
    let tc = TransferCoordinator::new(&registry, &ids);

    let hotbar = Hotbar::default();
    let inventory = Inventory::new(3)
        .add(def(&registry, "water"), 7, None, &hotbar, &registry, &ids)
        .state
        .add(def(&registry, "phone"), 1, None, &hotbar, &registry, &ids)
        .state;
    let water = def(&registry, "water");

    let rejected: Vec<(Option<InventoryError>, Inventory)> = vec![
        {
            let out = inventory.remove(3, 1);
            (out.error, out.state)
        },
        {
            let out = inventory.remove(0, 0);
            (out.error, out.state)
        },
        {
            let out = inventory.swap(0, 9);
            (out.error, out.state)
        },
        {
            let out = inventory.split(0, 5, &ids);
            (out.error, out.state)
        },
        {
            let out = inventory.split(1, 1, &ids);
            (out.error, out.state)
        },
        {
            let out = inventory.merge(0, 0, water);
            (out.error, out.state)
        },
        {
            let out = inventory.merge(0, 2, water);
            (out.error, out.state)
        },
        {
            let out = inventory.add(water, 0, None, &hotbar, &registry, &ids);
            (out.error, out.state)
        },
        {
            let out = inventory.add(def(&registry, "phone"), 1, None, &hotbar, &registry, &ids);
            (out.error, out.state)
        },
        {
            let out = inventory.resize(1);
            (out.error, out.state)
        },
        {
            let out = inventory.set_max_weight(10, &registry);
            (out.error, out.state)
        },
    ];

    for (i, (error, state)) in rejected.into_iter().enumerate() {
        assert!(error.is_some(), "request {} was accepted", i);
        assert_eq!(state, inventory, "request {} changed state", i);
    }

    let out = tc.assign(&inventory, 0, &hotbar, 0, 9, water);
    assert_eq!(out.error, Some(InventoryError::InsufficientQuantity));
    assert_eq!((out.source, out.dest), (inventory.clone(), hotbar.clone()));

    let out = tc.give_back(&inventory, 2, &hotbar, 1, water);
    assert_eq!(out.error, Some(InventoryError::ItemMismatch));
    assert_eq!((out.source, out.dest), (inventory, hotbar));
}

/// INVARIANT: A unique item exists at most once across inventory and hotbar
#[test]
fn invariant_unique_items_stay_unique() {
    let registry = init();
    let ids = IdGenerator::new();
    let tc = TransferCoordinator::new(&registry, &ids);
    let phone = def(&registry, "phone");

    let inventory = Inventory::default();
    let hotbar = Hotbar::default().add(phone, 1, None, &inventory, &ids).state;

    let out = inventory.add(phone, 1, None, &hotbar, &registry, &ids);
    assert_eq!(out.placed, 0);
    assert_eq!(out.error, Some(InventoryError::UniqueConflict));
    assert_eq!(out.state, inventory);

    let ground = Ground::default().add(phone, 1, None, &ids).state;
    let out = tc.pick_up(&ground, 0, &inventory, &hotbar, 1);
    assert_eq!(out.error, Some(InventoryError::UniqueConflict));
    assert_eq!(out.source, ground);
    assert_eq!(out.dest, inventory);

    // Ground-sourced moves see only two containers and must not let it in
    let out = tc.assign(&ground, 0, &inventory, 0, 1, phone);
    assert_eq!(out.error, Some(InventoryError::UniqueConflict));
    assert_eq!(out.dest, inventory);
    let out = tc.swap_across(&ground, 0, &inventory, 0);
    assert_eq!(out.error, Some(InventoryError::UniqueConflict));
    assert_eq!(out.dest, inventory);
    let out = tc.swap_with_ground(&ground, 0, &inventory, 0, &hotbar);
    assert_eq!(out.error, Some(InventoryError::UniqueConflict));
    let out = tc.pick_up_to_hotbar(&ground, 0, &hotbar, &inventory, 1);
    assert_eq!(out.error, Some(InventoryError::UniqueConflict));
    assert_eq!(out.dest, hotbar);

    let out = tc.give_back(&hotbar, 0, &inventory, 1, phone);
    assert!(out.is_success());
    let count = out.source.total_quantity("phone") + out.dest.total_quantity("phone");
    assert_eq!(count, 1);
}

fn phones(inventory: &Inventory, hotbar: &Hotbar) -> u64 {
    inventory.total_quantity("phone") + hotbar.total_quantity("phone")
}

/// INVARIANT: No sequence of moves through the ground duplicates a unique item
#[test]
fn invariant_unique_items_stay_unique_through_ground() {
    let registry = init();
    let ids = IdGenerator::new();
    let tc = TransferCoordinator::new(&registry, &ids);
    let phone = def(&registry, "phone");

    let mut hotbar = Hotbar::default();
    let mut inventory = Inventory::new(4)
        .add(phone, 1, None, &hotbar, &registry, &ids)
        .state;
    let mut ground = Ground::new(4)
        .add(phone, 1, None, &ids)
        .state
        .add(def(&registry, "bread"), 3, None, &ids)
        .state;
    let mut accepted = 0;

    for step in 0..64usize {
        let g = step % 4;
        let i = (step * 3) % 4;
        let h = (step * 7) % 5;
        let error = match step % 9 {
            0 => {
                let out = tc.assign(&ground, g, &inventory, i, 1, phone);
                (ground, inventory) = (out.source, out.dest);
                out.error
            }
            1 => {
                let out = tc.give_back(&ground, g, &hotbar, 1, phone);
                (ground, hotbar) = (out.source, out.dest);
                out.error
            }
            2 => {
                let out = tc.swap_across(&ground, g, &inventory, i);
                (ground, inventory) = (out.source, out.dest);
                out.error
            }
            3 => {
                let out = tc.swap_across(&hotbar, h, &ground, g);
                (hotbar, ground) = (out.source, out.dest);
                out.error
            }
            4 => {
                let out = tc.pick_up(&ground, g, &inventory, &hotbar, 1);
                (ground, inventory) = (out.source, out.dest);
                out.error
            }
            5 => {
                let out = tc.pick_up_to_hotbar(&ground, g, &hotbar, &inventory, 1);
                (ground, hotbar) = (out.source, out.dest);
                out.error
            }
            6 => {
                let out = tc.swap_with_ground(&ground, g, &inventory, i, &hotbar);
                (ground, inventory) = (out.source, out.dest);
                out.error
            }
            7 => {
                let out = tc.drop_to_ground(&inventory, i, &ground, 1);
                (inventory, ground) = (out.source, out.dest);
                out.error
            }
            _ => {
                let out = tc.assign_item(&inventory, i, &hotbar, h, 1);
                (inventory, hotbar) = (out.source, out.dest);
                out.error
            }
        };
        if error.is_none() {
            accepted += 1;
        }

        assert!(phones(&inventory, &hotbar) <= 1, "step {} duplicated a phone", step);
        assert_eq!(total("phone", &inventory, &hotbar, &ground), 2, "step {}", step);
        assert_eq!(total("bread", &inventory, &hotbar, &ground), 3, "step {}", step);
    }
    assert!(accepted > 0);
}

/// INVARIANT: Fresh stacks never reuse an id
#[test]
fn invariant_stack_ids_are_fresh() {
    let registry = init();
    let ids = IdGenerator::new();
    let hotbar = Hotbar::default();

    let inventory = Inventory::new(8)
        .add(def(&registry, "water"), 20, None, &hotbar, &registry, &ids)
        .state;
    let inventory = inventory.split(0, 2, &ids).state;
    let inventory = inventory.split(1, 1, &ids).state;

    let mut seen: Vec<StackId> = inventory.slots().items().map(|(_, s)| s.id).collect();
    let count = seen.len();
    seen.sort_by_key(|id| id.to_raw());
    seen.dedup();
    assert_eq!(seen.len(), count);
    assert_eq!(count, 6);
}
