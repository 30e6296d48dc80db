//! Per-stack metadata
//!
//! A stack may carry a metadata bag. Bags with the clothing shape are
//! recognised once, when they enter the engine, and become
//! [`ItemMetadata::Clothing`]; everything else is kept verbatim as
//! [`ItemMetadata::Opaque`].

use crate::equipment::EquipmentSlot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-form metadata value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Float value
    Float(f64),
    /// String value
    String(String),
    /// Array of values
    Array(Vec<MetadataValue>),
    /// Nested map
    Map(BTreeMap<String, MetadataValue>),
}

impl MetadataValue {
    /// Get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i64> for MetadataValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for MetadataValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for MetadataValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

/// How a clothing item is applied to the ped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    /// Body component (torso, legs, ...)
    Component,
    /// Attached prop (hat, glasses, ...)
    Prop,
}

impl ComponentType {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "component" => Some(Self::Component),
            "prop" => Some(Self::Prop),
            _ => None,
        }
    }
}

/// Model gender a clothing item was authored for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Keys the clothing shape owns; anything else in the bag lands in `extra`
const CLOTHING_KEYS: [&str; 9] = [
    "equipmentSlot",
    "componentType",
    "componentId",
    "propId",
    "drawable",
    "texture",
    "palette",
    "gender",
    "customLabel",
];

/// Metadata every equippable clothing item carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClothingMetadata {
    /// Slot this item must be equipped in
    pub equipment_slot: EquipmentSlot,
    pub component_type: ComponentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prop_id: Option<i32>,
    pub drawable: i32,
    pub texture: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// Player-chosen display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_label: Option<String>,
    /// Keys outside the clothing shape (serial, durability, ...), kept as-is
    #[serde(flatten)]
    pub extra: BTreeMap<String, MetadataValue>,
}

impl ClothingMetadata {
    /// Create clothing metadata for `slot`, taking component type and
    /// component/prop id from the slot definition
    pub fn for_slot(slot: EquipmentSlot, drawable: i32, texture: i32) -> Self {
        let def = slot.definition();
        let (component_id, prop_id) = match def.component_type {
            ComponentType::Component => (Some(def.native_id), None),
            ComponentType::Prop => (None, Some(def.native_id)),
        };
        Self {
            equipment_slot: slot,
            component_type: def.component_type,
            component_id,
            prop_id,
            drawable,
            texture,
            palette: None,
            gender: None,
            custom_label: None,
            extra: BTreeMap::new(),
        }
    }

    /// Set gender
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Set palette
    pub fn with_palette(mut self, palette: i32) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Set custom label
    pub fn with_custom_label(mut self, label: impl Into<String>) -> Self {
        self.custom_label = Some(label.into());
        self
    }

    /// Try to read the clothing shape out of a raw property bag.
    ///
    /// A present but malformed optional key rejects the shape, matching
    /// what deserialization does. Unknown keys are carried in `extra`.
    pub fn from_properties(props: &BTreeMap<String, MetadataValue>) -> Option<Self> {
        let slot = props.get("equipmentSlot")?.as_str()?.parse::<EquipmentSlot>().ok()?;
        let component_type = ComponentType::parse(props.get("componentType")?.as_str()?)?;
        let drawable = props.get("drawable").and_then(int_value)?;
        let texture = props.get("texture").and_then(int_value)?;

        Some(Self {
            equipment_slot: slot,
            component_type,
            component_id: optional(props, "componentId", int_value)?,
            prop_id: optional(props, "propId", int_value)?,
            drawable,
            texture,
            palette: optional(props, "palette", int_value)?,
            gender: optional(props, "gender", |v| v.as_str().and_then(Gender::parse))?,
            custom_label: optional(props, "customLabel", |v| v.as_str().map(str::to_string))?,
            extra: props
                .iter()
                .filter(|(key, _)| !CLOTHING_KEYS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        })
    }

    /// Flatten back into a raw property bag
    pub fn to_properties(&self) -> BTreeMap<String, MetadataValue> {
        let mut props = self.extra.clone();
        props.insert("equipmentSlot".to_string(), self.equipment_slot.as_str().into());
        let component_type = match self.component_type {
            ComponentType::Component => "component",
            ComponentType::Prop => "prop",
        };
        props.insert("componentType".to_string(), component_type.into());
        props.insert("drawable".to_string(), i64::from(self.drawable).into());
        props.insert("texture".to_string(), i64::from(self.texture).into());
        if let Some(id) = self.component_id {
            props.insert("componentId".to_string(), i64::from(id).into());
        }
        if let Some(id) = self.prop_id {
            props.insert("propId".to_string(), i64::from(id).into());
        }
        if let Some(palette) = self.palette {
            props.insert("palette".to_string(), i64::from(palette).into());
        }
        if let Some(gender) = self.gender {
            let gender = match gender {
                Gender::Male => "male",
                Gender::Female => "female",
            };
            props.insert("gender".to_string(), gender.into());
        }
        if let Some(label) = &self.custom_label {
            props.insert("customLabel".to_string(), label.clone().into());
        }
        props
    }
}

fn int_value(value: &MetadataValue) -> Option<i32> {
    value.as_int().and_then(|v| i32::try_from(v).ok())
}

/// `Some(None)` when `key` is absent, `None` when it is present but unparsable
fn optional<T>(
    props: &BTreeMap<String, MetadataValue>,
    key: &str,
    parse: impl Fn(&MetadataValue) -> Option<T>,
) -> Option<Option<T>> {
    match props.get(key) {
        None => Some(None),
        Some(value) => parse(value).map(Some),
    }
}

/// Metadata attached to a stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemMetadata {
    /// Recognised clothing shape
    Clothing(ClothingMetadata),
    /// Anything else, kept as-is
    Opaque(BTreeMap<String, MetadataValue>),
}

impl ItemMetadata {
    /// Classify a raw property bag
    pub fn from_properties(props: BTreeMap<String, MetadataValue>) -> Self {
        match ClothingMetadata::from_properties(&props) {
            Some(clothing) => Self::Clothing(clothing),
            None => Self::Opaque(props),
        }
    }

    /// Get the clothing shape, if recognised
    pub fn as_clothing(&self) -> Option<&ClothingMetadata> {
        match self {
            Self::Clothing(clothing) => Some(clothing),
            Self::Opaque(_) => None,
        }
    }

    /// Player-chosen display name
    pub fn custom_label(&self) -> Option<&str> {
        match self {
            Self::Clothing(clothing) => clothing.custom_label.as_deref(),
            Self::Opaque(props) => props.get("customLabel").and_then(MetadataValue::as_str),
        }
    }

    /// Copy with the display name replaced
    pub fn with_custom_label(&self, label: impl Into<String>) -> Self {
        match self {
            Self::Clothing(clothing) => Self::Clothing(clothing.clone().with_custom_label(label)),
            Self::Opaque(props) => {
                let mut props = props.clone();
                props.insert("customLabel".to_string(), MetadataValue::String(label.into()));
                Self::Opaque(props)
            }
        }
    }
}

impl From<ClothingMetadata> for ItemMetadata {
    fn from(clothing: ClothingMetadata) -> Self {
        Self::Clothing(clothing)
    }
}
