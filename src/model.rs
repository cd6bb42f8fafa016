//! Domain records and the decode boundary. JSON shapes are loose: absent
//! fields take documented defaults, unknown fields are ignored, and the top
//! level may be a bare array or an object wrapping one.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const WEAR_MIN: f64 = 0.0;
pub const WEAR_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriticalLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl CriticalLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CriticalLevel::Low => "low",
            CriticalLevel::Medium => "medium",
            CriticalLevel::High => "high",
        }
    }
}

/// One tracked vehicle component. `id` is unique within a collection and
/// immutable once assigned; `current_wear` is a percentage in [0, 100].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Component {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub current_wear: f64,
    pub critical_level: CriticalLevel,
    pub replacement_cost: f64,
    pub urgency: String,
}

// Array field names used by the known data files, checked before falling
// back to the first array-valued field.
const ARRAY_FIELDS: &[&str] = &["components", "members"];

/// Decode a collection from raw JSON text. Accepts a bare array or an object
/// containing a named array field. Returns `None` on any parse failure; the
/// caller treats that the same as a transport failure.
pub fn decode_collection(text: &str) -> Option<Vec<Component>> {
    let value: Value = serde_json::from_str(text).ok()?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => {
            let named = ARRAY_FIELDS
                .iter()
                .find_map(|f| map.get(*f).and_then(|v| v.as_array()).cloned());
            match named {
                Some(items) => items,
                None => map.values().find_map(|v| v.as_array().cloned())?,
            }
        }
        _ => return None,
    };
    items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<Component>, _>>()
        .ok()
}

pub fn get_by_id(components: &[Component], id: u32) -> Option<&Component> {
    components.iter().find(|c| c.id == id)
}

/// Append a component within the current session, assigning the next free id.
/// Wear is clamped into the valid percentage range. Returns the assigned id.
pub fn add_component(components: &mut Vec<Component>, mut component: Component) -> u32 {
    let id = components.iter().map(|c| c.id).max().map_or(1, |max| max + 1);
    component.id = id;
    component.current_wear = component.current_wear.clamp(WEAR_MIN, WEAR_MAX);
    components.push(component);
    id
}

/// Field-wise update applied to an existing component; `None` leaves a field
/// untouched. The id itself is never changed.
#[derive(Debug, Clone, Default)]
pub struct ComponentUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub current_wear: Option<f64>,
    pub critical_level: Option<CriticalLevel>,
    pub replacement_cost: Option<f64>,
    pub urgency: Option<String>,
}

pub fn update_component(components: &mut [Component], id: u32, update: ComponentUpdate) -> bool {
    let Some(component) = components.iter_mut().find(|c| c.id == id) else {
        return false;
    };
    if let Some(name) = update.name {
        component.name = name;
    }
    if let Some(category) = update.category {
        component.category = category;
    }
    if let Some(wear) = update.current_wear {
        component.current_wear = wear.clamp(WEAR_MIN, WEAR_MAX);
    }
    if let Some(level) = update.critical_level {
        component.critical_level = level;
    }
    if let Some(cost) = update.replacement_cost {
        component.replacement_cost = cost;
    }
    if let Some(urgency) = update.urgency {
        component.urgency = urgency;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_bare_array() {
        let text = r#"[
            {"id": 1, "name": "Brake Pads", "category": "brakes",
             "currentWear": 88.0, "criticalLevel": "high", "replacementCost": 120.0},
            {"id": 2, "name": "Air Filter", "category": "engine",
             "currentWear": 35.0, "criticalLevel": "low", "replacementCost": 45.0}
        ]"#;
        let components = decode_collection(text).unwrap();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].name, "Brake Pads");
        assert_eq!(components[0].critical_level, CriticalLevel::High);
        assert_eq!(components[1].replacement_cost, 45.0);
    }

    #[test]
    fn test_decode_wrapped_object() {
        let text = r#"{"components": [{"id": 7, "name": "Tire", "category": "tires",
                        "currentWear": 10.0}]}"#;
        let components = decode_collection(text).unwrap();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].id, 7);
    }

    #[test]
    fn test_decode_first_array_field_when_unnamed() {
        let text = r#"{"meta": "x", "records": [{"id": 3, "name": "Belt"}]}"#;
        let components = decode_collection(text).unwrap();
        assert_eq!(components[0].name, "Belt");
    }

    #[test]
    fn test_decode_missing_fields_default() {
        let text = r#"[{"id": 4, "name": "Coolant"}]"#;
        let components = decode_collection(text).unwrap();
        let c = &components[0];
        assert_eq!(c.current_wear, 0.0);
        assert_eq!(c.critical_level, CriticalLevel::Low);
        assert_eq!(c.replacement_cost, 0.0);
        assert!(c.category.is_empty());
        assert!(c.urgency.is_empty());
    }

    #[test]
    fn test_decode_garbage_is_none() {
        assert!(decode_collection("not json").is_none());
        assert!(decode_collection("42").is_none());
        assert!(decode_collection(r#"{"no": "array here"}"#).is_none());
    }

    #[test]
    fn test_add_assigns_next_id_and_clamps() {
        let mut components = decode_collection(r#"[{"id": 5, "name": "A"}]"#).unwrap();
        let id = add_component(
            &mut components,
            Component { name: "B".to_string(), current_wear: 130.0, ..Default::default() },
        );
        assert_eq!(id, 6);
        assert_eq!(components[1].current_wear, 100.0);

        let mut empty = Vec::new();
        let first = add_component(&mut empty, Component::default());
        assert_eq!(first, 1);
    }

    #[test]
    fn test_get_by_id() {
        let components =
            decode_collection(r#"[{"id": 2, "name": "A"}, {"id": 9, "name": "B"}]"#).unwrap();
        assert_eq!(get_by_id(&components, 9).unwrap().name, "B");
        assert!(get_by_id(&components, 1).is_none());
    }

    #[test]
    fn test_update_merges_fields() {
        let mut components = decode_collection(
            r#"[{"id": 1, "name": "Brakes", "currentWear": 40.0, "replacementCost": 100.0}]"#,
        )
        .unwrap();
        let ok = update_component(
            &mut components,
            1,
            ComponentUpdate { current_wear: Some(65.0), ..Default::default() },
        );
        assert!(ok);
        assert_eq!(components[0].current_wear, 65.0);
        assert_eq!(components[0].name, "Brakes");
        assert_eq!(components[0].replacement_cost, 100.0);

        let missing = update_component(&mut components, 99, ComponentUpdate::default());
        assert!(!missing);
    }
}
