use serde::{Deserialize, Serialize};

/// A catalog entry defining a rate (price per unit) for one kind of
/// labor, material, or equipment.
///
/// The `id` is a stable numeric string (`"1"`, `"2"`, ...) assigned by the
/// inventory store as `max(existing numeric ids) + 1`. Ids are never reused
/// after deletion within one numbering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MasterItem {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::MasterItem;

    #[test]
    fn json_uses_canonical_field_names() {
        let item = MasterItem {
            id: "3".to_string(),
            name: "Mason".to_string(),
            unit: "PerDay".to_string(),
            price: 800.0,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "3");
        assert_eq!(json["name"], "Mason");
        assert_eq!(json["unit"], "PerDay");
        assert_eq!(json["price"], 800.0);
    }
}
