use serde::{Deserialize, Serialize};

/// A quantity of a specific work item included in a project.
///
/// `unit_price` is a snapshot of the work item's `sum_total` taken when the
/// line was added; `instance_id` is unique per insertion so the same work
/// item can appear in a project more than once.
///
/// The line total is never persisted: storage holds only the authoritative
/// inputs and [`ProjectLine::total`] recomputes on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProjectLine {
    pub instance_id: String,
    pub work_item_id: String,
    pub name: String,
    pub unit_of_measure: String,
    pub unit_price: f64,
    pub quantity: f64,
}

impl ProjectLine {
    /// `quantity * unit_price`, derived fresh on every read.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// A costed collection of work-item quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub items: Vec<ProjectLine>,
}

impl Project {
    /// Sum of all line totals, derived fresh on every read.
    #[must_use]
    pub fn grand_total(&self) -> f64 {
        self.items.iter().map(ProjectLine::total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::{Project, ProjectLine};

    fn line(quantity: f64, unit_price: f64) -> ProjectLine {
        ProjectLine {
            instance_id: "i-1".to_string(),
            work_item_id: "w-1".to_string(),
            name: "Brickwork".to_string(),
            unit_of_measure: "Cubic Meter".to_string(),
            unit_price,
            quantity,
        }
    }

    #[test]
    fn line_total_is_quantity_times_price() {
        assert_eq!(line(3.0, 287.5).total(), 862.5);
        assert_eq!(line(0.0, 287.5).total(), 0.0);
    }

    #[test]
    fn grand_total_sums_lines() {
        let project = Project {
            id: "p-1".to_string(),
            name: "Site A".to_string(),
            items: vec![line(2.0, 100.0), line(5.0, 10.0)],
        };
        assert_eq!(project.grand_total(), 250.0);
    }

    #[test]
    fn totals_are_never_serialized() {
        let json = serde_json::to_value(line(2.0, 100.0)).unwrap();
        assert!(json.get("total").is_none());
        let project: Project = serde_json::from_str(r#"{"id":"p","items":[]}"#).unwrap();
        assert!(serde_json::to_value(&project)
            .unwrap()
            .get("grand_total")
            .is_none());
    }

    #[test]
    fn stored_total_field_is_ignored_on_load() {
        // Legacy writers may have persisted a stale `total`; it must never
        // be trusted over the recomputed value.
        let json = r#"{"instance_id":"i","work_item_id":"w","unit_price":10.0,
                       "quantity":4.0,"total":999.0}"#;
        let parsed: ProjectLine = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.total(), 40.0);
    }
}
