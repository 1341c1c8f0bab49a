//! Train identity as it appears on a departure board.

use serde::{Deserialize, Serialize};

/// A train service: name, terminus, category and operating company.
///
/// Trains have no identity beyond their field values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Train {
    /// Public train name or number (e.g. "IC 1").
    pub name: String,

    /// Terminus the train is heading to.
    #[serde(rename = "to")]
    pub destination: String,

    /// Service category (e.g. "IC", "S", "RE").
    pub category: String,

    /// Operating company (e.g. "SBB").
    pub operator: String,
}

impl Train {
    /// Create a new train.
    pub fn new(
        name: impl Into<String>,
        destination: impl Into<String>,
        category: impl Into<String>,
        operator: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            destination: destination.into(),
            category: category.into(),
            operator: operator.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_destination_as_to() {
        let train = Train::new("IC1", "Zurich", "IC", "SBB");
        let json = serde_json::to_value(&train).unwrap();
        assert_eq!(json["to"], "Zurich");
        assert!(json.get("destination").is_none());
    }

    #[test]
    fn equality_is_by_value() {
        let a = Train::new("IC1", "Zurich", "IC", "SBB");
        let b = Train::new("IC1", "Zurich", "IC", "SBB");
        let c = Train::new("IC1", "Basel", "IC", "SBB");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
