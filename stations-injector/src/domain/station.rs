//! Station identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A station, identified by its numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Station {
    pub id: u64,
    pub name: String,
}

impl Station {
    /// Create a new station.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let station = Station::new(8507000, "Bern");
        assert_eq!(station.to_string(), "Bern (8507000)");
    }

    #[test]
    fn json_shape() {
        let station = Station::new(100, "Bern");
        let json = serde_json::to_string(&station).unwrap();
        assert_eq!(json, r#"{"id":100,"name":"Bern"}"#);
    }
}
