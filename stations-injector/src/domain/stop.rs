//! Scheduled departure events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Station, Train};

/// One scheduled departure of a train from a station.
///
/// This is the value stored in the station boards cache. It can only be
/// built from a complete [`Train`] and [`Station`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub train: Train,

    /// Delay in minutes, 0 when the source reported none.
    pub delay_min: i32,

    pub station: Station,

    /// Absolute departure time.
    pub departure: DateTime<Utc>,
}

impl Stop {
    /// Create a new stop.
    pub fn new(train: Train, delay_min: i32, station: Station, departure: DateTime<Utc>) -> Self {
        Self {
            train,
            delay_min,
            station,
            departure,
        }
    }
}
