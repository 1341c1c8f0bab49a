//! Domain types for station boards.
//!
//! These are the values written to the cache. They are plain immutable
//! records with no identity beyond their fields.

mod station;
mod stop;
mod train;

pub use station::Station;
pub use stop::Stop;
pub use train::Train;
