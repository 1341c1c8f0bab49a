//! Station boards dataset: gzip-compressed JSON lines.
//!
//! The decoder turns the compressed file into a lazy sequence of lines; the
//! mapper turns each line into a cache key and [`Stop`](crate::domain::Stop).

mod decoder;
mod error;
mod mapper;

pub use decoder::{DEFAULT_DATASET, DatasetResource, GzLines};
pub use error::{DatasetError, ParseError};
pub use mapper::{entry_key, to_entry};

#[cfg(test)]
pub(crate) use decoder::tests::write_dataset;
