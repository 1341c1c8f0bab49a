//! Station boards injector.
//!
//! Keeps a station boards cache populated with a rotating view of a
//! departures dataset: on each trigger it clears the cache, streams the
//! compressed dataset into it, and starts over whenever the data runs out.

pub mod cache;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod injector;
pub mod web;
