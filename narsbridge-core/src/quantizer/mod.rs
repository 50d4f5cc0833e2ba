//! Observation quantization
//!
//! Turns a stream of real-valued observation vectors into a small, slowly
//! growing vocabulary of `event_<n>` symbols the reasoning engine can talk
//! about.

mod config;
mod event_map;
mod snapshot;

pub use config::QuantizerConfig;
pub use event_map::{EventQuantizer, Prototype, euclidean_distance, symbol};
pub use snapshot::{QuantizerSnapshot, SNAPSHOT_VERSION};
