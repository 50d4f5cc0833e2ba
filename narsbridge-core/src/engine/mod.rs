//! Reasoning engine abstraction
//!
//! One [`ReasoningEngine`] interface over the engine dialects. Each dialect
//! supplies its launch command and a line parser; [`ProcessHandle`] owns the
//! process and the background reader for all of them.

mod config;
mod dialect;
mod factory;
mod mock;
mod ona;
mod opennars;
mod process;
mod signals;
mod traits;
mod transcript;

pub use config::{DialectKind, EngineConfig, SurprisePolicy};
pub use dialect::{Dialect, LineParser, SentObservation};
pub use factory::create_engine;
pub use mock::MockEngine;
pub use ona::{Ona, OnaParser};
pub use opennars::{OpenNars, OpenNarsParser};
pub use process::{OnaEngine, OpenNarsEngine, ProcessHandle};
pub use signals::{Anticipation, Signal, SignalSlots};
pub use traits::{EngineState, ReasoningEngine};
