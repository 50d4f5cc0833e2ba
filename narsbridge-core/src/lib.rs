//! narsbridge-core: bridge between continuous observations and a symbolic
//! reasoning engine
//!
//! This crate provides the pieces that sit between an agent's environment
//! and an external NARS process:
//!
//! - **Quantization** - [`EventQuantizer`] maps observation vectors onto a
//!   growing vocabulary of `event_<n>` symbols
//! - **Action mapping** - [`ActionMapper`] translates between engine
//!   operations (`^left`) and environment action ids
//! - **Engine handles** - [`ReasoningEngine`] over the ONA and OpenNARS
//!   dialects, backed by [`ProcessHandle`]
//! - **Sentences** - [`narsese`] helpers for the sentences the bridge sends
//!
//! # Quick Start
//!
//! ```no_run
//! use narsbridge_core::{
//!     ActionMapper, EngineConfig, EventQuantizer, QuantizerConfig, create_engine, narsese,
//! };
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut quantizer = EventQuantizer::new(QuantizerConfig::default().with_dimension(2));
//!     let mut engine = create_engine(&EngineConfig::default(), ActionMapper::new());
//!     engine.start();
//!
//!     let token = quantizer.quantize(&[0.1, 0.1], 0)?;
//!     engine.send(&narsese::observation(&token));
//!
//!     if let Some(op) = engine.get_action() {
//!         println!("engine chose {op}");
//!     }
//!     engine.stop();
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! observation ──► EventQuantizer ──► "<event_3 --> seen>. :|:"
//!                                              │
//!                               ┌──────────────▼──────────────┐
//!                               │        ProcessHandle        │
//!                               │  stdin ──► engine ──► stdout │
//!                               │               reader thread │
//!                               │                   │ Dialect │
//!                               │              SignalSlots    │
//!                               └──────────────┬──────────────┘
//!                                              │ get_action()
//! environment action id ◄── ActionMapper ◄─────┘
//! ```

pub mod actions;
pub mod config;
pub mod engine;
pub mod error;
pub mod narsese;
pub mod quantizer;

// Re-export key types for convenience
pub use actions::{ActionBinding, ActionMapper, FALLBACK_OP, UNKNOWN_ACTION, default_bindings};
pub use config::BridgeConfig;
pub use engine::{
    Anticipation, DialectKind, EngineConfig, EngineState, MockEngine, OnaEngine, OpenNarsEngine,
    ProcessHandle, ReasoningEngine, SurprisePolicy, create_engine,
};
pub use error::{BridgeError, ConfigError, EngineError, QuantizerError, Result};
pub use quantizer::{EventQuantizer, QuantizerConfig, QuantizerSnapshot};
