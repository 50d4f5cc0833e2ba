//! narsbridge-agent: episode driver for narsbridge
//!
//! Connects an [`Environment`] to a reasoning engine through the
//! narsbridge-core components:
//!
//! ```text
//! Environment ──observation──► Encoder ──vector──► EventQuantizer
//!      ▲                                                │ event_<n>
//!      │ action id                                      ▼
//! ActionMapper ◄──^op── ReasoningEngine ◄──"<event_n --> seen>. :|:"
//! ```
//!
//! # Example
//!
//! ```no_run
//! use narsbridge_agent::{AgentConfig, BridgeLoop, Environment, RandomProjection, Step};
//! use narsbridge_core::{EventQuantizer, create_engine};
//!
//! struct Corridor(usize);
//!
//! impl Environment for Corridor {
//!     type Observation = Vec<f64>;
//!
//!     fn reset(&mut self) -> Vec<f64> {
//!         self.0 = 0;
//!         vec![0.0; 4]
//!     }
//!
//!     fn step(&mut self, _action: i32) -> Step<Vec<f64>> {
//!         self.0 += 1;
//!         Step { observation: vec![self.0 as f64; 4], reward: 0.0, done: self.0 > 9, truncated: false }
//!     }
//!
//!     fn sample_action(&mut self) -> i32 {
//!         2
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! narsbridge_agent::init_logging(false)?;
//! let config = AgentConfig::load_default()?;
//! let engine = create_engine(&config.bridge.engine, config.bridge.action_mapper());
//! let encoder = RandomProjection::new(4, config.bridge.quantizer.dimension, 0);
//!
//! let mut agent = BridgeLoop::new(
//!     Corridor(0),
//!     encoder,
//!     engine,
//!     EventQuantizer::new(config.bridge.quantizer.clone()),
//!     config.bridge.action_mapper(),
//!     config.episode.clone(),
//! );
//! for report in agent.run(10).await? {
//!     println!("episode {}: {} steps", report.episode, report.steps);
//! }
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod config;
pub mod encoder;
pub mod environment;
pub mod error;
pub mod telemetry;

pub use bridge::{BridgeLoop, EpisodeReport};
pub use config::{AgentConfig, EpisodeConfig};
pub use encoder::{Encoder, Passthrough, RandomProjection};
pub use environment::{Environment, Step};
pub use error::{AgentError, EncoderError, Result, TelemetryError};
pub use telemetry::init_logging;
