//! Engine construction from configuration

use tracing::debug;

use super::config::{DialectKind, EngineConfig};
use super::ona::Ona;
use super::opennars::OpenNars;
use super::process::ProcessHandle;
use super::traits::ReasoningEngine;
use crate::actions::ActionMapper;

/// Build an idle handle for the configured dialect.
///
/// The handle is not started; call [`ReasoningEngine::start`] to launch it.
pub fn create_engine(config: &EngineConfig, mapper: ActionMapper) -> Box<dyn ReasoningEngine> {
    debug!(dialect = config.dialect.as_str(), "Creating engine handle");
    match &config.dialect {
        DialectKind::Ona => Box::new(ProcessHandle::new(Ona, config.clone(), mapper)),
        DialectKind::OpenNars { jar_path } => Box::new(ProcessHandle::new(
            OpenNars::new(jar_path.clone()),
            config.clone(),
            mapper,
        )),
    }
}
