//! Engine configuration types

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which line protocol the engine speaks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialectKind {
    /// OpenNARS for Applications in shell mode
    #[default]
    Ona,
    /// OpenNARS running from a jar
    OpenNars {
        #[serde(default = "default_jar_path")]
        jar_path: PathBuf,
    },
}

fn default_jar_path() -> PathBuf {
    PathBuf::from("opennars.jar")
}

impl DialectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ona => "ona",
            Self::OpenNars { .. } => "opennars",
        }
    }
}

/// How strongly each kind of surprise raises the prediction error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurprisePolicy {
    /// Level raised by revision and confidence heuristics.
    #[serde(default = "default_floor")]
    pub floor: f64,

    /// Level raised when an observation contradicts a held expectation.
    #[serde(default = "default_mismatch_floor")]
    pub mismatch_floor: f64,

    /// Output lines above this truth confidence count as surprising.
    #[serde(default = "default_output_confidence_threshold")]
    pub output_confidence_threshold: f64,

    /// Relevant derivations above this confidence count as surprising.
    #[serde(default = "default_derived_confidence_threshold")]
    pub derived_confidence_threshold: f64,

    /// Confidence given to anticipations that carry none.
    #[serde(default = "default_anticipation_confidence")]
    pub default_anticipation_confidence: f64,
}

fn default_floor() -> f64 {
    0.3
}

fn default_mismatch_floor() -> f64 {
    1.0
}

fn default_output_confidence_threshold() -> f64 {
    0.3
}

fn default_derived_confidence_threshold() -> f64 {
    0.1
}

fn default_anticipation_confidence() -> f64 {
    0.5
}

impl Default for SurprisePolicy {
    fn default() -> Self {
        Self {
            floor: default_floor(),
            mismatch_floor: default_mismatch_floor(),
            output_confidence_threshold: default_output_confidence_threshold(),
            derived_confidence_threshold: default_derived_confidence_threshold(),
            default_anticipation_confidence: default_anticipation_confidence(),
        }
    }
}

/// Configuration for an engine process handle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub dialect: DialectKind,

    /// Executable to launch; the dialect's default when unset.
    #[serde(default)]
    pub program: Option<PathBuf>,

    /// Arguments; the dialect's interactive-mode arguments when unset.
    #[serde(default)]
    pub args: Option<Vec<String>>,

    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Transcript of every output line; none when unset.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// How long `stop()` waits after closing stdin before killing.
    #[serde(default = "default_grace_period", with = "humantime_serde")]
    pub stop_grace_period: Duration,

    /// How long `stop()` waits for the reader thread.
    #[serde(default = "default_grace_period", with = "humantime_serde")]
    pub reader_join_timeout: Duration,

    #[serde(default)]
    pub surprise: SurprisePolicy,
}

fn default_grace_period() -> Duration {
    Duration::from_secs(1)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dialect: DialectKind::default(),
            program: None,
            args: None,
            working_dir: None,
            log_path: None,
            stop_grace_period: default_grace_period(),
            reader_join_timeout: default_grace_period(),
            surprise: SurprisePolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Config for a specific dialect with every other field defaulted.
    pub fn for_dialect(dialect: DialectKind) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = Some(program.into());
        self
    }

    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Log to the per-dialect file under the data directory unless a path is set.
    #[must_use]
    pub fn with_default_log(mut self) -> Self {
        if self.log_path.is_none() {
            self.log_path = Some(narsbridge_paths::engine_log_path(self.dialect.as_str()));
        }
        self
    }
}
