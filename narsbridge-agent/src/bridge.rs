//! The bridge loop
//!
//! Each tick the agent encodes the current observation, quantizes it to a
//! symbol, tells the engine it saw that symbol, lets the engine think for
//! `settle_delay`, then acts on whatever operation the engine executed. When
//! the engine stays silent or picks an operation with no action binding the
//! environment's own random action is used instead (motor babbling).

use narsbridge_core::{
    ActionMapper, EngineState, EventQuantizer, ReasoningEngine, UNKNOWN_ACTION, narsese,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};

use crate::config::EpisodeConfig;
use crate::encoder::Encoder;
use crate::environment::Environment;
use crate::error::Result;

/// Summary of one finished episode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    pub episode: usize,
    pub steps: usize,
    pub total_reward: f64,
    /// Steps whose action came from the engine
    pub engine_actions: usize,
    /// Steps whose action was sampled from the environment
    pub babbled_actions: usize,
    /// Steps after which the engine reported a prediction error
    pub surprises: usize,
    pub derived_statements: usize,
    pub anticipations: usize,
    /// Prototypes removed by the post-episode prune
    pub pruned: usize,
    pub vocabulary_size: usize,
}

impl EpisodeReport {
    fn new(episode: usize) -> Self {
        Self {
            episode,
            ..Self::default()
        }
    }
}

/// Drives episodes of an environment through a reasoning engine
pub struct BridgeLoop<E, C>
where
    E: Environment,
    C: Encoder<E::Observation>,
{
    env: E,
    encoder: C,
    engine: Box<dyn ReasoningEngine>,
    quantizer: EventQuantizer,
    mapper: ActionMapper,
    config: EpisodeConfig,
    tick: u64,
}

impl<E, C> BridgeLoop<E, C>
where
    E: Environment,
    C: Encoder<E::Observation>,
{
    pub fn new(
        env: E,
        encoder: C,
        engine: Box<dyn ReasoningEngine>,
        quantizer: EventQuantizer,
        mapper: ActionMapper,
        config: EpisodeConfig,
    ) -> Self {
        Self {
            env,
            encoder,
            engine,
            quantizer,
            mapper,
            config,
            tick: 0,
        }
    }

    pub fn quantizer(&self) -> &EventQuantizer {
        &self.quantizer
    }

    pub fn engine(&self) -> &dyn ReasoningEngine {
        self.engine.as_ref()
    }

    pub fn environment(&self) -> &E {
        &self.env
    }

    /// Ticks elapsed over all episodes
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Replace the quantizer with saved knowledge, if the file exists.
    pub fn load_knowledge(&mut self) -> Result<bool> {
        let Some(path) = &self.config.knowledge_path else {
            return Ok(false);
        };
        if !path.exists() {
            info!(path = %path.display(), "No saved knowledge, starting fresh");
            return Ok(false);
        }

        self.quantizer = EventQuantizer::load(path)?;
        info!(
            path = %path.display(),
            prototypes = self.quantizer.len(),
            vigilance = self.quantizer.vigilance(),
            "Loaded knowledge"
        );
        Ok(true)
    }

    /// Write the quantizer to the knowledge path, if one is configured.
    pub fn save_knowledge(&self) -> Result<()> {
        if let Some(path) = &self.config.knowledge_path {
            self.quantizer.save(path)?;
            info!(
                path = %path.display(),
                prototypes = self.quantizer.len(),
                "Saved knowledge"
            );
        }
        Ok(())
    }

    /// Run one episode to termination or `max_steps`.
    #[instrument(skip(self))]
    pub async fn run_episode(&mut self, episode: usize) -> Result<EpisodeReport> {
        let mut report = EpisodeReport::new(episode);
        let mut observation = self.env.reset();
        self.engine.send(&narsese::goal(&self.config.goal_term));

        while report.steps < self.config.max_steps {
            self.tick += 1;

            let vector = self.encoder.encode(&observation)?;
            let token = self.quantizer.quantize(&vector, self.tick)?;
            self.engine.send(&narsese::observation(&token));

            tokio::time::sleep(self.config.settle_delay).await;

            let action = self.choose_action(&mut report);
            let step = self.env.step(action);
            report.steps += 1;
            report.total_reward += step.reward;
            trace!(tick = self.tick, token = %token, action, reward = step.reward, "Step");

            if step.reward > 0.0 {
                debug!(reward = step.reward, "Goal reached");
                self.engine.send(&narsese::observation(&self.config.goal_term));
            }

            let error = self.engine.get_prediction_error();
            if error > 0.0 {
                report.surprises += 1;
                self.quantizer.adjust_vigilance(error);
            }
            self.drain_engine_output(&mut report);

            let terminal = step.is_terminal();
            observation = step.observation;
            if terminal {
                break;
            }
        }

        if let Some(age) = self.config.prune_age {
            report.pruned = self.quantizer.prune(self.tick, age);
        }
        self.save_knowledge()?;
        report.vocabulary_size = self.quantizer.len();

        info!(
            episode,
            steps = report.steps,
            reward = report.total_reward,
            engine_actions = report.engine_actions,
            babbled = report.babbled_actions,
            vocabulary = report.vocabulary_size,
            "Episode complete"
        );
        Ok(report)
    }

    /// Load knowledge, start the engine and run `episodes` episodes.
    ///
    /// The engine is stopped on every exit path.
    pub async fn run(&mut self, episodes: usize) -> Result<Vec<EpisodeReport>> {
        let result = self.run_episodes(episodes).await;
        self.engine.stop();
        result
    }

    async fn run_episodes(&mut self, episodes: usize) -> Result<Vec<EpisodeReport>> {
        self.load_knowledge()?;

        if self.engine.state() == EngineState::Idle {
            self.engine.start();
        }
        if !self.engine.is_running() {
            warn!(
                engine = self.engine.name(),
                state = %self.engine.state(),
                "Engine unavailable, actions will be babbled"
            );
        }

        let mut reports = Vec::with_capacity(episodes);
        for episode in 0..episodes {
            reports.push(self.run_episode(episode).await?);
        }
        Ok(reports)
    }

    fn choose_action(&mut self, report: &mut EpisodeReport) -> i32 {
        if let Some(op) = self.engine.get_action() {
            let action = self.mapper.map_action(&op);
            if action != UNKNOWN_ACTION {
                debug!(op = %op, action, "Engine chose action");
                report.engine_actions += 1;
                return action;
            }
            debug!(op = %op, "Engine operation has no action binding");
        }

        report.babbled_actions += 1;
        self.env.sample_action()
    }

    fn drain_engine_output(&mut self, report: &mut EpisodeReport) {
        for statement in self.engine.get_derived() {
            trace!(statement = %statement, "Derived");
            report.derived_statements += 1;
        }
        for anticipation in self.engine.get_anticipations() {
            trace!(
                confidence = anticipation.confidence,
                statement = %anticipation.statement,
                "Anticipated"
            );
            report.anticipations += 1;
        }
    }
}
