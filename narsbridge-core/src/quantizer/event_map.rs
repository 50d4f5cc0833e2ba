//! Online vector quantizer producing `event_<n>` symbols

use tracing::{debug, info, instrument};

use super::config::QuantizerConfig;
use crate::error::QuantizerError;

/// Render the symbol for a prototype index.
pub fn symbol(index: usize) -> String {
    format!("event_{index}")
}

/// Euclidean distance between two equal-length vectors.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Representative vector of one learned symbol
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    pub(super) vector: Vec<f64>,
    pub(super) usage: u64,
    pub(super) last_active: u64,
}

impl Prototype {
    fn new(vector: &[f64], tick: u64) -> Self {
        Self {
            vector: vector.to_vec(),
            usage: 1,
            last_active: tick,
        }
    }

    /// Move toward `input` by `rate` and record the match.
    fn absorb(&mut self, input: &[f64], rate: f64, tick: u64) {
        for (p, v) in self.vector.iter_mut().zip(input) {
            *p += rate * (v - *p);
        }
        self.usage = self.usage.saturating_add(1);
        self.last_active = tick;
    }

    pub fn vector(&self) -> &[f64] {
        &self.vector
    }

    /// Number of inputs this prototype has matched, including its creation.
    pub fn usage(&self) -> u64 {
        self.usage
    }

    /// Tick of the most recent match.
    pub fn last_active(&self) -> u64 {
        self.last_active
    }
}

/// Incremental clustering of observation vectors into named symbols.
///
/// A prototype's position in the collection is its identity: prototype `i`
/// is reported as `event_i`. [`prune`](Self::prune) compacts the collection,
/// so every symbol returned before a prune that removed something at a lower
/// index now names a different prototype (or nothing). Callers holding old
/// symbols must treat them as stale; the reasoning engine is expected to
/// relearn under the new names.
#[derive(Debug, Clone)]
pub struct EventQuantizer {
    pub(super) dimension: usize,
    pub(super) learning_rate: f64,
    pub(super) min_vigilance: f64,
    pub(super) vigilance_step: f64,
    pub(super) vigilance: f64,
    pub(super) prototypes: Vec<Prototype>,
}

impl EventQuantizer {
    /// Build an empty quantizer.
    ///
    /// Out-of-range tuning values are logged and replaced by their defaults;
    /// call [`QuantizerConfig::validate`] first to reject them instead.
    pub fn new(config: QuantizerConfig) -> Self {
        let config = config.sanitized();
        Self {
            dimension: config.dimension,
            learning_rate: config.learning_rate,
            min_vigilance: config.min_vigilance,
            vigilance_step: config.vigilance_step,
            vigilance: config.vigilance.max(config.min_vigilance),
            prototypes: Vec::new(),
        }
    }

    /// Map `vector` to a symbol, learning from it.
    ///
    /// The nearest prototype strictly closer than the vigilance threshold
    /// absorbs the input; otherwise a new prototype is created from it.
    /// Equal distances resolve to the lowest index.
    pub fn quantize(&mut self, vector: &[f64], tick: u64) -> Result<String, QuantizerError> {
        self.validate(vector)?;

        let index = match self.nearest(vector) {
            Some((index, distance)) if distance < self.vigilance => {
                self.prototypes[index].absorb(vector, self.learning_rate, tick);
                index
            }
            nearest => {
                self.prototypes.push(Prototype::new(vector, tick));
                let index = self.prototypes.len() - 1;
                debug!(
                    index,
                    nearest_distance = ?nearest.map(|(_, d)| d),
                    vigilance = self.vigilance,
                    "Created prototype"
                );
                index
            }
        };

        Ok(symbol(index))
    }

    /// Index of and distance to the closest prototype, first index on ties.
    pub fn nearest(&self, vector: &[f64]) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (index, prototype) in self.prototypes.iter().enumerate() {
            let distance = euclidean_distance(&prototype.vector, vector);
            match best {
                Some((_, closest)) if distance >= closest => {}
                _ => best = Some((index, distance)),
            }
        }
        best
    }

    /// Tighten vigilance in proportion to a positive prediction error.
    ///
    /// Never relaxes: zero, negative and NaN errors leave it unchanged.
    pub fn adjust_vigilance(&mut self, error: f64) {
        if error > 0.0 {
            let previous = self.vigilance;
            self.vigilance = (self.vigilance - self.vigilance_step * error).max(self.min_vigilance);
            debug!(error, previous, vigilance = self.vigilance, "Adjusted vigilance");
        }
    }

    /// Remove prototypes idle for more than `age_threshold` ticks.
    ///
    /// Survivors keep their relative order and are renumbered densely from
    /// zero. Returns the number of prototypes removed.
    #[instrument(skip(self), fields(before = self.prototypes.len()))]
    pub fn prune(&mut self, current_tick: u64, age_threshold: u64) -> usize {
        let before = self.prototypes.len();
        self.prototypes
            .retain(|p| current_tick.saturating_sub(p.last_active) <= age_threshold);
        let removed = before - self.prototypes.len();
        if removed > 0 {
            info!(removed, remaining = self.prototypes.len(), "Pruned idle prototypes");
        }
        removed
    }

    pub fn prototypes(&self) -> &[Prototype] {
        &self.prototypes
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    pub fn vigilance(&self) -> f64 {
        self.vigilance
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub(super) fn validate(&self, vector: &[f64]) -> Result<(), QuantizerError> {
        if vector.len() != self.dimension {
            return Err(QuantizerError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        if vector.iter().any(|v| !v.is_finite()) {
            return Err(QuantizerError::NonFinite);
        }
        Ok(())
    }
}

impl Default for EventQuantizer {
    fn default() -> Self {
        Self::new(QuantizerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quantizer(dimension: usize, vigilance: f64) -> EventQuantizer {
        EventQuantizer::new(
            QuantizerConfig::default()
                .with_dimension(dimension)
                .with_vigilance(vigilance),
        )
    }

    // ==================== Distance Tests ====================

    #[test]
    fn euclidean_distance_known_value() {
        assert!((euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn euclidean_distance_identical_is_zero() {
        assert_eq!(euclidean_distance(&[0.3, 0.7], &[0.3, 0.7]), 0.0);
    }

    // ==================== Quantize Tests ====================

    #[test]
    fn first_vector_creates_event_zero() {
        let mut q = quantizer(2, 0.5);
        assert_eq!(q.quantize(&[0.1, 0.1], 0).unwrap(), "event_0");
        assert_eq!(q.len(), 1);
        assert_eq!(q.prototypes()[0].usage(), 1);
    }

    #[test]
    fn match_moves_prototype_toward_input() {
        let mut q = quantizer(2, 0.5);
        q.quantize(&[0.0, 0.0], 0).unwrap();
        assert_eq!(q.quantize(&[0.2, 0.0], 3).unwrap(), "event_0");

        let prototype = &q.prototypes()[0];
        assert!((prototype.vector()[0] - 0.02).abs() < 1e-12);
        assert_eq!(prototype.vector()[1], 0.0);
        assert_eq!(prototype.usage(), 2);
        assert_eq!(prototype.last_active(), 3);
    }

    #[test]
    fn distance_equal_to_vigilance_is_novel() {
        let mut q = quantizer(1, 0.5);
        q.quantize(&[0.0], 0).unwrap();
        assert_eq!(q.quantize(&[0.5], 1).unwrap(), "event_1");
    }

    #[test]
    fn novelty_appends_next_index() {
        let mut q = quantizer(2, 0.5);
        q.quantize(&[0.0, 0.0], 0).unwrap();
        q.quantize(&[5.0, 5.0], 1).unwrap();
        assert_eq!(q.quantize(&[-5.0, 5.0], 2).unwrap(), "event_2");
        assert_eq!(q.len(), 3);
        assert_eq!(q.prototypes()[2].vector(), &[-5.0, 5.0]);
    }

    #[test]
    fn nearest_prototype_under_threshold_wins() {
        let mut q = quantizer(1, 1.0);
        q.quantize(&[0.0], 0).unwrap();
        q.quantize(&[2.0], 0).unwrap();
        assert_eq!(q.quantize(&[1.7], 1).unwrap(), "event_1");
    }

    #[test]
    fn ties_resolve_to_lowest_index() {
        let mut q = quantizer(1, 2.0);
        q.quantize(&[0.0], 0).unwrap();
        q.prototypes.push(Prototype::new(&[2.0], 0));
        assert_eq!(q.nearest(&[1.0]), Some((0, 1.0)));
        assert_eq!(q.quantize(&[1.0], 1).unwrap(), "event_0");
    }

    #[test]
    fn repeated_input_converges() {
        let mut q = quantizer(2, 0.5);
        q.quantize(&[0.0, 0.0], 0).unwrap();
        let target = [0.3, -0.2];
        let mut previous = f64::MAX;
        for tick in 1..200 {
            assert_eq!(q.quantize(&target, tick).unwrap(), "event_0");
            let distance = euclidean_distance(q.prototypes()[0].vector(), &target);
            assert!(distance <= previous);
            previous = distance;
        }
        assert!(previous < 1e-6);
    }

    #[test]
    fn wrong_dimension_is_rejected_without_learning() {
        let mut q = quantizer(2, 0.5);
        let err = q.quantize(&[1.0, 2.0, 3.0], 0).unwrap_err();
        assert!(matches!(
            err,
            QuantizerError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
        assert!(q.is_empty());
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let mut q = quantizer(2, 0.5);
        assert!(matches!(
            q.quantize(&[f64::NAN, 0.0], 0),
            Err(QuantizerError::NonFinite)
        ));
        assert!(q.is_empty());
    }

    // ==================== Vigilance Tests ====================

    #[test]
    fn positive_error_tightens_vigilance() {
        let mut q = quantizer(2, 0.5);
        q.adjust_vigilance(1.0);
        assert!((q.vigilance() - 0.45).abs() < 1e-12);
        q.adjust_vigilance(0.3);
        assert!((q.vigilance() - 0.435).abs() < 1e-12);
    }

    #[test]
    fn zero_and_negative_error_are_noops() {
        let mut q = quantizer(2, 0.5);
        q.adjust_vigilance(0.0);
        q.adjust_vigilance(-3.0);
        q.adjust_vigilance(f64::NAN);
        assert_eq!(q.vigilance(), 0.5);
    }

    #[test]
    fn negative_floor_falls_back_to_default() {
        let mut q = EventQuantizer::new(
            QuantizerConfig::default()
                .with_dimension(2)
                .with_min_vigilance(-1.0),
        );
        q.adjust_vigilance(100.0);
        assert_eq!(q.vigilance(), 0.01);
    }

    #[test]
    fn negative_step_never_raises_vigilance() {
        let mut q = EventQuantizer::new(
            QuantizerConfig::default()
                .with_dimension(2)
                .with_vigilance_step(-0.05),
        );
        q.adjust_vigilance(1.0);
        assert!(q.vigilance() <= 0.5);
        assert!((q.vigilance() - 0.45).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_learning_rate_falls_back_to_default() {
        let q = EventQuantizer::new(QuantizerConfig::default().with_learning_rate(-0.5));
        assert_eq!(q.learning_rate(), 0.1);
    }

    #[test]
    fn vigilance_is_floored() {
        let mut q = quantizer(2, 0.5);
        for _ in 0..100 {
            q.adjust_vigilance(5.0);
        }
        assert_eq!(q.vigilance(), 0.01);
        q.adjust_vigilance(5.0);
        assert_eq!(q.vigilance(), 0.01);
    }

    // ==================== Prune Tests ====================

    #[test]
    fn prune_keeps_survivor_order() {
        let mut q = quantizer(1, 0.5);
        for (tick, value) in [(0, 0.0), (50, 10.0), (1, 20.0), (60, 30.0)] {
            q.quantize(&[value], tick).unwrap();
        }

        assert_eq!(q.prune(65, 20), 2);

        let remaining: Vec<f64> = q.prototypes().iter().map(|p| p.vector()[0]).collect();
        assert_eq!(remaining, vec![10.0, 30.0]);
        assert_eq!(q.quantize(&[30.0], 66).unwrap(), "event_1");
    }

    #[test]
    fn prune_boundary_age_survives() {
        let mut q = quantizer(1, 0.5);
        q.quantize(&[0.0], 10).unwrap();
        assert_eq!(q.prune(20, 10), 0);
        assert_eq!(q.prune(21, 10), 1);
        assert!(q.is_empty());
    }

    #[test]
    fn prune_on_empty_quantizer_is_noop() {
        let mut q = quantizer(1, 0.5);
        assert_eq!(q.prune(1_000, 0), 0);
    }
}
