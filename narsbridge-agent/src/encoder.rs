//! Observation encoders
//!
//! An [`Encoder`] turns an environment observation into the fixed-length
//! vector the quantizer clusters.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, StandardNormal};

use crate::error::EncoderError;

/// Maps observations of type `O` to vectors of [`output_dimension`](Self::output_dimension)
pub trait Encoder<O: ?Sized> {
    fn output_dimension(&self) -> usize;

    fn encode(&self, observation: &O) -> Result<Vec<f64>, EncoderError>;
}

/// Fixed Gaussian random projection with L2-normalised output.
///
/// The weights are drawn from a seeded generator, so the same seed always
/// yields the same projection. They are never persisted; reuse the seed to
/// keep saved quantizer knowledge meaningful across runs.
#[derive(Debug, Clone)]
pub struct RandomProjection {
    input_dimension: usize,
    output_dimension: usize,
    /// Row-major, one row of `output_dimension` weights per input value
    weights: Vec<f64>,
}

impl RandomProjection {
    pub fn new(input_dimension: usize, output_dimension: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let weights = (0..input_dimension * output_dimension)
            .map(|_| StandardNormal.sample(&mut rng))
            .collect();
        Self {
            input_dimension,
            output_dimension,
            weights,
        }
    }

    pub fn input_dimension(&self) -> usize {
        self.input_dimension
    }
}

impl<O: AsRef<[f64]> + ?Sized> Encoder<O> for RandomProjection {
    fn output_dimension(&self) -> usize {
        self.output_dimension
    }

    fn encode(&self, observation: &O) -> Result<Vec<f64>, EncoderError> {
        let input = observation.as_ref();
        if input.len() != self.input_dimension {
            return Err(EncoderError::InputMismatch {
                expected: self.input_dimension,
                actual: input.len(),
            });
        }

        let mut output = vec![0.0; self.output_dimension];
        if output.is_empty() {
            return Ok(output);
        }
        for (value, row) in input.iter().zip(self.weights.chunks(self.output_dimension)) {
            for (out, weight) in output.iter_mut().zip(row) {
                *out += value * weight;
            }
        }

        normalize(&mut output);
        Ok(output)
    }
}

/// Passes vector observations through unchanged
#[derive(Debug, Clone, Copy)]
pub struct Passthrough {
    dimension: usize,
}

impl Passthrough {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl<O: AsRef<[f64]> + ?Sized> Encoder<O> for Passthrough {
    fn output_dimension(&self) -> usize {
        self.dimension
    }

    fn encode(&self, observation: &O) -> Result<Vec<f64>, EncoderError> {
        let input = observation.as_ref();
        if input.len() != self.dimension {
            return Err(EncoderError::InputMismatch {
                expected: self.dimension,
                actual: input.len(),
            });
        }
        Ok(input.to_vec())
    }
}

/// Scale to unit length; the zero vector is left as is.
fn normalize(vector: &mut [f64]) {
    let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(vector: &[f64]) -> f64 {
        vector.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    #[test]
    fn projection_output_is_unit_length() {
        let encoder = RandomProjection::new(147, 64, 7);
        let observation: Vec<f64> = (0..147).map(|i| (i % 11) as f64).collect();

        let encoded = encoder.encode(&observation).unwrap();
        assert_eq!(encoded.len(), 64);
        assert!((norm(&encoded) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn projection_is_deterministic_per_seed() {
        let observation: Vec<f64> = vec![1.0, 0.0, 2.0, 5.0];
        let a = RandomProjection::new(4, 8, 42).encode(&observation).unwrap();
        let b = RandomProjection::new(4, 8, 42).encode(&observation).unwrap();
        let c = RandomProjection::new(4, 8, 43).encode(&observation).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn zero_observation_stays_zero() {
        let encoded = RandomProjection::new(3, 5, 1).encode(&[0.0_f64; 3][..]).unwrap();
        assert_eq!(encoded, vec![0.0; 5]);
    }

    #[test]
    fn projection_rejects_wrong_length() {
        let encoder = RandomProjection::new(3, 5, 1);
        assert_eq!(
            encoder.encode(&vec![1.0_f64, 2.0]),
            Err(EncoderError::InputMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn passthrough_copies_input() {
        let encoder = Passthrough::new(2);
        assert_eq!(encoder.encode(&vec![0.25_f64, 0.75]).unwrap(), vec![0.25, 0.75]);
        assert!(encoder.encode(&vec![1.0_f64]).is_err());
    }
}
