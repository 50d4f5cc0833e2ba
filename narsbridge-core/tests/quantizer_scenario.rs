//! End-to-end quantizer behaviour: learning, surprise, pruning and
//! persistence through the public API.

use narsbridge_core::{EventQuantizer, QuantizerConfig, QuantizerError, narsese};
use tempfile::TempDir;

fn two_d() -> EventQuantizer {
    EventQuantizer::new(
        QuantizerConfig::default()
            .with_dimension(2)
            .with_vigilance(0.5),
    )
}

#[test]
fn learn_prune_and_rename() {
    let mut quantizer = two_d();

    assert_eq!(quantizer.quantize(&[0.1, 0.1], 0).unwrap(), "event_0");
    assert_eq!(quantizer.quantize(&[0.15, 0.1], 0).unwrap(), "event_0");
    let drifted = quantizer.prototypes()[0].vector()[0];
    assert!(drifted > 0.1 && drifted < 0.15);

    assert_eq!(quantizer.quantize(&[0.9, 0.9], 99).unwrap(), "event_1");
    assert_eq!(quantizer.len(), 2);

    assert_eq!(quantizer.prune(100, 10), 1);
    assert_eq!(quantizer.len(), 1);

    // The survivor was event_1 and now answers to event_0.
    assert_eq!(quantizer.prototypes()[0].last_active(), 99);
    assert_eq!(quantizer.quantize(&[0.9, 0.9], 100).unwrap(), "event_0");
}

#[test]
fn surprise_splits_a_category() {
    let mut quantizer = two_d();
    assert_eq!(quantizer.quantize(&[0.0, 0.0], 0).unwrap(), "event_0");
    assert_eq!(quantizer.quantize(&[0.3, 0.0], 1).unwrap(), "event_0");

    // Repeated surprise tightens vigilance below the gap between the inputs.
    for _ in 0..10 {
        quantizer.adjust_vigilance(1.0);
    }
    assert!(quantizer.vigilance() < 0.3);
    assert_eq!(quantizer.quantize(&[0.45, 0.0], 2).unwrap(), "event_1");
}

#[test]
fn tokens_become_observations() {
    let mut quantizer = two_d();
    let token = quantizer.quantize(&[0.2, 0.4], 0).unwrap();
    let sentence = narsese::observation(&token);
    assert_eq!(sentence, "<event_0 --> seen>. :|:");
    assert_eq!(narsese::observed_term(&sentence).as_deref(), Some("event_0"));
}

#[test]
fn rejected_input_leaves_state_untouched() {
    let mut quantizer = two_d();
    quantizer.quantize(&[0.1, 0.1], 0).unwrap();

    assert!(matches!(
        quantizer.quantize(&[0.1, 0.1, 0.1], 1),
        Err(QuantizerError::DimensionMismatch {
            expected: 2,
            actual: 3
        })
    ));
    assert!(matches!(
        quantizer.quantize(&[f64::NAN, 0.1], 1),
        Err(QuantizerError::NonFinite)
    ));
    assert_eq!(quantizer.len(), 1);
    assert_eq!(quantizer.prototypes()[0].usage(), 1);
}

#[test]
fn knowledge_survives_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("agent").join("knowledge.json");

    let mut quantizer = two_d();
    quantizer.quantize(&[0.1, 0.1], 0).unwrap();
    quantizer.quantize(&[0.12, 0.1], 3).unwrap();
    quantizer.quantize(&[0.9, 0.9], 7).unwrap();
    quantizer.adjust_vigilance(0.5);
    quantizer.save(&path).unwrap();

    let restored = EventQuantizer::load(&path).unwrap();
    assert_eq!(restored.len(), 2);
    assert_eq!(restored.vigilance(), quantizer.vigilance());
    for (before, after) in quantizer.prototypes().iter().zip(restored.prototypes()) {
        assert_eq!(before.vector(), after.vector());
        assert_eq!(before.usage(), after.usage());
        assert_eq!(before.last_active(), after.last_active());
    }

    // Learning continues where it left off.
    let mut restored = restored;
    assert_eq!(restored.quantize(&[0.9, 0.88], 8).unwrap(), "event_1");
}

#[test]
fn loading_missing_knowledge_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = EventQuantizer::load(dir.path().join("absent.json"));
    assert!(matches!(result, Err(QuantizerError::Io(_))));
}
