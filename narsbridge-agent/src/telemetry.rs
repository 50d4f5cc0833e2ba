//! Logging setup

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::TelemetryError;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug` over
/// `info`. Engine stderr is logged under the `engine` target, so
/// `RUST_LOG=info,engine=debug` shows it without the bridge's own debug
/// output.
pub fn init_logging(verbose: bool) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_an_error() {
        let _ = init_logging(false);
        assert!(matches!(
            init_logging(true),
            Err(TelemetryError::SetGlobalSubscriber(_))
        ));
    }
}
