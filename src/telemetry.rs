//! Telemetry helpers for hosts embedding `eth-charts`.
//!
//! The pipeline only emits `tracing` events; installing a subscriber is the
//! host's decision. These helpers exist for demos and tools that have no
//! subscriber of their own.

/// Default filter directive used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "eth_charts=info";

/// Installs a compact subscriber filtered by `RUST_LOG`, or `DEFAULT_FILTER`.
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_fallback(DEFAULT_FILTER)
}

/// Same as [`init_default_tracing`] with a caller-chosen fallback directive,
/// e.g. `"eth_charts=trace"` while debugging hover lookups.
#[must_use]
pub fn init_tracing_with_fallback(fallback_directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_directive));

        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_directive;
        false
    }
}
