//! Opt-in tracing setup for hosts embedding `grapheme-rs`.
//!
//! Gridline recomputes log at `debug`, widening steps and solved spacings at
//! `trace`, and soft failures (gridline limit exceeded, element update
//! failed) at `warn`. Hosts with their own subscriber can ignore this module.

/// Filter used when `RUST_LOG` is unset: warnings everywhere, recompute
/// summaries from this crate.
pub const DEFAULT_FILTER: &str = "warn,grapheme_rs=debug";

/// Installs a compact `tracing` subscriber filtered by `RUST_LOG`, falling back
/// to [`DEFAULT_FILTER`].
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter(DEFAULT_FILTER)
}

/// Same as [`init_default_tracing`] with a caller-provided fallback directive.
#[must_use]
pub fn init_tracing_with_filter(fallback: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback;
        false
    }
}
