//! SeaORM entities for the budgeting ledger. Schema management lives in the
//! `migration` crate; the engine logic in `compute`.

pub mod entities;

/// Installs the stdout tracing subscriber for an embedding binary.
/// Filtering follows `RUST_LOG`; tests install their own subscriber or none.
#[cfg(not(test))]
pub fn init_tracing() {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_span_events(FmtSpan::CLOSE)
        .init();
}
