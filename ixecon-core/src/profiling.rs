//! Tracy profiling support.
//!
//! With the `tracy` feature enabled, `tracing` spans from the engine,
//! projections and batches are reported to Tracy.
//!
//! ## Usage
//!
//! 1. Enable the feature: `cargo build -p ixecon --features tracy`
//! 2. Call [`init_tracy()`] early in main
//! 3. Connect the Tracy GUI or capture tool
//!
//! Each completed recalculation batch emits a frame marker via [`frame_mark_batch`].

/// Trace level for Tracy profiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraceLevel {
    /// Batch and projection spans only
    #[default]
    Info,
    Debug,
    /// Includes per-step engine spans
    Trace,
}

impl std::str::FromStr for TraceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(TraceLevel::Info),
            "debug" => Ok(TraceLevel::Debug),
            "trace" => Ok(TraceLevel::Trace),
            _ => Err(format!(
                "Invalid trace level: {}. Use info, debug, or trace.",
                s
            )),
        }
    }
}

/// Initialize the Tracy tracing subscriber.
///
/// No-op unless the `tracy` feature is enabled.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
#[cfg(feature = "tracy")]
pub fn init_tracy(level: TraceLevel) {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::prelude::*;

    let filter = match level {
        TraceLevel::Info => LevelFilter::INFO,
        TraceLevel::Debug => LevelFilter::DEBUG,
        TraceLevel::Trace => LevelFilter::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_tracy::TracyLayer::default())
        .with(filter)
        .init();
}

#[cfg(not(feature = "tracy"))]
pub fn init_tracy(_level: TraceLevel) {}

/// Marks the end of a recalculation batch in Tracy's timeline.
#[cfg(feature = "tracy")]
#[inline]
pub fn frame_mark_batch() {
    tracy_client::secondary_frame_mark!("batch");
}

#[cfg(not(feature = "tracy"))]
#[inline]
pub fn frame_mark_batch() {}
