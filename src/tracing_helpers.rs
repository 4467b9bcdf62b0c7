//! Zero-cost tracing helpers.
//!
//! With the `tracing` feature these macros forward to the `tracing` crate,
//! otherwise they expand to nothing.
//!
//! ```bash
//! cargo test --features tracing
//! ```
#![allow(unused_macros, unused_imports)]

/// Trace-level event, used for structural changes (rotations, relinks).
#[cfg(feature = "tracing")]
macro_rules! trace_log {
	($($arg:tt)*) => {
		tracing::trace!($($arg)*)
	};
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_log {
	($($arg:tt)*) => {};
}

/// Debug-level event, used for map-level mutations.
#[cfg(feature = "tracing")]
macro_rules! debug_log {
	($($arg:tt)*) => {
		tracing::debug!($($arg)*)
	};
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_log {
	($($arg:tt)*) => {};
}

pub(crate) use debug_log;
pub(crate) use trace_log;
