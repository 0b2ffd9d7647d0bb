//! Logging hooks for the engine.
//!
//! With the `tracing` feature the macros forward to `tracing`, without it they
//! expand to nothing and their arguments are never evaluated. Use them in
//! statement position only.

/// A trace-level event.
#[cfg(feature = "tracing")]
macro_rules! trace {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// A trace-level span, entered until the end of the enclosing block.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($($arg:tt)*) => {
        let _entered = ::tracing::trace_span!($($arg)*).entered();
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($($arg:tt)*) => {};
}

pub(crate) use {trace, trace_span};
