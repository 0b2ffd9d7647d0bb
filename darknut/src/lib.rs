#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub use darknut_core::*;

#[doc(hidden)]
pub use darknut_core::__private;

pub use darknut_macros::Unmarshal;
