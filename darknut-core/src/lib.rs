//! Core of darknut: the NewsDoc document model, the annotation parser, scalar
//! decoding and the recursive engine that maps a document onto a type's
//! [`Shape`].
//!
//! Most users want the `darknut` crate, which re-exports everything here
//! together with `#[derive(Unmarshal)]`.

#![deny(missing_docs, rustdoc::broken_intra_doc_links)]

mod tracing_macros;

mod document;
pub use document::*;

mod error;
pub use error::*;

mod layout;
pub use layout::*;

mod scalar;
pub use scalar::*;

mod shape;
pub use shape::*;

mod source;
pub use source::*;

mod tag;
pub use tag::*;

mod unmarshal;
pub use unmarshal::*;

#[doc(hidden)]
pub mod __private;
