//! Form engine, validation rules and renderers.
//!
//! Everything from the `formkit-forms` crate, including the [`render`]
//! module.

pub use formkit_forms::*;
