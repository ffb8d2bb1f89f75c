//! # formkit
//!
//! Headless form state and validation for Rust.
//!
//! A [`FormEngine`] owns a form's values, which fields the user has touched,
//! and the errors produced by its [`ValidationSchema`]. Rendering is left to
//! the caller; the `render` module ships HTML renderers for the common cases.
//!
//! ## Feature Flags
//!
//! - `forms` (default) - The form engine, validation rules and renderers
//!
//! ## Quick Example
//!
//! ```rust
//! # #[cfg(feature = "forms")]
//! # {
//! use formkit::{FormEngine, ValidationSchema};
//! use serde_json::json;
//!
//! let mut form = FormEngine::builder(json!({ "email": "" }))
//!     .schema(
//!         ValidationSchema::builder()
//!             .required("email", "Required")
//!             .email("email", "Invalid email format")
//!             .build()
//!             .unwrap(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! form.set_field_value("email", "not-an-email");
//! form.set_field_touched("email");
//! assert_eq!(form.errors().get("email"), Some("Invalid email format"));
//! # }
//! ```

#[cfg(feature = "forms")]
pub mod forms;

// Re-export forms (forms feature)
#[cfg(feature = "forms")]
pub use formkit_forms::{
	BoundField, ErrorMap, FieldPath, FormConfig, FormEngine, FormError, FormResult, FormSnapshot,
	FormValues, SubmitOutcome, ValidationSchema,
};
