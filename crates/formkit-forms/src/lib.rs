//! Form state and validation for formkit
//!
//! This crate provides a headless form engine:
//! - Nested values addressed by dotted/indexed [`FieldPath`]s
//! - Declarative [`ValidationSchema`]s (required, pattern, email, length, custom)
//! - Touched tracking so errors show only after interaction
//! - Field-array editing (push, remove, insert, swap)
//! - Submission gating on a clean [`ErrorMap`]
//! - HTML renderers for fields and error messages
//!
//! ## Example
//!
//! ```
//! use formkit_forms::{FormEngine, SubmitOutcome, ValidationSchema};
//! use serde_json::json;
//!
//! let schema = ValidationSchema::builder()
//!     .required("name", "Required")
//!     .required("email", "Required")
//!     .email("email", "Invalid email format")
//!     .build()
//!     .unwrap();
//!
//! let mut form = FormEngine::builder(json!({ "name": "", "email": "" }))
//!     .schema(schema)
//!     .on_submit(|values| println!("submitted {}", values.to_value()))
//!     .build()
//!     .unwrap();
//!
//! assert!(matches!(form.submit(), SubmitOutcome::Rejected(_)));
//!
//! form.set_field_value("name", "Ada");
//! form.set_field_value("email", "ada@example.com");
//! assert_eq!(form.submit(), SubmitOutcome::Submitted);
//! ```

pub mod bound_field;
pub mod config;
pub mod engine;
pub mod errors;
pub mod path;
pub mod render;
pub mod rules;
pub mod snapshot;
pub mod values;

pub use bound_field::BoundField;
pub use config::FormConfig;
pub use engine::{FormEngine, FormEngineBuilder, SubmitHandler, SubmitOutcome};
pub use errors::{ErrorMap, FormError, FormResult};
pub use path::{FieldPath, IntoFieldPath, PathSegment};
pub use render::{
	ClassedError, ErrorRenderer, FieldRenderer, InputType, ListInput, PlainError, StyledError,
	TextArea, TextInput,
};
pub use rules::{Predicate, RuleKind, SchemaBuilder, ValidationRule, ValidationSchema};
pub use snapshot::FormSnapshot;
pub use values::FormValues;
