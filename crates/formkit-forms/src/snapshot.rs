//! Serializable form state
//!
//! [`FormSnapshot`] is plain data copied out of a [`FormEngine`], for a
//! presentation layer that lives elsewhere (another thread, a client, a
//! template) and cannot hold the engine with its submit closure.
//!
//! ## Example
//!
//! ```
//! use formkit_forms::FormEngine;
//! use serde_json::json;
//!
//! let form = FormEngine::builder(json!({ "name": "" })).build().unwrap();
//!
//! let snapshot = form.snapshot();
//! let json = serde_json::to_string(&snapshot).unwrap();
//! assert!(json.contains("\"submit_count\":0"));
//! ```
//!
//! [`FormEngine`]: crate::FormEngine

use crate::errors::ErrorMap;
use crate::path::FieldPath;
use crate::values::FormValues;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Everything a renderer reads from a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSnapshot {
	pub values: FormValues,

	/// Failing fields and their messages
	pub errors: ErrorMap,

	/// Fields the user has interacted with
	#[serde(default)]
	pub touched: BTreeSet<FieldPath>,

	pub is_valid: bool,

	pub is_dirty: bool,

	#[serde(default)]
	pub submit_count: usize,
}

impl FormSnapshot {
	/// Error for `path` if it should be displayed (the field is touched).
	pub fn visible_error(&self, path: &FieldPath) -> Option<&str> {
		if self.touched.contains(path) {
			self.errors.get(path)
		} else {
			None
		}
	}
}
