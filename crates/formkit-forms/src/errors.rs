//! Validation results and contract violations
//!
//! Two kinds of failure exist in this crate and they never mix:
//!
//! - [`ErrorMap`] holds user-facing validation failures, one message per
//!   failing field. It is data, not an error, and is rebuilt from scratch on
//!   every validation pass.
//! - [`FormError`] reports a caller bug: a path that does not parse, a path
//!   that does not exist in the form values, an array operation on a scalar.

use crate::path::{FieldPath, IntoFieldPath};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error)]
pub enum FormError {
	#[error("Invalid field path `{input}`: {reason}")]
	InvalidPath { input: String, reason: &'static str },
	#[error("Field `{0}` does not exist in the form values")]
	UnknownPath(FieldPath),
	#[error("Field `{0}` is not an array")]
	NotAnArray(FieldPath),
	#[error("Index {index} is out of bounds for `{path}` (length {len})")]
	IndexOutOfBounds {
		path: FieldPath,
		index: usize,
		len: usize,
	},
	#[error("Form values must be an object, got {0}")]
	NotAnObject(&'static str),
	#[error("Invalid pattern for `{path}`: {source}")]
	InvalidPattern {
		path: FieldPath,
		#[source]
		source: regex::Error,
	},
	#[error("Invalid form configuration: {0}")]
	Config(#[from] toml::de::Error),
}

pub type FormResult<T> = Result<T, FormError>;

/// Active validation failures keyed by field path.
///
/// A path is present only while at least one of its rules fails. Entries
/// iterate in path order, so two maps built from the same values compare
/// equal and serialize identically.
///
/// # Examples
///
/// ```
/// use formkit_forms::ErrorMap;
///
/// let errors = ErrorMap::new();
/// assert!(errors.is_empty());
/// assert_eq!(errors.get("email"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorMap(BTreeMap<FieldPath, String>);

impl ErrorMap {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Message for `path`, if that field is currently failing.
	///
	/// Paths that do not parse simply have no entry.
	pub fn get(&self, path: impl IntoFieldPath) -> Option<&str> {
		let path = path.into_field_path().ok()?;
		self.0.get(&path).map(String::as_str)
	}

	pub fn contains(&self, path: &FieldPath) -> bool {
		self.0.contains_key(path)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &str)> {
		self.0.iter().map(|(path, message)| (path, message.as_str()))
	}

	pub fn paths(&self) -> impl Iterator<Item = &FieldPath> {
		self.0.keys()
	}

	/// Records `message` unless `path` already has one.
	pub(crate) fn insert_first(&mut self, path: &FieldPath, message: &str) {
		if !self.0.contains_key(path) {
			self.0.insert(path.clone(), message.to_string());
		}
	}
}

impl<'a> IntoIterator for &'a ErrorMap {
	type Item = (&'a FieldPath, &'a String);
	type IntoIter = std::collections::btree_map::Iter<'a, FieldPath, String>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_insert_first_keeps_earliest_message() {
		// Arrange
		let mut errors = ErrorMap::new();
		let path = FieldPath::key("email");

		// Act
		errors.insert_first(&path, "Required");
		errors.insert_first(&path, "Invalid email format");

		// Assert
		assert_eq!(errors.len(), 1);
		assert_eq!(errors.get("email"), Some("Required"));
	}

	#[rstest]
	fn test_get_with_unparseable_path_is_none() {
		let mut errors = ErrorMap::new();
		errors.insert_first(&FieldPath::key("name"), "Required");

		assert_eq!(errors.get("name."), None);
		assert_eq!(errors.get("name"), Some("Required"));
	}

	#[rstest]
	fn test_serializes_as_flat_string_map() {
		// Arrange
		let mut errors = ErrorMap::new();
		errors.insert_first(&FieldPath::key("social").child("facebook"), "Required");
		errors.insert_first(&FieldPath::key("friends").index(1), "Too short");

		// Act
		let json = serde_json::to_value(&errors).unwrap();

		// Assert
		assert_eq!(
			json,
			serde_json::json!({
				"friends[1]": "Too short",
				"social.facebook": "Required",
			})
		);
		let back: ErrorMap = serde_json::from_value(json).unwrap();
		assert_eq!(back, errors);
	}

	#[rstest]
	fn test_form_error_messages() {
		let err = FormError::IndexOutOfBounds {
			path: FieldPath::key("friends"),
			index: 3,
			len: 1,
		};
		assert_eq!(
			err.to_string(),
			"Index 3 is out of bounds for `friends` (length 1)"
		);

		let err = FormError::UnknownPath(FieldPath::key("social").child("instagram"));
		assert_eq!(
			err.to_string(),
			"Field `social.instagram` does not exist in the form values"
		);
	}
}
