use crate::path::{FieldPath, PathSegment};
use serde_json::Value;
use std::borrow::Cow;

/// BoundField is one field's view of the form state
///
/// Renderers read everything they need from here: the current value, the
/// active error, and whether the user has touched the field yet.
#[derive(Debug, Clone)]
pub struct BoundField<'a> {
	path: FieldPath,
	value: Option<&'a Value>,
	error: Option<&'a str>,
	touched: bool,
}

impl<'a> BoundField<'a> {
	/// Bind a field to its current state
	///
	/// # Examples
	///
	/// ```
	/// use formkit_forms::{BoundField, FieldPath};
	/// use serde_json::json;
	///
	/// let value = json!("Ada");
	/// let bound = BoundField::new(FieldPath::key("name"), Some(&value), None, false);
	/// assert_eq!(bound.name(), "name");
	/// assert_eq!(bound.value(), Some(&value));
	/// ```
	pub fn new(
		path: FieldPath,
		value: Option<&'a Value>,
		error: Option<&'a str>,
		touched: bool,
	) -> Self {
		Self {
			path,
			value,
			error,
			touched,
		}
	}

	pub fn path(&self) -> &FieldPath {
		&self.path
	}

	/// The HTML name attribute, which is the path in its string form
	///
	/// # Examples
	///
	/// ```
	/// use formkit_forms::{BoundField, FieldPath};
	///
	/// let bound = BoundField::new(FieldPath::key("social").child("facebook"), None, None, false);
	/// assert_eq!(bound.name(), "social.facebook");
	/// ```
	pub fn name(&self) -> String {
		self.path.to_string()
	}

	/// Get the HTML id attribute
	///
	/// # Examples
	///
	/// ```
	/// use formkit_forms::{BoundField, FieldPath};
	///
	/// let bound = BoundField::new(FieldPath::key("phoneNumbers").index(0), None, None, false);
	/// assert_eq!(bound.id_for_label(), "id_phoneNumbers_0");
	/// ```
	pub fn id_for_label(&self) -> String {
		let parts: Vec<Cow<'_, str>> = self
			.path
			.segments()
			.iter()
			.map(|segment| match segment {
				PathSegment::Key(key) => Cow::Borrowed(key.as_str()),
				PathSegment::Index(index) => Cow::Owned(index.to_string()),
			})
			.collect();
		format!("id_{}", parts.join("_"))
	}

	pub fn value(&self) -> Option<&'a Value> {
		self.value
	}

	/// The value as input text: strings verbatim, null as empty, anything
	/// else in its JSON form.
	pub fn value_text(&self) -> Cow<'a, str> {
		match self.value {
			None | Some(Value::Null) => Cow::Borrowed(""),
			Some(Value::String(text)) => Cow::Borrowed(text.as_str()),
			Some(other) => Cow::Owned(other.to_string()),
		}
	}

	pub fn error(&self) -> Option<&'a str> {
		self.error
	}

	pub fn has_error(&self) -> bool {
		self.error.is_some()
	}

	pub fn is_touched(&self) -> bool {
		self.touched
	}

	/// The error to show right now: present only once the field is touched
	///
	/// # Examples
	///
	/// ```
	/// use formkit_forms::{BoundField, FieldPath};
	///
	/// let pristine = BoundField::new(FieldPath::key("email"), None, Some("Required"), false);
	/// assert_eq!(pristine.visible_error(), None);
	///
	/// let touched = BoundField::new(FieldPath::key("email"), None, Some("Required"), true);
	/// assert_eq!(touched.visible_error(), Some("Required"));
	/// ```
	pub fn visible_error(&self) -> Option<&'a str> {
		self.error.filter(|_| self.touched)
	}
}
