//! Form values
//!
//! [`FormValues`] is the ordered tree of field values a form edits. The
//! initial values passed at construction double as the form's schema: a
//! field exists if and only if its path resolves here.

use crate::errors::{FormError, FormResult};
use crate::path::{self, FieldPath};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered mapping from field name to value.
///
/// Field order follows insertion order of the initial values.
///
/// # Examples
///
/// ```
/// use formkit_forms::{FieldPath, FormValues};
/// use serde_json::json;
///
/// let mut values = FormValues::new(json!({
///     "name": "",
///     "social": { "facebook": "", "twitter": "" },
/// }))
/// .unwrap();
///
/// let path: FieldPath = "social.twitter".parse().unwrap();
/// values.set(&path, json!("@ada")).unwrap();
/// assert_eq!(values.get(&path), Some(&json!("@ada")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Map<String, Value>", try_from = "Map<String, Value>")]
pub struct FormValues(Map<String, Value>);

impl FormValues {
	/// Wrap a JSON object.
	///
	/// Returns [`FormError::NotAnObject`] for any other JSON value, and
	/// [`FormError::InvalidPath`] when an object key anywhere in the tree is
	/// empty or contains `.`, `[` or `]`, since no path could address it.
	///
	/// # Examples
	///
	/// ```
	/// use formkit_forms::{FormError, FormValues};
	/// use serde_json::json;
	///
	/// assert!(FormValues::new(json!({ "social": { "facebook": "" } })).is_ok());
	/// assert!(matches!(
	///     FormValues::new(json!({ "social": { "face.book": "" } })),
	///     Err(FormError::InvalidPath { .. })
	/// ));
	/// ```
	pub fn new(value: Value) -> FormResult<Self> {
		match value {
			Value::Object(map) => Self::try_from(map),
			other => Err(FormError::NotAnObject(json_kind(&other))),
		}
	}

	pub fn as_map(&self) -> &Map<String, Value> {
		&self.0
	}

	pub fn to_value(&self) -> Value {
		Value::Object(self.0.clone())
	}

	pub fn into_value(self) -> Value {
		Value::Object(self.0)
	}

	pub fn get(&self, path: &FieldPath) -> Option<&Value> {
		path.lookup(&self.0)
	}

	pub fn get_mut(&mut self, path: &FieldPath) -> Option<&mut Value> {
		path.lookup_mut(&mut self.0)
	}

	pub fn contains(&self, path: &FieldPath) -> bool {
		self.get(path).is_some()
	}

	/// Replace the value at an existing path, returning the old value.
	///
	/// The path must already resolve; new fields are never created.
	pub fn set(&mut self, path: &FieldPath, value: Value) -> FormResult<Value> {
		check_keys(&value)?;
		let slot = self
			.get_mut(path)
			.ok_or_else(|| FormError::UnknownPath(path.clone()))?;
		Ok(std::mem::replace(slot, value))
	}

	/// Append to an array field, returning the index of the new element.
	///
	/// # Examples
	///
	/// ```
	/// use formkit_forms::{FieldPath, FormValues};
	/// use serde_json::json;
	///
	/// let mut values = FormValues::new(json!({ "friends": [""] })).unwrap();
	/// let friends = FieldPath::key("friends");
	///
	/// assert_eq!(values.push(&friends, json!("Grace")).unwrap(), 1);
	/// assert_eq!(values.get(&friends), Some(&json!(["", "Grace"])));
	/// ```
	pub fn push(&mut self, path: &FieldPath, value: Value) -> FormResult<usize> {
		check_keys(&value)?;
		let items = self.array_mut(path)?;
		items.push(value);
		Ok(items.len() - 1)
	}

	/// Remove and return an array element; later elements shift down.
	pub fn remove(&mut self, path: &FieldPath, index: usize) -> FormResult<Value> {
		let items = self.array_mut(path)?;
		check_index(path, index, items.len())?;
		Ok(items.remove(index))
	}

	/// Insert an array element at `index`; `index == len` appends.
	pub fn insert(&mut self, path: &FieldPath, index: usize, value: Value) -> FormResult<()> {
		check_keys(&value)?;
		let items = self.array_mut(path)?;
		check_index(path, index, items.len() + 1)?;
		items.insert(index, value);
		Ok(())
	}

	pub fn swap(&mut self, path: &FieldPath, a: usize, b: usize) -> FormResult<()> {
		let items = self.array_mut(path)?;
		check_index(path, a, items.len())?;
		check_index(path, b, items.len())?;
		items.swap(a, b);
		Ok(())
	}

	/// Every addressable leaf, in document order.
	///
	/// Scalars are leaves; an empty object or array is reported as its own
	/// path since it has no children to stand in for it.
	///
	/// # Examples
	///
	/// ```
	/// use formkit_forms::FormValues;
	/// use serde_json::json;
	///
	/// let values = FormValues::new(json!({
	///     "name": "",
	///     "social": { "facebook": "" },
	///     "phoneNumbers": ["", ""],
	/// }))
	/// .unwrap();
	///
	/// let leaves: Vec<String> = values.leaf_paths().iter().map(|p| p.to_string()).collect();
	/// assert_eq!(
	///     leaves,
	///     ["name", "social.facebook", "phoneNumbers[0]", "phoneNumbers[1]"]
	/// );
	/// ```
	pub fn leaf_paths(&self) -> Vec<FieldPath> {
		let mut leaves = Vec::new();
		for (key, value) in &self.0 {
			collect_leaves(FieldPath::key(key.clone()), value, &mut leaves);
		}
		leaves
	}

	fn array_mut(&mut self, path: &FieldPath) -> FormResult<&mut Vec<Value>> {
		self.get_mut(path)
			.ok_or_else(|| FormError::UnknownPath(path.clone()))?
			.as_array_mut()
			.ok_or_else(|| FormError::NotAnArray(path.clone()))
	}
}

fn check_index(path: &FieldPath, index: usize, len: usize) -> FormResult<()> {
	if index < len {
		Ok(())
	} else {
		Err(FormError::IndexOutOfBounds {
			path: path.clone(),
			index,
			len,
		})
	}
}

fn collect_leaves(path: FieldPath, value: &Value, leaves: &mut Vec<FieldPath>) {
	match value {
		Value::Object(map) if !map.is_empty() => {
			for (key, child) in map {
				collect_leaves(path.clone().child(key.clone()), child, leaves);
			}
		}
		Value::Array(items) if !items.is_empty() => {
			for (index, child) in items.iter().enumerate() {
				collect_leaves(path.clone().index(index), child, leaves);
			}
		}
		_ => leaves.push(path),
	}
}

// Every object key in the tree must be expressible as a path field name.
fn check_keys(value: &Value) -> FormResult<()> {
	match value {
		Value::Object(map) => check_map(map),
		Value::Array(items) => items.iter().try_for_each(check_keys),
		_ => Ok(()),
	}
}

fn check_map(map: &Map<String, Value>) -> FormResult<()> {
	map.iter().try_for_each(|(key, child)| {
		path::check_key(key).map_err(|reason| FormError::InvalidPath {
			input: key.clone(),
			reason,
		})?;
		check_keys(child)
	})
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

impl TryFrom<Map<String, Value>> for FormValues {
	type Error = FormError;

	fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
		check_map(&map)?;
		Ok(Self(map))
	}
}

impl From<FormValues> for Map<String, Value> {
	fn from(values: FormValues) -> Self {
		values.0
	}
}

impl TryFrom<Value> for FormValues {
	type Error = FormError;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl From<FormValues> for Value {
	fn from(values: FormValues) -> Self {
		values.into_value()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn features() -> FormValues {
		FormValues::new(json!({
			"name": "",
			"social": { "facebook": "", "twitter": "" },
			"phoneNumbers": ["", ""],
			"friends": [""],
		}))
		.unwrap()
	}

	#[rstest]
	#[case(json!(null), "null")]
	#[case(json!("text"), "a string")]
	#[case(json!([1, 2]), "an array")]
	#[case(json!(3), "a number")]
	fn test_new_rejects_non_objects(#[case] input: Value, #[case] kind: &str) {
		let result = FormValues::new(input);

		assert!(matches!(result, Err(FormError::NotAnObject(k)) if k == kind));
	}

	#[rstest]
	fn test_set_returns_previous_value(mut features: FormValues) {
		// Arrange
		let path = FieldPath::key("phoneNumbers").index(1);

		// Act
		let previous = features.set(&path, json!("555-0100")).unwrap();

		// Assert
		assert_eq!(previous, json!(""));
		assert_eq!(features.get(&path), Some(&json!("555-0100")));
	}

	#[rstest]
	fn test_set_unknown_path_is_rejected(mut features: FormValues) {
		// Arrange
		let path = FieldPath::key("social").child("instagram");
		let before = features.clone();

		// Act
		let result = features.set(&path, json!("x"));

		// Assert
		assert!(matches!(result, Err(FormError::UnknownPath(p)) if p == path));
		assert_eq!(features, before);
	}

	#[rstest]
	fn test_array_ops_on_scalar_field(mut features: FormValues) {
		let name = FieldPath::key("name");

		assert!(matches!(
			features.push(&name, json!("x")),
			Err(FormError::NotAnArray(_))
		));
		assert!(matches!(
			features.remove(&name, 0),
			Err(FormError::NotAnArray(_))
		));
	}

	#[rstest]
	fn test_remove_preserves_order(mut features: FormValues) {
		// Arrange
		let friends = FieldPath::key("friends");
		features.set(&friends, json!(["a", "b", "c", "d"])).unwrap();

		// Act
		let removed = features.remove(&friends, 1).unwrap();

		// Assert
		assert_eq!(removed, json!("b"));
		assert_eq!(features.get(&friends), Some(&json!(["a", "c", "d"])));
	}

	#[rstest]
	fn test_remove_out_of_bounds(mut features: FormValues) {
		let friends = FieldPath::key("friends");

		let result = features.remove(&friends, 1);

		assert!(matches!(
			result,
			Err(FormError::IndexOutOfBounds { index: 1, len: 1, .. })
		));
	}

	#[rstest]
	fn test_insert_and_swap(mut features: FormValues) {
		// Arrange
		let friends = FieldPath::key("friends");

		// Act
		features.insert(&friends, 0, json!("first")).unwrap();
		features.insert(&friends, 2, json!("last")).unwrap();
		features.swap(&friends, 0, 2).unwrap();

		// Assert
		assert_eq!(features.get(&friends), Some(&json!(["last", "", "first"])));
		assert!(features.insert(&friends, 5, json!("x")).is_err());
		assert!(features.swap(&friends, 0, 3).is_err());
	}

	#[rstest]
	fn test_leaf_paths_document_order(features: FormValues) {
		let leaves: Vec<String> = features
			.leaf_paths()
			.iter()
			.map(ToString::to_string)
			.collect();

		assert_eq!(
			leaves,
			[
				"name",
				"social.facebook",
				"social.twitter",
				"phoneNumbers[0]",
				"phoneNumbers[1]",
				"friends[0]",
			]
		);
	}

	#[rstest]
	fn test_leaf_paths_reports_empty_containers() {
		let values = FormValues::new(json!({ "tags": [], "meta": {} })).unwrap();

		let leaves = values.leaf_paths();

		assert_eq!(leaves, vec![FieldPath::key("tags"), FieldPath::key("meta")]);
	}

	#[rstest]
	fn test_serializes_as_plain_object(features: FormValues) {
		let json = serde_json::to_value(&features).unwrap();

		assert_eq!(json, features.to_value());
		let back: FormValues = serde_json::from_value(json).unwrap();
		assert_eq!(back, features);
	}

	#[rstest]
	#[case(json!({ "": "" }), "")]
	#[case(json!({ "a.b": "" }), "a.b")]
	#[case(json!({ "social": { "face[book]": "" } }), "face[book]")]
	#[case(json!({ "friends": [{ "": "Ada" }] }), "")]
	fn test_new_rejects_unaddressable_keys(#[case] input: Value, #[case] bad_key: &str) {
		let result = FormValues::new(input);

		assert!(matches!(result, Err(FormError::InvalidPath { input, .. }) if input == bad_key));
	}

	#[rstest]
	fn test_writes_reject_unaddressable_keys(mut features: FormValues) {
		// Arrange
		let before = features.clone();
		let name = FieldPath::key("name");
		let friends = FieldPath::key("friends");

		// Act
		let set = features.set(&name, json!({ "first.last": "" }));
		let pushed = features.push(&friends, json!({ "]": "" }));
		let inserted = features.insert(&friends, 0, json!([{ "": "" }]));

		// Assert
		assert!(matches!(set, Err(FormError::InvalidPath { .. })));
		assert!(matches!(pushed, Err(FormError::InvalidPath { .. })));
		assert!(matches!(inserted, Err(FormError::InvalidPath { .. })));
		assert_eq!(features, before);
	}

	#[rstest]
	fn test_deserialize_rejects_unaddressable_keys() {
		let result = serde_json::from_value::<FormValues>(json!({ "a.b": "" }));

		assert!(result.is_err());
	}
}
