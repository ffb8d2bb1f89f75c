//! Validation rules and the rule registry
//!
//! Every [`ValidationRule`] is bound to exactly one [`FieldPath`] and carries
//! the message shown when it fails. Rules are collected into a
//! [`ValidationSchema`] when the form is built; the schema is then checked
//! against the initial values so that a rule can never point at a field the
//! form does not have.
//!
//! Required, pattern, and custom failures are indistinguishable in the
//! resulting [`ErrorMap`]: each is a path mapped to its rule's message.

use crate::errors::{ErrorMap, FormError, FormResult};
use crate::path::{FieldPath, IntoFieldPath};
use crate::values::FormValues;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, LazyLock};

// Email pattern from the HTML living standard's `type=email` definition.
//
// - Local part: letters, digits and the permitted punctuation
// - Domain labels: 1-63 characters, no leading/trailing hyphen
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
	)
	.expect("EMAIL_REGEX: invalid regex pattern")
});

/// Predicate over a single field value; `true` means valid.
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// What a rule checks.
#[derive(Clone)]
pub enum RuleKind {
	/// Fails on null/missing, `""`, and `[]`.
	Required,
	/// String must match the expression.
	Pattern(Regex),
	/// String must look like an email address.
	Email,
	/// Minimum string length, in characters.
	MinLength(usize),
	/// Maximum string length, in characters.
	MaxLength(usize),
	Custom(Predicate),
}

impl RuleKind {
	/// Compile a pattern rule.
	///
	/// # Examples
	///
	/// ```
	/// use formkit_forms::RuleKind;
	///
	/// assert!(RuleKind::pattern(r"^\d{3}-\d{4}$").is_ok());
	/// assert!(RuleKind::pattern(r"(unclosed").is_err());
	/// ```
	pub fn pattern(expression: &str) -> Result<Self, regex::Error> {
		Regex::new(expression).map(Self::Pattern)
	}

	pub fn custom<F>(predicate: F) -> Self
	where
		F: Fn(&Value) -> bool + Send + Sync + 'static,
	{
		Self::Custom(Arc::new(predicate))
	}

	fn accepts(&self, value: &Value) -> bool {
		match self {
			Self::Required => !is_blank(value),
			Self::Pattern(regex) => text_rule(value, |text| regex.is_match(text)),
			Self::Email => text_rule(value, |text| EMAIL_REGEX.is_match(text)),
			Self::MinLength(min) => length_of(value).is_none_or(|len| len >= *min),
			Self::MaxLength(max) => length_of(value).is_none_or(|len| len <= *max),
			Self::Custom(predicate) => predicate(value),
		}
	}
}

impl fmt::Debug for RuleKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Required => f.write_str("Required"),
			Self::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
			Self::Email => f.write_str("Email"),
			Self::MinLength(min) => f.debug_tuple("MinLength").field(min).finish(),
			Self::MaxLength(max) => f.debug_tuple("MaxLength").field(max).finish(),
			Self::Custom(_) => f.write_str("Custom(..)"),
		}
	}
}

fn is_blank(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::String(text) => text.is_empty(),
		Value::Array(items) => items.is_empty(),
		_ => false,
	}
}

// Absent and empty strings pass; presence is Required's concern.
fn text_rule(value: &Value, check: impl Fn(&str) -> bool) -> bool {
	match value {
		Value::Null => true,
		Value::String(text) => text.is_empty() || check(text),
		_ => false,
	}
}

// `None` means the length rule does not apply: the value is absent, empty,
// or not a string.
fn length_of(value: &Value) -> Option<usize> {
	match value {
		Value::String(text) if !text.is_empty() => Some(text.chars().count()),
		_ => None,
	}
}

/// A check bound to one field, with the message reported on failure.
///
/// # Examples
///
/// ```
/// use formkit_forms::{FieldPath, RuleKind, ValidationRule};
/// use serde_json::json;
///
/// let rule = ValidationRule::new(FieldPath::key("email"), RuleKind::Email, "Invalid email format");
/// assert!(rule.check(Some(&json!("a@b.com"))).is_ok());
/// assert_eq!(rule.check(Some(&json!("bad"))), Err("Invalid email format"));
/// ```
#[derive(Debug, Clone)]
pub struct ValidationRule {
	path: FieldPath,
	kind: RuleKind,
	message: String,
}

impl ValidationRule {
	pub fn new(path: FieldPath, kind: RuleKind, message: impl Into<String>) -> Self {
		Self {
			path,
			kind,
			message: message.into(),
		}
	}

	pub fn path(&self) -> &FieldPath {
		&self.path
	}

	pub fn kind(&self) -> &RuleKind {
		&self.kind
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	/// Evaluate the rule against a field value.
	///
	/// A missing value is checked as `null`.
	pub fn check(&self, value: Option<&Value>) -> Result<(), &str> {
		if self.kind.accepts(value.unwrap_or(&Value::Null)) {
			Ok(())
		} else {
			Err(self.message.as_str())
		}
	}
}

/// Ordered registry of validation rules.
///
/// # Examples
///
/// ```
/// use formkit_forms::{FormValues, ValidationSchema};
/// use serde_json::json;
///
/// let schema = ValidationSchema::builder()
///     .required("name", "Name is required")
///     .required("email", "Required")
///     .email("email", "Invalid email format")
///     .build()
///     .unwrap();
///
/// let values = FormValues::new(json!({ "name": "", "email": "bad" })).unwrap();
/// let errors = schema.validate(&values);
/// assert_eq!(errors.get("name"), Some("Name is required"));
/// assert_eq!(errors.get("email"), Some("Invalid email format"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationSchema {
	rules: Vec<ValidationRule>,
}

impl ValidationSchema {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn builder() -> SchemaBuilder {
		SchemaBuilder::default()
	}

	pub fn push(&mut self, rule: ValidationRule) {
		self.rules.push(rule);
	}

	pub fn rules(&self) -> &[ValidationRule] {
		&self.rules
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	/// Distinct rule paths, in registration order.
	pub fn paths(&self) -> Vec<&FieldPath> {
		let mut paths: Vec<&FieldPath> = Vec::new();
		for rule in &self.rules {
			if !paths.contains(&rule.path()) {
				paths.push(rule.path());
			}
		}
		paths
	}

	/// Run every rule against `values`.
	///
	/// Fields are checked independently of one another. Within one field the
	/// first failing rule, in registration order, supplies the message.
	pub fn validate(&self, values: &FormValues) -> ErrorMap {
		let mut errors = ErrorMap::new();
		for rule in &self.rules {
			if errors.contains(rule.path()) {
				continue;
			}
			if let Err(message) = rule.check(values.get(rule.path())) {
				errors.insert_first(rule.path(), message);
			}
		}
		tracing::trace!(rules = self.rules.len(), failing = errors.len(), "validated form values");
		errors
	}

	/// Check that every rule path resolves in `values`.
	pub fn ensure_complete(&self, values: &FormValues) -> FormResult<()> {
		match self.rules.iter().find(|rule| !values.contains(rule.path())) {
			Some(rule) => Err(FormError::UnknownPath(rule.path().clone())),
			None => Ok(()),
		}
	}
}

/// Fluent [`ValidationSchema`] construction.
///
/// Path parse failures and bad patterns are held back until
/// [`SchemaBuilder::build`], which reports the first one.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
	schema: ValidationSchema,
	error: Option<FormError>,
}

impl SchemaBuilder {
	pub fn rule(mut self, rule: ValidationRule) -> Self {
		self.schema.push(rule);
		self
	}

	pub fn required(self, path: impl IntoFieldPath, message: impl Into<String>) -> Self {
		self.with_kind(path, Ok(RuleKind::Required), message)
	}

	pub fn email(self, path: impl IntoFieldPath, message: impl Into<String>) -> Self {
		self.with_kind(path, Ok(RuleKind::Email), message)
	}

	/// # Examples
	///
	/// ```
	/// use formkit_forms::{FormError, ValidationSchema};
	///
	/// let result = ValidationSchema::builder()
	///     .pattern("code", "([A-Z]", "Code must be uppercase")
	///     .build();
	/// assert!(matches!(result, Err(FormError::InvalidPattern { .. })));
	/// ```
	pub fn pattern(
		self,
		path: impl IntoFieldPath,
		expression: &str,
		message: impl Into<String>,
	) -> Self {
		self.with_kind(path, RuleKind::pattern(expression), message)
	}

	pub fn min_length(self, path: impl IntoFieldPath, min: usize, message: impl Into<String>) -> Self {
		self.with_kind(path, Ok(RuleKind::MinLength(min)), message)
	}

	pub fn max_length(self, path: impl IntoFieldPath, max: usize, message: impl Into<String>) -> Self {
		self.with_kind(path, Ok(RuleKind::MaxLength(max)), message)
	}

	/// # Examples
	///
	/// ```
	/// use formkit_forms::{FormValues, ValidationSchema};
	/// use serde_json::json;
	///
	/// let schema = ValidationSchema::builder()
	///     .custom("age", "Must be an adult", |v| v.as_u64().is_some_and(|age| age >= 18))
	///     .build()
	///     .unwrap();
	///
	/// let values = FormValues::new(json!({ "age": 12 })).unwrap();
	/// assert_eq!(schema.validate(&values).get("age"), Some("Must be an adult"));
	/// ```
	pub fn custom<F>(self, path: impl IntoFieldPath, message: impl Into<String>, predicate: F) -> Self
	where
		F: Fn(&Value) -> bool + Send + Sync + 'static,
	{
		self.with_kind(path, Ok(RuleKind::custom(predicate)), message)
	}

	pub fn build(self) -> FormResult<ValidationSchema> {
		match self.error {
			Some(err) => Err(err),
			None => Ok(self.schema),
		}
	}

	fn with_kind(
		mut self,
		path: impl IntoFieldPath,
		kind: Result<RuleKind, regex::Error>,
		message: impl Into<String>,
	) -> Self {
		if self.error.is_some() {
			return self;
		}
		let path = match path.into_field_path() {
			Ok(path) => path,
			Err(err) => {
				self.error = Some(err);
				return self;
			}
		};
		match kind {
			Ok(kind) => self.schema.push(ValidationRule::new(path, kind, message)),
			Err(source) => self.error = Some(FormError::InvalidPattern { path, source }),
		}
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn check(kind: RuleKind, value: Value) -> bool {
		ValidationRule::new(FieldPath::key("field"), kind, "failed")
			.check(Some(&value))
			.is_ok()
	}

	#[rstest]
	#[case(json!(null), false)]
	#[case(json!(""), false)]
	#[case(json!([]), false)]
	#[case(json!(" "), true)]
	#[case(json!("x"), true)]
	#[case(json!(0), true)]
	#[case(json!(false), true)]
	#[case(json!([""]), true)]
	#[case(json!({}), true)]
	fn test_required(#[case] value: Value, #[case] expected: bool) {
		assert_eq!(check(RuleKind::Required, value), expected);
	}

	#[rstest]
	#[case("a@b.com", true)]
	#[case("first.last+tag@example.co.uk", true)]
	#[case("", true)]
	#[case("bad", false)]
	#[case("a@", false)]
	#[case("@b.com", false)]
	#[case("a b@c.com", false)]
	#[case("a@-b.com", false)]
	fn test_email(#[case] input: &str, #[case] expected: bool) {
		assert_eq!(check(RuleKind::Email, json!(input)), expected, "{input:?}");
	}

	#[rstest]
	fn test_email_rejects_non_strings() {
		assert!(!check(RuleKind::Email, json!(42)));
		assert!(check(RuleKind::Email, json!(null)));
	}

	#[rstest]
	#[case("555-0100", true)]
	#[case("5550100", false)]
	#[case("", true)]
	fn test_pattern(#[case] input: &str, #[case] expected: bool) {
		let kind = RuleKind::pattern(r"^\d{3}-\d{4}$").unwrap();

		assert_eq!(check(kind, json!(input)), expected);
	}

	#[rstest]
	#[case(RuleKind::MinLength(3), json!("ab"), false)]
	#[case(RuleKind::MinLength(3), json!("abc"), true)]
	#[case(RuleKind::MinLength(3), json!("日本語"), true)]
	#[case(RuleKind::MinLength(3), json!(""), true)]
	#[case(RuleKind::MinLength(2), json!(["a"]), true)]
	#[case(RuleKind::MinLength(2), json!(7), true)]
	#[case(RuleKind::MaxLength(3), json!("abcd"), false)]
	#[case(RuleKind::MaxLength(3), json!("abc"), true)]
	#[case(RuleKind::MaxLength(1), json!(["a", "b"]), true)]
	#[case(RuleKind::MaxLength(3), json!("日本語です"), false)]
	fn test_length(#[case] kind: RuleKind, #[case] value: Value, #[case] expected: bool) {
		assert_eq!(check(kind, value), expected);
	}

	#[rstest]
	fn test_missing_value_checked_as_null() {
		let required = ValidationRule::new(FieldPath::key("name"), RuleKind::Required, "Required");
		let email = ValidationRule::new(FieldPath::key("email"), RuleKind::Email, "Invalid");

		assert_eq!(required.check(None), Err("Required"));
		assert_eq!(email.check(None), Ok(()));
	}

	#[rstest]
	fn test_first_failing_rule_wins_per_field() {
		// Arrange
		let schema = ValidationSchema::builder()
			.required("email", "Required")
			.min_length("email", 10, "Too short")
			.email("email", "Invalid email format")
			.build()
			.unwrap();
		let values = FormValues::new(json!({ "email": "bad" })).unwrap();

		// Act
		let errors = schema.validate(&values);

		// Assert
		assert_eq!(errors.len(), 1);
		assert_eq!(errors.get("email"), Some("Too short"));
	}

	#[rstest]
	fn test_unruled_fields_never_reported() {
		// Arrange
		let schema = ValidationSchema::builder()
			.required("name", "Required")
			.build()
			.unwrap();
		let values = FormValues::new(json!({ "name": "", "nickname": "" })).unwrap();

		// Act
		let errors = schema.validate(&values);

		// Assert
		assert_eq!(errors.paths().collect::<Vec<_>>(), vec![&FieldPath::key("name")]);
	}

	#[rstest]
	fn test_nested_and_indexed_rules() {
		let schema = ValidationSchema::builder()
			.required("social.facebook", "Facebook is required")
			.pattern("phoneNumbers[0]", r"^\d+$", "Digits only")
			.build()
			.unwrap();
		let values = FormValues::new(json!({
			"social": { "facebook": "" },
			"phoneNumbers": ["12ab", ""],
		}))
		.unwrap();

		let errors = schema.validate(&values);

		assert_eq!(errors.get("social.facebook"), Some("Facebook is required"));
		assert_eq!(errors.get("phoneNumbers[0]"), Some("Digits only"));
		assert_eq!(errors.get("phoneNumbers[1]"), None);
	}

	#[rstest]
	fn test_builder_reports_first_bad_path() {
		let result = ValidationSchema::builder()
			.required("name", "Required")
			.required("friends[", "Required")
			.required("..", "Required")
			.build();

		match result {
			Err(FormError::InvalidPath { input, .. }) => assert_eq!(input, "friends["),
			other => panic!("Expected InvalidPath, got {other:?}"),
		}
	}

	#[rstest]
	fn test_ensure_complete() {
		// Arrange
		let schema = ValidationSchema::builder()
			.required("name", "Required")
			.required("social.instagram", "Required")
			.build()
			.unwrap();
		let values = FormValues::new(json!({ "name": "", "social": { "facebook": "" } })).unwrap();

		// Act
		let result = schema.ensure_complete(&values);

		// Assert
		match result {
			Err(FormError::UnknownPath(path)) => assert_eq!(path.to_string(), "social.instagram"),
			other => panic!("Expected UnknownPath, got {other:?}"),
		}
	}

	#[rstest]
	fn test_paths_are_distinct_and_ordered() {
		let schema = ValidationSchema::builder()
			.required("email", "Required")
			.required("name", "Required")
			.email("email", "Invalid")
			.build()
			.unwrap();

		let paths: Vec<String> = schema.paths().iter().map(|p| p.to_string()).collect();

		assert_eq!(paths, ["email", "name"]);
	}
}
