use crate::bound_field::BoundField;
use crate::config::FormConfig;
use crate::errors::{ErrorMap, FormError, FormResult};
use crate::path::{FieldPath, IntoFieldPath};
use crate::rules::ValidationSchema;
use crate::snapshot::FormSnapshot;
use crate::values::FormValues;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Index;

pub type SubmitHandler = Box<dyn FnMut(&FormValues)>;

/// Result of [`FormEngine::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
	/// Validation passed and the submit handler ran once
	Submitted,
	/// Validation failed; the handler was not called
	Rejected(ErrorMap),
}

impl SubmitOutcome {
	pub fn is_submitted(&self) -> bool {
		matches!(self, Self::Submitted)
	}
}

/// Report a broken caller contract: fatal in debug builds, skipped in release.
fn enforce<T>(result: FormResult<T>) -> Option<T> {
	match result {
		Ok(value) => Some(value),
		Err(err) => {
			tracing::error!(error = %err, "form contract violation");
			if cfg!(debug_assertions) {
				panic!("form contract violation: {err}");
			}
			None
		}
	}
}

/// Form state container
///
/// Owns the current values, the set of touched fields, and the errors
/// derived from the validation schema. The initial values define which
/// fields exist; every path-taking operation requires the path to resolve.
///
/// Operations come in pairs. The plain form (`set_field_value`, `push`, ...)
/// treats a bad path as a programming error: it logs, panics in debug
/// builds, and does nothing in release builds. The `try_` form returns the
/// [`FormError`] instead.
pub struct FormEngine {
	initial: FormValues,
	values: FormValues,
	touched: BTreeSet<FieldPath>,
	errors: ErrorMap,
	schema: ValidationSchema,
	config: FormConfig,
	submit_count: usize,
	on_submit: Option<SubmitHandler>,
}

impl FormEngine {
	/// Start building a form from its initial values
	///
	/// # Examples
	///
	/// ```
	/// use formkit_forms::{FormEngine, ValidationSchema};
	/// use serde_json::json;
	///
	/// let schema = ValidationSchema::builder()
	///     .required("name", "Name is required")
	///     .build()
	///     .unwrap();
	///
	/// let form = FormEngine::builder(json!({ "name": "" }))
	///     .schema(schema)
	///     .build()
	///     .unwrap();
	///
	/// assert!(!form.is_valid());
	/// assert!(form.touched().is_empty());
	/// ```
	pub fn builder(initial: Value) -> FormEngineBuilder {
		FormEngineBuilder {
			initial,
			schema: ValidationSchema::new(),
			config: FormConfig::default(),
			on_submit: None,
		}
	}

	pub fn values(&self) -> &FormValues {
		&self.values
	}

	pub fn initial_values(&self) -> &FormValues {
		&self.initial
	}

	pub fn errors(&self) -> &ErrorMap {
		&self.errors
	}

	pub fn touched(&self) -> &BTreeSet<FieldPath> {
		&self.touched
	}

	pub fn schema(&self) -> &ValidationSchema {
		&self.schema
	}

	pub fn config(&self) -> &FormConfig {
		&self.config
	}

	pub fn submit_count(&self) -> usize {
		self.submit_count
	}

	/// Whether a path has been touched. Unparseable paths never are.
	pub fn is_touched(&self, path: impl IntoFieldPath) -> bool {
		path.into_field_path()
			.is_ok_and(|path| self.touched.contains(&path))
	}

	pub fn is_valid(&self) -> bool {
		self.errors.is_empty()
	}

	/// Whether the values differ from the initial values
	pub fn is_dirty(&self) -> bool {
		self.values != self.initial
	}

	/// Run the schema against arbitrary values without touching form state.
	pub fn validate(&self, values: &FormValues) -> ErrorMap {
		self.schema.validate(values)
	}

	/// Replace the value at an existing path
	///
	/// # Examples
	///
	/// ```
	/// use formkit_forms::FormEngine;
	/// use serde_json::json;
	///
	/// let mut form = FormEngine::builder(json!({ "social": { "facebook": "" } }))
	///     .build()
	///     .unwrap();
	///
	/// form.set_field_value("social.facebook", "ada.lovelace");
	/// assert_eq!(form.values().to_value(), json!({ "social": { "facebook": "ada.lovelace" } }));
	/// assert!(form.is_dirty());
	/// ```
	pub fn set_field_value(&mut self, path: impl IntoFieldPath, value: impl Into<Value>) {
		enforce(self.try_set_field_value(path, value));
	}

	pub fn try_set_field_value(
		&mut self,
		path: impl IntoFieldPath,
		value: impl Into<Value>,
	) -> FormResult<()> {
		let path = path.into_field_path()?;
		self.values.set(&path, value.into())?;
		tracing::trace!(field = %path, "field value updated");
		if self.config.validate_on_change {
			self.revalidate();
		}
		Ok(())
	}

	/// Mark a field as touched; repeat calls are no-ops
	pub fn set_field_touched(&mut self, path: impl IntoFieldPath) {
		enforce(self.try_set_field_touched(path));
	}

	pub fn try_set_field_touched(&mut self, path: impl IntoFieldPath) -> FormResult<()> {
		let path = path.into_field_path()?;
		if !self.values.contains(&path) {
			return Err(FormError::UnknownPath(path));
		}
		if self.touched.insert(path) && self.config.validate_on_blur {
			self.revalidate();
		}
		Ok(())
	}

	/// Append to a field array
	pub fn push(&mut self, path: impl IntoFieldPath, value: impl Into<Value>) {
		enforce(self.try_push(path, value));
	}

	/// Append to a field array, returning the new element's index
	pub fn try_push(&mut self, path: impl IntoFieldPath, value: impl Into<Value>) -> FormResult<usize> {
		let path = path.into_field_path()?;
		let index = self.values.push(&path, value.into())?;
		tracing::debug!(field = %path, index, "field array element pushed");
		self.after_array_edit();
		Ok(index)
	}

	/// Remove a field array element; later elements shift down one index
	///
	/// Touched state moves with the elements: entries for the removed
	/// element are dropped and entries for later elements shift down.
	///
	/// # Examples
	///
	/// ```
	/// use formkit_forms::FormEngine;
	/// use serde_json::json;
	///
	/// let mut form = FormEngine::builder(json!({ "friends": ["Ada", "Grace", "Alan"] }))
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(form.remove("friends", 1), Some(json!("Grace")));
	/// assert_eq!(form.values().to_value(), json!({ "friends": ["Ada", "Alan"] }));
	/// ```
	pub fn remove(&mut self, path: impl IntoFieldPath, index: usize) -> Option<Value> {
		enforce(self.try_remove(path, index))
	}

	pub fn try_remove(&mut self, path: impl IntoFieldPath, index: usize) -> FormResult<Value> {
		let path = path.into_field_path()?;
		let removed = self.values.remove(&path, index)?;
		self.reindex_touched(&path, |k| match k.cmp(&index) {
			Ordering::Less => Some(k),
			Ordering::Equal => None,
			Ordering::Greater => Some(k - 1),
		});
		tracing::debug!(field = %path, index, "field array element removed");
		self.after_array_edit();
		Ok(removed)
	}

	/// Insert a field array element; elements from `index` on shift up, and
	/// their touched state with them
	pub fn insert(&mut self, path: impl IntoFieldPath, index: usize, value: impl Into<Value>) {
		enforce(self.try_insert(path, index, value));
	}

	pub fn try_insert(
		&mut self,
		path: impl IntoFieldPath,
		index: usize,
		value: impl Into<Value>,
	) -> FormResult<()> {
		let path = path.into_field_path()?;
		self.values.insert(&path, index, value.into())?;
		self.reindex_touched(&path, |k| Some(if k >= index { k + 1 } else { k }));
		tracing::debug!(field = %path, index, "field array element inserted");
		self.after_array_edit();
		Ok(())
	}

	/// Swap two field array elements along with their touched state
	pub fn swap(&mut self, path: impl IntoFieldPath, a: usize, b: usize) {
		enforce(self.try_swap(path, a, b));
	}

	pub fn try_swap(&mut self, path: impl IntoFieldPath, a: usize, b: usize) -> FormResult<()> {
		let path = path.into_field_path()?;
		self.values.swap(&path, a, b)?;
		self.reindex_touched(&path, |k| {
			Some(if k == a {
				b
			} else if k == b {
				a
			} else {
				k
			})
		});
		tracing::debug!(field = %path, a, b, "field array elements swapped");
		self.after_array_edit();
		Ok(())
	}

	/// Attempt a submission
	///
	/// Every field of the form is marked touched first, so that any errors
	/// become visible. The handler runs only when validation finds nothing.
	///
	/// # Examples
	///
	/// ```
	/// use formkit_forms::{FormEngine, SubmitOutcome, ValidationSchema};
	/// use serde_json::json;
	/// use std::cell::RefCell;
	/// use std::rc::Rc;
	///
	/// let submitted = Rc::new(RefCell::new(Vec::new()));
	/// let sink = Rc::clone(&submitted);
	///
	/// let mut form = FormEngine::builder(json!({ "name": "" }))
	///     .schema(ValidationSchema::builder().required("name", "Required").build().unwrap())
	///     .on_submit(move |values| sink.borrow_mut().push(values.to_value()))
	///     .build()
	///     .unwrap();
	///
	/// assert!(matches!(form.submit(), SubmitOutcome::Rejected(_)));
	/// assert!(form.is_touched("name"));
	///
	/// form.set_field_value("name", "Ada");
	/// assert_eq!(form.submit(), SubmitOutcome::Submitted);
	/// assert_eq!(*submitted.borrow(), vec![json!({ "name": "Ada" })]);
	/// ```
	pub fn submit(&mut self) -> SubmitOutcome {
		self.submit_count += 1;
		self.touched.extend(self.initial.leaf_paths());
		self.touched.extend(self.values.leaf_paths());
		self.revalidate();

		if !self.errors.is_empty() {
			tracing::debug!(
				attempt = self.submit_count,
				failing = self.errors.len(),
				"submit rejected by validation"
			);
			return SubmitOutcome::Rejected(self.errors.clone());
		}

		tracing::debug!(attempt = self.submit_count, "submitting form");
		if let Some(handler) = self.on_submit.as_mut() {
			handler(&self.values);
		}
		SubmitOutcome::Submitted
	}

	/// Restore the initial values and forget all interaction
	pub fn reset(&mut self) {
		self.values = self.initial.clone();
		self.touched.clear();
		self.submit_count = 0;
		self.revalidate();
		tracing::debug!("form reset");
	}

	/// Bind one field for rendering
	///
	/// Returns `None` when the path does not parse or does not exist.
	pub fn field(&self, path: impl IntoFieldPath) -> Option<BoundField<'_>> {
		let path = path.into_field_path().ok()?;
		let value = self.values.get(&path)?;
		let error = self.errors.get(&path);
		let touched = self.touched.contains(&path);
		Some(BoundField::new(path, Some(value), error, touched))
	}

	pub fn snapshot(&self) -> FormSnapshot {
		FormSnapshot {
			values: self.values.clone(),
			errors: self.errors.clone(),
			touched: self.touched.clone(),
			is_valid: self.is_valid(),
			is_dirty: self.is_dirty(),
			submit_count: self.submit_count,
		}
	}

	// Rewrite touched paths inside `array` through `remap`; `None` drops the entry.
	fn reindex_touched(&mut self, array: &FieldPath, remap: impl Fn(usize) -> Option<usize>) {
		self.touched = std::mem::take(&mut self.touched)
			.into_iter()
			.filter_map(|path| match path.element_index(array) {
				Some(index) => remap(index).map(|moved| path.with_element_index(array, moved)),
				None => Some(path),
			})
			.collect();
	}

	fn after_array_edit(&mut self) {
		if self.config.validate_on_change {
			self.revalidate();
		}
	}

	fn revalidate(&mut self) {
		self.errors = self.schema.validate(&self.values);
	}
}

impl fmt::Debug for FormEngine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FormEngine")
			.field("values", &self.values)
			.field("errors", &self.errors)
			.field("touched", &self.touched)
			.field("config", &self.config)
			.field("submit_count", &self.submit_count)
			.finish_non_exhaustive()
	}
}

/// Index by path string, panicking on unknown fields.
///
/// Use [`FormValues::get`] through [`FormEngine::values`] for a
/// non-panicking lookup.
impl Index<&str> for FormEngine {
	type Output = Value;

	fn index(&self, path: &str) -> &Self::Output {
		FieldPath::parse(path)
			.ok()
			.and_then(|parsed| self.values.get(&parsed))
			.unwrap_or_else(|| panic!("Field '{}' not found", path))
	}
}

/// Builder for [`FormEngine`]
pub struct FormEngineBuilder {
	initial: Value,
	schema: ValidationSchema,
	config: FormConfig,
	on_submit: Option<SubmitHandler>,
}

impl FormEngineBuilder {
	pub fn schema(mut self, schema: ValidationSchema) -> Self {
		self.schema = schema;
		self
	}

	pub fn config(mut self, config: FormConfig) -> Self {
		self.config = config;
		self
	}

	/// Handler invoked with the values on each successful submit
	pub fn on_submit<F>(mut self, handler: F) -> Self
	where
		F: FnMut(&FormValues) + 'static,
	{
		self.on_submit = Some(Box::new(handler));
		self
	}

	/// Check the schema against the initial values and build the engine
	///
	/// # Examples
	///
	/// ```
	/// use formkit_forms::{FormEngine, FormError, ValidationSchema};
	/// use serde_json::json;
	///
	/// let schema = ValidationSchema::builder()
	///     .required("social.instagram", "Required")
	///     .build()
	///     .unwrap();
	///
	/// let result = FormEngine::builder(json!({ "social": { "facebook": "" } }))
	///     .schema(schema)
	///     .build();
	/// assert!(matches!(result, Err(FormError::UnknownPath(_))));
	/// ```
	pub fn build(self) -> FormResult<FormEngine> {
		let initial = FormValues::new(self.initial)?;
		self.schema.ensure_complete(&initial)?;
		let errors = self.schema.validate(&initial);
		tracing::debug!(
			fields = initial.leaf_paths().len(),
			rules = self.schema.rules().len(),
			"form engine built"
		);

		Ok(FormEngine {
			values: initial.clone(),
			initial,
			touched: BTreeSet::new(),
			errors,
			schema: self.schema,
			config: self.config,
			submit_count: 0,
			on_submit: self.on_submit,
		})
	}
}
