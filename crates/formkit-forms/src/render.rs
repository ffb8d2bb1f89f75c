//! Field and error renderers
//!
//! Rendering is split into two capabilities:
//!
//! - [`ErrorRenderer`] turns one error message into markup. Use
//!   [`PlainError`], [`ClassedError`], [`StyledError`], or any
//!   `Fn(&str) -> String` closure.
//! - [`FieldRenderer`] turns a [`BoundField`] into markup. [`TextInput`],
//!   [`TextArea`], and [`ListInput`] cover single-line inputs, multi-line
//!   inputs, and field arrays.
//!
//! Field renderers show the error only when [`BoundField::visible_error`]
//! returns one, i.e. after the field was touched. All text is HTML-escaped.
//!
//! # Examples
//!
//! ```
//! use formkit_forms::render::{FieldRenderer, InputType, StyledError, TextInput};
//! use formkit_forms::{FormEngine, ValidationSchema};
//! use serde_json::json;
//!
//! let mut form = FormEngine::builder(json!({ "email": "" }))
//!     .schema(ValidationSchema::builder().required("email", "Required").build().unwrap())
//!     .build()
//!     .unwrap();
//! form.set_field_touched("email");
//!
//! let input = TextInput::new(InputType::Email).with_error_renderer(StyledError::default());
//! let html = input.render(&form.field("email").unwrap());
//! assert!(html.contains(r#"<input type="email" id="id_email" name="email" value="" />"#));
//! assert!(html.contains(">Required</div>"));
//! ```

use crate::bound_field::BoundField;
use serde_json::Value;

/// Escape text for use in element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
	text.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#x27;")
}

/// Renders one validation message.
pub trait ErrorRenderer {
	/// `message` is raw text; implementations escape it.
	fn render_error(&self, message: &str) -> String;
}

impl<F> ErrorRenderer for F
where
	F: Fn(&str) -> String,
{
	fn render_error(&self, message: &str) -> String {
		self(message)
	}
}

/// `<div>message</div>`
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainError;

impl ErrorRenderer for PlainError {
	fn render_error(&self, message: &str) -> String {
		format!("<div>{}</div>", escape_html(message))
	}
}

/// `<div class="…">message</div>`, with class `error` by default
#[derive(Debug, Clone)]
pub struct ClassedError {
	class: String,
}

impl ClassedError {
	pub fn new(class: impl Into<String>) -> Self {
		Self {
			class: class.into(),
		}
	}
}

impl Default for ClassedError {
	fn default() -> Self {
		Self::new("error")
	}
}

impl ErrorRenderer for ClassedError {
	fn render_error(&self, message: &str) -> String {
		format!(
			"<div class=\"{}\">{}</div>",
			escape_html(&self.class),
			escape_html(message)
		)
	}
}

/// Error message with inline styling
///
/// Defaults to bold red 14px text with a 4px top margin.
///
/// # Examples
///
/// ```
/// use formkit_forms::render::{ErrorRenderer, StyledError};
///
/// let html = StyledError::default().render_error("Invalid email format");
/// assert_eq!(
///     html,
///     "<div style=\"color: red; font-size: 14px; margin-top: 4px; font-weight: bold\">Invalid email format</div>"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct StyledError {
	pub color: String,
	pub font_size: String,
	pub margin_top: String,
	pub font_weight: String,
}

impl Default for StyledError {
	fn default() -> Self {
		Self {
			color: "red".to_string(),
			font_size: "14px".to_string(),
			margin_top: "4px".to_string(),
			font_weight: "bold".to_string(),
		}
	}
}

impl StyledError {
	pub fn with_color(mut self, color: impl Into<String>) -> Self {
		self.color = color.into();
		self
	}

	pub fn with_font_size(mut self, font_size: impl Into<String>) -> Self {
		self.font_size = font_size.into();
		self
	}

	fn style(&self) -> String {
		format!(
			"color: {}; font-size: {}; margin-top: {}; font-weight: {}",
			self.color, self.font_size, self.margin_top, self.font_weight
		)
	}
}

impl ErrorRenderer for StyledError {
	fn render_error(&self, message: &str) -> String {
		format!(
			"<div style=\"{}\">{}</div>",
			escape_html(&self.style()),
			escape_html(message)
		)
	}
}

/// Renders a bound field.
pub trait FieldRenderer {
	fn render(&self, field: &BoundField<'_>) -> String;
}

/// `type` attribute of a [`TextInput`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
	#[default]
	Text,
	Email,
	Password,
}

impl InputType {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Text => "text",
			Self::Email => "email",
			Self::Password => "password",
		}
	}
}

fn render_visible_error(out: &mut String, field: &BoundField<'_>, renderer: &dyn ErrorRenderer) {
	if let Some(message) = field.visible_error() {
		out.push_str(&renderer.render_error(message));
	}
}

/// Single-line `<input>`
pub struct TextInput {
	input_type: InputType,
	error_renderer: Box<dyn ErrorRenderer>,
}

impl TextInput {
	pub fn new(input_type: InputType) -> Self {
		Self {
			input_type,
			error_renderer: Box::new(PlainError),
		}
	}

	pub fn text() -> Self {
		Self::new(InputType::Text)
	}

	pub fn with_error_renderer(mut self, renderer: impl ErrorRenderer + 'static) -> Self {
		self.error_renderer = Box::new(renderer);
		self
	}

	pub fn input_type(&self) -> InputType {
		self.input_type
	}
}

impl FieldRenderer for TextInput {
	fn render(&self, field: &BoundField<'_>) -> String {
		let mut out = format!(
			r#"<input type="{}" id="{}" name="{}" value="{}" />"#,
			self.input_type.as_str(),
			escape_html(&field.id_for_label()),
			escape_html(&field.name()),
			escape_html(&field.value_text()),
		);
		render_visible_error(&mut out, field, self.error_renderer.as_ref());
		out
	}
}

/// Multi-line `<textarea>`
pub struct TextArea {
	error_renderer: Box<dyn ErrorRenderer>,
}

impl TextArea {
	pub fn new() -> Self {
		Self {
			error_renderer: Box::new(PlainError),
		}
	}

	pub fn with_error_renderer(mut self, renderer: impl ErrorRenderer + 'static) -> Self {
		self.error_renderer = Box::new(renderer);
		self
	}
}

impl Default for TextArea {
	fn default() -> Self {
		Self::new()
	}
}

impl FieldRenderer for TextArea {
	fn render(&self, field: &BoundField<'_>) -> String {
		let mut out = format!(
			r#"<textarea id="{}" name="{}">{}</textarea>"#,
			escape_html(&field.id_for_label()),
			escape_html(&field.name()),
			escape_html(&field.value_text()),
		);
		render_visible_error(&mut out, field, self.error_renderer.as_ref());
		out
	}
}

/// Field array editor
///
/// One text input per element, named by its indexed path. Each row gets an
/// add button; rows after the first also get a remove button. The buttons
/// carry `data-action` / `data-index` attributes for the caller to map onto
/// [`FormEngine::push`] and [`FormEngine::remove`].
///
/// # Examples
///
/// ```
/// use formkit_forms::render::{FieldRenderer, ListInput};
/// use formkit_forms::FormEngine;
/// use serde_json::json;
///
/// let form = FormEngine::builder(json!({ "friends": ["Ada", "Grace"] })).build().unwrap();
/// let html = ListInput::new().render(&form.field("friends").unwrap());
///
/// assert!(html.contains(r#"name="friends[0]" value="Ada""#));
/// assert!(html.contains(r#"name="friends[1]" value="Grace""#));
/// assert_eq!(html.matches("data-action=\"remove\"").count(), 1);
/// assert_eq!(html.matches("data-action=\"push\"").count(), 2);
/// ```
///
/// [`FormEngine::push`]: crate::FormEngine::push
/// [`FormEngine::remove`]: crate::FormEngine::remove
pub struct ListInput {
	error_renderer: Box<dyn ErrorRenderer>,
}

impl ListInput {
	pub fn new() -> Self {
		Self {
			error_renderer: Box::new(PlainError),
		}
	}

	pub fn with_error_renderer(mut self, renderer: impl ErrorRenderer + 'static) -> Self {
		self.error_renderer = Box::new(renderer);
		self
	}
}

impl Default for ListInput {
	fn default() -> Self {
		Self::new()
	}
}

impl FieldRenderer for ListInput {
	fn render(&self, field: &BoundField<'_>) -> String {
		let items: &[Value] = field
			.value()
			.and_then(Value::as_array)
			.map(Vec::as_slice)
			.unwrap_or_default();

		let mut out = String::from("<div>");
		for (index, item) in items.iter().enumerate() {
			let element = BoundField::new(field.path().clone().index(index), Some(item), None, false);
			out.push_str(&format!(
				r#"<div><input type="text" id="{}" name="{}" value="{}" />"#,
				escape_html(&element.id_for_label()),
				escape_html(&element.name()),
				escape_html(&element.value_text()),
			));
			if index > 0 {
				out.push_str(&format!(
					r#"<button type="button" data-action="remove" data-index="{index}">-</button>"#
				));
			}
			out.push_str("<button type=\"button\" data-action=\"push\">+</button></div>");
		}
		out.push_str("</div>");
		render_visible_error(&mut out, field, self.error_renderer.as_ref());
		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::path::FieldPath;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("plain", "plain")]
	#[case("<script>", "&lt;script&gt;")]
	#[case("a & \"b\" 'c'", "a &amp; &quot;b&quot; &#x27;c&#x27;")]
	fn test_escape_html(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(escape_html(input), expected);
	}

	#[rstest]
	fn test_error_renderers() {
		assert_eq!(PlainError.render_error("Required"), "<div>Required</div>");
		assert_eq!(
			ClassedError::default().render_error("Required"),
			"<div class=\"error\">Required</div>"
		);
		assert_eq!(
			StyledError::default()
				.with_color("crimson")
				.with_font_size("12px")
				.render_error("<b>"),
			"<div style=\"color: crimson; font-size: 12px; margin-top: 4px; font-weight: bold\">&lt;b&gt;</div>"
		);
	}

	#[rstest]
	fn test_closure_error_renderer() {
		let renderer = |message: &str| format!("<span class=\"hint\">{}</span>", escape_html(message));

		let html = TextInput::text()
			.with_error_renderer(renderer)
			.render(&BoundField::new(FieldPath::key("postName"), None, Some("Required"), true));

		assert!(html.ends_with("<span class=\"hint\">Required</span>"));
	}

	#[rstest]
	#[case(false, None)]
	#[case(true, Some("<div>Required</div>"))]
	fn test_text_input_error_gated_by_touched(#[case] touched: bool, #[case] expected: Option<&str>) {
		// Arrange
		let value = json!("");
		let field = BoundField::new(FieldPath::key("name"), Some(&value), Some("Required"), touched);

		// Act
		let html = TextInput::text().render(&field);

		// Assert
		assert!(html.starts_with(
			"<input type=\"text\" id=\"id_name\" name=\"name\" value=\"\" />"
		));
		match expected {
			Some(error) => assert!(html.ends_with(error)),
			None => assert!(!html.contains("<div>")),
		}
	}

	#[rstest]
	fn test_password_input_and_escaping() {
		let value = json!("p\"w<d>");
		let field = BoundField::new(FieldPath::key("password"), Some(&value), None, true);

		let html = TextInput::new(InputType::Password).render(&field);

		assert_eq!(
			html,
			"<input type=\"password\" id=\"id_password\" name=\"password\" value=\"p&quot;w&lt;d&gt;\" />"
		);
	}

	#[rstest]
	fn test_text_area() {
		let value = json!("Hello\nworld");
		let field = BoundField::new(
			FieldPath::key("postMessage"),
			Some(&value),
			Some("Required"),
			true,
		);

		let html = TextArea::new()
			.with_error_renderer(ClassedError::default())
			.render(&field);

		assert_eq!(
			html,
			"<textarea id=\"id_postMessage\" name=\"postMessage\">Hello\nworld</textarea><div class=\"error\">Required</div>"
		);
	}

	#[rstest]
	fn test_list_input_rows() {
		// Arrange
		let value = json!(["Ada"]);
		let field = BoundField::new(FieldPath::key("friends"), Some(&value), None, false);

		// Act
		let html = ListInput::new().render(&field);

		// Assert
		assert_eq!(
			html,
			concat!(
				"<div><div><input type=\"text\" id=\"id_friends_0\" name=\"friends[0]\" value=\"Ada\" />",
				"<button type=\"button\" data-action=\"push\">+</button></div></div>"
			)
		);
	}

	#[rstest]
	fn test_list_input_remove_button_after_first_row() {
		let value = json!(["Ada", "<Grace>"]);
		let field = BoundField::new(FieldPath::key("friends"), Some(&value), None, false);

		let html = ListInput::new().render(&field);

		assert_eq!(
			html,
			concat!(
				"<div><div><input type=\"text\" id=\"id_friends_0\" name=\"friends[0]\" value=\"Ada\" />",
				"<button type=\"button\" data-action=\"push\">+</button></div>",
				"<div><input type=\"text\" id=\"id_friends_1\" name=\"friends[1]\" value=\"&lt;Grace&gt;\" />",
				"<button type=\"button\" data-action=\"remove\" data-index=\"1\">-</button>",
				"<button type=\"button\" data-action=\"push\">+</button></div></div>"
			)
		);
	}

	#[rstest]
	fn test_list_input_on_non_array_renders_empty_list() {
		let value = json!("not a list");
		let field = BoundField::new(FieldPath::key("friends"), Some(&value), None, false);

		assert_eq!(ListInput::default().render(&field), "<div></div>");
	}
}
