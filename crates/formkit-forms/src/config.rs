//! Form behavior settings

use crate::errors::FormResult;
use serde::{Deserialize, Serialize};

/// Controls when the engine recomputes its errors.
///
/// Submitting always validates, whatever these switches say.
///
/// # Examples
///
/// ```
/// use formkit_forms::FormConfig;
///
/// let config = FormConfig::from_toml_str("validate_on_change = false").unwrap();
/// assert!(!config.validate_on_change);
/// assert!(config.validate_on_blur);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
	/// Re-validate after every value change and field-array edit
	pub validate_on_change: bool,
	/// Re-validate when a field is marked touched
	pub validate_on_blur: bool,
}

impl Default for FormConfig {
	fn default() -> Self {
		Self {
			validate_on_change: true,
			validate_on_blur: true,
		}
	}
}

impl FormConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_validate_on_change(mut self, enabled: bool) -> Self {
		self.validate_on_change = enabled;
		self
	}

	pub fn with_validate_on_blur(mut self, enabled: bool) -> Self {
		self.validate_on_blur = enabled;
		self
	}

	/// Parse settings from a TOML document; absent keys keep their defaults.
	pub fn from_toml_str(source: &str) -> FormResult<Self> {
		Ok(toml::from_str(source)?)
	}
}
