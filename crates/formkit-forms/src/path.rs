//! Structured field paths
//!
//! A [`FieldPath`] addresses one location inside the form values: a plain
//! field (`name`), a nested field (`social.facebook`), an array element
//! (`phoneNumbers[0]`), or any mix of those (`friends[2].name`).
//!
//! Paths are parsed once and then handled as a sequence of
//! [`PathSegment`]s, so lookups never depend on string formatting.

use crate::errors::{FormError, FormResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::iter::Peekable;
use std::str::{Chars, FromStr};

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
	/// Object member access
	Key(String),
	/// Array element access
	Index(usize),
}

/// A parsed location inside the form values.
///
/// The first segment is always a [`PathSegment::Key`], since the form values
/// root is an object.
///
/// # Examples
///
/// ```
/// use formkit_forms::{FieldPath, PathSegment};
///
/// let path: FieldPath = "friends[2].name".parse().unwrap();
/// assert_eq!(
///     path.segments(),
///     &[
///         PathSegment::Key("friends".to_string()),
///         PathSegment::Index(2),
///         PathSegment::Key("name".to_string()),
///     ]
/// );
/// assert_eq!(path.to_string(), "friends[2].name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
	segments: Vec<PathSegment>,
}

impl FieldPath {
	/// Parse a path written in the usual `a.b[0].c` syntax.
	///
	/// # Examples
	///
	/// ```
	/// use formkit_forms::FieldPath;
	///
	/// assert!(FieldPath::parse("social.facebook").is_ok());
	/// assert!(FieldPath::parse("phoneNumbers[1]").is_ok());
	/// assert!(FieldPath::parse("").is_err());
	/// assert!(FieldPath::parse("[0]").is_err());
	/// assert!(FieldPath::parse("friends[x]").is_err());
	/// ```
	pub fn parse(input: &str) -> FormResult<Self> {
		let invalid = |reason: &'static str| FormError::InvalidPath {
			input: input.to_string(),
			reason,
		};

		if input.is_empty() {
			return Err(invalid("path is empty"));
		}

		let mut chars = input.chars().peekable();
		let first = take_key(&mut chars).ok_or_else(|| invalid("path must start with a field name"))?;
		let mut segments = vec![PathSegment::Key(first)];

		while let Some(c) = chars.next() {
			match c {
				'.' => {
					let key = take_key(&mut chars)
						.ok_or_else(|| invalid("expected a field name after `.`"))?;
					segments.push(PathSegment::Key(key));
				}
				'[' => {
					let mut digits = String::new();
					loop {
						match chars.next() {
							Some(']') => break,
							Some(d) if d.is_ascii_digit() => digits.push(d),
							Some(_) => {
								return Err(invalid("array index must be a non-negative integer"));
							}
							None => return Err(invalid("unterminated `[`")),
						}
					}
					let index = digits
						.parse::<usize>()
						.map_err(|_| invalid("array index must be a non-negative integer"))?;
					segments.push(PathSegment::Index(index));
				}
				_ => return Err(invalid("expected `.` or `[`")),
			}
		}

		Ok(Self { segments })
	}

	/// A single-segment path naming a top-level field.
	///
	/// The name is not checked here; [`FieldPath::check`] (run by every
	/// engine and schema entry point) rejects names the path syntax cannot
	/// express.
	pub fn key(name: impl Into<String>) -> Self {
		Self {
			segments: vec![PathSegment::Key(name.into())],
		}
	}

	/// Extend the path with an object member.
	///
	/// # Examples
	///
	/// ```
	/// use formkit_forms::FieldPath;
	///
	/// let path = FieldPath::key("social").child("twitter");
	/// assert_eq!(path.to_string(), "social.twitter");
	/// ```
	pub fn child(mut self, name: impl Into<String>) -> Self {
		self.segments.push(PathSegment::Key(name.into()));
		self
	}

	/// Extend the path with an array index.
	///
	/// # Examples
	///
	/// ```
	/// use formkit_forms::FieldPath;
	///
	/// let path = FieldPath::key("phoneNumbers").index(0);
	/// assert_eq!(path.to_string(), "phoneNumbers[0]");
	/// ```
	pub fn index(mut self, index: usize) -> Self {
		self.segments.push(PathSegment::Index(index));
		self
	}

	/// Verify that every field name can be written in path syntax, so the
	/// path survives a display/parse round trip.
	///
	/// # Examples
	///
	/// ```
	/// use formkit_forms::FieldPath;
	///
	/// assert!(FieldPath::key("social").child("facebook").check().is_ok());
	/// assert!(FieldPath::key("social").child("a.b").check().is_err());
	/// assert!(FieldPath::key("").check().is_err());
	/// ```
	pub fn check(&self) -> FormResult<()> {
		for segment in &self.segments {
			if let PathSegment::Key(key) = segment {
				check_key(key).map_err(|reason| FormError::InvalidPath {
					input: self.to_string(),
					reason,
				})?;
			}
		}
		Ok(())
	}

	pub fn segments(&self) -> &[PathSegment] {
		&self.segments
	}

	pub fn last(&self) -> &PathSegment {
		// Non-empty by construction.
		&self.segments[self.segments.len() - 1]
	}

	/// The enclosing path, or `None` for a top-level field.
	pub fn parent(&self) -> Option<FieldPath> {
		if self.segments.len() < 2 {
			return None;
		}
		Some(Self {
			segments: self.segments[..self.segments.len() - 1].to_vec(),
		})
	}

	/// Whether `self` equals `prefix` or lies underneath it.
	pub fn starts_with(&self, prefix: &FieldPath) -> bool {
		self.segments.starts_with(&prefix.segments)
	}

	/// Index of the `array` element this path lies in, if it lies in one.
	///
	/// # Examples
	///
	/// ```
	/// use formkit_forms::FieldPath;
	///
	/// let friends = FieldPath::key("friends");
	/// assert_eq!(FieldPath::key("friends").index(2).child("name").element_index(&friends), Some(2));
	/// assert_eq!(friends.element_index(&friends), None);
	/// assert_eq!(FieldPath::key("name").element_index(&friends), None);
	/// ```
	pub fn element_index(&self, array: &FieldPath) -> Option<usize> {
		if !self.starts_with(array) {
			return None;
		}
		match self.segments.get(array.segments.len()) {
			Some(PathSegment::Index(index)) => Some(*index),
			_ => None,
		}
	}

	/// Move the path to element `index` of `array`.
	///
	/// Callers establish that the path lies in `array` via
	/// [`FieldPath::element_index`].
	pub(crate) fn with_element_index(mut self, array: &FieldPath, index: usize) -> Self {
		self.segments[array.segments.len()] = PathSegment::Index(index);
		self
	}

	/// Resolve the path against an object.
	pub fn lookup<'v>(&self, root: &'v Map<String, Value>) -> Option<&'v Value> {
		let (first, rest) = self.split_first();
		rest.iter().try_fold(root.get(first)?, |current, segment| match segment {
			PathSegment::Key(key) => current.as_object()?.get(key),
			PathSegment::Index(index) => current.as_array()?.get(*index),
		})
	}

	/// Resolve the path against an object, mutably.
	pub fn lookup_mut<'v>(&self, root: &'v mut Map<String, Value>) -> Option<&'v mut Value> {
		let (first, rest) = self.split_first();
		rest.iter()
			.try_fold(root.get_mut(first)?, |current, segment| match segment {
				PathSegment::Key(key) => current.as_object_mut()?.get_mut(key),
				PathSegment::Index(index) => current.as_array_mut()?.get_mut(*index),
			})
	}

	fn split_first(&self) -> (&str, &[PathSegment]) {
		match self.segments.split_first() {
			Some((PathSegment::Key(key), rest)) => (key.as_str(), rest),
			// parse() and key() both start with a Key segment.
			_ => unreachable!("field path must start with a key"),
		}
	}
}

/// Why `name` cannot be a path field name, if it cannot.
pub(crate) fn check_key(name: &str) -> Result<(), &'static str> {
	if name.is_empty() {
		Err("field name is empty")
	} else if name.contains(['.', '[', ']']) {
		Err("field name contains `.`, `[` or `]`")
	} else {
		Ok(())
	}
}

fn take_key(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
	let mut key = String::new();
	while let Some(&c) = chars.peek() {
		if matches!(c, '.' | '[' | ']') {
			break;
		}
		key.push(c);
		chars.next();
	}
	(!key.is_empty()).then_some(key)
}

impl fmt::Display for FieldPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, segment) in self.segments.iter().enumerate() {
			match segment {
				PathSegment::Key(key) if i == 0 => f.write_str(key)?,
				PathSegment::Key(key) => write!(f, ".{key}")?,
				PathSegment::Index(index) => write!(f, "[{index}]")?,
			}
		}
		Ok(())
	}
}

impl FromStr for FieldPath {
	type Err = FormError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl TryFrom<&str> for FieldPath {
	type Error = FormError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		Self::parse(value)
	}
}

impl Serialize for FieldPath {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for FieldPath {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = String::deserialize(deserializer)?;
		Self::parse(&raw).map_err(serde::de::Error::custom)
	}
}

/// Anything usable where a field path is expected.
///
/// Implemented for parsed paths and for path strings, so callers can write
/// `engine.set_field_value("social.facebook", ...)` without parsing first.
pub trait IntoFieldPath {
	fn into_field_path(self) -> FormResult<FieldPath>;
}

impl IntoFieldPath for FieldPath {
	fn into_field_path(self) -> FormResult<FieldPath> {
		self.check()?;
		Ok(self)
	}
}

impl IntoFieldPath for &FieldPath {
	fn into_field_path(self) -> FormResult<FieldPath> {
		self.check()?;
		Ok(self.clone())
	}
}

impl IntoFieldPath for &str {
	fn into_field_path(self) -> FormResult<FieldPath> {
		FieldPath::parse(self)
	}
}

impl IntoFieldPath for String {
	fn into_field_path(self) -> FormResult<FieldPath> {
		FieldPath::parse(&self)
	}
}

impl IntoFieldPath for &String {
	fn into_field_path(self) -> FormResult<FieldPath> {
		FieldPath::parse(self)
	}
}
