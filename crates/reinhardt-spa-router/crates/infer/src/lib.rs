//! Scalar type inference for route and query parameters.
//!
//! URL components are always text. [`infer`] coerces a raw value into the
//! scalar it most likely represents so that `/user/123` yields the number `123`
//! and `?debug=true` yields a boolean.
//!
//! ## Rules
//!
//! - `true` / `false` become [`Scalar::Bool`]
//! - a canonical decimal integer in `i64` range becomes [`Scalar::Int`]
//! - a finite decimal or exponent number becomes [`Scalar::Float`]
//! - anything else stays [`Scalar::Text`], including the empty string,
//!   zero-padded integers such as `007`, `NaN` and `inf`
//!
//! ## Example
//!
//! ```
//! use reinhardt_spa_infer::{Scalar, infer};
//!
//! assert_eq!(infer("123"), Scalar::Int(123));
//! assert_eq!(infer("1.5"), Scalar::Float(1.5));
//! assert_eq!(infer("true"), Scalar::Bool(true));
//! assert_eq!(infer("test"), Scalar::Text("test".to_string()));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static INTEGER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^-?(?:0|[1-9][0-9]*)$").expect("integer pattern is valid"));

static FLOAT: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^-?(?:(?:0|[1-9][0-9]*)(?:\.[0-9]+)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
		.expect("float pattern is valid")
});

/// Parameters keyed by name with inferred values.
pub type ParamMap = HashMap<String, Scalar>;

/// A scalar value inferred from URL text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
	/// A boolean literal.
	Bool(bool),
	/// An integer.
	Int(i64),
	/// A floating point number.
	Float(f64),
	/// Text that is not recognized as any other scalar.
	Text(String),
}

impl Scalar {
	/// Returns the integer value, if this is an integer.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::Int(value) => Some(*value),
			_ => None,
		}
	}

	/// Returns the numeric value of an integer or float.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Int(value) => Some(*value as f64),
			Self::Float(value) => Some(*value),
			_ => None,
		}
	}

	/// Returns the boolean value, if this is a boolean.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(value) => Some(*value),
			_ => None,
		}
	}

	/// Returns the text, if this value stayed textual.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Text(value) => Some(value),
			_ => None,
		}
	}

	/// Returns the name of the inferred type.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Bool(_) => "bool",
			Self::Int(_) => "int",
			Self::Float(_) => "float",
			Self::Text(_) => "text",
		}
	}
}

impl fmt::Display for Scalar {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool(value) => write!(f, "{}", value),
			Self::Int(value) => write!(f, "{}", value),
			Self::Float(value) => write!(f, "{}", value),
			Self::Text(value) => f.write_str(value),
		}
	}
}

impl From<&str> for Scalar {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for Scalar {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<i64> for Scalar {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<f64> for Scalar {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<bool> for Scalar {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

/// Infers the scalar a raw URL value represents.
pub fn infer(raw: &str) -> Scalar {
	match raw {
		"true" => return Scalar::Bool(true),
		"false" => return Scalar::Bool(false),
		_ => {}
	}

	if INTEGER.is_match(raw) {
		// Out-of-range integers fall through to the float branch.
		if let Ok(value) = raw.parse::<i64>() {
			return Scalar::Int(value);
		}
	}

	if FLOAT.is_match(raw) {
		if let Ok(value) = raw.parse::<f64>() {
			if value.is_finite() {
				return Scalar::Float(value);
			}
		}
	}

	Scalar::Text(raw.to_string())
}

/// Infers every value of a sequence of raw key/value pairs.
///
/// When a key repeats, the last value wins.
pub fn infer_pairs<I, K, V>(pairs: I) -> ParamMap
where
	I: IntoIterator<Item = (K, V)>,
	K: Into<String>,
	V: AsRef<str>,
{
	pairs
		.into_iter()
		.map(|(key, value)| (key.into(), infer(value.as_ref())))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("0", Scalar::Int(0))]
	#[case("123", Scalar::Int(123))]
	#[case("-42", Scalar::Int(-42))]
	#[case("1.5", Scalar::Float(1.5))]
	#[case("-0.25", Scalar::Float(-0.25))]
	#[case(".5", Scalar::Float(0.5))]
	#[case("1e3", Scalar::Float(1000.0))]
	#[case("99999999999999999999", Scalar::Float(1e20))]
	#[case("true", Scalar::Bool(true))]
	#[case("false", Scalar::Bool(false))]
	fn test_infer_typed(#[case] raw: &str, #[case] expected: Scalar) {
		assert_eq!(infer(raw), expected);
	}

	#[rstest]
	#[case("")]
	#[case("test")]
	#[case("007")]
	#[case("1.")]
	#[case("+1")]
	#[case("NaN")]
	#[case("inf")]
	#[case("1e999")]
	#[case("True")]
	#[case("12abc")]
	#[case(" 1")]
	fn test_infer_text(#[case] raw: &str) {
		assert_eq!(infer(raw), Scalar::Text(raw.to_string()));
	}

	#[rstest]
	fn test_infer_pairs_last_wins() {
		let params = infer_pairs(vec![("page", "1"), ("name", "test"), ("page", "2")]);

		assert_eq!(params.len(), 2);
		assert_eq!(params["page"], Scalar::Int(2));
		assert_eq!(params["name"], Scalar::Text("test".to_string()));
	}

	#[rstest]
	fn test_accessors() {
		assert_eq!(Scalar::Int(3).as_i64(), Some(3));
		assert_eq!(Scalar::Int(3).as_f64(), Some(3.0));
		assert_eq!(Scalar::Float(0.5).as_i64(), None);
		assert_eq!(Scalar::Bool(true).as_bool(), Some(true));
		assert_eq!(Scalar::from("x").as_str(), Some("x"));
		assert_eq!(Scalar::Text("x".into()).kind(), "text");
	}

	#[rstest]
	fn test_serializes_untagged() {
		let params = infer_pairs([("id", "123")]);
		let json = serde_json::to_string(&params).unwrap();

		assert_eq!(json, r#"{"id":123}"#);
	}

	#[rstest]
	fn test_display() {
		assert_eq!(Scalar::Int(7).to_string(), "7");
		assert_eq!(Scalar::Text("abc".into()).to_string(), "abc");
		assert_eq!(Scalar::Bool(false).to_string(), "false");
	}

	mod properties {
		use super::*;
		use proptest::prelude::*;

		proptest! {
			#[test]
			fn integers_round_trip(value in any::<i64>()) {
				prop_assert_eq!(infer(&value.to_string()), Scalar::Int(value));
			}

			#[test]
			fn alphabetic_text_stays_text(raw in "[a-zA-Z]{1,12}") {
				prop_assume!(raw != "true" && raw != "false");
				prop_assert_eq!(infer(&raw), Scalar::Text(raw.clone()));
			}
		}
	}
}
