//! Typed access to inferred parameters.
//!
//! # Example
//!
//! ```ignore
//! use reinhardt_spa_router::use_router;
//!
//! let id: i64 = use_router().path_param("id")?;
//! let page: u32 = use_router().query_param("page").unwrap_or(1);
//! ```

use reinhardt_spa_infer::{ParamMap, Scalar};

use crate::error::ParamError;

/// Types readable from an inferred [`Scalar`].
pub trait FromScalar: Sized {
	/// Name reported in [`ParamError::TypeMismatch`].
	const TYPE_NAME: &'static str;

	/// Converts the scalar, or returns `None` if it holds another type.
	fn from_scalar(value: &Scalar) -> Option<Self>;
}

macro_rules! impl_from_scalar_for_integer {
	($($ty:ty => $type_name:expr),* $(,)?) => {
		$(
			impl FromScalar for $ty {
				const TYPE_NAME: &'static str = $type_name;

				fn from_scalar(value: &Scalar) -> Option<Self> {
					value.as_i64().and_then(|value| <$ty>::try_from(value).ok())
				}
			}
		)*
	};
}

impl_from_scalar_for_integer! {
	i32 => "i32",
	i64 => "i64",
	u32 => "u32",
	u64 => "u64",
	usize => "usize",
}

impl FromScalar for f64 {
	const TYPE_NAME: &'static str = "f64";

	fn from_scalar(value: &Scalar) -> Option<Self> {
		value.as_f64()
	}
}

impl FromScalar for bool {
	const TYPE_NAME: &'static str = "bool";

	fn from_scalar(value: &Scalar) -> Option<Self> {
		value.as_bool()
	}
}

// Every scalar has a textual form.
impl FromScalar for String {
	const TYPE_NAME: &'static str = "String";

	fn from_scalar(value: &Scalar) -> Option<Self> {
		Some(value.to_string())
	}
}

impl FromScalar for Scalar {
	const TYPE_NAME: &'static str = "Scalar";

	fn from_scalar(value: &Scalar) -> Option<Self> {
		Some(value.clone())
	}
}

pub(crate) fn extract<T: FromScalar>(params: &ParamMap, name: &str) -> Result<T, ParamError> {
	let value = params
		.get(name)
		.ok_or_else(|| ParamError::Missing(name.to_string()))?;

	T::from_scalar(value).ok_or_else(|| ParamError::TypeMismatch {
		name: name.to_string(),
		expected: T::TYPE_NAME,
		found: value.kind(),
	})
}
