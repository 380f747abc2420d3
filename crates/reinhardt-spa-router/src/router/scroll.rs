//! Per-path scroll offsets.

use std::collections::HashMap;

/// Last known vertical scroll offset for each visited path.
#[derive(Debug, Clone, Default)]
pub struct ScrollCache {
	offsets: HashMap<String, f64>,
}

impl ScrollCache {
	/// Creates an empty cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records the offset of the path being left.
	pub fn record_last(&mut self, path: &str, offset: f64) {
		self.offsets.insert(path.to_string(), offset);
	}

	/// Returns the recorded offset for `path`, or `0` if it was never recorded.
	pub fn offset(&self, path: &str) -> f64 {
		self.offsets.get(path).copied().unwrap_or(0.0)
	}

	/// Forgets the offset of `path` so the next restore scrolls to the top.
	pub fn reset(&mut self, path: &str) {
		self.offsets.insert(path.to_string(), 0.0);
	}

	/// Returns the number of paths with a recorded offset.
	pub fn len(&self) -> usize {
		self.offsets.len()
	}

	/// Returns whether nothing was recorded.
	pub fn is_empty(&self) -> bool {
		self.offsets.is_empty()
	}
}
