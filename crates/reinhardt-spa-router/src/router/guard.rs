//! Single top-level scope guard.
//!
//! At most one top-level `Routes` scope may own the global click and
//! navigation listeners at a time. The guard is an injectable flag: tests
//! create their own [`ScopeGuard`], applications use [`ScopeGuard::global`].

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

thread_local! {
	static GLOBAL: ScopeGuard = ScopeGuard::new();
}

/// Shared "a top-level scope is mounted" flag.
///
/// Clones observe the same flag.
#[derive(Clone, Default)]
pub struct ScopeGuard {
	state: Rc<GuardState>,
}

#[derive(Default)]
struct GuardState {
	held: Cell<bool>,
	// Bumped on every acquisition so stale tokens cannot release a newer holder.
	generation: Cell<u64>,
}

impl ScopeGuard {
	/// Creates an unheld guard.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the guard shared by every scope on this thread.
	pub fn global() -> Self {
		GLOBAL.with(Clone::clone)
	}

	/// Returns whether a scope currently holds the guard.
	pub fn is_held(&self) -> bool {
		self.state.held.get()
	}

	/// Takes the guard if it is free.
	///
	/// The guard is released when the returned token is dropped.
	pub fn try_acquire(&self) -> Option<GuardToken> {
		if self.state.held.replace(true) {
			return None;
		}
		let generation = self.state.generation.get().wrapping_add(1);
		self.state.generation.set(generation);
		Some(GuardToken {
			state: Rc::clone(&self.state),
			generation,
		})
	}

	/// Releases the guard regardless of who holds it.
	///
	/// Tokens issued before the reset no longer release the guard.
	pub fn reset(&self) {
		self.state.held.set(false);
	}
}

impl fmt::Debug for ScopeGuard {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ScopeGuard")
			.field("held", &self.state.held.get())
			.field("generation", &self.state.generation.get())
			.finish()
	}
}

/// Proof of holding a [`ScopeGuard`].
pub struct GuardToken {
	state: Rc<GuardState>,
	generation: u64,
}

impl fmt::Debug for GuardToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GuardToken")
			.field("generation", &self.generation)
			.finish()
	}
}

impl Drop for GuardToken {
	fn drop(&mut self) {
		if self.state.generation.get() == self.generation {
			self.state.held.set(false);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_acquire_release() {
		let guard = ScopeGuard::new();

		let token = guard.try_acquire().unwrap();
		assert!(guard.is_held());
		assert!(guard.try_acquire().is_none());

		drop(token);
		assert!(!guard.is_held());
		assert!(guard.try_acquire().is_some());
	}

	#[rstest]
	fn test_clones_share_flag() {
		let guard = ScopeGuard::new();
		let other = guard.clone();

		let _token = guard.try_acquire().unwrap();

		assert!(other.is_held());
	}

	#[rstest]
	fn test_stale_token_does_not_release_new_holder() {
		let guard = ScopeGuard::new();
		let stale = guard.try_acquire().unwrap();
		guard.reset();
		let current = guard.try_acquire().unwrap();

		drop(stale);
		assert!(guard.is_held());

		drop(current);
		assert!(!guard.is_held());
	}

	#[rstest]
	fn test_global_guard_is_shared() {
		ScopeGuard::global().reset();

		let token = ScopeGuard::global().try_acquire().unwrap();
		assert!(ScopeGuard::global().is_held());

		drop(token);
		assert!(!ScopeGuard::global().is_held());
	}
}
