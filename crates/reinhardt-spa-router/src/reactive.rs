//! Store - publish/subscribe state container
//!
//! `Store<T>` holds a value, publishes every change to its subscribers and
//! counts how many changes it has published. It replaces an implicit UI
//! re-render cycle: navigation scopes write their resolved state into a store,
//! and whatever renders the application subscribes to it.
//!
//! ## Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use reinhardt_spa_router::reactive::Store;
//!
//! let path = Store::new("/".to_string());
//! let seen = Rc::new(Cell::new(0));
//!
//! let _subscription = path.subscribe({
//!     let seen = Rc::clone(&seen);
//!     move |_| seen.set(seen.get() + 1)
//! });
//!
//! assert!(path.set("/about".to_string()));
//! assert!(!path.set("/about".to_string()));
//! assert_eq!(seen.get(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

thread_local! {
	static PUBLISHED: Cell<u64> = const { Cell::new(0) };
}

/// Returns the number of changes published by any store on this thread.
///
/// Render drivers compare this before and after a pass to decide whether the
/// pass produced state that has not been rendered yet.
pub fn publish_epoch() -> u64 {
	PUBLISHED.with(Cell::get)
}

type Subscriber<T> = Rc<dyn Fn(&T)>;

struct StoreInner<T> {
	value: RefCell<T>,
	subscribers: RefCell<Vec<(u64, Subscriber<T>)>>,
	next_subscriber: Cell<u64>,
	version: Cell<u64>,
}

/// A shared value that notifies subscribers when it changes.
///
/// Clones share the same value and subscriber list.
pub struct Store<T: 'static> {
	inner: Rc<StoreInner<T>>,
}

impl<T: 'static> Clone for Store<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T: Clone + PartialEq + 'static> Store<T> {
	/// Creates a store holding `value`.
	pub fn new(value: T) -> Self {
		Self {
			inner: Rc::new(StoreInner {
				value: RefCell::new(value),
				subscribers: RefCell::new(Vec::new()),
				next_subscriber: Cell::new(0),
				version: Cell::new(0),
			}),
		}
	}

	/// Returns a clone of the current value.
	pub fn get(&self) -> T {
		self.inner.value.borrow().clone()
	}

	/// Reads the current value without cloning it.
	///
	/// `f` must not write to this store.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.inner.value.borrow())
	}

	/// Returns how many changes this store has published.
	pub fn version(&self) -> u64 {
		self.inner.version.get()
	}

	/// Replaces the value and publishes it if it differs from the current one.
	///
	/// Returns whether a change was published.
	pub fn set(&self, value: T) -> bool {
		if *self.inner.value.borrow() == value {
			return false;
		}
		*self.inner.value.borrow_mut() = value;
		self.publish();
		true
	}

	/// Mutates the value in place and publishes it if it changed.
	pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
		let mut next = self.get();
		f(&mut next);
		self.set(next)
	}

	/// Registers a subscriber called with every published value.
	///
	/// The subscriber stays registered until the returned [`Subscription`]
	/// is dropped.
	pub fn subscribe(&self, subscriber: impl Fn(&T) + 'static) -> Subscription {
		let id = self.inner.next_subscriber.get();
		self.inner.next_subscriber.set(id + 1);
		self.inner
			.subscribers
			.borrow_mut()
			.push((id, Rc::new(subscriber)));

		let weak: Weak<StoreInner<T>> = Rc::downgrade(&self.inner);
		Subscription {
			release: Some(Box::new(move || {
				if let Some(inner) = weak.upgrade() {
					inner
						.subscribers
						.borrow_mut()
						.retain(|(existing, _)| *existing != id);
				}
			})),
		}
	}

	/// Returns the number of live subscribers.
	pub fn subscriber_count(&self) -> usize {
		self.inner.subscribers.borrow().len()
	}

	fn publish(&self) {
		self.inner.version.set(self.inner.version.get() + 1);
		PUBLISHED.with(|count| count.set(count.get() + 1));

		// Subscribers may write to this store or subscribe again; call them
		// without holding any borrow.
		let snapshot = self.get();
		let subscribers: Vec<Subscriber<T>> = self
			.inner
			.subscribers
			.borrow()
			.iter()
			.map(|(_, subscriber)| Rc::clone(subscriber))
			.collect();

		for subscriber in subscribers {
			subscriber(&snapshot);
		}
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Store<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Store")
			.field("value", &*self.inner.value.borrow())
			.field("version", &self.inner.version.get())
			.field("subscribers", &self.inner.subscribers.borrow().len())
			.finish()
	}
}

/// Keeps a [`Store`] subscriber registered; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
	release: Option<Box<dyn FnOnce()>>,
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription")
			.field("active", &self.release.is_some())
			.finish()
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		if let Some(release) = self.release.take() {
			release();
		}
	}
}
