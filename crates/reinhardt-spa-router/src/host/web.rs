//! `web-sys` backed browser host (WASM only).

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::{
	AnchorClick, BrowserHost, ClickDisposition, ClickEvent, ClickListener, HistoryState,
	ListenerHandle, Location, NavigationListener,
};
use crate::error::RouterError;

fn js_error(context: &str, value: JsValue) -> RouterError {
	RouterError::Host(format!("{}: {:?}", context, value))
}

/// Browser host backed by `window`, `document` and `history`.
#[derive(Debug, Clone)]
pub struct WebHost {
	window: web_sys::Window,
}

impl WebHost {
	/// Binds to the global `window`.
	pub fn new() -> Result<Self, RouterError> {
		let window =
			web_sys::window().ok_or_else(|| RouterError::Host("no global window".to_string()))?;
		Ok(Self { window })
	}

	/// Returns this host as a shared trait object.
	pub fn shared(&self) -> Rc<dyn BrowserHost> {
		Rc::new(self.clone())
	}

	fn history(&self) -> Result<web_sys::History, RouterError> {
		self.window
			.history()
			.map_err(|err| js_error("history unavailable", err))
	}

	fn state_value(state: &HistoryState) -> Result<JsValue, RouterError> {
		let json = serde_json::to_string(state)
			.map_err(|err| RouterError::Host(format!("history state: {}", err)))?;
		js_sys::JSON::parse(&json).map_err(|err| js_error("history state", err))
	}

	fn listen(
		target: web_sys::EventTarget,
		event: &'static str,
		capture: bool,
		closure: Closure<dyn FnMut(web_sys::Event)>,
	) -> Result<ListenerHandle, RouterError> {
		target
			.add_event_listener_with_callback_and_bool(
				event,
				closure.as_ref().unchecked_ref(),
				capture,
			)
			.map_err(|err| js_error(event, err))?;

		// The handle owns the closure; dropping it detaches and frees it.
		Ok(ListenerHandle::new(move || {
			let _ = target.remove_event_listener_with_callback_and_bool(
				event,
				closure.as_ref().unchecked_ref(),
				capture,
			);
			drop(closure);
		}))
	}
}

fn anchor_click(event: &web_sys::MouseEvent) -> Option<AnchorClick> {
	let target = event.target()?.dyn_into::<web_sys::Element>().ok()?;
	let anchor = target
		.closest("a[href]")
		.ok()??
		.dyn_into::<web_sys::HtmlAnchorElement>()
		.ok()?;

	let target = anchor.target();
	Some(AnchorClick {
		href: anchor.href(),
		target: (!target.is_empty()).then_some(target),
		download: anchor.has_attribute("download"),
		external: anchor.has_attribute("data-external"),
	})
}

impl BrowserHost for WebHost {
	fn location(&self) -> Location {
		let location = self.window.location();
		Location::new(
			location.origin().unwrap_or_default(),
			location.pathname().unwrap_or_else(|_| "/".to_string()),
			location.search().unwrap_or_default(),
		)
	}

	fn push_entry(&self, url: &str, state: &HistoryState) -> Result<(), RouterError> {
		self.history()?
			.push_state_with_url(&Self::state_value(state)?, "", Some(url))
			.map_err(|err| RouterError::Navigation(format!("pushState `{}`: {:?}", url, err)))
	}

	fn replace_entry(&self, url: &str, state: &HistoryState) -> Result<(), RouterError> {
		self.history()?
			.replace_state_with_url(&Self::state_value(state)?, "", Some(url))
			.map_err(|err| RouterError::Navigation(format!("replaceState `{}`: {:?}", url, err)))
	}

	fn back(&self) -> Result<(), RouterError> {
		self.history()?
			.back()
			.map_err(|err| RouterError::Navigation(format!("history.back: {:?}", err)))
	}

	fn scroll_y(&self) -> f64 {
		self.window.scroll_y().unwrap_or(0.0)
	}

	fn scroll_to(&self, offset: f64) {
		self.window.scroll_to_with_x_and_y(0.0, offset);
	}

	fn on_click(&self, listener: ClickListener) -> Result<ListenerHandle, RouterError> {
		let document = self
			.window
			.document()
			.ok_or_else(|| RouterError::Host("no document".to_string()))?;

		let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
			let Some(mouse) = event.dyn_ref::<web_sys::MouseEvent>() else {
				return;
			};
			let click = ClickEvent {
				anchor: anchor_click(mouse),
				button: mouse.button(),
				modifier_key: mouse.ctrl_key()
					|| mouse.meta_key()
					|| mouse.shift_key()
					|| mouse.alt_key(),
				default_prevented: mouse.default_prevented(),
			};
			if listener(&click) == ClickDisposition::Intercepted {
				event.prevent_default();
			}
		}) as Box<dyn FnMut(_)>);

		Self::listen(document.into(), "click", true, closure)
	}

	fn on_navigation(&self, listener: NavigationListener) -> Result<ListenerHandle, RouterError> {
		let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
			listener();
		}) as Box<dyn FnMut(_)>);

		Self::listen(self.window.clone().into(), "popstate", false, closure)
	}

	fn defer(&self, task: Box<dyn FnOnce()>) {
		let callback = Closure::once_into_js(move || task());
		if let Err(err) = self.window.request_animation_frame(callback.unchecked_ref()) {
			crate::error_log!("requestAnimationFrame failed: {:?}", err);
		}
	}
}
