//! Integration tests for the declarative router
//!
//! These tests drive a full `Routes` tree on the in-memory host:
//! 1. Match precedence and exactly-once registration
//! 2. History semantics of push, replace and back
//! 3. Parameter and query inference
//! 4. Redirects, Navigate, links and nested scopes
//! 5. The accessor outside of a scope

use std::cell::Cell;
use std::rc::Rc;

use reinhardt_spa_router::host::{AnchorClick, BrowserHost, ClickEvent, MemoryHost};
use reinhardt_spa_router::prelude::*;
use reinhardt_spa_router::{MatchStatus, NavigationController};
use rstest::{fixture, rstest};

#[fixture]
fn host() -> MemoryHost {
	MemoryHost::new()
}

fn mount<F, V>(host: &MemoryHost, view: F) -> Routes
where
	F: Fn() -> V + 'static,
	V: IntoView,
{
	Routes::mount(host.shared(), RouterConfig::default(), &ScopeGuard::new(), view).unwrap()
}

fn html(routes: &Routes) -> String {
	routes.try_render().unwrap().render_to_string()
}

/// Identical patterns: the first registered slot wins
#[rstest]
fn test_duplicate_pattern_first_registered_wins(host: MemoryHost) {
	let first = RouteSlot::new("/a", |_| "First");
	let second = RouteSlot::new("/a", |_| "Second");
	let routes = mount(&host, {
		let (first, second) = (first.clone(), second.clone());
		move || View::fragment([first.render(), second.render()])
	});
	html(&routes);

	routes.controller().push("/a").unwrap();

	assert_eq!(html(&routes), "First");
	assert_eq!(routes.controller().active_handler(), Some(first.id()));
}

/// Render order of content does not change precedence
#[rstest]
fn test_precedence_follows_registration_not_render_order(host: MemoryHost) {
	let first = RouteSlot::new("/a", |_| "First");
	let second = RouteSlot::new("/a", |_| "Second");
	let flipped = Rc::new(Cell::new(false));
	let routes = mount(&host, {
		let (first, second, flipped) = (first.clone(), second.clone(), Rc::clone(&flipped));
		move || {
			if flipped.get() {
				View::fragment([second.render(), first.render()])
			} else {
				View::fragment([first.render(), second.render()])
			}
		}
	});
	html(&routes);

	flipped.set(true);
	routes.controller().push("/a").unwrap();

	assert_eq!(html(&routes), "First");
}

/// A catch-all declared first shadows everything after it
#[rstest]
fn test_wildcard_registered_first_shadows_literal(host: MemoryHost) {
	let fallback = RouteSlot::new("*", |_| "Fallback");
	let about = RouteSlot::new("/about", |_| "About");
	let routes = mount(&host, move || View::fragment([fallback.render(), about.render()]));
	html(&routes);

	routes.controller().push("/about").unwrap();

	assert_eq!(html(&routes), "Fallback");
}

/// Re-rendering never re-registers
#[rstest]
fn test_slots_register_exactly_once(host: MemoryHost) {
	let home = RouteSlot::new("/", |_| "Home");
	let routes = mount(&host, {
		let home = home.clone();
		move || home.render()
	});

	for _ in 0..10 {
		html(&routes);
	}
	routes.controller().push("/elsewhere").unwrap();
	html(&routes);

	assert_eq!(routes.controller().routes_for(home.id()), 1);
	assert_eq!(routes.controller().route_count(), 1);
}

/// push then replace then back lands before the push
#[rstest]
fn test_replace_then_back_skips_replaced_entry(host: MemoryHost) {
	let routes = mount(&host, || View::Empty);
	let controller = routes.controller();

	controller.push("/x").unwrap();
	assert_eq!(controller.current_path(), "/x");

	controller.replace("/y").unwrap();
	assert_eq!(controller.current_path(), "/y");

	controller.back().unwrap();
	assert_eq!(controller.current_path(), "/y");

	host.flush();
	assert_eq!(controller.current_path(), "/");
	assert_eq!(host.location().path, "/");
}

/// Browser forward navigation is followed as well
#[rstest]
fn test_forward_navigation(host: MemoryHost) {
	let routes = mount(&host, || View::Empty);
	let controller = routes.controller();
	controller.push("/a").unwrap();
	controller.back().unwrap();
	host.flush();

	host.forward();
	host.flush();

	assert_eq!(controller.current_path(), "/a");
}

/// Navigation behind the router's back is picked up on the next notification
#[rstest]
fn test_external_history_change_followed_on_notification(host: MemoryHost) {
	let about = RouteSlot::new("/about", |_| "About");
	let routes = mount(&host, move || about.render());
	html(&routes);

	host.visit("/about").unwrap();
	assert_eq!(routes.controller().current_path(), "/");

	host.dispatch_navigation();
	assert_eq!(html(&routes), "About");
}

/// Named segments are inferred
#[rstest]
fn test_path_param_is_numeric(host: MemoryHost) {
	let user = RouteSlot::new("/user/:id", |router| {
		format!("User ID: {}", router.path_param::<i64>("id").unwrap())
	});
	let routes = mount(&host, {
		let user = user.clone();
		move || user.render()
	});
	html(&routes);

	routes.controller().push("/user/123").unwrap();

	assert_eq!(html(&routes), "User ID: 123");
	let state = routes.controller().state();
	assert_eq!(state.path_params.get("id"), Some(&Scalar::Int(123)));
	assert_eq!(state.matched_pattern.as_deref(), Some("/user/:id"));
}

/// Query values are inferred independently of the match
#[rstest]
fn test_query_params_inferred(host: MemoryHost) {
	let home = RouteSlot::new("/", |router| {
		let name: String = router.query_param("name").unwrap_or_default();
		let page: i64 = router.query_param("page").unwrap_or_default();
		format!("{} {}", name, page)
	});
	let routes = mount(&host, move || home.render());
	html(&routes);

	routes.controller().push("/?name=test&page=1").unwrap();

	assert_eq!(html(&routes), "test 1");
	let query = routes.controller().state().query_params;
	assert_eq!(query.len(), 2);
	assert_eq!(query.get("name"), Some(&Scalar::Text("test".to_string())));
	assert_eq!(query.get("page"), Some(&Scalar::Int(1)));
}

/// No match clears everything and renders nothing
#[rstest]
fn test_not_found_renders_nothing(host: MemoryHost) {
	let about = RouteSlot::new("/about", |_| "About");
	let routes = mount(&host, move || about.render());
	html(&routes);

	routes.controller().push("/missing?x=1").unwrap();

	assert_eq!(html(&routes), "");
	let state = routes.controller().state();
	assert_eq!(state.status, MatchStatus::NotFound);
	assert!(state.query_params.is_empty());
}

/// Redirect from /old to /new
#[rstest]
fn test_redirect(host: MemoryHost) {
	let old_rendered = Rc::new(Cell::new(false));
	let old = RouteSlot::new("/old", {
		let old_rendered = Rc::clone(&old_rendered);
		move |_| {
			old_rendered.set(true);
			"Old"
		}
	});
	let redirect = Redirect::new("/old", "/new");
	let new_page = RouteSlot::new("/new", |_| "New");
	let routes = mount(&host, move || {
		View::fragment([redirect.render(), old.render(), new_page.render()])
	});
	html(&routes);
	let depth = host.history_len();

	routes.controller().push("/old").unwrap();

	assert_eq!(html(&routes), "New");
	assert_eq!(routes.controller().current_path(), "/new");
	assert!(!old_rendered.get());
	assert_eq!(host.history_len(), depth + 1);
}

/// A redirect on the initial path replaces the first entry
#[rstest]
fn test_catch_all_redirect_on_load() {
	let host = MemoryHost::starting_at("/does-not-exist").unwrap();
	let not_found = RouteSlot::new("/not-found", |_| "Not Found");
	let fallback = Redirect::new("*", "/not-found");
	let routes = mount(&host, move || View::fragment([not_found.render(), fallback.render()]));

	assert_eq!(html(&routes), "Not Found");
	assert_eq!(host.location().path, "/not-found");
	assert_eq!(host.history_len(), 1);
}

/// Programmatic navigation through the accessor
#[rstest]
fn test_navigate_through_accessor(host: MemoryHost) {
	let home = RouteSlot::new("/", |router| {
		router.navigate("/about").unwrap();
		"Home"
	});
	let about = RouteSlot::new("/about", |router| {
		format!("About ({})", router.current_path())
	});
	let routes = mount(&host, move || View::fragment([home.render(), about.render()]));

	assert_eq!(html(&routes), "About (/about)");
	assert_eq!(host.history_len(), 2);
}

/// Clicking a rendered link navigates without a page load
#[rstest]
fn test_link_click(host: MemoryHost) {
	let link = Link::new("/about", "About");
	let home = RouteSlot::new("/", |_| "Home");
	let about = RouteSlot::new("/about", |_| "About page");
	let routes = mount(&host, {
		let link = link.clone();
		move || View::fragment([link.render(), home.render(), about.render()])
	});
	assert!(html(&routes).ends_with("Home"));

	assert!(host.click(ClickEvent::on_anchor(AnchorClick::new(link.to()))));

	assert!(html(&routes).ends_with("About page"));
	assert_eq!(host.location().path, "/about");
	assert!(host.default_navigations().is_empty());
}

/// External links are left to the browser
#[rstest]
fn test_external_link_click(host: MemoryHost) {
	let routes = mount(&host, || Link::new("/docs", "Docs").external(true).render());
	html(&routes);

	let prevented = host.click(ClickEvent::on_anchor(AnchorClick::new("/docs").external(true)));

	assert!(!prevented);
	assert_eq!(routes.controller().current_path(), "/");
	assert_eq!(host.default_navigations(), vec!["/docs".to_string()]);
}

/// Nested scopes resolve the parent's path against their own routes
#[rstest]
fn test_nested_routes() {
	let host = MemoryHost::starting_at("/settings/notifications").unwrap();
	let main = RouteSlot::new("/settings", |_| "Main Settings");
	let notifications = RouteSlot::new("/settings/notifications", |_| "Notifications Settings");
	let nested = NestedRoutes::new(move || View::fragment([main.render(), notifications.render()]));
	let settings = RouteSlot::new(["/settings", "/settings/not*"], move |_| nested.render());
	let old_settings = Redirect::new("/old-settings", "/settings");
	let routes = mount(&host, move || View::fragment([settings.render(), old_settings.render()]));

	assert_eq!(html(&routes), "Notifications Settings");

	routes.controller().push("/old-settings").unwrap();
	assert_eq!(html(&routes), "Main Settings");
	assert_eq!(host.location().path, "/settings");
}

/// Navigation from inside a nested scope goes through the top-level scope
#[rstest]
fn test_nested_scope_navigation(host: MemoryHost) {
	let parent = NavigationController::mount(host.shared(), RouterConfig::default(), &ScopeGuard::new())
		.unwrap();
	let nested = NavigationController::nested(&parent);

	nested.push("/inner").unwrap();

	assert_eq!(parent.current_path(), "/inner");
	assert_eq!(nested.current_path(), "/inner");
	assert_eq!(host.listener_counts(), (1, 1));
}

/// The accessor fails fast outside of a scope
#[rstest]
#[should_panic(expected = "use_router must be used within a Routes scope")]
fn test_use_router_outside_scope_panics() {
	let _ = use_router();
}

/// Rendering a slot outside of a scope fails fast
#[rstest]
#[should_panic(expected = "use_router must be used within a Routes scope")]
fn test_slot_outside_scope_panics() {
	let _ = RouteSlot::new("/", |_| "Home").render();
}

#[rstest]
fn test_try_use_router_outside_scope() {
	assert!(matches!(try_use_router(), Err(RouterError::OutsideScope)));
}

/// Subscribers see every resolved state
#[rstest]
fn test_subscribers_see_transitions(host: MemoryHost) {
	let routes = mount(&host, || View::Empty);
	let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
	let _subscription = routes.controller().subscribe({
		let seen = Rc::clone(&seen);
		move |state| seen.borrow_mut().push(state.current_path.clone())
	});

	routes.controller().push("/a").unwrap();
	routes.controller().push("/b").unwrap();

	assert_eq!(*seen.borrow(), vec!["/a".to_string(), "/b".to_string()]);
}
