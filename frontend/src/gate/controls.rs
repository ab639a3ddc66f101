//! DOM-level binding between the session gate and the submission control.
//!
//! The gate never holds a reference to the upload form. It publishes access on
//! `<body data-session>` and on the control's `disabled` attribute, and keeps
//! re-applying that for a short window after load so a late-mounted form is
//! still caught.

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, CustomEventInit, Element, MutationObserver, MutationObserverInit};

/// Canonical identifier first; the rest are older markup kept for migration.
pub const SUBMIT_CONTROL_SELECTORS: &[&str] = &[
    "[data-role=\"process-submit\"]",
    "#process-btn",
    "#processBtn",
    "#upload-form button[type=\"submit\"]",
];

pub const AUTH_REQUIRED_EVENT: &str = "notes:auth-required";

const SESSION_ATTR: &str = "data-session";
/// Present on the submission control while its request is in flight.
const BUSY_ATTR: &str = "data-busy";
const GRANTED: &str = "granted";
const DENIED: &str = "denied";

fn document() -> Option<web_sys::Document> {
    web_sys::window()?.document()
}

pub fn find_submit_control() -> Option<Element> {
    let document = document()?;
    SUBMIT_CONTROL_SELECTORS
        .iter()
        .find_map(|selector| document.query_selector(selector).ok().flatten())
}

/// Reads the published access marker. A missing marker means denied.
pub fn access_granted() -> bool {
    document()
        .and_then(|d| d.body())
        .and_then(|body| body.get_attribute(SESSION_ATTR))
        .is_some_and(|value| value == GRANTED)
}

fn set_control_disabled(control: &Element, disabled: bool) {
    let result = if disabled {
        control
            .set_attribute("disabled", "")
            .and_then(|_| control.set_attribute("aria-disabled", "true"))
    } else {
        control
            .remove_attribute("disabled")
            .and_then(|_| control.set_attribute("aria-disabled", "false"))
    };
    if let Err(e) = result {
        gloo_console::error!("Failed to toggle submission control:", e);
    }
}

/// A control stays disabled while its request is in flight, whatever the session.
pub fn control_disabled(granted: bool, busy: bool) -> bool {
    busy || !granted
}

/// Marks the control busy (disabled, `data-busy`) or idle (enabled iff `granted`).
pub fn set_control_busy(control: &Element, busy: bool, granted: bool) {
    let result = if busy {
        control.set_attribute(BUSY_ATTR, "")
    } else {
        control.remove_attribute(BUSY_ATTR)
    };
    if let Err(e) = result {
        gloo_console::error!("Failed to mark submission control:", e);
    }
    set_control_disabled(control, control_disabled(granted, busy));
}

/// Sets the submission control's disabled flag to `!granted` if the control
/// exists yet, leaving a busy control disabled. Idempotent. Returns whether a
/// control was found.
pub fn enable_controls_if_present(granted: bool) -> bool {
    match find_submit_control() {
        Some(control) => {
            let busy = control.has_attribute(BUSY_ATTR);
            set_control_disabled(&control, control_disabled(granted, busy));
            true
        }
        None => false,
    }
}

/// Records access on `<body>` and applies it to the control.
pub fn publish_access(granted: bool) {
    if let Some(body) = document().and_then(|d| d.body()) {
        if let Err(e) = body.set_attribute(SESSION_ATTR, if granted { GRANTED } else { DENIED }) {
            gloo_console::error!("Failed to publish session marker:", e);
        }
    }
    let found = enable_controls_if_present(granted);
    log::debug!("Access {} (control present: {})", if granted { GRANTED } else { DENIED }, found);
}

/// Asks whoever owns the auth overlay to show it again.
pub fn request_auth() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let init = CustomEventInit::new();
    init.set_bubbles(false);
    match CustomEvent::new_with_event_init_dict(AUTH_REQUIRED_EVENT, &init) {
        Ok(event) => {
            if let Err(e) = window.dispatch_event(&event) {
                gloo_console::error!("Failed to dispatch auth request:", e);
            }
        }
        Err(e) => gloo_console::error!("Failed to create auth request event:", e),
    }
}

/// Watches the document for inserted nodes and re-applies the access marker to
/// the submission control. Detaches itself after `window_ms`, or when dropped.
pub struct ControlWatcher {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
    _expiry: Timeout,
}

impl ControlWatcher {
    pub fn start(window_ms: u32) -> Result<Self, JsValue> {
        let body = document()
            .and_then(|d| d.body())
            .ok_or_else(|| JsValue::from_str("document has no body"))?;

        let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
            |records: js_sys::Array, _observer: MutationObserver| {
                let inserted = records.iter().any(|record| {
                    record
                        .dyn_into::<web_sys::MutationRecord>()
                        .map(|r| r.added_nodes().length() > 0)
                        .unwrap_or(false)
                });
                if inserted {
                    enable_controls_if_present(access_granted());
                }
            },
        );

        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer.observe_with_options(&body, &init)?;
        log::debug!("Control watcher attached for {} ms", window_ms);

        let expiring = observer.clone();
        let expiry = Timeout::new(window_ms, move || {
            expiring.disconnect();
            log::debug!("Control watcher detached");
        });

        Ok(Self { observer, _callback: callback, _expiry: expiry })
    }
}

impl Drop for ControlWatcher {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_control_stays_disabled_even_with_access() {
        assert!(control_disabled(true, true));
        assert!(control_disabled(false, true));
    }

    #[test]
    fn idle_control_follows_access() {
        assert!(!control_disabled(true, false));
        assert!(control_disabled(false, false));
    }
}
