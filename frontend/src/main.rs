mod api;
mod components;
mod config;
mod error;
mod gate;
mod submission;

use components::auth_gate::{AuthGate, AuthGateProps};
use components::workbench::{Workbench, WorkbenchProps};
use config::AppConfig;
use web_sys::Element;

/// Finds `#id`, or appends an empty `<div id=...>` to the body.
fn mount_point(id: &str) -> Option<Element> {
    let document = web_sys::window()?.document()?;
    if let Some(existing) = document.get_element_by_id(id) {
        return Some(existing);
    }
    let element = document.create_element("div").ok()?;
    element.set_id(id);
    document.body()?.append_child(&element).ok()?;
    Some(element)
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");

    let config = AppConfig::from_document();
    log::info!(
        "API base {:?}, login required: {}",
        config.api_base,
        config.require_login
    );

    // The gate goes first so the page starts out locked.
    match mount_point("auth-root") {
        Some(root) => {
            let props = AuthGateProps { config: config.clone() };
            yew::Renderer::<AuthGate>::with_root_and_props(root, props).render();
        }
        None => log::error!("No mount point for the sign-in overlay"),
    }

    match mount_point("app") {
        Some(root) => {
            let props = WorkbenchProps { config };
            yew::Renderer::<Workbench>::with_root_and_props(root, props).render();
        }
        None => log::error!("No mount point for the upload form"),
    }
}
