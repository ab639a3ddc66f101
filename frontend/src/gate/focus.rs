use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, KeyboardEvent};

const FOCUSABLE: &str = "a[href], button:not([disabled]), \
     input:not([disabled]):not([type=\"hidden\"]), select:not([disabled]), \
     textarea:not([disabled]), [tabindex]:not([tabindex=\"-1\"])";

/// Where focus must be moved to keep it inside the overlay, or `None` when the
/// browser's own Tab order already stays inside.
pub fn focus_wrap_target(current: Option<usize>, count: usize, backwards: bool) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let last = count - 1;
    match (current, backwards) {
        (None, false) => Some(0),
        (None, true) => Some(last),
        (Some(i), false) if i >= last => Some(0),
        (Some(0), true) => Some(last),
        _ => None,
    }
}

fn visible_focusables(overlay: &Element) -> Vec<HtmlElement> {
    let Ok(nodes) = overlay.query_selector_all(FOCUSABLE) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .filter(|el| {
            el.offset_width() > 0 || el.offset_height() > 0 || el.get_client_rects().length() > 0
        })
        .collect()
}

/// Keyboard policy while the overlay is up: Escape is swallowed and Tab cycles
/// within the overlay. Returns `true` if the event was consumed.
pub fn contain_focus(overlay: &Element, event: &KeyboardEvent) -> bool {
    match event.key().as_str() {
        "Escape" | "Esc" => {
            event.prevent_default();
            event.stop_propagation();
            true
        }
        "Tab" => {
            let focusables = visible_focusables(overlay);
            let active = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.active_element());
            let current = active.and_then(|active| {
                focusables.iter().position(|el| {
                    let el: &Element = el.as_ref();
                    *el == active
                })
            });

            match focus_wrap_target(current, focusables.len(), event.shift_key()) {
                Some(target) => {
                    event.prevent_default();
                    if let Err(e) = focusables[target].focus() {
                        gloo_console::warn!("Could not move focus inside overlay:", e);
                    }
                    true
                }
                None if focusables.is_empty() => {
                    event.prevent_default();
                    true
                }
                None => false,
            }
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_from_last_wraps_to_first() {
        assert_eq!(focus_wrap_target(Some(3), 4, false), Some(0));
    }

    #[test]
    fn shift_tab_from_first_wraps_to_last() {
        assert_eq!(focus_wrap_target(Some(0), 4, true), Some(3));
    }

    #[test]
    fn interior_moves_are_left_to_the_browser() {
        assert_eq!(focus_wrap_target(Some(1), 4, false), None);
        assert_eq!(focus_wrap_target(Some(2), 4, true), None);
    }

    #[test]
    fn focus_outside_overlay_is_pulled_in() {
        assert_eq!(focus_wrap_target(None, 4, false), Some(0));
        assert_eq!(focus_wrap_target(None, 4, true), Some(3));
    }

    #[test]
    fn single_element_keeps_focus() {
        assert_eq!(focus_wrap_target(Some(0), 1, false), Some(0));
        assert_eq!(focus_wrap_target(Some(0), 1, true), Some(0));
    }

    #[test]
    fn empty_overlay_has_no_target() {
        assert_eq!(focus_wrap_target(None, 0, false), None);
    }
}
