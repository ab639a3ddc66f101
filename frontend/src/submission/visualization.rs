use serde_json::{Value, json};
use shared::{GraphDescriptor, LayoutMode};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = vis, js_name = Network)]
    type JsNetwork;

    #[wasm_bindgen(catch, constructor, js_namespace = vis, js_class = "Network")]
    fn new(
        container: &HtmlElement,
        data: &JsValue,
        options: &JsValue,
    ) -> Result<JsNetwork, JsValue>;

    #[wasm_bindgen(method)]
    fn destroy(this: &JsNetwork);
}

/// Visual configuration for a graph view. Hierarchical views turn physics off
/// and lay nodes out left-to-right in directed layers.
pub fn network_options(mode: LayoutMode) -> Value {
    let base = json!({
        "autoResize": true,
        "interaction": { "hover": true, "navigationButtons": true, "keyboard": true },
        "nodes": { "shape": "box", "margin": 10, "font": { "size": 14 } },
        "edges": {
            "arrows": { "to": { "enabled": true, "scaleFactor": 0.6 } },
            "font": { "size": 11, "align": "middle" }
        },
    });

    let layout = match mode {
        LayoutMode::ForceDirected => json!({
            "physics": {
                "enabled": true,
                "solver": "forceAtlas2Based",
                "stabilization": { "iterations": 200 }
            },
            "edges": { "smooth": { "type": "dynamic" } }
        }),
        LayoutMode::Hierarchical => json!({
            "physics": { "enabled": false },
            "layout": {
                "hierarchical": {
                    "enabled": true,
                    "direction": "LR",
                    "sortMethod": "directed",
                    "levelSeparation": 180,
                    "nodeSpacing": 120
                }
            },
            "edges": { "smooth": { "type": "cubicBezier", "forceDirection": "horizontal" } }
        }),
    };

    merge(base, layout)
}

fn merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut target), Value::Object(source)) => {
            for (key, value) in source {
                let merged = match target.remove(&key) {
                    Some(existing) => merge(existing, value),
                    None => value,
                };
                target.insert(key, merged);
            }
            Value::Object(target)
        }
        (_, overlay) => overlay,
    }
}

/// The seam to the graph rendering library.
pub trait NetworkBackend {
    type Container;
    type Handle;

    fn create(
        &self,
        container: &Self::Container,
        descriptor: &GraphDescriptor,
        mode: LayoutMode,
    ) -> Result<Self::Handle, JsValue>;

    fn destroy(&self, handle: Self::Handle);
}

/// Materializes `descriptor` in `container`, destroying `previous` first.
/// Without a container nothing happens and `previous` comes back unchanged.
pub fn render<B: NetworkBackend>(
    backend: &B,
    container: Option<&B::Container>,
    previous: Option<B::Handle>,
    descriptor: &GraphDescriptor,
    mode: LayoutMode,
) -> Option<B::Handle> {
    let Some(container) = container else {
        return previous;
    };

    if let Some(old) = previous {
        backend.destroy(old);
    }

    match backend.create(container, descriptor, mode) {
        Ok(handle) => Some(handle),
        Err(e) => {
            gloo_console::error!("Failed to create graph view:", e);
            None
        }
    }
}

/// Exclusive owner of the one live graph bound to a container.
pub struct GraphSlot<B: NetworkBackend> {
    backend: B,
    mode: LayoutMode,
    handle: Option<B::Handle>,
}

impl<B: NetworkBackend> GraphSlot<B> {
    pub fn new(backend: B, mode: LayoutMode) -> Self {
        Self { backend, mode, handle: None }
    }

    pub fn render(&mut self, container: Option<&B::Container>, descriptor: &GraphDescriptor) {
        let previous = self.handle.take();
        self.handle = render(&self.backend, container, previous, descriptor, self.mode);
    }

    pub fn clear(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.backend.destroy(handle);
        }
    }
}

impl<B: NetworkBackend> Drop for GraphSlot<B> {
    fn drop(&mut self) {
        self.clear();
    }
}

pub struct RenderedNetwork(JsNetwork);

/// vis-network, loaded by the host page as the global `vis`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisNetwork;

impl NetworkBackend for VisNetwork {
    type Container = HtmlElement;
    type Handle = RenderedNetwork;

    fn create(
        &self,
        container: &HtmlElement,
        descriptor: &GraphDescriptor,
        mode: LayoutMode,
    ) -> Result<RenderedNetwork, JsValue> {
        let data = json!({ "nodes": descriptor.nodes, "edges": descriptor.edges });
        let data = js_sys::JSON::parse(&data.to_string())?;
        let options = js_sys::JSON::parse(&network_options(mode).to_string())?;

        let network = JsNetwork::new(container, &data, &options)?;
        log::debug!(
            "Created {} graph ({} nodes, {} edges)",
            mode,
            descriptor.nodes.len(),
            descriptor.edges.len()
        );
        Ok(RenderedNetwork(network))
    }

    fn destroy(&self, handle: RenderedNetwork) {
        handle.0.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    #[derive(Default)]
    struct Registry {
        next: u32,
        live: HashSet<u32>,
        destroyed: Vec<u32>,
    }

    #[derive(Clone, Default)]
    struct FakeBackend(Rc<RefCell<Registry>>);

    impl NetworkBackend for FakeBackend {
        type Container = ();
        type Handle = u32;

        fn create(&self, _: &(), _: &GraphDescriptor, _: LayoutMode) -> Result<u32, JsValue> {
            let mut registry = self.0.borrow_mut();
            registry.next += 1;
            let id = registry.next;
            registry.live.insert(id);
            Ok(id)
        }

        fn destroy(&self, handle: u32) {
            let mut registry = self.0.borrow_mut();
            assert!(registry.live.remove(&handle), "destroyed a handle that was not live");
            registry.destroyed.push(handle);
        }
    }

    fn descriptor() -> GraphDescriptor {
        GraphDescriptor { nodes: vec![json!({ "id": "a" })], edges: vec![] }
    }

    #[test]
    fn repeated_renders_keep_exactly_one_live_instance() {
        let backend = FakeBackend::default();
        let mut slot = GraphSlot::new(backend.clone(), LayoutMode::ForceDirected);

        for _ in 0..5 {
            slot.render(Some(&()), &descriptor());
            assert_eq!(backend.0.borrow().live.len(), 1);
        }
        assert_eq!(backend.0.borrow().destroyed, vec![1, 2, 3, 4]);
        assert!(backend.0.borrow().live.contains(&5));
    }

    #[test]
    fn missing_container_keeps_previous_handle() {
        let backend = FakeBackend::default();
        let first = render(&backend, Some(&()), None, &descriptor(), LayoutMode::Hierarchical);
        assert_eq!(first, Some(1));

        let kept = render(&backend, None, first, &descriptor(), LayoutMode::Hierarchical);
        assert_eq!(kept, Some(1));
        assert!(backend.0.borrow().destroyed.is_empty());
    }

    #[test]
    fn dropping_the_slot_destroys_its_instance() {
        let backend = FakeBackend::default();
        {
            let mut slot = GraphSlot::new(backend.clone(), LayoutMode::Hierarchical);
            slot.render(Some(&()), &descriptor());
        }
        assert!(backend.0.borrow().live.is_empty());
    }

    #[test]
    fn hierarchical_layout_disables_physics() {
        let options = network_options(LayoutMode::Hierarchical);
        assert_eq!(options["physics"]["enabled"], json!(false));
        assert_eq!(options["layout"]["hierarchical"]["direction"], json!("LR"));
        assert_eq!(options["layout"]["hierarchical"]["sortMethod"], json!("directed"));
        assert_eq!(options["nodes"]["shape"], json!("box"));
    }

    #[test]
    fn force_directed_layout_keeps_physics() {
        let options = network_options(LayoutMode::ForceDirected);
        assert_eq!(options["physics"]["enabled"], json!(true));
        assert!(options.get("layout").is_none());
        assert_eq!(options["edges"]["arrows"]["to"]["enabled"], json!(true));
        assert_eq!(options["edges"]["smooth"]["type"], json!("dynamic"));
    }
}
