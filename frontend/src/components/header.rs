use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-diagram-project"></i>{" Notes to Mindmap"}</h1>
            <p class="subtitle">{"Upload scanned notes or PDFs to extract text, key concepts and concept maps"}</p>
        </header>
    }
}
