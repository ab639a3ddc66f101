use super::workbench::Workbench;
use shared::{ProcessingResult, ScoredConcept};
use yew::prelude::*;

pub fn render_results(model: &Workbench) -> Html {
    let result = model.result.as_ref();

    html! {
        <div class="results-container">
            <section class="result-text">
                <h3>{"Extracted text"}</h3>
                <textarea
                    id="text-output"
                    readonly=true
                    rows="12"
                    value={result.map(|r| r.text.clone()).unwrap_or_default()}
                    placeholder="Processed text will appear here"
                />
                { render_raw_excerpt(result) }
            </section>

            <section class="result-concepts">
                <h3>{"Key concepts"}</h3>
                { render_concepts(result) }
            </section>

            <section class="result-graphs">
                <div class="graph-panel">
                    <h3>{"Mindmap"}</h3>
                    <div id="mindmap" class="graph-container" ref={model.mindmap_ref.clone()}></div>
                </div>
                <div class="graph-panel">
                    <h3>{"Flowchart"}</h3>
                    <div id="flowchart" class="graph-container" ref={model.flowchart_ref.clone()}></div>
                </div>
            </section>
        </div>
    }
}

fn render_concepts(result: Option<&ProcessingResult>) -> Html {
    match result {
        Some(result) if !result.concepts.is_empty() => html! {
            <ol id="concepts" class="concept-list">
                { for result.concepts.iter().map(render_concept) }
            </ol>
        },
        Some(_) => html! { <p class="no-results-message">{"No concepts were found."}</p> },
        None => html! { <ol id="concepts" class="concept-list"></ol> },
    }
}

fn render_concept(concept: &ScoredConcept) -> Html {
    html! {
        <li class="concept-item">
            <span class="concept-phrase">{ &concept.phrase }</span>
            if let Some(score) = concept.score_label() {
                <span class="concept-score">{ score }</span>
            }
        </li>
    }
}

fn render_raw_excerpt(result: Option<&ProcessingResult>) -> Html {
    let Some(excerpt) = result
        .and_then(|r| r.meta.raw_excerpt.as_deref())
        .filter(|e| !e.trim().is_empty())
    else {
        return html! {};
    };

    html! {
        <details class="raw-excerpt">
            <summary>{"Raw OCR excerpt"}</summary>
            <pre>{ excerpt }</pre>
        </details>
    }
}
