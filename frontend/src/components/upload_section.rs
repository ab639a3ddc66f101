use super::utils::{debounce, extract_upload_files};
use super::workbench::{Msg, SelectedFile, Workbench};
use shared::OcrEngine;
use strum::IntoEnumIterator;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

pub fn render_upload_section(model: &Workbench, ctx: &Context<Workbench>) -> Html {
    let link = ctx.link();

    html! {
        <form
            id="upload-form"
            class="upload-section"
            onsubmit={link.callback(|e: SubmitEvent| {
                e.prevent_default();
                Msg::Submit
            })}
        >
            { render_file_input_area(model, ctx) }
            { render_selected_files(model, ctx) }
            { render_parameters(model, ctx) }
            <div class="button-container">
                <button
                    type="submit"
                    id="process-btn"
                    data-role="process-submit"
                    class="analyze-btn"
                    ref={model.submit_ref.clone()}
                >
                    if model.submission.is_in_flight() {
                        <i class="fa-solid fa-spinner fa-spin"></i>{" Processing..."}
                    } else {
                        <i class="fa-solid fa-wand-magic-sparkles"></i>{" Process notes"}
                    }
                </button>
            </div>
        </form>
    }
}

fn render_file_input_area(model: &Workbench, ctx: &Context<Workbench>) -> Html {
    let link = ctx.link();
    let handle_change = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let (files, skipped) = input
            .files()
            .as_ref()
            .map(extract_upload_files)
            .unwrap_or_default();

        input.set_value("");
        Msg::FilesAdded { files, skipped }
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);
    let trigger_file_input = Callback::from(|_| {
        let input = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("file-input"))
            .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());
        if let Some(input) = input {
            input.click();
        }
    });

    html! {
        <>
            <input
                type="file"
                id="file-input"
                name="files"
                multiple=true
                accept="image/*,application/pdf"
                style="display: none;"
                onchange={handle_change}
            />

            <div
                id="drop-zone"
                class={classes!("upload-area", model.is_dragging.then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, move || trigger_file_input.emit(()))}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{"Drag & drop notes here, or click to choose files"}</p>
                    <p class="file-types">{"Supported formats: JPG, PNG, WEBP, PDF"}</p>
                </div>
            </div>
        </>
    }
}

fn render_selected_files(model: &Workbench, ctx: &Context<Workbench>) -> Html {
    if model.files.is_empty() {
        return html! {};
    }

    let link = ctx.link();
    html! {
        <div id="selected-files">
            <h2>{ format!("Selected: {}", model.files.len()) }</h2>
            <ul class="file-list">
                { for model.files.iter().map(|selected| render_file_item(ctx, selected)) }
            </ul>
            <button
                type="button"
                id="clear-all-btn"
                class="analyze-btn"
                style="background-color: var(--clear-color);"
                disabled={model.submission.is_in_flight()}
                onclick={link.callback(|_| Msg::ClearFiles)}
            >
                <i class="fa-solid fa-trash"></i>{" Clear All"}
            </button>
        </div>
    }
}

fn render_file_item(ctx: &Context<Workbench>, selected: &SelectedFile) -> Html {
    let file_id = selected.id;
    let name = selected.file.name();

    html! {
        <li class="file-item" key={file_id.to_string()} title={name.clone()}>
            <span class="file-name">{ display_name(&name) }</span>
            <button
                type="button"
                class="remove-btn"
                title="Remove this file"
                onclick={ctx.link().callback(move |e: MouseEvent| {
                    e.stop_propagation();
                    Msg::RemoveFile(file_id)
                })}
            >
                <i class="fa-solid fa-times" style="font-size: 10px;"></i>
            </button>
        </li>
    }
}

fn display_name(name: &str) -> String {
    if name.chars().count() > 32 {
        format!("{}...", name.chars().take(29).collect::<String>())
    } else {
        name.to_string()
    }
}

fn render_parameters(model: &Workbench, ctx: &Context<Workbench>) -> Html {
    let link = ctx.link();
    let params = &model.params;

    html! {
        <fieldset class="processing-options">
            <label for="lang">{"Language"}</label>
            <input
                id="lang"
                name="lang"
                type="text"
                maxlength="16"
                value={params.lang.clone()}
                onchange={link.callback(|e: Event| {
                    Msg::SetLang(e.target_unchecked_into::<HtmlInputElement>().value())
                })}
            />

            <label for="top_k">{"Top concepts"}</label>
            <input
                id="top_k"
                name="top_k"
                type="number"
                min="1"
                max="50"
                value={params.top_k.to_string()}
                onchange={link.callback(|e: Event| {
                    Msg::SetTopK(e.target_unchecked_into::<HtmlInputElement>().value())
                })}
            />

            <label for="ocr_engine">{"OCR engine"}</label>
            <select
                id="ocr_engine"
                name="ocr_engine"
                onchange={link.callback(|e: Event| {
                    Msg::SetEngine(e.target_unchecked_into::<HtmlSelectElement>().value())
                })}
            >
                { for OcrEngine::iter().map(|engine| html! {
                    <option value={engine.to_string()} selected={engine == params.ocr_engine}>
                        { engine.label() }
                    </option>
                })}
            </select>

            <label class="messy-toggle">
                <input
                    id="messy"
                    name="messy"
                    type="checkbox"
                    checked={params.messy}
                    onchange={link.callback(|e: Event| {
                        Msg::SetMessy(e.target_unchecked_into::<HtmlInputElement>().checked())
                    })}
                />
                {" Messy handwriting"}
            </label>
        </fieldset>
    }
}
