use super::header::render_header;
use super::results::render_results;
use super::upload_section::render_upload_section;
use super::utils::{StatusKind, StatusMessage, extract_upload_files, generate_id, render_status};
use crate::api;
use crate::config::AppConfig;
use crate::error::ClientError;
use crate::gate::controls::set_control_busy;
use crate::gate::{access_granted, request_auth};
use crate::submission::visualization::{GraphSlot, VisNetwork};
use crate::submission::{SubmissionState, UploadRequest, parse_top_k, status_summary};
use gloo_file::File as GlooFile;
use gloo_storage::{LocalStorage, Storage};
use shared::{LayoutMode, OcrEngine, ProcessingResult, UploadParams};
use std::str::FromStr;
use wasm_bindgen_futures::spawn_local;
use web_sys::{DragEvent, Element, HtmlElement};
use yew::prelude::*;

const PARAMS_KEY: &str = "notes.upload_params";

pub struct SelectedFile {
    pub id: u64,
    pub file: GlooFile,
}

pub enum Msg {
    // File operations
    FilesAdded { files: Vec<GlooFile>, skipped: Vec<String> },
    RemoveFile(u64),
    ClearFiles,

    // Parameters
    SetLang(String),
    SetTopK(String),
    SetEngine(String),
    SetMessy(bool),

    // Submission
    Submit,
    Completed(Result<ProcessingResult, ClientError>),

    // Input events
    SetDragging(bool),
    HandleDrop(DragEvent),
}

#[derive(Properties, PartialEq, Clone)]
pub struct WorkbenchProps {
    pub config: AppConfig,
}

/// Upload form, request lifecycle and result views.
pub struct Workbench {
    pub(crate) files: Vec<SelectedFile>,
    pub(crate) params: UploadParams,
    pub(crate) submission: SubmissionState,
    pub(crate) status: Option<StatusMessage>,
    pub(crate) result: Option<ProcessingResult>,
    pub(crate) is_dragging: bool,
    pub(crate) submit_ref: NodeRef,
    pub(crate) mindmap_ref: NodeRef,
    pub(crate) flowchart_ref: NodeRef,
    mindmap: GraphSlot<VisNetwork>,
    flowchart: GraphSlot<VisNetwork>,
}

impl Component for Workbench {
    type Message = Msg;
    type Properties = WorkbenchProps;

    fn create(_ctx: &Context<Self>) -> Self {
        let params = LocalStorage::get::<UploadParams>(PARAMS_KEY).unwrap_or_default();

        Self {
            files: Vec::new(),
            params,
            submission: SubmissionState::default(),
            status: None,
            result: None,
            is_dragging: false,
            submit_ref: NodeRef::default(),
            mindmap_ref: NodeRef::default(),
            flowchart_ref: NodeRef::default(),
            mindmap: GraphSlot::new(VisNetwork, LayoutMode::ForceDirected),
            flowchart: GraphSlot::new(VisNetwork, LayoutMode::Hierarchical),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // File operations
            Msg::FilesAdded { files, skipped } => self.handle_files_added(files, skipped),
            Msg::RemoveFile(id) => self.handle_remove_file(id),
            Msg::ClearFiles => self.handle_clear_files(),

            // Parameters
            Msg::SetLang(lang) => {
                self.params.lang = lang.trim().to_string();
                self.save_params();
                true
            }
            Msg::SetTopK(raw) => {
                self.params.top_k = parse_top_k(&raw);
                self.save_params();
                true
            }
            Msg::SetEngine(raw) => match OcrEngine::from_str(&raw) {
                Ok(engine) => {
                    self.params.ocr_engine = engine;
                    self.save_params();
                    true
                }
                Err(_) => {
                    log::warn!("Ignoring unknown OCR engine {:?}", raw);
                    false
                }
            },
            Msg::SetMessy(messy) => {
                self.params.messy = messy;
                self.save_params();
                true
            }

            // Submission
            Msg::Submit => self.handle_submit(ctx),
            Msg::Completed(outcome) => self.handle_completed(outcome),

            // Input events
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::HandleDrop(event) => self.handle_drop(event),
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, first_render: bool) {
        if first_render {
            self.restore_control();
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { render_header() }

                <main class="main-content">
                    { render_upload_section(self, ctx) }
                    { render_status(self.status.as_ref()) }
                    { render_results(self) }
                </main>

                <footer class="app-footer">
                    <p>{"Notes to Mindmap | Rust + WASM"}</p>
                </footer>
            </div>
        }
    }
}

// Handler methods
impl Workbench {
    fn handle_files_added(&mut self, files: Vec<GlooFile>, skipped: Vec<String>) -> bool {
        for file in files {
            self.files.push(SelectedFile { id: generate_id(), file });
        }

        self.status = if skipped.is_empty() {
            None
        } else {
            Some(StatusMessage::new(
                StatusKind::Info,
                format!("Skipped unsupported file(s): {}", skipped.join(", ")),
            ))
        };
        true
    }

    fn handle_remove_file(&mut self, id: u64) -> bool {
        let before = self.files.len();
        self.files.retain(|selected| selected.id != id);
        self.files.len() != before
    }

    fn handle_clear_files(&mut self) -> bool {
        if self.submission.is_in_flight() {
            return false;
        }
        self.files.clear();
        self.status = None;
        true
    }

    fn handle_drop(&mut self, event: DragEvent) -> bool {
        event.prevent_default();
        self.is_dragging = false;

        if let Some(file_list) = event.data_transfer().and_then(|dt| dt.files()) {
            let (files, skipped) = extract_upload_files(&file_list);
            return self.handle_files_added(files, skipped);
        }
        true
    }

    fn handle_submit(&mut self, ctx: &Context<Self>) -> bool {
        if self.submission.is_in_flight() {
            return false;
        }
        if !access_granted() {
            self.report(ClientError::AuthRequired);
            return true;
        }

        let files = self.files.iter().map(|selected| selected.file.clone()).collect();
        let request = match UploadRequest::new(files, self.params.clone()) {
            Ok(request) => request,
            Err(e) => {
                self.report(e);
                return true;
            }
        };

        self.submission.begin();
        self.mark_control_busy();
        self.status = Some(StatusMessage::new(
            StatusKind::Busy,
            format!("Processing {} file(s)...", request.files.len()),
        ));

        let config = ctx.props().config.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            let outcome = api::process_upload(&config, request).await;
            link.send_message(Msg::Completed(outcome));
        });
        true
    }

    fn handle_completed(&mut self, outcome: Result<ProcessingResult, ClientError>) -> bool {
        match outcome {
            Ok(result) => self.apply_result(result),
            Err(e) => self.report(e),
        }

        self.submission.finish();
        self.restore_control();
        true
    }

    fn apply_result(&mut self, result: ProcessingResult) {
        if let Some(mindmap) = &result.mindmap {
            self.mindmap.render(self.mindmap_ref.cast::<HtmlElement>().as_ref(), mindmap);
        }
        if let Some(flowchart) = &result.flowchart {
            self.flowchart.render(self.flowchart_ref.cast::<HtmlElement>().as_ref(), flowchart);
        }

        let summary = status_summary(&result.meta);
        log::info!("{} ({} concepts)", summary, result.concepts.len());
        self.status = Some(StatusMessage::new(StatusKind::Success, summary));
        self.result = Some(result);
    }

    /// Surfaces a failure without touching the previous results.
    fn report(&mut self, err: ClientError) {
        match &err {
            ClientError::Validation(_) | ClientError::AuthRequired => {
                log::info!("Submission blocked: {}", err)
            }
            _ => log::error!("Submission failed: {}", err),
        }
        if err.needs_login() {
            request_auth();
        }
        self.status = Some(StatusMessage::new(StatusKind::Error, err.to_string()));
    }

    fn save_params(&self) {
        if let Err(e) = LocalStorage::set(PARAMS_KEY, &self.params) {
            log::warn!("Could not remember upload preferences: {}", e);
        }
    }

    fn mark_control_busy(&self) {
        if let Some(control) = self.submit_ref.cast::<Element>() {
            set_control_busy(&control, true, access_granted());
        }
    }

    /// Back to idle: enabled exactly when the gate grants access.
    fn restore_control(&self) {
        if let Some(control) = self.submit_ref.cast::<Element>() {
            set_control_busy(&control, false, access_granted());
        }
    }
}
