use gloo_file::File as GlooFile;
use gloo_timers::callback::Timeout;
use js_sys::Date;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use web_sys::FileList;
use yew::prelude::*;

pub fn generate_id() -> u64 {
    static ID_COUNTER: AtomicU64 = AtomicU64::new(0);
    let now = Date::now() as u64;
    let count = ID_COUNTER.fetch_add(1, Ordering::SeqCst);
    now * 1000 + (count % 1000)
}

// Debounce function to limit button events
pub fn debounce<F>(duration: u32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));

    Callback::from(move |_| {
        let mut timeout_ref = timeout.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        *timeout_ref = Some(Timeout::new(duration, move || inner_callback()));
    })
}

pub fn is_accepted_type(mime: &str) -> bool {
    mime.starts_with("image/") || mime == "application/pdf"
}

/// Splits a file list into accepted uploads and the names of skipped files.
pub fn extract_upload_files(file_list: &FileList) -> (Vec<GlooFile>, Vec<String>) {
    let mut accepted = Vec::new();
    let mut skipped = Vec::new();

    for file in (0..file_list.length()).filter_map(|i| file_list.item(i)) {
        if is_accepted_type(&file.type_()) {
            accepted.push(GlooFile::from(file));
        } else {
            log::warn!("Skipping unsupported file: {}", file.name());
            skipped.push(file.name());
        }
    }

    (accepted, skipped)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Busy,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }
}

pub fn render_status(status: Option<&StatusMessage>) -> Html {
    let Some(status) = status else {
        return html! { <p id="status" class="status" role="status" aria-live="polite"></p> };
    };

    let (class, icon) = match status.kind {
        StatusKind::Info => ("status-info", "fa-solid fa-circle-info"),
        StatusKind::Busy => ("status-busy", "fa-solid fa-spinner fa-spin"),
        StatusKind::Success => ("status-success", "fa-solid fa-circle-check"),
        StatusKind::Error => ("error-message", "fa-solid fa-circle-exclamation"),
    };

    html! {
        <p id="status" class={classes!("status", class)} role="status" aria-live="polite">
            <i class={icon}></i>{" "}{ &status.text }
        </p>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_images_and_pdfs_only() {
        assert!(is_accepted_type("image/png"));
        assert!(is_accepted_type("image/jpeg"));
        assert!(is_accepted_type("application/pdf"));
        assert!(!is_accepted_type("text/plain"));
        assert!(!is_accepted_type(""));
    }
}
