pub mod response;
pub mod visualization;

use crate::error::ClientError;
use gloo_file::File as GlooFile;
use shared::{DEFAULT_TOP_K, ProcessingMeta, UploadParams};

const MAX_TOP_K: u32 = 50;

/// Files plus scalar parameters, checked before anything touches the network.
#[derive(Clone)]
pub struct UploadRequest {
    pub files: Vec<GlooFile>,
    pub params: UploadParams,
}

impl UploadRequest {
    pub fn new(files: Vec<GlooFile>, params: UploadParams) -> Result<Self, ClientError> {
        if files.is_empty() {
            return Err(ClientError::Validation(
                "Select at least one image or PDF to process.".to_string(),
            ));
        }
        Ok(Self { files, params })
    }
}

/// In-flight guard for one submission control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
}

impl SubmissionState {
    /// Returns `false` if a submission is already running.
    pub fn begin(&mut self) -> bool {
        if *self == SubmissionState::InFlight {
            return false;
        }
        *self = SubmissionState::InFlight;
        true
    }

    pub fn finish(&mut self) {
        *self = SubmissionState::Idle;
    }

    pub fn is_in_flight(&self) -> bool {
        *self == SubmissionState::InFlight
    }
}

pub fn parse_top_k(raw: &str) -> u32 {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|k| *k > 0)
        .map(|k| k.min(MAX_TOP_K))
        .unwrap_or(DEFAULT_TOP_K)
}

pub fn status_summary(meta: &ProcessingMeta) -> String {
    let pages = meta.images_processed.unwrap_or(0);
    let engine = meta
        .ocr_engine
        .as_deref()
        .filter(|e| !e.is_empty())
        .map(str::to_uppercase)
        .unwrap_or_else(|| "unknown engine".to_string());
    let noun = if pages == 1 { "page" } else { "pages" };
    format!("Done. Processed {} {} with {}.", pages, noun, engine)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_selection_is_rejected_before_dispatch() {
        let err = UploadRequest::new(Vec::new(), UploadParams::default()).err();
        assert!(matches!(err, Some(ClientError::Validation(_))));
    }

    #[test]
    fn submissions_are_strictly_sequential() {
        let mut state = SubmissionState::default();
        assert!(state.begin());
        assert!(state.is_in_flight());
        assert!(!state.begin());
        state.finish();
        assert!(!state.is_in_flight());
        assert!(state.begin());
    }

    #[test]
    fn top_k_parsing() {
        assert_eq!(parse_top_k("20"), 20);
        assert_eq!(parse_top_k(" 7 "), 7);
        assert_eq!(parse_top_k("0"), 15);
        assert_eq!(parse_top_k("many"), 15);
        assert_eq!(parse_top_k("500"), 50);
    }

    #[test]
    fn summary_mentions_pages_and_engine() {
        let meta = ProcessingMeta {
            images_processed: Some(3),
            ocr_engine: Some("gcv".into()),
            ..Default::default()
        };
        assert_eq!(status_summary(&meta), "Done. Processed 3 pages with GCV.");

        let meta = ProcessingMeta { images_processed: Some(1), ..Default::default() };
        assert_eq!(status_summary(&meta), "Done. Processed 1 page with unknown engine.");
    }
}
