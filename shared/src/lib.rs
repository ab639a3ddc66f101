pub mod processing;
pub mod session;

pub use processing::{
    DEFAULT_LANG, DEFAULT_TOP_K, GraphDescriptor, Keyphrase, LayoutMode, LlmSection, OcrEngine,
    ProcessingMeta, ProcessingResponse, ProcessingResult, ScoredConcept, UploadParams,
};
pub use session::{
    AuthResponse, ErrorBody, LoginCredentials, SessionProbe, SessionUser, SignupCredentials,
};
