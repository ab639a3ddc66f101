use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

pub const DEFAULT_LANG: &str = "en";
pub const DEFAULT_TOP_K: u32 = 15;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, Display,
    EnumIter, AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OcrEngine {
    #[default]
    Gcv,
    Tesseract,
}

impl OcrEngine {
    pub fn label(&self) -> &'static str {
        match self {
            OcrEngine::Gcv => "Google Cloud Vision",
            OcrEngine::Tesseract => "Tesseract",
        }
    }
}

/// How a graph view lays out its nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LayoutMode {
    #[strum(serialize = "force-directed")]
    ForceDirected,
    #[strum(serialize = "hierarchical")]
    Hierarchical,
}

/// Scalar fields sent alongside the uploaded files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadParams {
    pub lang: String,
    pub top_k: u32,
    pub ocr_engine: OcrEngine,
    pub messy: bool,
}

impl Default for UploadParams {
    fn default() -> Self {
        Self {
            lang: DEFAULT_LANG.to_string(),
            top_k: DEFAULT_TOP_K,
            ocr_engine: OcrEngine::default(),
            messy: false,
        }
    }
}

impl UploadParams {
    /// Multipart text fields in send order. `messy` is omitted entirely when off.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let lang = match self.lang.trim() {
            "" => DEFAULT_LANG.to_string(),
            lang => lang.to_string(),
        };
        let mut fields = vec![
            ("lang", lang),
            ("top_k", self.top_k.to_string()),
            ("ocr_engine", self.ocr_engine.to_string()),
        ];
        if self.messy {
            fields.push(("messy", "1".to_string()));
        }
        fields
    }
}

/// Nodes/edges handed verbatim to the visualization library.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDescriptor {
    #[serde(default)]
    pub nodes: Vec<Value>,
    #[serde(default)]
    pub edges: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Keyphrase {
    Plain(String),
    Pair(String, Option<f64>),
    Scored {
        phrase: String,
        #[serde(default)]
        score: Option<f64>,
    },
}

/// Reads `T` if the value has the expected shape and yields `None` otherwise,
/// so a malformed optional section cannot fail the whole body.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Keeps the entries that read as a [`Keyphrase`] and drops the rest.
fn lenient_keyphrases<'de, D>(deserializer: D) -> Result<Option<Vec<Keyphrase>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
    ))
}

/// Post-processing output, passed through by the server as-is.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LlmSection {
    #[serde(default, deserialize_with = "lenient")]
    pub clean_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_keyphrases")]
    pub concepts: Option<Vec<Keyphrase>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingMeta {
    #[serde(default)]
    pub images_processed: Option<u32>,
    #[serde(default)]
    pub ocr_engine: Option<String>,
    #[serde(default)]
    pub llm_provider: Option<String>,
    #[serde(default)]
    pub raw_excerpt: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
}

/// Raw body of `POST /api/process`. Older deployments put the text and concepts
/// under `llm`, `extracted_text` or `top_concepts`; `normalize` folds those into
/// a single [`ProcessingResult`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessingResponse {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub extracted_text: Option<String>,
    #[serde(default)]
    pub keyphrases: Option<Vec<Keyphrase>>,
    #[serde(default, deserialize_with = "lenient_keyphrases")]
    pub top_concepts: Option<Vec<Keyphrase>>,
    #[serde(default, deserialize_with = "lenient")]
    pub llm: Option<LlmSection>,
    #[serde(default)]
    pub mindmap: Option<GraphDescriptor>,
    #[serde(default)]
    pub flowchart: Option<GraphDescriptor>,
    #[serde(default)]
    pub meta: Option<ProcessingMeta>,
    #[serde(default)]
    pub engine_used: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredConcept {
    pub phrase: String,
    pub score: Option<f64>,
}

impl ScoredConcept {
    pub fn score_label(&self) -> Option<String> {
        self.score.map(|score| format!("{:.2}", score))
    }
}

impl From<Keyphrase> for ScoredConcept {
    fn from(keyphrase: Keyphrase) -> Self {
        match keyphrase {
            Keyphrase::Plain(phrase) => Self { phrase, score: None },
            Keyphrase::Pair(phrase, score) | Keyphrase::Scored { phrase, score } => {
                Self { phrase, score }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingResult {
    pub text: String,
    pub concepts: Vec<ScoredConcept>,
    pub mindmap: Option<GraphDescriptor>,
    pub flowchart: Option<GraphDescriptor>,
    pub meta: ProcessingMeta,
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

impl ProcessingResponse {
    /// Business-level error text, if the body carries one.
    pub fn error_text(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::Null => None,
            Value::Bool(false) => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn normalize(self) -> ProcessingResult {
        let llm = self.llm.unwrap_or_default();

        let text = non_empty(self.text)
            .or_else(|| non_empty(llm.clean_text))
            .or_else(|| non_empty(self.extracted_text))
            .unwrap_or_default();

        let concepts = match (self.keyphrases, llm.concepts, self.top_concepts) {
            (Some(keyphrases), _, _) => {
                keyphrases.into_iter().map(ScoredConcept::from).collect()
            }
            (None, Some(concepts), _) => concepts
                .into_iter()
                .map(ScoredConcept::from)
                .map(|concept| ScoredConcept {
                    score: concept.score.or(Some(1.0)),
                    ..concept
                })
                .collect(),
            (None, None, Some(top)) => top.into_iter().map(ScoredConcept::from).collect(),
            (None, None, None) => Vec::new(),
        };

        let mut meta = self.meta.unwrap_or_default();
        if meta.ocr_engine.is_none() {
            meta.ocr_engine = self.engine_used;
        }

        ProcessingResult {
            text,
            concepts,
            mindmap: self.mindmap,
            flowchart: self.flowchart,
            meta,
        }
    }
}
