use crate::model::ElementId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("node {id} is not part of the graph")]
    MissingNode { id: ElementId },
    #[error("edge {id} is not part of the graph")]
    MissingEdge { id: ElementId },
    #[error("graph contains a cycle through {} node(s)", nodes.len())]
    Cycle { nodes: Vec<ElementId> },
    #[error("edges leaving {node} have different durations ({first} vs {other})")]
    InconsistentDuration { node: ElementId, first: f64, other: f64 },
    #[error("edge {edge} has negative weight {weight}")]
    NegativeWeight { edge: ElementId, weight: f64 },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("invalid json: {0}")]
    Json(String),
    #[error("{what} out of bounds")]
    OutOfBounds { what: String },
    #[error("{what} exceeds limit of {limit}")]
    CapsExceeded { what: &'static str, limit: usize },
    #[error("invalid structure: {0}")]
    InvalidStructure(String),
    #[error("label {label:?} is already used by another node")]
    DuplicateLabel { label: String },
    #[error("unknown tool {0:?}")]
    UnknownTool(String),
    #[error("unknown layout {0:?}")]
    UnknownLayout(String),
    #[error("search stopped after {steps} steps")]
    SearchBudget { steps: usize },
}

impl Error {
    /// Stable machine-readable code, used by the wasm error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Error::MissingNode { .. } => "missing_node",
            Error::MissingEdge { .. } => "missing_edge",
            Error::Cycle { .. } => "cycle",
            Error::InconsistentDuration { .. } => "inconsistent_duration",
            Error::NegativeWeight { .. } => "negative_weight",
            Error::Parse { .. } => "parse",
            Error::Json(_) => "json_parse",
            Error::OutOfBounds { .. } => "out_of_bounds",
            Error::CapsExceeded { .. } => "caps_exceeded",
            Error::InvalidStructure(_) => "invalid_structure",
            Error::DuplicateLabel { .. } => "duplicate_label",
            Error::UnknownTool(_) => "unknown_tool",
            Error::UnknownLayout(_) => "unknown_layout",
            Error::SearchBudget { .. } => "search_budget",
        }
    }

    pub(crate) fn missing_node(id: &ElementId) -> Self {
        Error::MissingNode { id: id.clone() }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
