use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("invalid flow #{index}: {reason}")]
    InvalidEdge { index: usize, reason: String },

    #[error("palette must contain at least one color")]
    EmptyPalette,

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

impl LayoutError {
    pub(super) fn invalid_edge(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidEdge {
            index,
            reason: reason.into(),
        }
    }
}
