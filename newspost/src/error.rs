use std::fmt;

use thiserror::Error;

/// Failure talking to the news search API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The API answered with a non-success status; `body` is the raw response text.
    #[error("news API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("news API request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

/// Pipeline step at which generation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    News,
    Title,
    MetaDescription,
    Body,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::News => "news",
            Stage::Title => "title",
            Stage::MetaDescription => "meta description",
            Stage::Body => "body",
        })
    }
}

/// Any failure of the topic-to-post pipeline. No partial results survive it.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Error generating content: {0}")]
    News(#[from] UpstreamError),
    #[error("Error generating content ({stage}): {source:#}")]
    Completion {
        stage: Stage,
        #[source]
        source: anyhow::Error,
    },
}

impl GenerationError {
    pub fn stage(&self) -> Stage {
        match self {
            GenerationError::News(_) => Stage::News,
            GenerationError::Completion { stage, .. } => *stage,
        }
    }
}
