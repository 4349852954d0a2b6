use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rand::Rng;

use crate::question::{Question, QuestionError};

/// Ordered, immutable set of questions presented one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog must contain at least one question")]
    Empty,
    #[error("question id {id} appears more than once")]
    DuplicateId { id: u32 },
    #[error(transparent)]
    InvalidQuestion(#[from] QuestionError),
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("failed to read question file at {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse question file at {path}: {source}")]
    ParseError {
        path: String,
        source: serde_json::Error,
    },
    #[error("question file at {path} is invalid: {source}")]
    Invalid { path: String, source: CatalogError },
}

impl PartialEq for CatalogLoadError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ReadError { path: left, .. }, Self::ReadError { path: right, .. }) => {
                left == right
            }
            (Self::ParseError { path: left, .. }, Self::ParseError { path: right, .. }) => {
                left == right
            }
            (
                Self::Invalid {
                    path: left,
                    source: left_source,
                },
                Self::Invalid {
                    path: right,
                    source: right_source,
                },
            ) => left == right && left_source == right_source,
            _ => false,
        }
    }
}

impl Eq for CatalogLoadError {}

/// On-disk and over-the-wire shape of a question file.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct QuestionList {
    pub questions: Vec<Question>,
}

impl QuestionCatalog {
    /// Builds a catalog, rejecting it as a whole if any record is malformed.
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut ids = HashSet::new();
        for question in &questions {
            question.validate()?;

            if !ids.insert(question.id) {
                return Err(CatalogError::DuplicateId { id: question.id });
            }
        }

        Ok(Self { questions })
    }

    /// Skips validation for compiled-in question sets that are covered by tests.
    pub(crate) fn from_trusted(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn from_json_str(source: &str) -> Result<Self, CatalogLoadError> {
        parse_list(source.as_bytes(), "<inline>")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogLoadError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| CatalogLoadError::ReadError {
            path: path.display().to_string(),
            source,
        })?;

        parse_list(&data, &path.display().to_string())
    }

    /// Returns the question at `index`, or `None` once the quiz is complete.
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn is_complete_at(&self, index: usize) -> bool {
        index >= self.questions.len()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Same questions in the same order, each with its options permuted.
    pub fn with_shuffled_options<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        Self {
            questions: self
                .questions
                .iter()
                .map(|question| question.with_shuffled_options(rng))
                .collect(),
        }
    }
}

fn parse_list(data: &[u8], path: &str) -> Result<QuestionCatalog, CatalogLoadError> {
    let parsed: QuestionList =
        serde_json::from_slice(data).map_err(|source| CatalogLoadError::ParseError {
            path: path.to_string(),
            source,
        })?;

    QuestionCatalog::new(parsed.questions).map_err(|source| CatalogLoadError::Invalid {
        path: path.to_string(),
        source,
    })
}
