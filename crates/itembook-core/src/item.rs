use std::fmt;

use chrono::{DateTime, Utc};

/// Store-assigned item identifier (SQLite rowid).
pub type ItemId = i64;

/// Maximum title length in characters, mirroring the `VARCHAR(100)` column.
pub const TITLE_MAX_LEN: usize = 100;

/// The single record managed by itembook.
///
/// `id` and `created_at` are owned by the store and never change after
/// insertion; only `title` and `description` are mutable.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Item {}: {}>", self.id, self.title)
    }
}

/// A validated title/description pair, ready to be written by a store.
///
/// The only way to build one is [`ItemDraft::new`], so every draft that
/// reaches a store has a non-blank title within [`TITLE_MAX_LEN`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    title: String,
    description: Option<String>,
}

impl ItemDraft {
    /// Validate raw field values.
    ///
    /// `None` means the field was absent from the submission. The title is
    /// trimmed; a blank description is normalized to `None`.
    pub fn new(
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.ok_or(ValidationError::MissingField("title"))?;
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyField("title"));
        }

        let len = title.chars().count();
        if len > TITLE_MAX_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                max: TITLE_MAX_LEN,
                actual: len,
            });
        }

        let description = description.filter(|d| !d.trim().is_empty());

        Ok(Self {
            title: title.to_string(),
            description,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A submitted field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("{field} must be at most {max} characters (got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

impl ValidationError {
    /// Name of the offending form field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField(f) | Self::EmptyField(f) => *f,
            Self::TooLong { field, .. } => *field,
        }
    }
}
