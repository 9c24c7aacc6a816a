//! Typed form bodies for the create and edit pages

use serde::Deserialize;

use itembook_core::{Item, ItemDraft, ValidationError};

/// Submitted item form. Absent keys deserialize to `None` and are reported
/// by validation instead of rejecting the request outright.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemForm {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl ItemForm {
    pub fn into_draft(self) -> Result<ItemDraft, ValidationError> {
        ItemDraft::new(self.title, self.description)
    }

    /// Field values to echo back into a re-rendered form
    pub fn values(&self) -> FormValues {
        FormValues {
            title: self.title.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
        }
    }
}

/// Text shown in the title and description inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub title: String,
    pub description: String,
}

impl From<&Item> for FormValues {
    fn from(item: &Item) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_title_is_validation_error() {
        let form = ItemForm {
            title: None,
            description: Some("2%".into()),
        };
        assert_eq!(
            form.into_draft().unwrap_err(),
            ValidationError::MissingField("title")
        );
    }

    #[test]
    fn values_echo_submission() {
        let form = ItemForm {
            title: Some("".into()),
            description: Some("kept".into()),
        };
        let values = form.values();
        assert_eq!(values.title, "");
        assert_eq!(values.description, "kept");
    }
}
