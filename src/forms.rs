use std::collections::BTreeMap;

use thiserror::Error;

use crate::db::{Category, NewArticle};

pub const TITLE_MAX_LENGTH: usize = 150;

const REQUIRED: &str = "This field is required.";
const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";
const NULL_CHARACTERS: &str = "Null characters are not allowed.";

/// Key for errors that belong to the whole form rather than one field.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Raw values submitted through the article form.
///
/// Every field defaults to empty so that any urlencoded body binds; problems
/// are reported by [`ArticleForm::validate`] instead of the extractor.
#[derive(Debug, Clone, Default)]
pub struct ArticleForm {
    pub title: String,
    pub content: String,
    pub category: String,
    pub is_published: Option<String>,
}

/// Field-level validation messages, keyed by form field name.
#[derive(Debug, Clone, Default, Error)]
#[error("form has {} invalid field(s)", .0.len())]
pub struct FormErrors(BTreeMap<&'static str, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages for one field; empty when the field is valid.
    pub fn field(&self, name: &str) -> &[String] {
        self.0.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn non_field(&self) -> &[String] {
        self.field(NON_FIELD_ERRORS)
    }
}

impl ArticleForm {
    /// Bind decoded `name=value` pairs. A repeated field keeps its last value
    /// and unknown fields are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut form = ArticleForm::default();
        for (name, value) in pairs {
            match name.as_str() {
                "title" => form.title = value,
                "content" => form.content = value,
                "category" => form.category = value,
                "is_published" => form.is_published = Some(value),
                _ => {}
            }
        }
        form
    }

    /// Checkbox semantics: absent, empty or "false" means unchecked.
    pub fn is_checked(&self) -> bool {
        match self.is_published.as_deref() {
            None => false,
            Some(value) => {
                let value = value.trim();
                !value.is_empty() && !value.eq_ignore_ascii_case("false")
            }
        }
    }

    pub fn is_selected(&self, category: &Category) -> bool {
        self.category.trim() == category.id.to_string()
    }

    pub fn validate(&self, categories: &[Category]) -> Result<NewArticle, FormErrors> {
        let mut errors = FormErrors::default();

        let title = self.title.trim();
        let title_length = title.chars().count();
        if title.contains('\0') {
            errors.add("title", NULL_CHARACTERS);
        } else if title.is_empty() {
            errors.add("title", REQUIRED);
        } else if title_length > TITLE_MAX_LENGTH {
            errors.add(
                "title",
                format!(
                    "Ensure this value has at most {} characters (it has {}).",
                    TITLE_MAX_LENGTH, title_length
                ),
            );
        }

        if self.content.contains('\0') {
            errors.add("content", NULL_CHARACTERS);
        }

        let category = self.category.trim();
        let category_id = if category.is_empty() {
            errors.add("category", REQUIRED);
            None
        } else {
            match category.parse::<i64>() {
                Ok(id) if categories.iter().any(|c| c.id == id) => Some(id),
                _ => {
                    errors.add("category", INVALID_CHOICE);
                    None
                }
            }
        };

        match category_id {
            Some(category_id) if errors.is_empty() => Ok(NewArticle {
                title: title.to_string(),
                content: self.content.trim().to_string(),
                category_id,
                is_published: self.is_checked(),
            }),
            _ => Err(errors),
        }
    }
}
