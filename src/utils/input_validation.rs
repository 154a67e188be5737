use derive_more::derive::Display;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::models::Category;

/// Phrases of which at least one must appear in every post title
pub const MARKER_PHRASES: [&str; 4] = ["Won't Believe", "Secret", "Top", "Guess"];

pub const PHONE_NUMBER_LENGTH: usize = 10;
pub const MIN_CONTENT_LENGTH: usize = 250;
pub const MAX_SUMMARY_LENGTH: usize = 250;

// Alternation of the marker phrases, matched anywhere in the title
static MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    let alternatives: Vec<String> = MARKER_PHRASES.iter().map(|p| regex::escape(p)).collect();
    Regex::new(&alternatives.join("|")).expect("Failed to compile marker phrase regex")
});

/// Reasons a field value is refused before it reaches storage.
///
/// The display text of each variant is the message surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Author name is required!")]
    AuthorNameRequired,
    #[error("Author name already exists.")]
    AuthorNameTaken,
    #[error("Phone number can only contain digits.")]
    PhoneNumberNotDigits,
    #[error("Phone number must be exactly 10 digits.")]
    PhoneNumberLength,
    #[error("Each post must have a title!")]
    TitleRequired,
    #[error(
        "Title must have at least one of the following terms: {}",
        MARKER_PHRASES.join(", ")
    )]
    TitleMissingMarker,
    #[error("Content must be at least 250 characters long!")]
    ContentTooShort,
    #[error("Summary cannot exceed 250 characters!")]
    SummaryTooLong,
    #[error("Category can only be Fiction or Non-Fiction")]
    InvalidCategory,
    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// Removes every space character. Other whitespace is kept.
pub fn compact(value: &str) -> String {
    value.replace(' ', "")
}

/// Length of the compacted value, counted in characters
fn compact_len(value: &str) -> usize {
    value.chars().filter(|&c| c != ' ').count()
}

/// Implements the conversions every validated wrapper shares: construction
/// through `TryFrom`, and extraction back to a plain string.
macro_rules! validated_string {
    ($name:ident, $validate:path) => {
        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                $validate(&value).map(Self)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ValidationError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                $validate(value).map(Self)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

/// Wrapper type for a non-blank author name.
///
/// Uniqueness depends on what is stored and is checked by
/// [`crate::validators::AuthorValidator`], not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[serde(try_from = "String", into = "String")]
pub struct AuthorName(String);

validated_string!(AuthorName, author_name_validation);

fn author_name_validation(name: &str) -> Result<String, ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::AuthorNameRequired);
    }
    Ok(name.to_owned())
}

/// Wrapper type for a phone number, stored as exactly ten digits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Display)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

validated_string!(PhoneNumber, phone_number_validation);

fn phone_number_validation(number: &str) -> Result<String, ValidationError> {
    let compact_number = compact(number);

    // An empty number has no digits either
    if compact_number.is_empty() || !compact_number.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PhoneNumberNotDigits);
    }

    if compact_number.len() != PHONE_NUMBER_LENGTH {
        return Err(ValidationError::PhoneNumberLength);
    }

    Ok(compact_number)
}

/// Wrapper type for a post title containing at least one marker phrase
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Display)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

validated_string!(Title, title_validation);

fn title_validation(title: &str) -> Result<String, ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::TitleRequired);
    }

    if !MARKER_REGEX.is_match(title) {
        return Err(ValidationError::TitleMissingMarker);
    }

    Ok(title.to_owned())
}

/// Wrapper type for post content. The original text is kept, spaces included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Display)]
#[serde(try_from = "String", into = "String")]
pub struct Content(String);

validated_string!(Content, content_validation);

fn content_validation(content: &str) -> Result<String, ValidationError> {
    if compact_len(content) < MIN_CONTENT_LENGTH {
        return Err(ValidationError::ContentTooShort);
    }
    Ok(content.to_owned())
}

/// Wrapper type for a post summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Display)]
#[serde(try_from = "String", into = "String")]
pub struct Summary(String);

validated_string!(Summary, summary_validation);

fn summary_validation(summary: &str) -> Result<String, ValidationError> {
    if compact_len(summary) > MAX_SUMMARY_LENGTH {
        return Err(ValidationError::SummaryTooLong);
    }
    Ok(summary.to_owned())
}

impl Category {
    /// Accepts exactly "Fiction" or "Non-Fiction"
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        Category::from_str(value).map_err(|_| ValidationError::InvalidCategory)
    }
}
