//! Validation par champ des auteurs et des articles, avant toute écriture.
//!
//! Chaque validateur prend un champ et une valeur candidate, et rend la
//! valeur acceptée (éventuellement normalisée) ou une [`ValidationError`].

use std::str::FromStr;

use strum_macros::{Display, EnumIter, EnumString};

use crate::models::{Author, AuthorDraft, AuthorID, Category, NewAuthor, NewPost, PostDraft};
use crate::utils::input_validation::{
    AuthorName, Content, PhoneNumber, Summary, Title, ValidationError,
};

/// Lookup of a stored author by exact name.
///
/// The only storage capability the validators need.
pub trait AuthorLookup {
    fn find_by_name(&self, name: &str) -> Option<&Author>;
}

/// Assignable author columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum AuthorField {
    Name,
    PhoneNumber,
}

/// Assignable post columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum PostField {
    Title,
    Content,
    Summary,
    Category,
}

impl AuthorField {
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        Self::from_str(name).map_err(|_| ValidationError::UnknownField(name.to_owned()))
    }
}

impl PostField {
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        Self::from_str(name).map_err(|_| ValidationError::UnknownField(name.to_owned()))
    }
}

/// Validates author fields against the authors currently stored.
///
/// `current` is the author being edited, if any: an author keeping its own
/// name is not a duplicate of itself.
pub struct AuthorValidator<'db, L: AuthorLookup + ?Sized> {
    lookup: &'db L,
    current: Option<AuthorID>,
}

impl<'db, L: AuthorLookup + ?Sized> AuthorValidator<'db, L> {
    /// Validator for an author that does not exist yet
    pub fn new(lookup: &'db L) -> Self {
        Self {
            lookup,
            current: None,
        }
    }

    /// Validator for edits to an existing author
    pub fn for_author(lookup: &'db L, id: AuthorID) -> Self {
        Self {
            lookup,
            current: Some(id),
        }
    }

    pub fn name(&self, value: &str) -> Result<AuthorName, ValidationError> {
        let name = AuthorName::try_from(value)?;

        match self.lookup.find_by_name(name.as_ref()) {
            Some(existing) if Some(existing.id) != self.current => {
                Err(ValidationError::AuthorNameTaken)
            }
            _ => Ok(name),
        }
    }

    pub fn phone_number(&self, value: &str) -> Result<PhoneNumber, ValidationError> {
        PhoneNumber::try_from(value)
    }

    /// Validates one field and returns the value to store
    pub fn validate(&self, field: AuthorField, value: &str) -> Result<String, ValidationError> {
        match field {
            AuthorField::Name => self.name(value).map(String::from),
            AuthorField::PhoneNumber => self.phone_number(value).map(String::from),
        }
    }

    /// Same as [`Self::validate`], with the field given by its column name
    pub fn validate_field(&self, field: &str, value: &str) -> Result<String, ValidationError> {
        self.validate(AuthorField::parse(field)?, value)
    }

    /// Validates every field of a draft; the first failure wins
    pub fn draft(&self, draft: &AuthorDraft) -> Result<NewAuthor, ValidationError> {
        Ok(NewAuthor {
            name: self.name(&draft.name)?,
            phone_number: draft
                .phone_number
                .as_deref()
                .map(|number| self.phone_number(number))
                .transpose()?,
        })
    }
}

/// Validates post fields. Post rules only look at the value itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostValidator;

impl PostValidator {
    pub fn title(value: &str) -> Result<Title, ValidationError> {
        Title::try_from(value)
    }

    pub fn content(value: &str) -> Result<Content, ValidationError> {
        Content::try_from(value)
    }

    pub fn summary(value: &str) -> Result<Summary, ValidationError> {
        Summary::try_from(value)
    }

    pub fn category(value: &str) -> Result<Category, ValidationError> {
        Category::parse(value)
    }

    /// Validates one field and returns the value to store
    pub fn validate(field: PostField, value: &str) -> Result<String, ValidationError> {
        match field {
            PostField::Title => Self::title(value).map(String::from),
            PostField::Content => Self::content(value).map(String::from),
            PostField::Summary => Self::summary(value).map(String::from),
            PostField::Category => Self::category(value).map(|c| c.to_string()),
        }
    }

    pub fn validate_field(field: &str, value: &str) -> Result<String, ValidationError> {
        Self::validate(PostField::parse(field)?, value)
    }

    /// Validates every field of a draft; the first failure wins
    pub fn draft(draft: &PostDraft) -> Result<NewPost, ValidationError> {
        Ok(NewPost {
            title: Self::title(&draft.title)?,
            content: Self::content(&draft.content)?,
            summary: Self::summary(&draft.summary)?,
            category: Self::category(&draft.category)?,
        })
    }
}
