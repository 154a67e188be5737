//! Modèle de données

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString};

use crate::utils::input_validation::{AuthorName, Content, PhoneNumber, Summary, Title};

/// Catégorie d'un article: Fiction ou Non-Fiction
#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display,
)]
pub enum Category {
    Fiction,
    #[serde(rename = "Non-Fiction")]
    #[strum(serialize = "Non-Fiction")]
    #[display("Non-Fiction")]
    NonFiction,
}

/// Un identifiant unique d'auteur, attribué par la base de données.
#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord, Display,
)]
pub struct AuthorID(u64);

impl AuthorID {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Un identifiant unique d'article, attribué par la base de données.
#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord, Display,
)]
pub struct PostID(u64);

impl PostID {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Un auteur enregistré.
///
/// Le nom est unique parmi tous les auteurs; le numéro de téléphone,
/// s'il existe, est stocké sous forme compacte (10 chiffres).
#[derive(Debug, Serialize, Deserialize, Clone, Display)]
#[display("Author(id={id}, name={name})")]
pub struct Author {
    pub id: AuthorID,
    pub name: AuthorName,
    pub phone_number: Option<PhoneNumber>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Un article enregistré
#[derive(Debug, Serialize, Deserialize, Clone, Display)]
#[display("Post(id={id}, title={title} content={content}, summary={summary})")]
pub struct Post {
    pub id: PostID,
    pub title: Title,
    pub content: Content,
    pub summary: Summary,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Author {
    /// Marque l'auteur comme modifié
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Post {
    /// Marque l'article comme modifié
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Champs bruts d'un auteur, tels que saisis, avant validation
#[derive(Debug, Clone, Default)]
pub struct AuthorDraft {
    pub name: String,
    pub phone_number: Option<String>,
}

/// Champs bruts d'un article, tels que saisis, avant validation
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub summary: String,
    pub category: String,
}

/// Un auteur validé, pas encore stocké
#[derive(Debug, Clone)]
pub struct NewAuthor {
    pub name: AuthorName,
    pub phone_number: Option<PhoneNumber>,
}

/// Un article validé, pas encore stocké
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: Title,
    pub content: Content,
    pub summary: Summary,
    pub category: Category,
}
