//! API d'accès aux auteurs et aux articles, et unique chemin d'écriture.
//!
//! Toute modification valide d'abord l'ensemble des champs concernés, puis
//! écrit. Si un champ est refusé, rien n'est modifié.
use crate::db::{DBError, Database};
use crate::models::{Author, AuthorDraft, AuthorID, Post, PostDraft, PostID};
use crate::utils::input_validation::ValidationError;
use crate::validators::{AuthorField, AuthorValidator, PostField, PostValidator};
use log::{info, warn};
use thiserror::Error;

pub struct Service {
    db: Database,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    DBError(#[from] DBError),
}

/// Logs a refused value before it is handed back to the caller
fn rejected<'a>(action: &'a str) -> impl FnOnce(&ValidationError) + 'a {
    move |error| warn!("{action} rejected: {error}")
}

impl Service {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        self.db.save()
    }

    /// Enregistre un nouvel auteur
    pub fn create_author(&mut self, draft: &AuthorDraft) -> Result<AuthorID, ServiceError> {
        let author = AuthorValidator::new(&self.db)
            .draft(draft)
            .inspect_err(rejected("Author creation"))?;

        let id = self.db.insert_author(author);
        info!("Author {id} created");
        Ok(id)
    }

    /// Remplace tous les champs d'un auteur
    pub fn update_author(&mut self, id: AuthorID, draft: &AuthorDraft) -> Result<(), ServiceError> {
        self.db.get_author(id)?;
        let validated = AuthorValidator::for_author(&self.db, id)
            .draft(draft)
            .inspect_err(rejected("Author update"))?;

        let author = self.db.get_author_mut(id)?;
        author.name = validated.name;
        author.phone_number = validated.phone_number;
        author.touch();
        info!("Author {id} updated");
        Ok(())
    }

    pub fn rename_author(&mut self, id: AuthorID, name: &str) -> Result<(), ServiceError> {
        self.set_author_field(id, AuthorField::Name, name)
    }

    /// Change ou efface le numéro de téléphone d'un auteur
    pub fn set_phone_number(
        &mut self,
        id: AuthorID,
        phone_number: Option<&str>,
    ) -> Result<(), ServiceError> {
        match phone_number {
            Some(number) => self.set_author_field(id, AuthorField::PhoneNumber, number),
            None => {
                let author = self.db.get_author_mut(id)?;
                author.phone_number = None;
                author.touch();
                info!("Author {id}: phone number cleared");
                Ok(())
            }
        }
    }

    /// Assigne un seul champ d'un auteur
    pub fn set_author_field(
        &mut self,
        id: AuthorID,
        field: AuthorField,
        value: &str,
    ) -> Result<(), ServiceError> {
        self.db.get_author(id)?;
        let validator = AuthorValidator::for_author(&self.db, id);
        let context = format!("Author {id} {field}");

        match field {
            AuthorField::Name => {
                let name = validator.name(value).inspect_err(rejected(&context))?;
                let author = self.db.get_author_mut(id)?;
                author.name = name;
                author.touch();
            }
            AuthorField::PhoneNumber => {
                let number = validator
                    .phone_number(value)
                    .inspect_err(rejected(&context))?;
                let author = self.db.get_author_mut(id)?;
                author.phone_number = Some(number);
                author.touch();
            }
        }

        info!("{context} updated");
        Ok(())
    }

    /// Même chose que [`Self::set_author_field`], le champ étant donné par son nom
    pub fn update_author_field(
        &mut self,
        id: AuthorID,
        field: &str,
        value: &str,
    ) -> Result<(), ServiceError> {
        let field = AuthorField::parse(field)?;
        self.set_author_field(id, field, value)
    }

    pub fn get_author(&self, id: AuthorID) -> Result<&Author, ServiceError> {
        Ok(self.db.get_author(id)?)
    }

    pub fn list_authors(&self) -> impl Iterator<Item = &Author> + '_ {
        self.db.list_authors()
    }

    pub fn delete_author(&mut self, id: AuthorID) -> Result<(), ServiceError> {
        let author = self.db.remove_author(id)?;
        info!("{author} deleted");
        Ok(())
    }

    /// Écrire un nouvel article
    pub fn create_post(&mut self, draft: &PostDraft) -> Result<PostID, ServiceError> {
        let post = PostValidator::draft(draft).inspect_err(rejected("Post creation"))?;

        let id = self.db.insert_post(post);
        info!("Post {id} created");
        Ok(id)
    }

    /// Remplace tous les champs d'un article
    pub fn update_post(&mut self, id: PostID, draft: &PostDraft) -> Result<(), ServiceError> {
        self.db.get_post(id)?;
        let validated = PostValidator::draft(draft).inspect_err(rejected("Post update"))?;

        let post = self.db.get_post_mut(id)?;
        post.title = validated.title;
        post.content = validated.content;
        post.summary = validated.summary;
        post.category = validated.category;
        post.touch();
        info!("Post {id} updated");
        Ok(())
    }

    /// Assigne un seul champ d'un article
    pub fn set_post_field(
        &mut self,
        id: PostID,
        field: PostField,
        value: &str,
    ) -> Result<(), ServiceError> {
        self.db.get_post(id)?;
        let context = format!("Post {id} {field}");

        // Each arm validates before borrowing the stored post
        match field {
            PostField::Title => {
                let title = PostValidator::title(value).inspect_err(rejected(&context))?;
                self.db.get_post_mut(id)?.title = title;
            }
            PostField::Content => {
                let content = PostValidator::content(value).inspect_err(rejected(&context))?;
                self.db.get_post_mut(id)?.content = content;
            }
            PostField::Summary => {
                let summary = PostValidator::summary(value).inspect_err(rejected(&context))?;
                self.db.get_post_mut(id)?.summary = summary;
            }
            PostField::Category => {
                let category = PostValidator::category(value).inspect_err(rejected(&context))?;
                self.db.get_post_mut(id)?.category = category;
            }
        }

        self.db.get_post_mut(id)?.touch();
        info!("{context} updated");
        Ok(())
    }

    /// Même chose que [`Self::set_post_field`], le champ étant donné par son nom
    pub fn update_post_field(
        &mut self,
        id: PostID,
        field: &str,
        value: &str,
    ) -> Result<(), ServiceError> {
        let field = PostField::parse(field)?;
        self.set_post_field(id, field, value)
    }

    pub fn get_post(&self, id: PostID) -> Result<&Post, ServiceError> {
        Ok(self.db.get_post(id)?)
    }

    pub fn list_posts(&self) -> impl Iterator<Item = &Post> + '_ {
        self.db.list_posts()
    }

    pub fn delete_post(&mut self, id: PostID) -> Result<(), ServiceError> {
        let post = self.db.remove_post(id)?;
        info!("Post {} deleted: {}", post.id, post.title);
        Ok(())
    }
}
