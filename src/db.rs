//! Stockage des données en mémoire, avec sauvegarde en JSON

use crate::{
    models::{Author, AuthorID, NewAuthor, NewPost, Post, PostID},
    validators::AuthorLookup,
};
use chrono::Utc;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashSet},
    fs::File,
    io::{self, ErrorKind::NotFound},
    path::PathBuf,
};
use thiserror::Error;

/// Authors and posts, keyed by id.
///
/// Field values arrive already validated through [`crate::services::Service`];
/// on `open`, only the invariants spanning several records are checked here.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Database {
    #[serde(skip)]
    path: Option<PathBuf>,
    next_author_id: u64,
    next_post_id: u64,
    authors: BTreeMap<AuthorID, Author>,
    posts: BTreeMap<PostID, Post>,
}

#[derive(Debug, Error)]
pub enum DBError {
    #[error("Invalid author ID: {0}")]
    InvalidAuthorID(AuthorID),
    #[error("Invalid post ID: {0}")]
    InvalidPostID(PostID),
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self, io::Error> {
        match File::open(&path) {
            Ok(f) => {
                let mut db: Self = serde_json::from_reader(f)?;
                db.check()?;
                db.path = Some(path);
                Ok(db)
            }

            // Fichier non existant, on le crée
            Err(not_found) if not_found.kind() == NotFound => {
                info!("DB file not found, creating new empty DB");
                let new_db = Database {
                    path: Some(path),
                    ..Default::default()
                };

                // Sauvegarde immédiate pour vérifier que le chemin est utilisable
                new_db.save()?;
                Ok(new_db)
            }

            Err(other) => Err(other),
        }
    }

    /// Vérifie les invariants qui portent sur plusieurs enregistrements.
    ///
    /// Chaque champ est déjà validé à la désérialisation; il reste l'unicité
    /// des noms, la cohérence clé/id, et les compteurs d'id.
    fn check(&mut self) -> Result<(), io::Error> {
        let invalid = |message: String| io::Error::new(io::ErrorKind::InvalidData, message);

        let mut names = HashSet::new();
        for (key, author) in &self.authors {
            if *key != author.id {
                return Err(invalid(format!(
                    "Author stored under ID {key} has ID {}",
                    author.id
                )));
            }
            if !names.insert(author.name.as_ref()) {
                return Err(invalid(format!("Duplicate author name: {}", author.name)));
            }
        }

        for (key, post) in &self.posts {
            if *key != post.id {
                return Err(invalid(format!(
                    "Post stored under ID {key} has ID {}",
                    post.id
                )));
            }
        }

        // Un compteur en retard réattribuerait un id existant
        if let Some(last) = self.authors.keys().next_back() {
            if self.next_author_id < last.get() {
                warn!("Author ID counter behind stored records, raised to {last}");
                self.next_author_id = last.get();
            }
        }
        if let Some(last) = self.posts.keys().next_back() {
            if self.next_post_id < last.get() {
                warn!("Post ID counter behind stored records, raised to {last}");
                self.next_post_id = last.get();
            }
        }
        Ok(())
    }

    /// A store with no backing file; `save` does nothing
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn save(&self) -> Result<(), io::Error> {
        if let Some(path) = &self.path {
            let file = File::create(path)?;
            serde_json::to_writer_pretty(file, self)?;
        }
        Ok(())
    }

    pub fn insert_author(&mut self, author: NewAuthor) -> AuthorID {
        self.next_author_id += 1;
        let id = AuthorID::new(self.next_author_id);
        let now = Utc::now();

        self.authors.insert(
            id,
            Author {
                id,
                name: author.name,
                phone_number: author.phone_number,
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    pub fn get_author(&self, id: AuthorID) -> Result<&Author, DBError> {
        self.authors.get(&id).ok_or(DBError::InvalidAuthorID(id))
    }

    pub fn get_author_mut(&mut self, id: AuthorID) -> Result<&mut Author, DBError> {
        self.authors
            .get_mut(&id)
            .ok_or(DBError::InvalidAuthorID(id))
    }

    pub fn remove_author(&mut self, id: AuthorID) -> Result<Author, DBError> {
        self.authors.remove(&id).ok_or(DBError::InvalidAuthorID(id))
    }

    pub fn list_authors(&self) -> impl Iterator<Item = &Author> + '_ {
        self.authors.values()
    }

    pub fn insert_post(&mut self, post: NewPost) -> PostID {
        self.next_post_id += 1;
        let id = PostID::new(self.next_post_id);
        let now = Utc::now();

        self.posts.insert(
            id,
            Post {
                id,
                title: post.title,
                content: post.content,
                summary: post.summary,
                category: post.category,
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    pub fn get_post(&self, id: PostID) -> Result<&Post, DBError> {
        self.posts.get(&id).ok_or(DBError::InvalidPostID(id))
    }

    pub fn get_post_mut(&mut self, id: PostID) -> Result<&mut Post, DBError> {
        self.posts.get_mut(&id).ok_or(DBError::InvalidPostID(id))
    }

    pub fn remove_post(&mut self, id: PostID) -> Result<Post, DBError> {
        self.posts.remove(&id).ok_or(DBError::InvalidPostID(id))
    }

    pub fn list_posts(&self) -> impl Iterator<Item = &Post> + '_ {
        self.posts.values()
    }
}

impl AuthorLookup for Database {
    fn find_by_name(&self, name: &str) -> Option<&Author> {
        self.authors
            .values()
            .find(|author| author.name.as_ref() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::utils::input_validation::{AuthorName, Content, PhoneNumber, Summary, Title};

    fn new_author(name: &str) -> NewAuthor {
        NewAuthor {
            name: AuthorName::try_from(name).unwrap(),
            phone_number: None,
        }
    }

    fn new_post(title: &str) -> NewPost {
        NewPost {
            title: Title::try_from(title).unwrap(),
            content: Content::try_from("c".repeat(250)).unwrap(),
            summary: Summary::try_from("").unwrap(),
            category: Category::Fiction,
        }
    }

    #[test]
    fn test_ids_are_sequential_and_never_reused() {
        let mut db = Database::in_memory();
        let first = db.insert_author(new_author("Ada"));
        let second = db.insert_author(new_author("Grace"));
        assert_eq!((first.get(), second.get()), (1, 2));

        db.remove_author(second).unwrap();
        let third = db.insert_author(new_author("Linus"));
        assert_eq!(third.get(), 3);
    }

    #[test]
    fn test_timestamps_are_set_on_insert() {
        let mut db = Database::in_memory();
        let id = db.insert_post(new_post("Top Stories"));
        let post = db.get_post(id).unwrap();
        assert_eq!(post.created_at, post.updated_at);
    }

    #[test]
    fn test_missing_records() {
        let mut db = Database::in_memory();
        let ghost = AuthorID::new(42);

        assert!(matches!(db.get_author(ghost), Err(DBError::InvalidAuthorID(id)) if id == ghost));
        assert!(db.remove_post(PostID::new(1)).is_err());
        assert_eq!(
            db.get_post(PostID::new(7)).unwrap_err().to_string(),
            "Invalid post ID: 7"
        );
    }

    #[test]
    fn test_find_by_name_is_exact() {
        let mut db = Database::in_memory();
        let id = db.insert_author(new_author("Ada Lovelace"));

        assert_eq!(db.find_by_name("Ada Lovelace").map(|a| a.id), Some(id));
        assert!(db.find_by_name("ada lovelace").is_none());
        assert!(db.find_by_name("Ada").is_none());
    }

    #[test]
    fn test_open_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let db = Database::open(path.clone()).unwrap();
        assert!(path.exists(), "Empty store was not written");
        assert_eq!(db.list_authors().count(), 0);
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut db = Database::open(path.clone()).unwrap();
        let author = db.insert_author(NewAuthor {
            name: AuthorName::try_from("Ada").unwrap(),
            phone_number: Some(PhoneNumber::try_from("555 123 4567").unwrap()),
        });
        let post = db.insert_post(new_post("Guess Who"));
        db.save().unwrap();

        let mut reopened = Database::open(path).unwrap();
        let stored = reopened.get_author(author).unwrap();
        assert_eq!(stored.name.as_ref(), "Ada");
        assert_eq!(
            stored.phone_number.as_ref().map(ToString::to_string),
            Some("5551234567".to_owned())
        );
        assert_eq!(reopened.get_post(post).unwrap().title.as_ref(), "Guess Who");

        // Counters survive the round trip
        assert_eq!(reopened.insert_author(new_author("Grace")).get(), 2);
    }

    #[test]
    fn test_open_rejects_invalid_stored_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(
            &path,
            r#"{
                "next_author_id": 1,
                "next_post_id": 0,
                "authors": {
                    "1": {
                        "id": 1,
                        "name": "Ada",
                        "phone_number": "555-123-4567",
                        "created_at": "2024-01-01T00:00:00Z",
                        "updated_at": "2024-01-01T00:00:00Z"
                    }
                },
                "posts": {}
            }"#,
        )
        .unwrap();

        let error = Database::open(path).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
    }

    fn author_json(id: u64, name: &str) -> String {
        format!(
            r#"{{
                "id": {id},
                "name": "{name}",
                "phone_number": null,
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-01T00:00:00Z"
            }}"#
        )
    }

    fn store_json(next_author_id: u64, authors: &[(u64, String)]) -> String {
        let authors: Vec<String> = authors
            .iter()
            .map(|(key, author)| format!(r#""{key}": {author}"#))
            .collect();
        format!(
            r#"{{"next_author_id": {next_author_id}, "next_post_id": 0, "authors": {{{}}}, "posts": {{}}}}"#,
            authors.join(", ")
        )
    }

    #[test]
    fn test_open_rejects_inconsistent_stores() {
        let cases = vec![
            (
                "duplicate names",
                store_json(2, &[(1, author_json(1, "Ada")), (2, author_json(2, "Ada"))]),
            ),
            ("key and id differ", store_json(2, &[(2, author_json(1, "Ada"))])),
        ];

        for (label, content) in cases {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("store.json");
            std::fs::write(&path, content).unwrap();

            let error = Database::open(path).unwrap_err();
            assert_eq!(error.kind(), io::ErrorKind::InvalidData, "Store with {label} was accepted !");
        }
    }

    #[test]
    fn test_open_raises_stale_counter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(
            &path,
            store_json(0, &[(1, author_json(1, "Ada")), (2, author_json(2, "Grace"))]),
        )
        .unwrap();

        let mut db = Database::open(path).unwrap();
        let id = db.insert_author(new_author("Linus"));

        assert_eq!(id.get(), 3);
        let names: Vec<&str> = db.list_authors().map(|a| a.name.as_ref()).collect();
        assert_eq!(names, ["Ada", "Grace", "Linus"]);
    }
}
