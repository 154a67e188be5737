use anyhow::Result;
use derive_more::Display;
use inquire::{Confirm, Editor, Select, Text};
use scribe::config::Config;
use scribe::db::Database;
use scribe::models::*;
use scribe::services::Service;
use scribe::validators::{AuthorField, PostField};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

type MenuExit = Option<()>;
const MENU_EXIT: MenuExit = None;
const MENU_LOOP: MenuExit = Some(());

/// Représente un menu texte
trait Menu {
    /// Implémente le contenu du menu. La valeur de retour
    /// doit être None si le menu souhaite terminer,
    /// ou Some(()) s'il faut le relancer.
    fn enter(&mut self) -> Result<MenuExit>;

    /// Lance le menu en boucle, en interceptant les erreurs,
    /// sauf si le menu souhaite quitter.
    fn enter_loop(&mut self) {
        while let Some(result) = self.enter().transpose() {
            if let Err(error) = result {
                eprintln!("Erreur: {error}");
            }
        }
    }
}

pub struct App {
    service: Service,
}

impl App {
    pub fn new(service: Service) -> Self {
        App { service }
    }

    pub fn start(&mut self) -> Result<()> {
        println!("Bienvenue sur SCRIBE, le registre des auteurs et des articles.");
        self.enter_loop();
        self.service.save()?;
        Ok(())
    }

    fn prompt_phone_number() -> Result<Option<String>> {
        let number = Text::new("Numéro de téléphone (vide pour aucun):").prompt()?;
        Ok(Some(number).filter(|n| !n.trim().is_empty()))
    }

    fn pick_author(&self) -> Result<Option<AuthorID>> {
        let authors: Vec<&Author> = self.service.list_authors().collect();
        if authors.is_empty() {
            println!("[*] Aucun auteur enregistré");
            return Ok(None);
        }
        Ok(Select::new("Choisissez un auteur:", authors)
            .prompt_skippable()?
            .map(|author| author.id))
    }

    fn pick_post(&self) -> Result<Option<PostID>> {
        let posts: Vec<&Post> = self.service.list_posts().collect();
        if posts.is_empty() {
            println!("[*] Aucun article enregistré");
            return Ok(None);
        }

        // Le Display d'un article inclut tout son contenu, trop long pour une liste
        let labels: Vec<String> = posts
            .iter()
            .map(|post| format!("[{}] {}", post.id, post.title))
            .collect();
        Ok(Select::new("Choisissez un article:", labels)
            .raw_prompt_skippable()?
            .map(|choice| posts[choice.index].id))
    }
}

impl Menu for App {
    fn enter(&mut self) -> Result<MenuExit> {
        #[derive(EnumIter, Display)]
        enum Choice {
            #[display("Créer un auteur")]
            CreateAuthor,
            #[display("Modifier un auteur")]
            EditAuthor,
            #[display("Écrire un article")]
            CreatePost,
            #[display("Modifier un article")]
            EditPost,
            #[display("Lister les auteurs")]
            ListAuthors,
            #[display("Lister les articles")]
            ListPosts,
            #[display("Supprimer un auteur")]
            DeleteAuthor,
            #[display("Supprimer un article")]
            DeletePost,
            #[display("Quitter")]
            Exit,
        }

        let choice = Select::new("Que voulez-vous faire ?", Choice::iter().collect()).prompt()?;

        match choice {
            Choice::CreateAuthor => {
                let draft = AuthorDraft {
                    name: Text::new("Nom de l'auteur:").prompt()?,
                    phone_number: Self::prompt_phone_number()?,
                };
                let id = self.service.create_author(&draft)?;
                println!("[*] Auteur {id} créé");
            }

            Choice::EditAuthor => {
                let Some(id) = self.pick_author()? else {
                    return Ok(MENU_LOOP);
                };
                let field =
                    Select::new("Champ à modifier:", AuthorField::iter().collect()).prompt()?;

                match field {
                    AuthorField::Name => {
                        let name = Text::new("Nouveau nom:").prompt()?;
                        self.service.rename_author(id, &name)?;
                    }
                    AuthorField::PhoneNumber => {
                        let number = Self::prompt_phone_number()?;
                        self.service.set_phone_number(id, number.as_deref())?;
                    }
                }
            }

            Choice::CreatePost => {
                let draft = PostDraft {
                    title: Text::new("Titre:").prompt()?,
                    content: Editor::new("Contenu de l'article:").prompt()?,
                    summary: Text::new("Résumé:").prompt()?,
                    category: Select::new("Catégorie:", Category::iter().collect())
                        .prompt()?
                        .to_string(),
                };
                let id = self.service.create_post(&draft)?;
                println!("[*] Article {id} créé");
            }

            Choice::EditPost => {
                let Some(id) = self.pick_post()? else {
                    return Ok(MENU_LOOP);
                };
                let field = Select::new("Champ à modifier:", PostField::iter().collect()).prompt()?;

                let value = match field {
                    PostField::Content => Editor::new("Nouveau contenu:").prompt()?,
                    PostField::Category => Select::new("Catégorie:", Category::iter().collect())
                        .prompt()?
                        .to_string(),
                    _ => Text::new("Nouvelle valeur:").prompt()?,
                };
                self.service.set_post_field(id, field, &value)?;
            }

            Choice::ListAuthors => {
                for author in self.service.list_authors() {
                    let phone = author
                        .phone_number
                        .as_ref()
                        .map_or_else(|| "-".to_owned(), ToString::to_string);
                    println!(
                        "{author}\n  Téléphone: {phone}\n  Créé: {}\n  Modifié: {}",
                        author.created_at, author.updated_at
                    );
                }
            }

            Choice::ListPosts => {
                for post in self.service.list_posts() {
                    println!(
                        "\n[{}] {}\nCatégorie: {}\nRésumé: {}\n\n{}\n===============",
                        post.id, post.title, post.category, post.summary, post.content
                    );
                }
            }

            Choice::DeleteAuthor => {
                if let Some(id) = self.pick_author()? {
                    if Confirm::new("Supprimer cet auteur ?").prompt()? {
                        self.service.delete_author(id)?;
                    }
                }
            }

            Choice::DeletePost => {
                if let Some(id) = self.pick_post()? {
                    if Confirm::new("Supprimer cet article ?").prompt()? {
                        self.service.delete_post(id)?;
                    }
                }
            }

            Choice::Exit => return Ok(MENU_EXIT),
        }
        Ok(MENU_LOOP)
    }
}

fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    simple_logging::log_to_file(&config.log_path, log::LevelFilter::Info)?;

    let db = Database::open(config.db_path)?;
    App::new(Service::new(db)).start()
}
