//! Définition des constantes globales pour l'application.

pub const DB_PATH: &str = "./scribe.json"; // Chemin par défaut de la base de données.
pub const LOG_PATH: &str = "./scribe.log"; // Chemin par défaut du fichier de log.

pub const DB_PATH_VAR: &str = "SCRIBE_DB_PATH";
pub const LOG_PATH_VAR: &str = "SCRIBE_LOG_PATH";
