pub mod config;
pub mod consts;
pub mod db;
pub mod models;
pub mod services;
pub mod utils;
pub mod validators;
