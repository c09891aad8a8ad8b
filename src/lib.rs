pub mod api;
pub mod casting;
pub mod config;
pub mod db;
pub mod interpretation;
pub mod models;
pub mod oracle;
pub mod presentation;
pub mod reading;
pub mod terminal;
