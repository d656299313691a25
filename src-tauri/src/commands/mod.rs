pub mod assessment;
pub mod config;
pub mod document;
pub mod health;
pub mod history;
pub mod image;
pub mod keychain;
pub mod models;
pub mod report;
pub mod session;
pub mod speech;
pub mod tutor;
