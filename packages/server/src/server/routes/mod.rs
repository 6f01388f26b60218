// HTTP routes
pub mod auth;
pub mod categories;
pub mod health;
pub mod organisations;
pub mod projects;
pub mod proxy;
