// Génie Public - API Core
//
// Backend-for-frontend for the public-funding dashboard: organisation
// accounts, projects, and their links to funding opportunities ("aides").
// All durable state lives in an external relational store reached through
// its generic REST interface; free-text project extraction is delegated to
// an LLM service.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
