// Projects and their funding-opportunity links
pub mod actions;
pub mod authz;
pub mod models;

pub use actions::*;
pub use authz::*;
pub use models::*;
