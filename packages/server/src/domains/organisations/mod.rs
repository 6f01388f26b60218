// Organisations and memberships
pub mod create;
pub mod models;
pub mod queries;

pub use create::*;
pub use models::*;
pub use queries::*;
