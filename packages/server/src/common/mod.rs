// Shared API plumbing
pub mod error;
pub mod response;
pub mod validate;

pub use error::*;
pub use response::*;
pub use validate::*;
