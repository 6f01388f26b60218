// Identity: credentials, sessions, and the signup saga
pub mod actions;
pub mod jwt;
pub mod models;
pub mod password;

pub use actions::*;
pub use jwt::{Claims, InvalidToken, JwtService};
pub use models::*;
