pub mod login;
pub mod me;
pub mod reset;
pub mod signup;

pub use login::*;
pub use me::*;
pub use reset::*;
pub use signup::*;
