//! Auth-domain scope lists and token models.

pub mod scope;
pub mod secret;
pub mod token;

pub use scope::*;
pub use secret::*;
pub use token::*;
