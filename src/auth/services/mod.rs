//! Token issuing and verification service.

mod token;

pub use token::TokenService;
