pub mod auth;
pub mod config;
pub mod domain;
pub mod errors;

pub use auth::passwords::{hash_password, verify_password};
pub use auth::tokens::{SessionToken, TokenClaims, TokenError, TokenSigner};
pub use domain::product::{NewProduct, Product, ProductId, ProductPatch};
pub use domain::user::{User, UserId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
