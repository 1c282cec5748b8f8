use async_trait::async_trait;
use thiserror::Error;

use sellery_core::domain::product::{Product, ProductId};
use sellery_core::domain::user::{User, UserId};

pub mod memory;
pub mod product;
pub mod user;

pub use memory::{InMemoryProductRepository, InMemoryUserRepository};
pub use product::SqlProductRepository;
pub use user::SqlUserRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;

    /// Resolve a login handle that may be either a username or an email.
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, RepositoryError>;

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, RepositoryError>;

    async fn insert(&self, user: User) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError>;

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError>;

    async fn insert(&self, product: Product) -> Result<(), RepositoryError>;

    /// Persist a modified product. Returns false when the row no longer
    /// exists.
    async fn update(&self, product: Product) -> Result<bool, RepositoryError>;

    async fn delete(&self, id: &ProductId) -> Result<bool, RepositoryError>;
}
