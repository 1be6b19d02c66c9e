//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::BlogPost;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub body: String,
    pub author: String,
    pub img_url: String,
}

/// Every mutable column; `date` is deliberately absent.
#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub author: String,
    pub img_url: String,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// All posts in insertion order.
    async fn list_posts(&self) -> Result<Vec<BlogPost>, RepoError>;

    async fn find_post(&self, id: i64) -> Result<Option<BlogPost>, RepoError>;

    async fn count_posts(&self) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, params: CreatePostParams) -> Result<BlogPost, RepoError>;

    async fn update_post(&self, params: UpdatePostParams) -> Result<BlogPost, RepoError>;

    async fn delete_post(&self, id: i64) -> Result<(), RepoError>;
}
