use std::sync::Arc;

use chrono_tz::Tz;
use metrics::counter;
use thiserror::Error;
use tracing::info;

use crate::application::repos::{
    CreatePostParams, PostsRepo, PostsWriteRepo, RepoError, UpdatePostParams,
};
use crate::domain::entities::BlogPost;
use crate::domain::error::DomainError;
use crate::domain::posts::{current_post_date, ensure_non_empty};

pub const POSTS_CREATED_METRIC: &str = "cleanblog_posts_created_total";
pub const POSTS_UPDATED_METRIC: &str = "cleanblog_posts_updated_total";
pub const POSTS_DELETED_METRIC: &str = "cleanblog_posts_deleted_total";

#[derive(Debug, Error)]
pub enum PostServiceError {
    #[error("post `{0}` not found")]
    NotFound(i64),
    #[error("a post titled `{0}` already exists")]
    DuplicateTitle(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Field values of a post as submitted by an author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub img_url: String,
    pub body: String,
}

impl PostContent {
    fn ensure_complete(&self) -> Result<(), DomainError> {
        ensure_non_empty(&self.title, "title")?;
        ensure_non_empty(&self.subtitle, "subtitle")?;
        ensure_non_empty(&self.author, "author")?;
        ensure_non_empty(&self.img_url, "img_url")?;
        ensure_non_empty(&self.body, "body")?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PostService {
    reader: Arc<dyn PostsRepo>,
    writer: Arc<dyn PostsWriteRepo>,
    timezone: Tz,
}

impl PostService {
    pub fn new(reader: Arc<dyn PostsRepo>, writer: Arc<dyn PostsWriteRepo>, timezone: Tz) -> Self {
        Self {
            reader,
            writer,
            timezone,
        }
    }

    pub async fn list_posts(&self) -> Result<Vec<BlogPost>, PostServiceError> {
        Ok(self.reader.list_posts().await?)
    }

    pub async fn load_post(&self, id: i64) -> Result<Option<BlogPost>, PostServiceError> {
        Ok(self.reader.find_post(id).await?)
    }

    pub async fn count_posts(&self) -> Result<u64, PostServiceError> {
        Ok(self.reader.count_posts().await?)
    }

    /// Persist a new post dated today in the site timezone.
    pub async fn create_post(&self, content: PostContent) -> Result<BlogPost, PostServiceError> {
        content.ensure_complete()?;
        let date = current_post_date(self.timezone)?;

        let params = CreatePostParams {
            title: content.title,
            subtitle: content.subtitle,
            date,
            body: content.body,
            author: content.author,
            img_url: content.img_url,
        };
        let title = params.title.clone();

        let post = self
            .writer
            .create_post(params)
            .await
            .map_err(|err| duplicate_title(err, title))?;

        counter!(POSTS_CREATED_METRIC).increment(1);
        info!(
            target = "cleanblog::posts",
            post_id = post.id,
            title = %post.title,
            "post created"
        );
        Ok(post)
    }

    /// Replace every mutable field; `id` and `date` stay as stored.
    pub async fn update_post(
        &self,
        id: i64,
        content: PostContent,
    ) -> Result<BlogPost, PostServiceError> {
        content.ensure_complete()?;

        let params = UpdatePostParams {
            id,
            title: content.title,
            subtitle: content.subtitle,
            body: content.body,
            author: content.author,
            img_url: content.img_url,
        };
        let title = params.title.clone();

        let post = self
            .writer
            .update_post(params)
            .await
            .map_err(|err| match err {
                RepoError::NotFound => PostServiceError::NotFound(id),
                other => duplicate_title(other, title),
            })?;

        counter!(POSTS_UPDATED_METRIC).increment(1);
        info!(
            target = "cleanblog::posts",
            post_id = post.id,
            title = %post.title,
            "post updated"
        );
        Ok(post)
    }

    pub async fn delete_post(&self, id: i64) -> Result<(), PostServiceError> {
        self.writer.delete_post(id).await.map_err(|err| match err {
            RepoError::NotFound => PostServiceError::NotFound(id),
            other => PostServiceError::Repo(other),
        })?;

        counter!(POSTS_DELETED_METRIC).increment(1);
        info!(target = "cleanblog::posts", post_id = id, "post deleted");
        Ok(())
    }
}

fn duplicate_title(err: RepoError, title: String) -> PostServiceError {
    match err {
        RepoError::Duplicate { .. } => PostServiceError::DuplicateTitle(title),
        other => PostServiceError::Repo(other),
    }
}
