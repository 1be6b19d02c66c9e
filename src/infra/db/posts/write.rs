use async_trait::async_trait;

use crate::application::repos::{CreatePostParams, PostsWriteRepo, RepoError, UpdatePostParams};
use crate::domain::entities::BlogPost;
use crate::infra::db::{SqliteRepositories, map_sqlx_error};

use super::POST_COLUMNS;
use super::types::PostRow;

#[async_trait]
impl PostsWriteRepo for SqliteRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<BlogPost, RepoError> {
        let CreatePostParams {
            title,
            subtitle,
            date,
            body,
            author,
            img_url,
        } = params;

        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            INSERT INTO blog_posts (title, subtitle, date, body, author, img_url)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(title)
        .bind(subtitle)
        .bind(date)
        .bind(body)
        .bind(author)
        .bind(img_url)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(BlogPost::from(row))
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<BlogPost, RepoError> {
        let UpdatePostParams {
            id,
            title,
            subtitle,
            body,
            author,
            img_url,
        } = params;

        // `fetch_one` turns a missing id into `RowNotFound`.
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            UPDATE blog_posts
               SET title = ?2,
                   subtitle = ?3,
                   body = ?4,
                   author = ?5,
                   img_url = ?6
             WHERE id = ?1
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(title)
        .bind(subtitle)
        .bind(body)
        .bind(author)
        .bind(img_url)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(BlogPost::from(row))
    }

    async fn delete_post(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM blog_posts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
