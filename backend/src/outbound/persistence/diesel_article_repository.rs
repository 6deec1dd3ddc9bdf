//! PostgreSQL-backed `ArticleRepository` implementation using Diesel ORM.
//!
//! Updates and view counting are single `UPDATE ... RETURNING` statements so
//! concurrent requests never lose an increment or observe a half-applied
//! merge.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{ArticleRepository, ArticleRepositoryError};
use crate::domain::{Article, ArticleChanges, Category};

use super::diesel_helpers::{from_db_count, map_diesel_error, map_pool_error, to_db_count};
use super::models::{ArticleRow, ArticleUpdate, NewArticleRow};
use super::pool::{DbPool, PoolError};
use super::schema::articles;

#[derive(Clone)]
pub struct DieselArticleRepository {
    pool: DbPool,
}

impl DieselArticleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ArticleRepositoryError {
    map_pool_error(error, |message| ArticleRepositoryError::connection(message))
}

fn diesel_error(error: diesel::result::Error) -> ArticleRepositoryError {
    map_diesel_error(
        error,
        |message| ArticleRepositoryError::query(message),
        |message| ArticleRepositoryError::connection(message),
    )
}

fn row_to_article(row: ArticleRow) -> Result<Article, ArticleRepositoryError> {
    let category = row.category.parse::<Category>().map_err(|err| {
        warn!(article_id = %row.id, value = %row.category, "unrecognised stored category");
        ArticleRepositoryError::query(err.to_string())
    })?;
    Ok(Article {
        id: row.id,
        title: row.title,
        content: row.content,
        excerpt: row.excerpt,
        category,
        tags: row.tags,
        published: row.published,
        featured: row.featured,
        image_url: row.image_url,
        published_at: row.published_at,
        created_at: row.created_at,
        updated_at: row.updated_at,
        read_time: from_db_count(row.read_time),
        views: from_db_count(row.views),
        author: row.author,
    })
}

fn rows_to_articles(rows: Vec<ArticleRow>) -> Result<Vec<Article>, ArticleRepositoryError> {
    rows.into_iter().map(row_to_article).collect()
}

fn to_db_minutes(minutes: u32) -> i32 {
    i32::try_from(minutes).unwrap_or(i32::MAX)
}

fn changeset(changes: &ArticleChanges) -> ArticleUpdate<'_> {
    ArticleUpdate {
        title: changes.title.as_deref(),
        content: changes.content.as_deref(),
        excerpt: changes.excerpt.as_deref(),
        category: changes.category.map(Category::as_str),
        tags: changes.tags.as_deref(),
        published: changes.published,
        featured: changes.featured,
        image_url: changes.image_url.as_ref().map(Option::as_deref),
        published_at: changes.published_at,
        read_time: changes.read_time.map(to_db_minutes),
        author: changes.author.as_deref(),
        updated_at: changes.updated_at,
    }
}

#[async_trait]
impl ArticleRepository for DieselArticleRepository {
    async fn list_published(&self) -> Result<Vec<Article>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = articles::table
            .filter(articles::published.eq(true))
            .order((
                articles::published_at.desc().nulls_last(),
                articles::created_at.desc(),
            ))
            .select(ArticleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows_to_articles(rows)
    }

    async fn list_all(&self) -> Result<Vec<Article>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = articles::table
            .order(articles::created_at.desc())
            .select(ArticleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows_to_articles(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        articles::table
            .find(id)
            .select(ArticleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_article)
            .transpose()
    }

    async fn record_view(&self, id: Uuid) -> Result<Option<Article>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::update(
            articles::table
                .filter(articles::id.eq(id))
                .filter(articles::published.eq(true)),
        )
        .set(articles::views.eq(articles::views + 1_i64))
        .returning(ArticleRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(diesel_error)?
        .map(row_to_article)
        .transpose()
    }

    async fn insert(&self, article: &Article) -> Result<(), ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewArticleRow {
            id: article.id,
            title: &article.title,
            content: &article.content,
            excerpt: &article.excerpt,
            category: article.category.as_str(),
            tags: &article.tags,
            published: article.published,
            featured: article.featured,
            image_url: article.image_url.as_deref(),
            published_at: article.published_at,
            created_at: article.created_at,
            updated_at: article.updated_at,
            read_time: to_db_minutes(article.read_time),
            views: to_db_count(article.views),
            author: &article.author,
        };
        diesel::insert_into(articles::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &ArticleChanges,
    ) -> Result<Option<Article>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::update(articles::table.find(id))
            .set(&changeset(changes))
            .returning(ArticleRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_article)
            .transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(articles::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }
}
