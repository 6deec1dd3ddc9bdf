//! PostgreSQL-backed `PageRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PageRepository, PageRepositoryError};
use crate::domain::{Page, PageChanges, PageSlug};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{PageRow, PageUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::pages;

#[derive(Clone)]
pub struct DieselPageRepository {
    pool: DbPool,
}

impl DieselPageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> PageRepositoryError {
    map_pool_error(error, |message| PageRepositoryError::connection(message))
}

fn diesel_error(error: diesel::result::Error) -> PageRepositoryError {
    map_diesel_error(
        error,
        |message| PageRepositoryError::query(message),
        |message| PageRepositoryError::connection(message),
    )
}

fn row_to_page(row: PageRow) -> Result<Page, PageRepositoryError> {
    let slug = PageSlug::new(row.slug).map_err(|err| PageRepositoryError::query(err.to_string()))?;
    Ok(Page {
        slug,
        title: row.title,
        content: row.content,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl PageRepository for DieselPageRepository {
    async fn list(&self) -> Result<Vec<Page>, PageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<PageRow> = pages::table
            .order(pages::slug.asc())
            .select(PageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_page).collect()
    }

    async fn find_by_slug(&self, slug: &PageSlug) -> Result<Option<Page>, PageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        pages::table
            .find(slug.as_str())
            .select(PageRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_page)
            .transpose()
    }

    async fn update(
        &self,
        slug: &PageSlug,
        changes: &PageChanges,
    ) -> Result<Option<Page>, PageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let update = PageUpdate {
            title: changes.title.as_deref(),
            content: changes.content.as_deref(),
            updated_at: changes.updated_at,
        };
        diesel::update(pages::table.find(slug.as_str()))
            .set(&update)
            .returning(PageRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_page)
            .transpose()
    }
}
