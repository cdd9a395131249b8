//! PostgreSQL-backed `JokeRepository` implementation using Diesel ORM.
//!
//! Every ordered read sorts by `(created_at DESC, id DESC)`, matching the
//! `jokes_recency_idx` index.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{JokeRepository, JokeRepositoryError};
use crate::domain::{Joke, JokeId, JokeSummary, NewJoke, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{JokeRow, JokeSummaryRow, NewJokeRow};
use super::pool::{DbPool, PoolError};
use super::schema::jokes;

/// Diesel-backed implementation of the joke repository port.
#[derive(Clone)]
pub struct DieselJokeRepository {
    pool: DbPool,
}

impl DieselJokeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> JokeRepositoryError {
    map_basic_pool_error(error, JokeRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> JokeRepositoryError {
    map_basic_diesel_error(
        error,
        JokeRepositoryError::query,
        JokeRepositoryError::connection,
    )
}

fn row_to_joke(row: JokeRow) -> Joke {
    Joke {
        id: JokeId::from_uuid(row.id),
        owner_id: UserId::from_uuid(row.owner_id),
        name: row.name,
        content: row.content,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn row_to_summary(row: JokeSummaryRow) -> JokeSummary {
    JokeSummary {
        id: JokeId::from_uuid(row.id),
        name: row.name,
    }
}

#[async_trait]
impl JokeRepository for DieselJokeRepository {
    async fn list_recent(&self, limit: usize) -> Result<Vec<JokeSummary>, JokeRepositoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<JokeSummaryRow> = jokes::table
            .order((jokes::created_at.desc(), jokes::id.desc()))
            .limit(limit)
            .select(JokeSummaryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_summary).collect())
    }

    async fn count(&self) -> Result<u64, JokeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = jokes::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        u64::try_from(count).map_err(|err| JokeRepositoryError::query(err.to_string()))
    }

    async fn find_at_offset(&self, offset: u64) -> Result<Option<Joke>, JokeRepositoryError> {
        let Ok(offset) = i64::try_from(offset) else {
            return Ok(None);
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = jokes::table
            .order((jokes::created_at.desc(), jokes::id.desc()))
            .offset(offset)
            .select(JokeRow::as_select())
            .first::<JokeRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_joke))
    }

    async fn find_by_id(&self, id: &JokeId) -> Result<Option<Joke>, JokeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = jokes::table
            .filter(jokes::id.eq(id.as_uuid()))
            .select(JokeRow::as_select())
            .first::<JokeRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_joke))
    }

    async fn create(&self, joke: &NewJoke) -> Result<Joke, JokeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewJokeRow {
            id: Uuid::new_v4(),
            owner_id: *joke.owner_id.as_uuid(),
            name: joke.draft.name(),
            content: joke.draft.content(),
        };
        let row = diesel::insert_into(jokes::table)
            .values(&new_row)
            .returning(JokeRow::as_returning())
            .get_result::<JokeRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row_to_joke(row))
    }

    async fn delete(&self, id: &JokeId) -> Result<bool, JokeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(jokes::table.filter(jokes::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
