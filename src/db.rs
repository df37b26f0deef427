use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::{debug, error, info};

use crate::models::song::Song;

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("song {0} not found")]
    NotFound(i64),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Storage for the `songs` table.
///
/// `update_song` and `delete_song` do not check that a row exists: touching
/// an unknown id affects nothing and still returns `Ok`.
#[async_trait]
pub trait SongRepository: Send + Sync {
    async fn get_songs(&self) -> Result<Vec<Song>, RepoError>;
    async fn get_song(&self, song_id: i64) -> Result<Song, RepoError>;
    /// Returns the id assigned by storage.
    async fn insert_song(&self, song: &Song) -> Result<i64, RepoError>;
    async fn update_song(&self, song_id: i64, song: &Song) -> Result<(), RepoError>;
    async fn delete_song(&self, song_id: i64) -> Result<(), RepoError>;
}

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SongRepository for Database {
    async fn get_songs(&self) -> Result<Vec<Song>, RepoError> {
        debug!("Getting all songs from the database");
        let songs = sqlx::query_as::<_, Song>(
            r#"SELECT id, "group", song, release_date, text, link FROM songs"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Error querying songs: {}", e);
            e
        })?;

        info!("Retrieved {} songs from the database", songs.len());
        Ok(songs)
    }

    async fn get_song(&self, song_id: i64) -> Result<Song, RepoError> {
        let song = sqlx::query_as::<_, Song>(
            r#"SELECT id, "group", song, release_date, text, link FROM songs WHERE id = $1"#,
        )
        .bind(song_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Error querying song {}: {}", song_id, e);
            e
        })?;

        match song {
            Some(song) => {
                debug!("Retrieved song {}", song_id);
                Ok(song)
            }
            None => Err(RepoError::NotFound(song_id)),
        }
    }

    async fn insert_song(&self, song: &Song) -> Result<i64, RepoError> {
        debug!("Inserting song: {:?}", song);
        let (id,): (i64,) = sqlx::query_as(
            r#"INSERT INTO songs ("group", song, release_date, text, link)
               VALUES ($1, $2, $3, $4, $5) RETURNING id"#,
        )
        .bind(&song.group)
        .bind(&song.song)
        .bind(&song.release_date)
        .bind(&song.text)
        .bind(&song.link)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Error inserting song {:?}: {}", song, e);
            e
        })?;

        info!("Inserted song with id {}", id);
        Ok(id)
    }

    async fn update_song(&self, song_id: i64, song: &Song) -> Result<(), RepoError> {
        debug!("Updating song {}: {:?}", song_id, song);
        let result = sqlx::query(
            r#"UPDATE songs SET "group" = $1, song = $2, release_date = $3, text = $4, link = $5
               WHERE id = $6"#,
        )
        .bind(&song.group)
        .bind(&song.song)
        .bind(&song.release_date)
        .bind(&song.text)
        .bind(&song.link)
        .bind(song_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Error updating song {}: {}", song_id, e);
            e
        })?;

        info!("Updated song {} ({} rows)", song_id, result.rows_affected());
        Ok(())
    }

    async fn delete_song(&self, song_id: i64) -> Result<(), RepoError> {
        debug!("Deleting song {}", song_id);
        let result = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(song_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Error deleting song {}: {}", song_id, e);
                e
            })?;

        info!("Deleted song {} ({} rows)", song_id, result.rows_affected());
        Ok(())
    }
}
