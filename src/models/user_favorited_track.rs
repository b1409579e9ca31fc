use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::errors::{AppError, Result};
use crate::models::favorited_track::FavoritedTrack;

#[derive(sqlx::FromRow, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct UserFavoritedTrack {
    pub user_id: i64,
    pub track_id: i64,
}

impl UserFavoritedTrack {
    pub async fn add(pool: &SqlitePool, user_id: i64, track_id: i64) -> Result<UserFavoritedTrack> {
        sqlx::query(
            r#"
            INSERT INTO user_favorited_tracks (user_id, track_id)
            VALUES (?, ?)
            "#,
        )
        .bind(user_id)
        .bind(track_id)
        .execute(pool)
        .await
        .map_err(|e| AppError::from_constraint(e, "Track is already a favorite or does not exist"))?;

        Ok(UserFavoritedTrack { user_id, track_id })
    }

    /// Returns whether a row was removed.
    pub async fn remove(pool: &SqlitePool, user_id: i64, track_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user_favorited_tracks WHERE user_id = ? AND track_id = ?")
            .bind(user_id)
            .bind(track_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(pool: &SqlitePool, user_id: i64, track_id: i64) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_favorited_tracks WHERE user_id = ? AND track_id = ?",
        )
        .bind(user_id)
        .bind(track_id)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }

    /// Flips the favorite and returns the new state (`true` = now a favorite).
    pub async fn toggle(pool: &SqlitePool, user_id: i64, track: &FavoritedTrack) -> Result<bool> {
        let mut tx = pool.begin().await?;

        let removed = sqlx::query("DELETE FROM user_favorited_tracks WHERE user_id = ? AND track_id = ?")
            .bind(user_id)
            .bind(track.id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        if !removed {
            sqlx::query("INSERT INTO user_favorited_tracks (user_id, track_id) VALUES (?, ?)")
                .bind(user_id)
                .bind(track.id)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::from_constraint(e, "Unknown user or track"))?;
        }

        tx.commit().await?;
        Ok(!removed)
    }

    pub async fn tracks_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<FavoritedTrack>> {
        let tracks = sqlx::query_as::<_, FavoritedTrack>(
            r#"
            SELECT favorited_tracks.*
            FROM favorited_tracks
            JOIN user_favorited_tracks ON favorited_tracks.id = user_favorited_tracks.track_id
            WHERE user_favorited_tracks.user_id = ?
            ORDER BY favorited_tracks.track_name, favorited_tracks.id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(tracks)
    }

    pub async fn spotify_ids_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<String>> {
        let ids = Self::tracks_for_user(pool, user_id)
            .await?
            .into_iter()
            .map(|track| track.spotify_track_id)
            .collect();
        Ok(ids)
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_favorited_tracks")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
