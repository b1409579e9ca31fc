use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::errors::{AppError, Result};

pub const NOT_AVAILABLE: &str = "Not Available";
pub const DEFAULT_TRACK_PHOTO: &str = "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcQcnVvH2T5J45c9Bp3zm4R7ZwLmBBwFCTbo3w&usqp=CAU";

#[derive(sqlx::FromRow, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct FavoritedTrack {
    pub id: i64,
    pub track_name: String,
    pub artist_name: String,
    pub album_name: String,
    pub track_photo: String,
    pub spotify_track_id: String,
}

/// Track metadata as submitted; every field but the spotify id falls back to a default.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct NewFavoritedTrack {
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub album_name: Option<String>,
    pub track_photo: Option<String>,
    pub spotify_track_id: Option<String>,
}

impl NewFavoritedTrack {
    pub fn new(spotify_track_id: &str) -> NewFavoritedTrack {
        NewFavoritedTrack {
            spotify_track_id: Some(spotify_track_id.to_string()),
            ..Default::default()
        }
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn required_spotify_id(new_track: &NewFavoritedTrack) -> Result<String> {
    new_track
        .spotify_track_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Validation("Spotify track id is required".to_string()))
}

/// Makes `%`, `_` and `\` match literally in a `LIKE ... ESCAPE '\'` pattern.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl FavoritedTrack {
    pub async fn create(pool: &SqlitePool, new_track: NewFavoritedTrack) -> Result<FavoritedTrack> {
        let spotify_track_id = required_spotify_id(&new_track)?;
        let track_name = or_default(new_track.track_name, NOT_AVAILABLE);
        let artist_name = or_default(new_track.artist_name, NOT_AVAILABLE);
        let album_name = or_default(new_track.album_name, NOT_AVAILABLE);
        let track_photo = or_default(new_track.track_photo, DEFAULT_TRACK_PHOTO);

        let result = sqlx::query(
            r#"
            INSERT INTO favorited_tracks (track_name, artist_name, album_name, track_photo, spotify_track_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&track_name)
        .bind(&artist_name)
        .bind(&album_name)
        .bind(&track_photo)
        .bind(&spotify_track_id)
        .execute(pool)
        .await
        .map_err(|e| {
            AppError::from_constraint(e, format!("Track {} is already saved", spotify_track_id))
        })?;

        Ok(FavoritedTrack {
            id: result.last_insert_rowid(),
            track_name,
            artist_name,
            album_name,
            track_photo,
            spotify_track_id,
        })
    }

    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<FavoritedTrack>> {
        let track = sqlx::query_as::<_, FavoritedTrack>("SELECT * FROM favorited_tracks WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(track)
    }

    pub async fn find_by_spotify_id(
        pool: &SqlitePool,
        spotify_track_id: &str,
    ) -> Result<Option<FavoritedTrack>> {
        let track = sqlx::query_as::<_, FavoritedTrack>(
            "SELECT * FROM favorited_tracks WHERE spotify_track_id = ?",
        )
        .bind(spotify_track_id)
        .fetch_optional(pool)
        .await?;
        Ok(track)
    }

    /// Returns the stored track for this spotify id, creating it on first sight.
    ///
    /// A concurrent insert of the same id wins; its row is returned unchanged.
    pub async fn find_or_create(
        pool: &SqlitePool,
        new_track: NewFavoritedTrack,
    ) -> Result<FavoritedTrack> {
        let spotify_track_id = required_spotify_id(&new_track)?;

        sqlx::query(
            r#"
            INSERT INTO favorited_tracks (track_name, artist_name, album_name, track_photo, spotify_track_id)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (spotify_track_id) DO NOTHING
            "#,
        )
        .bind(or_default(new_track.track_name, NOT_AVAILABLE))
        .bind(or_default(new_track.artist_name, NOT_AVAILABLE))
        .bind(or_default(new_track.album_name, NOT_AVAILABLE))
        .bind(or_default(new_track.track_photo, DEFAULT_TRACK_PHOTO))
        .bind(&spotify_track_id)
        .execute(pool)
        .await?;

        Self::find_by_spotify_id(pool, &spotify_track_id)
            .await?
            .ok_or(AppError::NotFound("Track"))
    }

    /// Case-insensitive substring search over the cached track metadata.
    pub async fn search(pool: &SqlitePool, query: &str) -> Result<Vec<FavoritedTrack>> {
        let pattern = format!("%{}%", escape_like(&query.trim().to_lowercase()));
        let tracks = sqlx::query_as::<_, FavoritedTrack>(
            r#"
            SELECT * FROM favorited_tracks
            WHERE lower(track_name) LIKE ?1 ESCAPE '\'
               OR lower(artist_name) LIKE ?1 ESCAPE '\'
               OR lower(album_name) LIKE ?1 ESCAPE '\'
            ORDER BY track_name, id
            "#,
        )
        .bind(pattern)
        .fetch_all(pool)
        .await?;
        Ok(tracks)
    }

    /// Removes the track; every user's favorite of it goes with it.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM favorited_tracks WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Track"));
        }
        Ok(())
    }
}
