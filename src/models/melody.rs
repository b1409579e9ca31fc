use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::errors::{AppError, Result};

pub const DEFAULT_MELODY_NAME: &str = "Unnamed";
pub const DEFAULT_INSTRUMENT: &str = "piano";

#[derive(sqlx::FromRow, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Melody {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub timestamp: String,
    pub music_notes: String,
    pub visibility: bool,
    pub instrument: String,
}

/// A melody joined with its author's username.
#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
pub struct SharedMelody {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub melody: Melody,
    pub username: String,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct NewMelody {
    pub user_id: Option<i64>,
    pub name: Option<String>,
    pub timestamp: Option<String>,
    pub music_notes: Option<String>,
    pub visibility: Option<bool>,
}

impl Melody {
    pub async fn create(pool: &SqlitePool, new_melody: NewMelody) -> Result<Melody> {
        let user_id = new_melody
            .user_id
            .ok_or_else(|| AppError::Validation("Melody needs an owner".to_string()))?;
        let timestamp = new_melody
            .timestamp
            .ok_or_else(|| AppError::Validation("Melody needs a timestamp".to_string()))?;
        let music_notes = new_melody
            .music_notes
            .ok_or_else(|| AppError::Validation("Melody needs music notes".to_string()))?;
        let name = new_melody
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MELODY_NAME.to_string());
        let visibility = new_melody.visibility.unwrap_or(false);

        let result = sqlx::query(
            r#"
            INSERT INTO melodies (user_id, name, timestamp, music_notes, visibility, instrument)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(&name)
        .bind(&timestamp)
        .bind(&music_notes)
        .bind(visibility)
        .bind(DEFAULT_INSTRUMENT)
        .execute(pool)
        .await
        .map_err(|e| AppError::from_constraint(e, format!("User {} does not exist", user_id)))?;

        Ok(Melody {
            id: result.last_insert_rowid(),
            user_id,
            name,
            timestamp,
            music_notes,
            visibility,
            instrument: DEFAULT_INSTRUMENT.to_string(),
        })
    }

    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Melody>> {
        let melody = sqlx::query_as::<_, Melody>("SELECT * FROM melodies WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(melody)
    }

    /// Looks up the melody and checks that `requester_id` owns it.
    async fn find_owned(pool: &SqlitePool, id: i64, requester_id: i64) -> Result<Melody> {
        let melody = Self::find(pool, id).await?.ok_or(AppError::NotFound("Melody"))?;
        if melody.user_id != requester_id {
            log::warn!("user {} tried to modify melody {} owned by {}", requester_id, id, melody.user_id);
            return Err(AppError::Unauthorized);
        }
        Ok(melody)
    }

    pub async fn delete(pool: &SqlitePool, id: i64, requester_id: i64) -> Result<()> {
        Self::find_owned(pool, id, requester_id).await?;

        sqlx::query("DELETE FROM melodies WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(requester_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn toggle_visibility(pool: &SqlitePool, id: i64, requester_id: i64) -> Result<Melody> {
        let mut melody = Self::find_owned(pool, id, requester_id).await?;
        melody.visibility = !melody.visibility;

        sqlx::query("UPDATE melodies SET visibility = ? WHERE id = ? AND user_id = ?")
            .bind(melody.visibility)
            .bind(id)
            .bind(requester_id)
            .execute(pool)
            .await?;
        Ok(melody)
    }

    /// Visible melodies of every user, newest first.
    pub async fn public_feed(pool: &SqlitePool) -> Result<Vec<SharedMelody>> {
        let melodies = sqlx::query_as::<_, SharedMelody>(
            r#"
            SELECT melodies.*, users.username
            FROM melodies
            JOIN users ON users.id = melodies.user_id
            WHERE melodies.visibility = 1
            ORDER BY melodies.id DESC
            "#,
        )
        .fetch_all(pool)
        .await?;
        Ok(melodies)
    }

    /// All of a user's melodies, hidden ones included.
    pub async fn for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Melody>> {
        let melodies = sqlx::query_as::<_, Melody>("SELECT * FROM melodies WHERE user_id = ? ORDER BY id")
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        Ok(melodies)
    }
}
