use bcrypt::{hash, verify};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::errors::{AppError, Result};

#[cfg(not(test))]
const HASH_COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
const HASH_COST: u32 = 4;

#[derive(sqlx::FromRow, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String, // bcrypt hash
}

impl User {
    /// Hashes the password and stores a new user.
    pub async fn signup(pool: &SqlitePool, username: &str, password: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::Validation("Username is required".to_string()));
        }
        if password.is_empty() {
            return Err(AppError::Validation("Password is required".to_string()));
        }

        let hashed_password = hash(password, HASH_COST)?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password)
            VALUES (?, ?)
            "#,
        )
        .bind(username)
        .bind(&hashed_password)
        .execute(pool)
        .await
        .map_err(|e| AppError::from_constraint(e, "Username already taken"))?;

        log::info!("new user {} signed up", username);

        Ok(User {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            password: hashed_password,
        })
    }

    /// Returns the user when the credentials match, `None` otherwise.
    pub async fn authenticate(
        pool: &SqlitePool,
        username: &str,
        password: &str,
    ) -> Result<Option<User>> {
        if username.is_empty() || password.is_empty() {
            return Ok(None);
        }

        let user = match Self::find_by_username(pool, username).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        let is_password_correct = verify(password, &user.password).unwrap_or(false);
        Ok(is_password_correct.then_some(user))
    }

    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, username, password FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }

    /// Changes the username and optionally the password once the current password checks out.
    pub async fn update_profile(
        pool: &SqlitePool,
        id: i64,
        current_password: &str,
        new_username: &str,
        new_password: Option<&str>,
    ) -> Result<User> {
        let user = Self::find(pool, id).await?.ok_or(AppError::NotFound("User"))?;

        if !verify(current_password, &user.password).unwrap_or(false) {
            return Err(AppError::Unauthorized);
        }

        let new_username = new_username.trim();
        if new_username.is_empty() {
            return Err(AppError::Validation("Username is required".to_string()));
        }

        let hashed_password = match new_password.filter(|p| !p.is_empty()) {
            Some(password) => hash(password, HASH_COST)?,
            None => user.password,
        };

        sqlx::query(
            r#"
            UPDATE users
            SET username = ?, password = ?
            WHERE id = ?
            "#,
        )
        .bind(new_username)
        .bind(&hashed_password)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| AppError::from_constraint(e, "Username already taken"))?;

        Ok(User {
            id,
            username: new_username.to_string(),
            password: hashed_password,
        })
    }

    /// Deletes the user; melodies and favorites go with it.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User"));
        }
        log::info!("deleted user {}", id);
        Ok(())
    }
}
