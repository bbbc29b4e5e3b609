use sqlx::PgPool;

use super::types::{NewUser, User};
use crate::registration::AccountLookup;

const SELECT_USER: &str = "\
    SELECT id, username, email, name, country, is_active, \
           created_at::TEXT AS created_at \
    FROM users";

/// Exact, case-sensitive match.
pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    let sql = format!("{SELECT_USER} WHERE username = $1");
    sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await
}

/// Emails are unique regardless of case.
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let sql = format!("{SELECT_USER} WHERE LOWER(email) = LOWER($1)");
    sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Resolve an account from a string that is either an email or a username.
pub async fn find_by_identifier(pool: &PgPool, identifier: &str) -> Result<Option<User>, sqlx::Error> {
    if identifier.contains('@') {
        find_by_email(pool, identifier).await
    } else {
        find_by_username(pool, identifier).await
    }
}

pub async fn create(pool: &PgPool, new: &NewUser) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO users (username, email, name, country) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(&new.username)
    .bind(&new.email)
    .bind(&new.name)
    .bind(&new.country)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users").fetch_one(pool).await
}

impl AccountLookup for PgPool {
    async fn existing_username(&self, username: &str) -> Result<Option<String>, sqlx::Error> {
        Ok(find_by_username(self, username).await?.map(|u| u.username))
    }

    async fn existing_email(&self, email: &str) -> Result<Option<String>, sqlx::Error> {
        Ok(find_by_email(self, email).await?.map(|u| u.email))
    }
}
