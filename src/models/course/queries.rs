use sqlx::PgPool;
use sqlx::types::Json;

use super::types::{Course, CourseKey, NewCourse};

const SELECT_COURSE: &str = "\
    SELECT id, organization, number, run, owner_id, fields, schema_version, \
           created_at::TEXT AS created_at \
    FROM courses";

pub async fn find_by_key(pool: &PgPool, key: &CourseKey) -> Result<Option<Course>, sqlx::Error> {
    let sql = format!("{SELECT_COURSE} WHERE organization = $1 AND number = $2 AND run = $3");
    sqlx::query_as::<_, Course>(&sql)
        .bind(&key.organization)
        .bind(&key.number)
        .bind(&key.run)
        .fetch_optional(pool)
        .await
}

pub async fn exists(pool: &PgPool, key: &CourseKey) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM courses WHERE organization = $1 AND number = $2 AND run = $3)",
    )
    .bind(&key.organization)
    .bind(&key.number)
    .bind(&key.run)
    .fetch_one(pool)
    .await
}

pub async fn create(pool: &PgPool, new: &NewCourse) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO courses (organization, number, run, owner_id, fields, schema_version) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(&new.key.organization)
    .bind(&new.key.number)
    .bind(&new.key.run)
    .bind(new.owner_id)
    .bind(Json(&new.fields))
    .bind(new.schema_version)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn list_by_owner(pool: &PgPool, owner_id: i64) -> Result<Vec<Course>, sqlx::Error> {
    let sql = format!("{SELECT_COURSE} WHERE owner_id = $1 ORDER BY id");
    sqlx::query_as::<_, Course>(&sql)
        .bind(owner_id)
        .fetch_all(pool)
        .await
}
