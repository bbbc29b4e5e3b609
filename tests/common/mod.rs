//! Shared test infrastructure.
//!
//! - `MemoryStore` - in-process account and course store for validator and
//!   generator tests
//! - `setup_test_db()` - Postgres pool from `TEST_DATABASE_URL`, or `None`
//!   when the variable is unset
#![allow(dead_code)]

use std::sync::Mutex;

use sqlx::PgPool;

use learnhub::generator::CourseStore;
use learnhub::models::course::{CourseKey, NewCourse};
use learnhub::registration::AccountLookup;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const EXISTING_USERNAME: &str = "user";
pub const EXISTING_EMAIL: &str = "user@email.com";
pub const FALLBACK_USER: &str = "edx@example.com";

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

#[derive(Debug, Clone)]
pub struct StoredUser {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<StoredUser>>,
    courses: Mutex<Vec<(i64, NewCourse)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with `user`/`user@email.com` and the generator's fallback account.
    pub fn with_default_accounts() -> Self {
        let store = Self::new();
        store.add_user(EXISTING_USERNAME, EXISTING_EMAIL);
        store.add_user("edx", FALLBACK_USER);
        store
    }

    pub fn add_user(&self, username: &str, email: &str) -> i64 {
        let mut users = self.users.lock().unwrap();
        let id = users.len() as i64 + 1;
        users.push(StoredUser {
            id,
            username: username.to_string(),
            email: email.to_string(),
        });
        id
    }

    pub fn user_id(&self, username: &str) -> Option<i64> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.id)
    }

    pub fn courses(&self) -> Vec<(i64, NewCourse)> {
        self.courses.lock().unwrap().clone()
    }

    pub fn course(&self, key: &CourseKey) -> Option<NewCourse> {
        self.courses
            .lock()
            .unwrap()
            .iter()
            .find(|(_, c)| &c.key == key)
            .map(|(_, c)| c.clone())
    }
}

impl AccountLookup for MemoryStore {
    async fn existing_username(&self, username: &str) -> Result<Option<String>, sqlx::Error> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.username.clone()))
    }

    async fn existing_email(&self, email: &str) -> Result<Option<String>, sqlx::Error> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .map(|u| u.email.clone()))
    }
}

impl CourseStore for MemoryStore {
    async fn resolve_owner(&self, identifier: &str) -> Result<Option<i64>, sqlx::Error> {
        let users = self.users.lock().unwrap();
        let found = if identifier.contains('@') {
            users.iter().find(|u| u.email.eq_ignore_ascii_case(identifier))
        } else {
            users.iter().find(|u| u.username == identifier)
        };
        Ok(found.map(|u| u.id))
    }

    async fn course_exists(&self, key: &CourseKey) -> Result<bool, sqlx::Error> {
        Ok(self.courses.lock().unwrap().iter().any(|(_, c)| &c.key == key))
    }

    async fn create_course(&self, new: &NewCourse) -> Result<i64, sqlx::Error> {
        let mut courses = self.courses.lock().unwrap();
        let id = courses.len() as i64 + 1;
        courses.push((id, new.clone()));
        Ok(id)
    }
}

// ============================================================================
// DATABASE SETUP
// ============================================================================

/// Connect to `TEST_DATABASE_URL`, run migrations and clear both tables.
///
/// Returns `None` when the variable is unset so Postgres-backed tests can be
/// skipped on machines without a database.
pub async fn setup_test_db() -> Option<PgPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = learnhub::db::init_pool(&url, 2)
        .await
        .expect("Failed to connect to TEST_DATABASE_URL");
    learnhub::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    sqlx::query("TRUNCATE courses, users RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await
        .expect("Failed to reset tables");
    Some(pool)
}
