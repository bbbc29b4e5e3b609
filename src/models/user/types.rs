use sqlx::FromRow;

/// An existing account.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub name: String,
    pub country: String,
    pub is_active: bool,
    pub created_at: String,
}

/// New account data for creation.
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub name: String,
    pub country: String,
}
