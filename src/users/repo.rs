use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Read view of a user with the credential column stripped. Every
/// user-facing query selects these columns only.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SafeUser {
    pub id: i32,
    pub email: String,
    pub name: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Full row including the stored password hash. Only the login path reads
/// this; it is never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

pub async fn list(db: &PgPool) -> sqlx::Result<Vec<SafeUser>> {
    sqlx::query_as::<_, SafeUser>(
        r#"
        SELECT id, email, name, created_at, updated_at
        FROM users
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn find_by_id(db: &PgPool, id: i32) -> sqlx::Result<Option<SafeUser>> {
    sqlx::query_as::<_, SafeUser>(
        r#"
        SELECT id, email, name, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password, name, created_at, updated_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await
}

pub async fn insert(
    db: &PgPool,
    email: &str,
    password_hash: &str,
    name: Option<&str>,
) -> sqlx::Result<SafeUser> {
    sqlx::query_as::<_, SafeUser>(
        r#"
        INSERT INTO users (email, password, name)
        VALUES ($1, $2, $3)
        RETURNING id, email, name, created_at, updated_at
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .fetch_one(db)
    .await
}

pub async fn update(
    db: &PgPool,
    id: i32,
    email: Option<&str>,
    name: Option<&str>,
) -> sqlx::Result<Option<SafeUser>> {
    sqlx::query_as::<_, SafeUser>(
        r#"
        UPDATE users
        SET email = COALESCE($2, email),
            name = COALESCE($3, name),
            updated_at = now()
        WHERE id = $1
        RETURNING id, email, name, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(email)
    .bind(name)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &PgPool, id: i32) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
