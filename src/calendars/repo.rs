use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "calendar_provider", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum CalendarProvider {
    Google,
    Outlook,
}

/// Calendar row joined with the owning user's safe columns.
#[derive(Debug, Clone, FromRow)]
pub struct CalendarWithOwner {
    pub id: Uuid,
    pub user_id: i32,
    pub provider: CalendarProvider,
    pub email: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_expiry: Option<OffsetDateTime>,
    pub timezone: Option<String>,
    pub connected_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
    pub owner_email: String,
    pub owner_name: Option<String>,
}

const WITH_OWNER: &str = r#"
    SELECT c.id, c.user_id, c.provider, c.email, c.access_token, c.refresh_token,
           c.token_expiry, c.timezone, c.connected_at, c.created_at,
           u.email AS owner_email, u.name AS owner_name
    FROM calendars c
    JOIN users u ON u.id = c.user_id
"#;

#[derive(Debug)]
pub struct NewCalendar {
    pub user_id: i32,
    pub provider: CalendarProvider,
    pub email: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_expiry: Option<OffsetDateTime>,
    pub timezone: Option<String>,
}

#[derive(Debug)]
pub struct CalendarChanges {
    pub provider: Option<CalendarProvider>,
    pub email: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_expiry: Option<OffsetDateTime>,
    pub timezone: Option<String>,
}

pub async fn list(db: &PgPool, user_id: Option<i32>) -> sqlx::Result<Vec<CalendarWithOwner>> {
    sqlx::query_as::<_, CalendarWithOwner>(&format!(
        "{WITH_OWNER} WHERE $1::int IS NULL OR c.user_id = $1 ORDER BY c.created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<CalendarWithOwner>> {
    sqlx::query_as::<_, CalendarWithOwner>(&format!("{WITH_OWNER} WHERE c.id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert(db: &PgPool, new: &NewCalendar) -> sqlx::Result<CalendarWithOwner> {
    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO calendars
            (user_id, provider, email, access_token, refresh_token,
             token_expiry, timezone, connected_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, now())
        RETURNING id
        "#,
    )
    .bind(new.user_id)
    .bind(new.provider)
    .bind(&new.email)
    .bind(&new.access_token)
    .bind(&new.refresh_token)
    .bind(new.token_expiry)
    .bind(&new.timezone)
    .fetch_one(db)
    .await?;

    find_by_id(db, id).await?.ok_or(sqlx::Error::RowNotFound)
}

pub async fn update(
    db: &PgPool,
    id: Uuid,
    changes: &CalendarChanges,
) -> sqlx::Result<Option<CalendarWithOwner>> {
    let updated: Option<Uuid> = sqlx::query_scalar(
        r#"
        UPDATE calendars
        SET provider = COALESCE($2, provider),
            email = COALESCE($3, email),
            access_token = COALESCE($4, access_token),
            refresh_token = COALESCE($5, refresh_token),
            token_expiry = COALESCE($6, token_expiry),
            timezone = COALESCE($7, timezone)
        WHERE id = $1
        RETURNING id
        "#,
    )
    .bind(id)
    .bind(changes.provider)
    .bind(&changes.email)
    .bind(&changes.access_token)
    .bind(&changes.refresh_token)
    .bind(changes.token_expiry)
    .bind(&changes.timezone)
    .fetch_optional(db)
    .await?;

    match updated {
        Some(id) => find_by_id(db, id).await,
        None => Ok(None),
    }
}

pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM calendars WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
