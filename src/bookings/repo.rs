use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Booking row without the owner attached; used for per-user listings.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub user_id: i32,
    pub service_id: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Booking row joined with the owning user's safe columns.
#[derive(Debug, Clone, FromRow)]
pub struct BookingWithOwner {
    pub id: i32,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub user_id: i32,
    pub service_id: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub owner_email: String,
    pub owner_name: Option<String>,
}

const WITH_OWNER: &str = r#"
    SELECT b.id, b.start_time, b.end_time, b.status, b.notes,
           b.user_id, b.service_id, b.created_at, b.updated_at,
           u.email AS owner_email, u.name AS owner_name
    FROM bookings b
    JOIN users u ON u.id = b.user_id
"#;

#[derive(Debug)]
pub struct NewBooking {
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub user_id: i32,
    pub service_id: i32,
}

#[derive(Debug)]
pub struct BookingChanges {
    pub start_time: Option<OffsetDateTime>,
    pub end_time: Option<OffsetDateTime>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub service_id: Option<i32>,
}

pub async fn list(db: &PgPool) -> sqlx::Result<Vec<BookingWithOwner>> {
    sqlx::query_as::<_, BookingWithOwner>(&format!("{WITH_OWNER} ORDER BY b.id"))
        .fetch_all(db)
        .await
}

pub async fn find_by_id(db: &PgPool, id: i32) -> sqlx::Result<Option<BookingWithOwner>> {
    sqlx::query_as::<_, BookingWithOwner>(&format!("{WITH_OWNER} WHERE b.id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn list_by_user(db: &PgPool, user_id: i32) -> sqlx::Result<Vec<Booking>> {
    sqlx::query_as::<_, Booking>(
        r#"
        SELECT id, start_time, end_time, status, notes,
               user_id, service_id, created_at, updated_at
        FROM bookings
        WHERE user_id = $1
        ORDER BY start_time ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn insert(db: &PgPool, new: &NewBooking) -> sqlx::Result<BookingWithOwner> {
    let id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO bookings (start_time, end_time, status, notes, user_id, service_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(new.start_time)
    .bind(new.end_time)
    .bind(&new.status)
    .bind(&new.notes)
    .bind(new.user_id)
    .bind(new.service_id)
    .fetch_one(db)
    .await?;

    find_by_id(db, id).await?.ok_or(sqlx::Error::RowNotFound)
}

pub async fn update(
    db: &PgPool,
    id: i32,
    changes: &BookingChanges,
) -> sqlx::Result<Option<BookingWithOwner>> {
    let updated: Option<i32> = sqlx::query_scalar(
        r#"
        UPDATE bookings
        SET start_time = COALESCE($2, start_time),
            end_time = COALESCE($3, end_time),
            status = COALESCE($4, status),
            notes = COALESCE($5, notes),
            service_id = COALESCE($6, service_id),
            updated_at = now()
        WHERE id = $1
        RETURNING id
        "#,
    )
    .bind(id)
    .bind(changes.start_time)
    .bind(changes.end_time)
    .bind(&changes.status)
    .bind(&changes.notes)
    .bind(changes.service_id)
    .fetch_optional(db)
    .await?;

    match updated {
        Some(id) => find_by_id(db, id).await,
        None => Ok(None),
    }
}

pub async fn delete(db: &PgPool, id: i32) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
