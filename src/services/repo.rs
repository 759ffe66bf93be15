use serde::Serialize;
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub duration: i32,
    pub available: bool,
}

#[derive(Debug)]
pub struct NewService {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub duration: i32,
    pub available: bool,
}

#[derive(Debug)]
pub struct ServiceChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub duration: Option<i32>,
    pub available: Option<bool>,
}

pub async fn list(db: &PgPool) -> sqlx::Result<Vec<Service>> {
    sqlx::query_as::<_, Service>(
        r#"
        SELECT id, name, description, price, duration, available
        FROM services
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn find_by_id(db: &PgPool, id: i32) -> sqlx::Result<Option<Service>> {
    sqlx::query_as::<_, Service>(
        r#"
        SELECT id, name, description, price, duration, available
        FROM services
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert(db: &PgPool, new: &NewService) -> sqlx::Result<Service> {
    sqlx::query_as::<_, Service>(
        r#"
        INSERT INTO services (name, description, price, duration, available)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, description, price, duration, available
        "#,
    )
    .bind(&new.name)
    .bind(&new.description)
    .bind(new.price)
    .bind(new.duration)
    .bind(new.available)
    .fetch_one(db)
    .await
}

pub async fn update(
    db: &PgPool,
    id: i32,
    changes: &ServiceChanges,
) -> sqlx::Result<Option<Service>> {
    sqlx::query_as::<_, Service>(
        r#"
        UPDATE services
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            price = COALESCE($4, price),
            duration = COALESCE($5, duration),
            available = COALESCE($6, available)
        WHERE id = $1
        RETURNING id, name, description, price, duration, available
        "#,
    )
    .bind(id)
    .bind(&changes.name)
    .bind(&changes.description)
    .bind(changes.price)
    .bind(changes.duration)
    .bind(changes.available)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &PgPool, id: i32) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM services WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
