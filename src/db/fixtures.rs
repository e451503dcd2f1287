// src/db/fixtures.rs
// DOCUMENTATION: Rows shared by the repository tests

use sqlx::PgPool;
use uuid::Uuid;

pub async fn insert_influencer(pool: &PgPool, name: &str) -> Uuid {
    let (id,): (Uuid,) = sqlx::query_as("INSERT INTO influencers (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap();
    id
}

pub async fn insert_review(pool: &PgPool, influencer_id: Uuid, business_name: &str) -> Uuid {
    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO influencer_reviews (influencer_id, business_name, stars) VALUES ($1, $2, 5) RETURNING id",
    )
    .bind(influencer_id)
    .bind(business_name)
    .fetch_one(pool)
    .await
    .unwrap();
    id
}

pub async fn count_rows(pool: &PgPool, sql: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as(sql).fetch_one(pool).await.unwrap();
    count
}
