use axum::body::to_bytes;
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::app::{create_app, AppState};

// single connection so every query sees the same :memory: database
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::run_migrations(&pool).await.unwrap();
    pool
}

pub async fn test_app() -> (Router, SqlitePool) {
    let pool = test_pool().await;
    (create_app(AppState { pool: pool.clone() }), pool)
}

// two categories, three questions: ids handed back for assertions
pub struct Seed {
    pub science: i64,
    pub art: i64,
    pub question_ids: Vec<i64>,
}

pub async fn seed(pool: &SqlitePool) -> Seed {
    let science = db::categories::create_category(pool, "Science")
        .await
        .unwrap();
    let art = db::categories::create_category(pool, "Art").await.unwrap();

    let mut question_ids = Vec::new();
    for (question, answer, category, difficulty) in [
        ("What is the heaviest organ in the human body?", "The liver", science, 4),
        ("Which bird can fly backwards?", "Hummingbird", science, 3),
        ("Who painted \"Morning in a Pine Forest\"?", "Shishkin", art, 2),
    ] {
        question_ids.push(
            db::questions::create_question(pool, question, answer, category, difficulty)
                .await
                .unwrap(),
        );
    }
    Seed {
        science,
        art,
        question_ids,
    }
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
