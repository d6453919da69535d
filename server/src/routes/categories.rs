use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use db::{Category, Question};

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};

#[derive(Serialize)]
struct CategoriesResponse {
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct CategoryQuestionsResponse {
    questions: Vec<Question>,
    total_questions: usize,
    current_category: i64,
}

pub(crate) fn category_map(categories: Vec<Category>) -> BTreeMap<i64, String> {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResult<CategoriesResponse> {
    let categories = db::categories::get_categories(&pool).await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoriesResponse {
        categories: category_map(categories),
    }))
}

// 404 is for an unknown category; a category without questions is an empty list
async fn get_category_questions(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> ApiResult<CategoryQuestionsResponse> {
    db::categories::get_category(&pool, id).await?;
    let questions = db::questions::get_questions_for_category(&pool, id).await?;
    Ok(Json(CategoryQuestionsResponse {
        total_questions: questions.len(),
        current_category: id,
        questions,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(get_category_questions))
        .with_state(state)
}
