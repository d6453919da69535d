use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use db::Question;

use super::category_map;
use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extract;

pub const QUESTIONS_PER_PAGE: i64 = 10;

#[derive(Deserialize)]
struct PageQuery {
    page: Option<i64>,
}

#[derive(Deserialize)]
struct NewQuestion {
    question: String,
    answer: String,
    category: i64,
    difficulty: i64,
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm")]
    search_term: String,
}

#[derive(Serialize)]
struct QuestionListResponse {
    questions: Vec<Question>,
    total_questions: i64,
    categories: BTreeMap<i64, String>,
    current_categories: Option<i64>,
}

#[derive(Serialize)]
struct SuccessResponse {
    success: bool,
}

async fn paginated_response(pool: &SqlitePool, page: i64) -> ApiResult<QuestionListResponse> {
    if page < 1 {
        return Err(ApiError::BadRequest("page must be positive".to_owned()));
    }
    let questions =
        db::questions::get_questions_page(pool, QUESTIONS_PER_PAGE, (page - 1) * QUESTIONS_PER_PAGE)
            .await?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    let total_questions = db::questions::count_questions(pool).await?;
    let categories = category_map(db::categories::get_categories(pool).await?);
    Ok(Json(QuestionListResponse {
        questions,
        total_questions,
        categories,
        current_categories: None,
    }))
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> ApiResult<QuestionListResponse> {
    paginated_response(&pool, page.unwrap_or(1)).await
}

async fn list_questions_page(
    State(pool): State<SqlitePool>,
    Path(page): Path<i64>,
) -> ApiResult<QuestionListResponse> {
    paginated_response(&pool, page).await
}

async fn create_question(
    State(pool): State<SqlitePool>,
    extract::Json(new): extract::Json<NewQuestion>,
) -> ApiResult<SuccessResponse> {
    // reject dangling category references up front
    match db::categories::get_category(&pool, new.category).await {
        Ok(_) => {}
        Err(sqlx::Error::RowNotFound) => {
            return Err(ApiError::Unprocessable(format!(
                "unknown category {}",
                new.category
            )))
        }
        Err(error) => return Err(error.into()),
    }
    db::questions::create_question(&pool, &new.question, &new.answer, new.category, new.difficulty)
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> ApiResult<SuccessResponse> {
    db::questions::delete_question(&pool, id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

// zero matches is a valid result, not a 404
async fn search_questions(
    State(pool): State<SqlitePool>,
    extract::Json(body): extract::Json<SearchBody>,
) -> ApiResult<QuestionListResponse> {
    let questions = db::questions::search_questions(&pool, &body.search_term).await?;
    let categories = category_map(db::categories::get_categories(&pool).await?);
    Ok(Json(QuestionListResponse {
        total_questions: questions.len() as i64,
        questions,
        categories,
        current_categories: None,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions))
        .route(
            "/questions/{id}",
            get(list_questions_page).delete(delete_question),
        )
        .route("/questions/search", post(search_questions))
        .route("/add", post(create_question))
        .with_state(state)
}
