use std::collections::HashSet;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use db::Question;

use crate::app::AppState;
use crate::error::ApiResult;
use crate::extract;
use crate::telemetry::QUIZ_DRAWS;

pub const ANY_CATEGORY: i64 = 0;

#[derive(Deserialize)]
struct QuizBody {
    previous_questions: Vec<i64>,
    quiz_category: QuizCategory,
}

#[derive(Serialize, Deserialize)]
struct QuizCategory {
    id: i64,
}

#[derive(Serialize)]
struct QuizResponse {
    success: bool,
    question: Option<Question>,
    current_category: QuizCategory,
}

// a drained deck is the normal end of a game, not an error
async fn play(
    State(pool): State<SqlitePool>,
    extract::Json(body): extract::Json<QuizBody>,
) -> ApiResult<QuizResponse> {
    let candidates = if body.quiz_category.id == ANY_CATEGORY {
        db::questions::get_questions(&pool).await?
    } else {
        db::questions::get_questions_for_category(&pool, body.quiz_category.id).await?
    };

    let seen: HashSet<i64> = body.previous_questions.iter().copied().collect();
    let remaining: Vec<Question> = candidates
        .into_iter()
        .filter(|q| !seen.contains(&q.id))
        .collect();

    let question = remaining.choose(&mut rand::thread_rng()).cloned();
    if let Some(question) = &question {
        QUIZ_DRAWS
            .with_label_values(&[question.category.to_string().as_str()])
            .inc();
    }

    Ok(Json(QuizResponse {
        success: true,
        question,
        current_category: body.quiz_category,
    }))
}

pub fn quiz_router(state: AppState) -> Router {
    Router::new().route("/play", post(play)).with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::test_util::{self, body_json};

    async fn play(app: &Router, payload: String) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/play")
                    .header("content-type", "application/json")
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    #[tokio::test]
    async fn draws_from_the_whole_set_when_no_category_is_selected() {
        let (app, pool) = test_util::test_app().await;
        let seed = test_util::seed(&pool).await;

        let (status, body) =
            play(&app, r#"{"previous_questions": [], "quiz_category": {"id": 0}}"#.to_owned())
                .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["current_category"]["id"], 0);
        let drawn = body["question"]["id"].as_i64().unwrap();
        assert!(seed.question_ids.contains(&drawn));
    }

    #[tokio::test]
    async fn draws_only_from_the_selected_category() {
        let (app, pool) = test_util::test_app().await;
        let seed = test_util::seed(&pool).await;

        let (status, body) = play(
            &app,
            format!(
                r#"{{"previous_questions": [], "quiz_category": {{"id": {}}}}}"#,
                seed.art
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["question"]["category"], seed.art);
    }

    #[tokio::test]
    async fn excludes_previously_seen_questions() {
        let (app, pool) = test_util::test_app().await;
        let seed = test_util::seed(&pool).await;
        let previous: Vec<i64> = seed.question_ids[..2].to_vec();

        let (status, body) = play(
            &app,
            format!(
                r#"{{"previous_questions": {previous:?}, "quiz_category": {{"id": 0}}}}"#
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["question"]["id"].as_i64().unwrap(),
            seed.question_ids[2]
        );
    }

    #[tokio::test]
    async fn exhausted_deck_is_a_null_question_not_an_error() {
        let (app, pool) = test_util::test_app().await;
        let seed = test_util::seed(&pool).await;

        let (status, body) = play(
            &app,
            format!(
                r#"{{"previous_questions": {:?}, "quiz_category": {{"id": 0}}}}"#,
                seed.question_ids
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["question"].is_null());
    }

    #[tokio::test]
    async fn repeated_draws_cover_the_whole_set() {
        let (app, pool) = test_util::test_app().await;
        let seed = test_util::seed(&pool).await;

        let mut previous: Vec<i64> = Vec::new();
        loop {
            let (status, body) = play(
                &app,
                format!(
                    r#"{{"previous_questions": {previous:?}, "quiz_category": {{"id": 0}}}}"#
                ),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            match body["question"]["id"].as_i64() {
                Some(id) => {
                    assert!(!previous.contains(&id));
                    previous.push(id);
                }
                None => break,
            }
        }
        previous.sort_unstable();
        assert_eq!(previous, seed.question_ids);
    }

    #[tokio::test]
    async fn malformed_payload_is_a_uniform_400() {
        let (app, pool) = test_util::test_app().await;
        test_util::seed(&pool).await;

        let (status, body) = play(&app, r#"{"previous_questions": []}"#.to_owned()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], 400);
    }
}
