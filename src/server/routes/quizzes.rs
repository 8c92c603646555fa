use std::collections::HashSet;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions::list_questions, Question},
    quiz::{select_next, QuizCategory, Selection},
    server::{
        app::AppState,
        error::{ApiError, ApiJson},
    },
    telemetry::QUIZ_CNTR,
};

use super::ApiResponse;

#[derive(Deserialize)]
struct QuizRequest {
    previous_questions: Option<Vec<i64>>,
    quiz_category: Option<QuizCategoryBody>,
}

// category ids arrive either as numbers or as object keys turned into strings
#[derive(Deserialize)]
struct QuizCategoryBody {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

#[derive(Serialize)]
struct QuizResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    question: Option<Question>,
}

async fn next_question(
    State(pool): State<SqlitePool>,
    ApiJson(body): ApiJson<QuizRequest>,
) -> ApiResponse<Json<QuizResponse>> {
    let (Some(previous), Some(category)) = (body.previous_questions, body.quiz_category) else {
        return Err(ApiError::BadRequest(
            "quiz_category and previous_questions are required".to_owned(),
        ));
    };
    let category = QuizCategory::from_id(category.id);
    let previous: HashSet<i64> = previous.into_iter().collect();

    let candidates = list_questions(&pool, category.category_id()).await?;
    let selection = select_next(candidates, &previous, &mut rand::thread_rng());

    let question = match selection {
        Selection::Selected(question) => {
            QUIZ_CNTR.with_label_values(&["selected"]).inc();
            Some(question)
        }
        Selection::Exhausted => {
            tracing::debug!(?category, seen = previous.len(), "Quiz exhausted");
            QUIZ_CNTR.with_label_values(&["exhausted"]).inc();
            None
        }
    };
    Ok(Json(QuizResponse {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}
