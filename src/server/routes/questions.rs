use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::get_all_categories,
            questions::{self, get_all_questions, search_questions},
        },
        NewQuestion, Question,
    },
    pagination::{paginate, PageQuery, PageSize},
    server::{
        app::AppState,
        error::{ApiError, ApiJson, ApiPath},
    },
};

use super::{category_map, ApiResponse};

// fields are optional so that a missing one is reported as 422 rather than a decode error
#[derive(Deserialize)]
struct CreateQuestion {
    question: Option<String>,
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct QuestionCreated {
    success: bool,
    created: i64,
    questions: Vec<Question>,
    total_questions: usize,
}

#[derive(Serialize)]
struct QuestionDeleted {
    success: bool,
    deleted: i64,
    questions: Vec<Question>,
    total_questions: usize,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
}

async fn questions_page(
    State(pool): State<SqlitePool>,
    State(page_size): State<PageSize>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    let questions = get_all_questions(&pool).await?;
    let total_questions = questions.len();

    let questions = paginate(questions, page, page_size);
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(QuestionsPage {
        success: true,
        questions,
        total_questions,
        categories: category_map(get_all_categories(&pool).await?),
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    State(page_size): State<PageSize>,
    Query(PageQuery { page }): Query<PageQuery>,
    ApiJson(form): ApiJson<CreateQuestion>,
) -> ApiResponse<Json<QuestionCreated>> {
    let (Some(question), Some(answer), Some(category), Some(difficulty)) =
        (form.question, form.answer, form.category, form.difficulty)
    else {
        return Err(ApiError::Unprocessable(
            "question, answer, category and difficulty are required".to_owned(),
        ));
    };
    if question.trim().is_empty() || answer.trim().is_empty() {
        return Err(ApiError::Unprocessable(
            "question and answer must not be blank".to_owned(),
        ));
    }

    let id = questions::create_question(
        &pool,
        NewQuestion {
            question: &question,
            answer: &answer,
            category,
            difficulty,
        },
    )
    .await?
    .ok_or_else(|| ApiError::Unprocessable(format!("category {category} does not exist")))?;
    tracing::info!(id, category, "Question created");

    let questions = get_all_questions(&pool).await?;
    let total_questions = questions.len();
    Ok(Json(QuestionCreated {
        success: true,
        created: id,
        questions: paginate(questions, page, page_size),
        total_questions,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    State(page_size): State<PageSize>,
    ApiPath(id): ApiPath<i64>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> ApiResponse<Json<QuestionDeleted>> {
    if !questions::delete_question(&pool, id).await? {
        return Err(ApiError::NotFound);
    }
    tracing::info!(id, "Question deleted");

    let questions = get_all_questions(&pool).await?;
    let total_questions = questions.len();
    Ok(Json(QuestionDeleted {
        success: true,
        deleted: id,
        questions: paginate(questions, page, page_size),
        total_questions,
    }))
}

async fn search(
    State(pool): State<SqlitePool>,
    State(page_size): State<PageSize>,
    Query(PageQuery { page }): Query<PageQuery>,
    ApiJson(body): ApiJson<SearchBody>,
) -> ApiResponse<Json<SearchResults>> {
    let term = body
        .search_term
        .ok_or_else(|| ApiError::Unprocessable("searchTerm is required".to_owned()))?;

    let found = search_questions(&pool, &term).await?;
    let total_questions = found.len();
    Ok(Json(SearchResults {
        success: true,
        questions: paginate(found, page, page_size),
        total_questions,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(questions_page).post(create_question))
        .route("/questions/{id}", delete(delete_question))
        .route("/search", post(search))
        .with_state(state)
}
