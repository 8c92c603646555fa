use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{get_all_categories, get_category},
            questions::list_questions,
        },
        Question,
    },
    pagination::{paginate, PageQuery, PageSize},
    server::{app::AppState, error::ApiError, error::ApiPath},
};

use super::{category_map, ApiResponse};

#[derive(Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct CategoryQuestionsResponse {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: String,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesResponse>> {
    let categories = get_all_categories(&pool).await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoriesResponse {
        success: true,
        categories: category_map(categories),
    }))
}

async fn questions_by_category(
    State(pool): State<SqlitePool>,
    State(page_size): State<PageSize>,
    ApiPath(id): ApiPath<i64>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> ApiResponse<Json<CategoryQuestionsResponse>> {
    let category = get_category(&pool, id).await?.ok_or(ApiError::NotFound)?;
    let questions = list_questions(&pool, Some(category.id)).await?;
    let total_questions = questions.len();

    let questions = paginate(questions, page, page_size);
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoryQuestionsResponse {
        success: true,
        questions,
        total_questions,
        current_category: category.name,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_by_category))
        .with_state(state)
}
