use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// A stored question. Its serde form is the formatted shape served by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

pub struct NewQuestion<'a> {
    pub question: &'a str,
    pub answer: &'a str,
    pub category: i64,
    pub difficulty: i64,
}

/// All questions ordered by id, optionally restricted to one category.
pub async fn list_questions(
    pool: &SqlitePool,
    category: Option<i64>,
) -> sqlx::Result<Vec<Question>> {
    match category {
        Some(category) => {
            sqlx::query_as::<_, Question>(
                r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE questions.category = ?1
ORDER BY id
                "#,
            )
            .bind(category)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Question>(
                r#"
SELECT id, question, answer, category, difficulty
FROM questions
ORDER BY id
                "#,
            )
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    list_questions(pool, None).await
}

pub async fn get_question(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn count_questions(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar(
        r#"
SELECT COUNT(*) FROM questions
        "#,
    )
    .fetch_one(pool)
    .await
}

/// Case-insensitive substring match on the question text.
///
/// SQLite `LIKE` only folds ASCII, so matching happens here with Unicode lowercasing.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let questions = get_all_questions(pool).await?;
    Ok(filter_by_term(questions, term))
}

fn filter_by_term(questions: Vec<Question>, term: &str) -> Vec<Question> {
    let term = term.to_lowercase();
    questions
        .into_iter()
        .filter(|q| q.question.to_lowercase().contains(&term))
        .collect()
}

/// Inserts the question if its category exists. Returns the new id, or `None` for an unknown category.
pub async fn create_question(pool: &SqlitePool, new: NewQuestion<'_>) -> sqlx::Result<Option<i64>> {
    // existence check and insert are one statement
    let result = sqlx::query(
        r#"
INSERT INTO questions (question, answer, category, difficulty)
SELECT ?1, ?2, ?3, ?4
WHERE EXISTS (SELECT 1 FROM categories WHERE categories.id = ?3)
        "#,
    )
    .bind(new.question)
    .bind(new.answer)
    .bind(new.category)
    .bind(new.difficulty)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    Ok(Some(result.last_insert_rowid()))
}

/// Returns whether a row was actually removed.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let affected = sqlx::query(
        r#"
DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(affected > 0)
}

pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for q in questions {
        sqlx::query(
            r#"
INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (id) DO UPDATE SET
    question = excluded.question,
    answer = excluded.answer,
    category = excluded.category,
    difficulty = excluded.difficulty
            "#,
        )
        .bind(q.id)
        .bind(q.question)
        .bind(q.answer)
        .bind(q.category)
        .bind(q.difficulty)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i64, text: &str) -> Question {
        Question {
            id,
            question: text.to_owned(),
            answer: "answer".to_owned(),
            category: 1,
            difficulty: 1,
        }
    }

    fn matching(term: &str) -> Vec<i64> {
        let questions = vec![
            question(1, "Где находится ЭРМИТАЖ?"),
            question(2, "Who painted l'ÉCOLE d'Athènes?"),
            question(3, "What is 100% juice?"),
        ];
        filter_by_term(questions, term).into_iter().map(|q| q.id).collect()
    }

    #[test]
    fn folds_non_ascii_case() {
        assert_eq!(matching("эрмитаж"), vec![1]);
        assert_eq!(matching("ЭРМИТАЖ"), vec![1]);
        assert_eq!(matching("école"), vec![2]);
        assert_eq!(matching("ATHÈNES"), vec![2]);
    }

    #[test]
    fn term_is_literal_text() {
        assert_eq!(matching("100%"), vec![3]);
        assert_eq!(matching("_"), Vec::<i64>::new());
        assert_eq!(matching("?"), vec![1, 2, 3]);
    }
}
