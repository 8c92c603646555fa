//! Picks the next question of a quiz session.
//!
//! The selector never touches the store: the caller loads the candidate pool
//! for the requested category and hands it over together with the ids the
//! player has already seen.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::db::Question;

/// Category filter of a quiz. On the wire, id `0` means every category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCategory {
    All,
    Category(i64),
}

impl QuizCategory {
    pub fn from_id(id: i64) -> Self {
        match id {
            0 => QuizCategory::All,
            id => QuizCategory::Category(id),
        }
    }

    /// Store filter for this selector, `None` meaning no filter.
    pub fn category_id(self) -> Option<i64> {
        match self {
            QuizCategory::All => None,
            QuizCategory::Category(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Selected(Question),
    /// No unseen question is left in the pool.
    Exhausted,
}

/// Draws uniformly among the questions of `pool` whose id is not in `previous`.
pub fn select_next<R>(pool: Vec<Question>, previous: &HashSet<i64>, rng: &mut R) -> Selection
where
    R: Rng + ?Sized,
{
    let remaining: Vec<Question> = if previous.is_empty() {
        pool
    } else {
        pool.into_iter()
            .filter(|q| !previous.contains(&q.id))
            .collect()
    };

    match remaining.choose(rng) {
        Some(question) => Selection::Selected(question.clone()),
        None => Selection::Exhausted,
    }
}
