//! Shared test utilities for the neuro-niche test suite.
//!
//! Provides the stock lesson plus canned answer maps at known scores, so
//! state-machine and scoring tests can assert against fixed totals without
//! repeating the answer key.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let lesson = stock_lesson();
//! assert_eq!(lesson.score(&all_correct_answers()), lesson.max_score());
//! ```

use crate::config::LessonConfig;
use crate::lesson::{Answer, AnswerMap, Lesson};
use std::collections::BTreeSet;

// =========================================================================
// Lesson fixtures
// =========================================================================

/// The built-in lesson: five slides, five scored questions.
pub fn stock_lesson() -> Lesson {
    Lesson::from_config(&LessonConfig::default()).unwrap()
}

// =========================================================================
// Answer maps
// =========================================================================

/// The full-marks answer map for the stock lesson.
pub fn all_correct_answers() -> AnswerMap {
    let mut answers = AnswerMap::new();
    answers.insert(
        "q_definition".into(),
        Answer::Single("natural_variation".into()),
    );
    answers.insert(
        "q_myths".into(),
        Answer::Multi(BTreeSet::from([
            "myth_intelligence".to_string(),
            "myth_outgrow".to_string(),
            "myth_visible".to_string(),
        ])),
    );
    answers.insert(
        "q_language".into(),
        Answer::Single("thinks_differently".into()),
    );
    answers.insert(
        "q_prevalence".into(),
        Answer::Single("fifteen_twenty".into()),
    );
    answers.insert(
        "q_practice".into(),
        Answer::Single("written_instructions".into()),
    );
    answers
}
