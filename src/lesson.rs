//! Runtime lesson model and scoring.
//!
//! [`Lesson`] is the immutable, validated form of a [`LessonConfig`]: slides
//! in presentation order, questions with stable choice ids, and the answer
//! key. Building it checks the cross-field rules the config loader cannot
//! see — duplicate question ids, answer keys referencing unknown choices,
//! multi-select caps smaller than the key set.
//!
//! ## Scoring
//!
//! Scoring is a pure function over recorded answers, run exactly once at
//! finish time. Each scored question is worth one point:
//!
//! - **Single-select**: the recorded choice id equals the key.
//! - **Multi-select**: the recorded set is *set-equal* to the key set.
//!   A subset or superset scores nothing — "find all incorrect statements"
//!   means all of them and only them.
//!
//! Comparison is by choice id, never by display text, so relabeling a choice
//! cannot silently break the key.

use crate::config::{LessonConfig, QuestionConfig, QuestionKind, SlideConfig};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LessonError {
    #[error("Duplicate question id '{0}'")]
    DuplicateQuestionId(String),
    #[error("Question '{qid}': answer key references unknown choice '{cid}'")]
    UnknownKeyChoice { qid: String, cid: String },
    #[error("Question '{0}' is single-select but has no `answer`")]
    MissingAnswer(String),
    #[error("Question '{0}' is multi-select but has an empty `answer_set`")]
    MissingAnswerSet(String),
    #[error("Question '{qid}': max_selections {max} is below the key set size {need}")]
    CapBelowKeySet { qid: String, max: usize, need: usize },
    #[error("Question '{qid}': duplicate choice id '{cid}'")]
    DuplicateChoiceId { qid: String, cid: String },
}

/// A learner's recorded answer to one question, keyed by stable choice ids.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Answer {
    Single(String),
    Multi(BTreeSet<String>),
}

/// Mapping from question id to the recorded answer.
pub type AnswerMap = BTreeMap<String, Answer>;

/// The answer key for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerKey {
    /// The single correct choice id.
    Choice(String),
    /// The exact set of choice ids that must be selected.
    ChoiceSet(BTreeSet<String>),
}

/// A selectable choice.
#[derive(Debug, Clone)]
pub struct Choice {
    pub id: String,
    pub label: String,
}

/// A validated question.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub kind: QuestionKind,
    pub choices: Vec<Choice>,
    pub key: AnswerKey,
    pub max_selections: Option<usize>,
    pub scored: bool,
}

impl Question {
    /// Whether a recorded answer earns this question's point.
    pub fn is_correct(&self, answer: &Answer) -> bool {
        match (&self.key, answer) {
            (AnswerKey::Choice(key), Answer::Single(selected)) => selected == key,
            // Exact set equality — subsets and supersets both fail
            (AnswerKey::ChoiceSet(key), Answer::Multi(selected)) => selected == key,
            _ => false,
        }
    }

    /// Look up a choice by its stable id.
    pub fn choice(&self, id: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == id)
    }
}

/// One slide: instructional body plus zero or more questions.
#[derive(Debug, Clone)]
pub struct Slide {
    pub id: String,
    pub title: String,
    pub body: String,
    pub questions: Vec<Question>,
}

/// The validated, immutable lesson.
#[derive(Debug, Clone)]
pub struct Lesson {
    pub course_title: String,
    slides: Vec<Slide>,
}

impl Lesson {
    /// Build and validate the runtime lesson from its configuration.
    pub fn from_config(config: &LessonConfig) -> Result<Self, LessonError> {
        let mut seen_questions = HashSet::new();
        let mut slides = Vec::with_capacity(config.slides.len());

        for slide_config in &config.slides {
            slides.push(build_slide(slide_config, &mut seen_questions)?);
        }

        Ok(Self {
            course_title: config.course.title.clone(),
            slides,
        })
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> u32 {
        self.slides.len() as u32
    }

    /// The slide shown at a given step, where step 1 is the first slide.
    pub fn slide_at(&self, step: u32) -> Option<&Slide> {
        if step == 0 {
            return None;
        }
        self.slides.get(step as usize - 1)
    }

    /// Look up a question by id across all slides.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.slides
            .iter()
            .flat_map(|s| s.questions.iter())
            .find(|q| q.id == id)
    }

    /// Maximum attainable score: one point per scored question.
    pub fn max_score(&self) -> u32 {
        self.slides
            .iter()
            .flat_map(|s| s.questions.iter())
            .filter(|q| q.scored)
            .count() as u32
    }

    /// Compute the score for a set of recorded answers.
    ///
    /// Pure and deterministic: unanswered or wrongly-typed answers simply
    /// earn nothing. The result is always in `0..=max_score()`.
    pub fn score(&self, answers: &AnswerMap) -> u32 {
        self.slides
            .iter()
            .flat_map(|s| s.questions.iter())
            .filter(|q| q.scored)
            .filter(|q| answers.get(&q.id).is_some_and(|a| q.is_correct(a)))
            .count() as u32
    }
}

fn build_slide(
    config: &SlideConfig,
    seen_questions: &mut HashSet<String>,
) -> Result<Slide, LessonError> {
    let mut questions = Vec::with_capacity(config.questions.len());
    for question_config in &config.questions {
        if !seen_questions.insert(question_config.id.clone()) {
            return Err(LessonError::DuplicateQuestionId(question_config.id.clone()));
        }
        questions.push(build_question(question_config)?);
    }
    Ok(Slide {
        id: config.id.clone(),
        title: config.title.clone(),
        body: config.body.clone(),
        questions,
    })
}

fn build_question(config: &QuestionConfig) -> Result<Question, LessonError> {
    let mut choice_ids = HashSet::new();
    for choice in &config.choices {
        if !choice_ids.insert(choice.id.as_str()) {
            return Err(LessonError::DuplicateChoiceId {
                qid: config.id.clone(),
                cid: choice.id.clone(),
            });
        }
    }

    let key = match config.kind {
        QuestionKind::Single => {
            let answer = config
                .answer
                .as_ref()
                .ok_or_else(|| LessonError::MissingAnswer(config.id.clone()))?;
            if !choice_ids.contains(answer.as_str()) {
                return Err(LessonError::UnknownKeyChoice {
                    qid: config.id.clone(),
                    cid: answer.clone(),
                });
            }
            AnswerKey::Choice(answer.clone())
        }
        QuestionKind::Multi => {
            if config.answer_set.is_empty() {
                return Err(LessonError::MissingAnswerSet(config.id.clone()));
            }
            let mut set = BTreeSet::new();
            for cid in &config.answer_set {
                if !choice_ids.contains(cid.as_str()) {
                    return Err(LessonError::UnknownKeyChoice {
                        qid: config.id.clone(),
                        cid: cid.clone(),
                    });
                }
                set.insert(cid.clone());
            }
            if let Some(max) = config.max_selections
                && max < set.len()
            {
                return Err(LessonError::CapBelowKeySet {
                    qid: config.id.clone(),
                    max,
                    need: set.len(),
                });
            }
            AnswerKey::ChoiceSet(set)
        }
    };

    Ok(Question {
        id: config.id.clone(),
        prompt: config.prompt.clone(),
        kind: config.kind,
        choices: config
            .choices
            .iter()
            .map(|c| Choice {
                id: c.id.clone(),
                label: c.label.clone(),
            })
            .collect(),
        key,
        max_selections: config.max_selections,
        scored: config.scored,
    })
}
