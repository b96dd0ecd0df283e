//! Learner session state machine.
//!
//! One [`Session`] per attempt, modeled as a single serializable state object
//! that every transition mutates in place — no ambient state anywhere else.
//!
//! ```text
//! NotStarted(0) → Slide 1 → … → Slide N-1 → Quiz (N) → Finished (N+1)
//!       ▲                                                   │
//!       └────────────────────── restart ────────────────────┘
//! ```
//!
//! `current_step` only ever moves forward; the sole way back is [`Session::restart`],
//! which resets the whole object to its initial empty state. The entry step
//! gates on a non-blank name and email; no later transition has a validation
//! gate.
//!
//! Answers are (re-)recorded on every render of a prompt, so revisiting a
//! question preserves the prior selection — recording is an idempotent
//! overwrite keyed by question id.
//!
//! The score is **always** recomputed from the recorded answers at finish
//! time via [`Lesson::score`]; it is never accepted as input.
//!
//! ## Snapshots
//!
//! A session serializes to a small JSON document ([`Session::save`] /
//! [`Session::load`]), letting the interactive runner persist state between
//! interaction cycles and resume an interrupted attempt.

use crate::lesson::{Answer, AnswerMap, Lesson};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Please enter your {0} before starting")]
    MissingField(&'static str),
    #[error("The lesson has not been started yet")]
    NotStarted,
    #[error("The lesson is already finished — restart to retake it")]
    AlreadyFinished,
    #[error("Already on the final slide — finish instead of advancing")]
    AtFinalSlide,
    #[error("Finishing is only valid from the final slide")]
    NotAtFinalSlide,
    #[error("Unknown question '{0}'")]
    UnknownQuestion(String),
    #[error("Unknown choice '{cid}' for question '{qid}'")]
    UnknownChoice { qid: String, cid: String },
    #[error("Question '{qid}' accepts a single choice")]
    ExpectedSingle { qid: String },
    #[error("Question '{qid}' accepts a set of choices")]
    ExpectedMulti { qid: String },
    #[error("Question '{qid}' accepts at most {max} selections")]
    TooManySelections { qid: String, max: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Snapshot parse error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// The full per-attempt state. `Default` is the pristine not-started session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// 0 = not started, 1..=slide_count = slides, slide_count+1 = finished.
    pub current_step: u32,
    pub started: bool,
    pub name: String,
    pub email: String,
    /// Recorded answers, keyed by question id.
    pub answers: AnswerMap,
    /// Computed at finish; 0 until then.
    pub score: u32,
    pub finished: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry transition: store identity and move to the first slide.
    ///
    /// Blank or whitespace-only name/email is rejected with no state change.
    pub fn start(&mut self, name: &str, email: &str) -> Result<(), SessionError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(SessionError::MissingField("name"));
        }
        if email.is_empty() {
            return Err(SessionError::MissingField("email"));
        }
        self.name = name.to_string();
        self.email = email.to_string();
        self.started = true;
        self.current_step = 1;
        Ok(())
    }

    /// Record (or overwrite) the answer to a question.
    ///
    /// Called on every render of a prompt, not only on submit, so the
    /// recorded state always mirrors the learner's latest selection.
    pub fn record_answer(
        &mut self,
        lesson: &Lesson,
        question_id: &str,
        answer: Answer,
    ) -> Result<(), SessionError> {
        let question = lesson
            .question(question_id)
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.to_string()))?;

        match &answer {
            Answer::Single(cid) => {
                if matches!(question.kind, crate::config::QuestionKind::Multi) {
                    return Err(SessionError::ExpectedMulti {
                        qid: question_id.to_string(),
                    });
                }
                if question.choice(cid).is_none() {
                    return Err(SessionError::UnknownChoice {
                        qid: question_id.to_string(),
                        cid: cid.clone(),
                    });
                }
            }
            Answer::Multi(cids) => {
                if matches!(question.kind, crate::config::QuestionKind::Single) {
                    return Err(SessionError::ExpectedSingle {
                        qid: question_id.to_string(),
                    });
                }
                for cid in cids {
                    if question.choice(cid).is_none() {
                        return Err(SessionError::UnknownChoice {
                            qid: question_id.to_string(),
                            cid: cid.clone(),
                        });
                    }
                }
                if let Some(max) = question.max_selections
                    && cids.len() > max
                {
                    return Err(SessionError::TooManySelections {
                        qid: question_id.to_string(),
                        max,
                    });
                }
            }
        }

        self.answers.insert(question_id.to_string(), answer);
        Ok(())
    }

    /// "Next" / "Take Quiz": advance by exactly one slide.
    ///
    /// Has no validation gate — unanswered questions simply score nothing
    /// later. The final slide cannot be advanced past; that is [`Session::finish`].
    pub fn advance(&mut self, lesson: &Lesson) -> Result<(), SessionError> {
        self.expect_active()?;
        if self.current_step >= lesson.slide_count() {
            return Err(SessionError::AtFinalSlide);
        }
        self.current_step += 1;
        Ok(())
    }

    /// "Finish": recompute the score from recorded answers and mark the
    /// attempt complete. Valid from the final slide only.
    ///
    /// Appending the completion record and issuing the certificate are side
    /// effects of the surrounding flow (see [`crate::runner`]), not of the
    /// state transition itself.
    pub fn finish(&mut self, lesson: &Lesson) -> Result<u32, SessionError> {
        self.expect_active()?;
        if self.current_step != lesson.slide_count() {
            return Err(SessionError::NotAtFinalSlide);
        }
        self.score = lesson.score(&self.answers);
        self.finished = true;
        self.current_step = lesson.slide_count() + 1;
        Ok(self.score)
    }

    /// Restart transition: clear everything back to the initial empty state.
    pub fn restart(&mut self) {
        *self = Self::default();
    }

    /// Whether the session is on the final (quiz) slide.
    pub fn on_final_slide(&self, lesson: &Lesson) -> bool {
        self.started && !self.finished && self.current_step == lesson.slide_count()
    }

    fn expect_active(&self) -> Result<(), SessionError> {
        if !self.started {
            return Err(SessionError::NotStarted);
        }
        if self.finished {
            return Err(SessionError::AlreadyFinished);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    /// Persist the session as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a session snapshot.
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
