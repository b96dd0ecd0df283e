//! The interactive lesson loop.
//!
//! One interaction cycle per slide: render, collect answers, transition.
//! All user I/O goes through the [`Interface`] trait so the loop is testable
//! without a terminal — [`Console`] is the production stdin/stdout
//! implementation; tests drive the loop with a scripted double.
//!
//! ```text
//! entry (name + email) → slide 1 … slide N-1 → quiz → finish
//!                                                        │
//!                               restart? ────────────────┘
//! ```
//!
//! Finish runs the side effects in a fixed order: score, **append the
//! completion record**, then issue the certificate — so a render failure can
//! never lose the completion row.
//!
//! With `--state-file`, the session snapshot is rewritten after every
//! transition and an existing snapshot is resumed, so an interrupted attempt
//! picks up at its last slide.

use crate::certificate::{self, Branding, FontSet};
use crate::completions::{CompletionLog, CompletionRecord, LogError};
use crate::config::{LessonConfig, QuestionKind};
use crate::lesson::{Answer, Lesson, Question};
use crate::output;
use crate::session::{Session, SessionError};
use crate::share::{self, ShareError};
use chrono::Utc;
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Render(#[from] certificate::RenderError),
    #[error(transparent)]
    Log(#[from] LogError),
    #[error(transparent)]
    Share(#[from] ShareError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// User-facing I/O seam.
pub trait Interface {
    /// Display a block of lines.
    fn show(&mut self, lines: &[String]);
    /// Ask for one line of input.
    fn prompt(&mut self, message: &str) -> io::Result<String>;
}

/// Production interface: stdout + stdin.
pub struct Console;

impl Interface for Console {
    fn show(&mut self, lines: &[String]) {
        output::print_lines(lines);
    }

    fn prompt(&mut self, message: &str) -> io::Result<String> {
        print!("{message} ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Result of a completed run.
#[derive(Debug)]
pub struct RunOutcome {
    pub session: Session,
    pub certificate_path: PathBuf,
}

/// Drives one or more attempts through the lesson.
pub struct Runner<'a, I: Interface> {
    lesson: &'a Lesson,
    config: &'a LessonConfig,
    interface: I,
    state_file: Option<PathBuf>,
}

impl<'a, I: Interface> Runner<'a, I> {
    pub fn new(
        lesson: &'a Lesson,
        config: &'a LessonConfig,
        interface: I,
        state_file: Option<PathBuf>,
    ) -> Self {
        Self {
            lesson,
            config,
            interface,
            state_file,
        }
    }

    /// Run until the learner declines to restart. Returns the last attempt.
    pub fn run(&mut self, app_url: Option<&str>) -> Result<RunOutcome, RunError> {
        let mut session = self.resume_or_new();
        let mut outcome;

        loop {
            if !session.started {
                self.entry(&mut session)?;
            }
            while !session.finished {
                self.play_slide(&mut session)?;
            }
            outcome = self.finish_summary(&session, app_url)?;

            let again = self.interface.prompt("Restart the lesson? [y/N]")?;
            if again.trim().eq_ignore_ascii_case("y") {
                session.restart();
                self.snapshot(&session)?;
            } else {
                break;
            }
        }

        Ok(RunOutcome {
            session,
            certificate_path: outcome,
        })
    }

    /// Resume a saved snapshot when present, otherwise a fresh session.
    fn resume_or_new(&mut self) -> Session {
        let Some(path) = &self.state_file else {
            return Session::new();
        };
        match Session::load(path) {
            Ok(session) if !session.finished => {
                self.interface.show(&[format!(
                    "Resuming {} at slide {}",
                    session.name, session.current_step
                )]);
                session
            }
            _ => Session::new(),
        }
    }

    fn entry(&mut self, session: &mut Session) -> Result<(), RunError> {
        self.interface.show(&[
            format!("Welcome to {}", self.config.course.brand),
            self.config.course.title.clone(),
            String::new(),
        ]);
        loop {
            let name = self.interface.prompt("Your name:")?;
            let email = self.interface.prompt("Your email:")?;
            match session.start(&name, &email) {
                Ok(()) => break,
                Err(e) => self.interface.show(&[format!("\u{26a0} {e}")]),
            }
        }
        self.snapshot(session)?;
        Ok(())
    }

    /// One interaction cycle: render the slide, collect answers, transition.
    fn play_slide(&mut self, session: &mut Session) -> Result<(), RunError> {
        let step = session.current_step;
        let Some(slide) = self.lesson.slide_at(step) else {
            // Snapshot with an out-of-range step; treat as finished-by-hand
            return Err(SessionError::AlreadyFinished.into());
        };

        self.interface.show(&[String::new()]);
        self.interface
            .show(&output::format_slide(slide, step, self.lesson.slide_count(), session));

        for question in &slide.questions {
            self.ask(session, question)?;
        }

        if session.on_final_slide(self.lesson) {
            session.finish(self.lesson)?;
        } else {
            let label = if step + 1 == self.lesson.slide_count() {
                "Take the quiz"
            } else {
                "Next slide"
            };
            self.interface.prompt(&format!("[Enter] {label} \u{2192}"))?;
            session.advance(self.lesson)?;
        }
        self.snapshot(session)?;
        Ok(())
    }

    /// Prompt until a valid selection is recorded.
    ///
    /// An empty input keeps (and re-records) the existing answer, so a
    /// resumed session preserves prior selections.
    fn ask(&mut self, session: &mut Session, question: &Question) -> Result<(), RunError> {
        loop {
            let input = match question.kind {
                QuestionKind::Single => self.interface.prompt("Answer (number):")?,
                QuestionKind::Multi => self
                    .interface
                    .prompt("Answers (numbers, comma-separated):")?,
            };

            let existing = session.answers.get(&question.id).cloned();
            let parsed = match question.kind {
                QuestionKind::Single => parse_single(&input, question, existing.as_ref()),
                QuestionKind::Multi => parse_multi(&input, question, existing.as_ref()),
            };

            let answer = match parsed {
                Ok(answer) => answer,
                Err(message) => {
                    self.interface.show(&[format!("\u{26a0} {message}")]);
                    continue;
                }
            };

            match session.record_answer(self.lesson, &question.id, answer) {
                Ok(()) => return Ok(()),
                Err(e @ SessionError::TooManySelections { .. }) => {
                    self.interface.show(&[format!("\u{26a0} {e}")]);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Post-finish side effects: log append first, then certificate, then
    /// the summary block.
    fn finish_summary(
        &mut self,
        session: &Session,
        app_url: Option<&str>,
    ) -> Result<PathBuf, RunError> {
        let log = CompletionLog::new(&self.config.paths.completion_log);
        log.append(&CompletionRecord::now(
            &session.name,
            &session.email,
            session.score,
        ))?;

        let fonts = FontSet::load(
            self.config.certificate.font_regular.as_deref(),
            self.config.certificate.font_bold.as_deref(),
        );
        let branding = Branding {
            brand: self.config.course.brand.clone(),
            tagline: self.config.course.tagline.clone(),
            course_title: self.config.course.title.clone(),
            issuer: self.config.course.issuer.clone(),
        };
        let certificate = certificate::issue(
            &session.name,
            session.score,
            self.lesson.max_score(),
            &branding,
            &fonts,
            &self.config.certificate.file_prefix,
            &self.config.paths.certificates_dir,
            Utc::now(),
        )?;
        let certificate_path = self
            .config
            .paths
            .certificates_dir
            .join(&certificate.filename);

        let share = match app_url {
            Some(url) => Some(share::share_url(url)?.to_string()),
            None => None,
        };

        self.interface.show(&[String::new()]);
        self.interface.show(&output::format_summary(
            session,
            self.lesson.max_score(),
            &self.config.paths.completion_log,
            &certificate_path,
            share.as_deref(),
        ));
        Ok(certificate_path)
    }

    fn snapshot(&self, session: &Session) -> Result<(), RunError> {
        if let Some(path) = &self.state_file {
            session.save(path)?;
        }
        Ok(())
    }
}

// ============================================================================
// Input parsing
// ============================================================================

/// Parse a single-select input: a 1-based choice number. Empty keeps the
/// existing answer.
fn parse_single(
    input: &str,
    question: &Question,
    existing: Option<&Answer>,
) -> Result<Answer, String> {
    let input = input.trim();
    if input.is_empty() {
        return match existing {
            Some(answer) => Ok(answer.clone()),
            None => Err("Enter the number of your answer".to_string()),
        };
    }
    let choice = parse_choice_number(input, question)?;
    Ok(Answer::Single(choice))
}

/// Parse a multi-select input: comma- or space-separated 1-based numbers.
/// Empty keeps the existing answer, or records an empty selection.
fn parse_multi(
    input: &str,
    question: &Question,
    existing: Option<&Answer>,
) -> Result<Answer, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(existing
            .cloned()
            .unwrap_or_else(|| Answer::Multi(BTreeSet::new())));
    }
    let mut selected = BTreeSet::new();
    for token in input.split([',', ' ']).filter(|t| !t.is_empty()) {
        selected.insert(parse_choice_number(token, question)?);
    }
    Ok(Answer::Multi(selected))
}

fn parse_choice_number(token: &str, question: &Question) -> Result<String, String> {
    let number: usize = token
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a choice number", token.trim()))?;
    question
        .choices
        .get(number.checked_sub(1).ok_or("Choices start at 1".to_string())?)
        .map(|c| c.id.clone())
        .ok_or_else(|| {
            format!(
                "Choice {number} is out of range (1-{})",
                question.choices.len()
            )
        })
}
