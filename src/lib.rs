//! # Neuro Niche
//!
//! An interactive neurodiversity micro-lesson for the terminal: four content
//! slides, a final quiz, a scored completion log, and a printable PNG
//! certificate.
//!
//! # Architecture: One State Object, Pure Edges
//!
//! The lesson flow is a linear state machine driven by a single serializable
//! [`session::Session`]:
//!
//! ```text
//! entry (name + email) → slide 1 … slide 4 → quiz → finish
//!                                                     │
//!                        ┌────────────────────────────┤
//!                        │                            │
//!                     restart          log row + certificate + share link
//! ```
//!
//! Everything around the state machine is a pure function: scoring is
//! `answers → u32`, the certificate layout is `(name, score) → geometry`,
//! CLI output is `state → Vec<String>`. Side effects (CSV append, PNG write,
//! terminal I/O) live only at the edges, in [`completions`], the renderer,
//! and the [`runner`] loop. That keeps every rule unit-testable without a
//! terminal or a filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `lesson.toml` loading and validation — course identity, paths, the slide deck with its answer key |
//! | [`lesson`] | Validated runtime lesson model and the scoring function |
//! | [`session`] | Per-attempt state machine: entry gate, forward-only steps, finish, restart, JSON snapshots |
//! | [`completions`] | Append-only CSV completion log with header repair |
//! | [`certificate`] | Fixed-layout PNG certificate: layout plan, font fallback, rasterize + archive |
//! | [`share`] | LinkedIn share-link construction |
//! | [`output`] | CLI output formatting — pure `format_*` functions |
//! | [`runner`] | The interactive loop, behind an [`runner::Interface`] seam |
//!
//! # Design Decisions
//!
//! ## One Config-Driven Lesson
//!
//! Course content, branding, and the answer key all live in one `lesson.toml`
//! (see [`config`]); the binary ships a complete stock lesson so it runs with
//! no config file at all. There is exactly one implementation of the flow —
//! variants are config, not code.
//!
//! ## Stable Choice Ids
//!
//! Every choice carries an id separate from its display label, and the answer
//! key references ids only. Rewording a choice can never silently break
//! scoring; changing what counts as correct requires editing the key itself.
//!
//! ## Explicit Session State
//!
//! All per-attempt state lives in one plain serializable struct. Transitions
//! are methods returning `Result`, so illegal moves (advancing past the quiz,
//! finishing twice) are errors rather than silent corruption, and an attempt
//! can be snapshotted to JSON and resumed mid-lesson.
//!
//! ## Degrade, Don't Fail
//!
//! Completion must never be lost to a cosmetic failure. Preferred fonts that
//! fail to load fall back to a built-in face at a fixed size; a corrupt
//! completion log is rewritten fresh rather than refused; a failed archive
//! copy of the certificate is a stderr warning, not an error. The completion
//! row is appended before the certificate renders, so the log survives any
//! rendering problem.

pub mod certificate;
pub mod completions;
pub mod config;
pub mod lesson;
pub mod output;
pub mod runner;
pub mod session;
pub mod share;

#[cfg(test)]
pub(crate) mod test_helpers;
