//! CLI output formatting for the lesson flow.
//!
//! Each surface has a `format_*` function returning `Vec<String>` for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Slide
//!
//! ```text
//! ── Slide 2/5: Myths and facts ──────────────────────────
//! Misconceptions about neurodivergent people are common...
//!
//! Select ALL the statements that are incorrect. (pick up to 3)
//!   [1] Neurodivergent people are less intelligent
//!   [2] Neurodivergent people often have distinctive strengths
//! Current selection: 1, 3
//! ```
//!
//! ## Finish summary
//!
//! ```text
//! ══ Lesson complete ══
//! Ada — Score: 5/5
//!     Log: completions.csv
//!     Certificate: certificates/neuro_niche_certificate_20260823_140211.png
//!     Share: https://www.linkedin.com/sharing/share-offsite/?url=...
//! ```

use crate::completions::CompletionRecord;
use crate::lesson::{Answer, Lesson, Question, Slide};
use crate::session::Session;
use std::path::Path;

const RULE_WIDTH: usize = 56;

/// Section header line: `── title ───────…`.
fn header(title: &str) -> String {
    let prefix = format!("\u{2500}\u{2500} {title} ");
    let fill = RULE_WIDTH.saturating_sub(prefix.chars().count());
    format!("{prefix}{}", "\u{2500}".repeat(fill))
}

/// Format one slide: header, body, then each question with its choices.
pub fn format_slide(slide: &Slide, step: u32, total: u32, session: &Session) -> Vec<String> {
    let mut lines = vec![
        header(&format!("Slide {step}/{total}: {}", slide.title)),
        slide.body.clone(),
    ];
    for question in &slide.questions {
        lines.push(String::new());
        lines.extend(format_question(question, session.answers.get(&question.id)));
    }
    lines
}

/// Format a question: prompt, numbered choices, and the current selection.
pub fn format_question(question: &Question, current: Option<&Answer>) -> Vec<String> {
    let mut lines = Vec::new();
    let cap = match question.max_selections {
        Some(max) => format!(" (pick up to {max})"),
        None => String::new(),
    };
    lines.push(format!("{}{cap}", question.prompt));
    for (index, choice) in question.choices.iter().enumerate() {
        lines.push(format!("  [{}] {}", index + 1, choice.label));
    }
    if let Some(answer) = current {
        let selected: Vec<String> = match answer {
            Answer::Single(cid) => choice_numbers(question, std::slice::from_ref(cid)),
            Answer::Multi(cids) => {
                let ids: Vec<String> = cids.iter().cloned().collect();
                choice_numbers(question, &ids)
            }
        };
        if !selected.is_empty() {
            lines.push(format!("Current selection: {}", selected.join(", ")));
        }
    }
    lines
}

fn choice_numbers(question: &Question, ids: &[String]) -> Vec<String> {
    let mut numbers: Vec<usize> = ids
        .iter()
        .filter_map(|id| question.choices.iter().position(|c| &c.id == id))
        .map(|i| i + 1)
        .collect();
    numbers.sort_unstable();
    numbers.iter().map(|n| n.to_string()).collect()
}

/// Format the post-finish summary.
pub fn format_summary(
    session: &Session,
    max_score: u32,
    log_path: &Path,
    certificate_path: &Path,
    share_url: Option<&str>,
) -> Vec<String> {
    let mut lines = vec![
        "\u{2550}\u{2550} Lesson complete \u{2550}\u{2550}".to_string(),
        format!("{} \u{2014} Score: {}/{max_score}", session.name, session.score),
        format!("    Log: {}", log_path.display()),
        format!("    Certificate: {}", certificate_path.display()),
    ];
    if let Some(url) = share_url {
        lines.push(format!("    Share: {url}"));
    }
    lines
}

/// Format the `check` overview: slides with their question/choice counts.
pub fn format_check(lesson: &Lesson) -> Vec<String> {
    let mut lines = vec![format!("Course: {}", lesson.course_title)];
    for (index, slide) in lesson.slides().iter().enumerate() {
        let questions = slide.questions.len();
        let detail = match questions {
            0 => "content only".to_string(),
            1 => "1 question".to_string(),
            n => format!("{n} questions"),
        };
        lines.push(format!("{:0>3} {} ({detail})", index + 1, slide.title));
        for question in &slide.questions {
            let scored = if question.scored { "" } else { ", unscored" };
            lines.push(format!(
                "    {} ({} choices{scored})",
                question.id,
                question.choices.len()
            ));
        }
    }
    lines.push(format!(
        "{} slides, {} points attainable",
        lesson.slide_count(),
        lesson.max_score()
    ));
    lines
}

/// Format the completion log as an aligned listing (the CSV export is the
/// `log` command itself).
pub fn format_log_listing(records: &[CompletionRecord]) -> Vec<String> {
    if records.is_empty() {
        return vec!["No completions recorded yet".to_string()];
    }
    let mut lines = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        lines.push(format!(
            "{:0>3} {} {} <{}> score {}",
            index + 1,
            record.timestamp_utc.format("%Y-%m-%d %H:%M:%S"),
            record.name,
            record.email,
            record.score,
        ));
    }
    lines
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::stock_lesson;
    use std::collections::BTreeSet;

    #[test]
    fn slide_format_includes_header_and_body() {
        let lesson = stock_lesson();
        let session = Session::new();
        let slide = lesson.slide_at(1).unwrap();
        let lines = format_slide(slide, 1, 5, &session);
        assert!(lines[0].contains("Slide 1/5: What is neurodiversity?"));
        assert!(lines[1].contains("Neurodiversity describes"));
    }

    #[test]
    fn question_format_numbers_choices() {
        let lesson = stock_lesson();
        let question = lesson.question("q_definition").unwrap();
        let lines = format_question(question, None);
        assert!(lines[0].contains("best defines neurodiversity"));
        assert!(lines[1].starts_with("  [1] "));
        assert!(lines[4].starts_with("  [4] "));
    }

    #[test]
    fn question_format_shows_multi_cap_and_selection() {
        let lesson = stock_lesson();
        let question = lesson.question("q_myths").unwrap();
        let answer = Answer::Multi(BTreeSet::from([
            "myth_intelligence".to_string(),
            "myth_visible".to_string(),
        ]));
        let lines = format_question(question, Some(&answer));
        assert!(lines[0].ends_with("(pick up to 3)"));
        // myth_intelligence is choice 1, myth_visible is choice 5
        assert_eq!(lines.last().unwrap(), "Current selection: 1, 5");
    }

    #[test]
    fn summary_contains_score_and_paths() {
        let mut session = Session::new();
        session.name = "Ada".into();
        session.score = 5;
        let lines = format_summary(
            &session,
            5,
            Path::new("completions.csv"),
            Path::new("certificates/cert.png"),
            Some("https://example.com/share"),
        );
        assert!(lines[1].contains("Score: 5/5"));
        assert!(lines.iter().any(|l| l.contains("completions.csv")));
        assert!(lines.iter().any(|l| l.contains("https://example.com/share")));
    }

    #[test]
    fn check_format_summarizes_deck() {
        let lesson = stock_lesson();
        let lines = format_check(&lesson);
        assert!(lines[0].contains("The Neuro Niche"));
        assert!(lines.iter().any(|l| l.contains("004 Inclusion at work (content only)")));
        assert!(lines.last().unwrap().contains("5 slides, 5 points"));
    }

    #[test]
    fn empty_log_listing_has_placeholder() {
        let lines = format_log_listing(&[]);
        assert_eq!(lines, vec!["No completions recorded yet".to_string()]);
    }
}
