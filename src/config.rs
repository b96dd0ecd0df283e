//! Lesson configuration module.
//!
//! Handles loading and validating `lesson.toml`. One config file describes the
//! whole lesson: course identity, file locations, and the full slide/question
//! set with its answer key. Stock defaults reproduce the built-in Neuro Niche
//! lesson, so the binary is fully functional with no config file at all.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown by `neuro-niche gen-config`
//!
//! [course]
//! title = "The Neuro Niche: Understanding Neurodiversity at Work"
//! brand = "Neuro Niche"
//! tagline = "Practical neuroinclusion training"
//! issuer = "Neuro Niche Learning"
//!
//! [paths]
//! completion_log = "completions.csv"   # CSV completion log
//! certificates_dir = "certificates"    # Archived certificate PNGs
//!
//! [certificate]
//! file_prefix = "neuro_niche_certificate"
//! font_regular = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"
//! font_bold = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"
//!
//! [[slides]]
//! id = "what-is-neurodiversity"
//! title = "What is neurodiversity?"
//! body = "..."
//!
//! [[slides.questions]]
//! id = "q_definition"
//! prompt = "Which statement best defines neurodiversity?"
//! kind = "single"                      # "single" or "multi"
//! choices = [
//!     { id = "medical_condition", label = "..." },
//!     { id = "natural_variation", label = "..." },
//! ]
//! answer = "natural_variation"         # single-select key (choice id)
//! # answer_set = ["a", "b", "c"]       # multi-select key (exact set)
//! # max_selections = 3                 # optional multi-select cap
//! # scored = false                     # survey-style, excluded from scoring
//! ```
//!
//! ## Partial Configuration
//!
//! `[course]`, `[paths]`, and `[certificate]` are sparse — override just the
//! values you want. Defining any `[[slides]]` table replaces the *entire*
//! stock slide set: a question set is an answer key, and merging two answer
//! keys produces neither.
//!
//! Unknown keys are rejected to catch typos early.
//!
//! Cross-field rules (unique question ids, answer keys referencing real
//! choices) live in [`crate::lesson::Lesson::from_config`], which consumes
//! this config; `validate` here covers only per-field shape.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Lesson configuration loaded from `lesson.toml`.
///
/// All fields have stock defaults. User config files need only specify the
/// values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LessonConfig {
    /// Course and brand identity (certificate header, CLI banners).
    pub course: CourseConfig,
    /// Output file locations.
    pub paths: PathsConfig,
    /// Certificate rendering settings.
    pub certificate: CertificateConfig,
    /// The slide deck, in presentation order. The last slide is the quiz.
    pub slides: Vec<SlideConfig>,
}

impl Default for LessonConfig {
    fn default() -> Self {
        Self {
            course: CourseConfig::default(),
            paths: PathsConfig::default(),
            certificate: CertificateConfig::default(),
            slides: stock_slides(),
        }
    }
}

impl LessonConfig {
    /// Load config from a TOML file, or fall back to stock defaults when the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate per-field shape. Cross-field answer-key consistency is
    /// checked when the runtime [`crate::lesson::Lesson`] is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slides.is_empty() {
            return Err(ConfigError::Validation("slides must not be empty".into()));
        }
        if self.course.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "course.title must not be blank".into(),
            ));
        }
        if self.certificate.file_prefix.trim().is_empty() {
            return Err(ConfigError::Validation(
                "certificate.file_prefix must not be blank".into(),
            ));
        }
        for slide in &self.slides {
            if slide.id.trim().is_empty() {
                return Err(ConfigError::Validation("slide id must not be blank".into()));
            }
            for question in &slide.questions {
                if question.choices.len() < 2 {
                    return Err(ConfigError::Validation(format!(
                        "question '{}' needs at least two choices",
                        question.id
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Course and brand identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CourseConfig {
    /// Full course title, shown on the certificate.
    pub title: String,
    /// Short brand name (header band, logo glyph initials).
    pub brand: String,
    /// One-line brand tagline under the brand name.
    pub tagline: String,
    /// Issuing authority shown in the certificate footer.
    pub issuer: String,
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            title: "The Neuro Niche: Understanding Neurodiversity at Work".into(),
            brand: "Neuro Niche".into(),
            tagline: "Practical neuroinclusion training".into(),
            issuer: "Neuro Niche Learning".into(),
        }
    }
}

/// Output file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// CSV completion log, appended once per finished attempt.
    pub completion_log: PathBuf,
    /// Directory where archival certificate copies are written.
    pub certificates_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            completion_log: PathBuf::from("completions.csv"),
            certificates_dir: PathBuf::from("certificates"),
        }
    }
}

/// Certificate rendering settings.
///
/// Font paths are optional. When absent (or unloadable) the renderer falls
/// back to the built-in font — see [`crate::certificate::fonts`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CertificateConfig {
    /// Filename prefix; the issue timestamp is appended.
    pub file_prefix: String,
    /// Preferred regular-weight TTF/OTF file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_regular: Option<PathBuf>,
    /// Preferred bold-weight TTF/OTF file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_bold: Option<PathBuf>,
}

impl Default for CertificateConfig {
    fn default() -> Self {
        Self {
            file_prefix: "neuro_niche_certificate".into(),
            font_regular: None,
            font_bold: None,
        }
    }
}

/// One slide of the lesson, optionally carrying questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlideConfig {
    pub id: String,
    pub title: String,
    /// Instructional body text shown above any questions.
    pub body: String,
    #[serde(default)]
    pub questions: Vec<QuestionConfig>,
}

/// Selection mode of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Single,
    Multi,
}

/// One question with its choices and answer key.
///
/// Choices carry stable ids so the scoring key never depends on display
/// text — labels can be reworded without invalidating the answer key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestionConfig {
    pub id: String,
    pub prompt: String,
    #[serde(default = "default_kind")]
    pub kind: QuestionKind,
    pub choices: Vec<ChoiceConfig>,
    /// Single-select answer key: the correct choice id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// Multi-select answer key: the exact set of choice ids that must be
    /// selected — no more, no fewer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answer_set: Vec<String>,
    /// Optional cap on how many choices a multi-select accepts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_selections: Option<usize>,
    /// Whether this question contributes to the score. Default true.
    #[serde(default = "default_scored")]
    pub scored: bool,
}

fn default_kind() -> QuestionKind {
    QuestionKind::Single
}

fn default_scored() -> bool {
    true
}

/// A selectable choice: stable id + display label.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChoiceConfig {
    pub id: String,
    pub label: String,
}

// ============================================================================
// Stock lesson
// ============================================================================

fn single(id: &str, prompt: &str, choices: &[(&str, &str)], answer: &str) -> QuestionConfig {
    QuestionConfig {
        id: id.into(),
        prompt: prompt.into(),
        kind: QuestionKind::Single,
        choices: choices
            .iter()
            .map(|(id, label)| ChoiceConfig {
                id: (*id).into(),
                label: (*label).into(),
            })
            .collect(),
        answer: Some(answer.into()),
        answer_set: Vec::new(),
        max_selections: None,
        scored: true,
    }
}

/// The built-in Neuro Niche slide deck: four content slides followed by a
/// two-question quiz. Five scored questions in total, one point each.
fn stock_slides() -> Vec<SlideConfig> {
    vec![
        SlideConfig {
            id: "what-is-neurodiversity".into(),
            title: "What is neurodiversity?".into(),
            body: "Neurodiversity describes the natural range of differences in how \
                   human brains work, including autism, ADHD, dyslexia, dyspraxia, \
                   and Tourette syndrome. These differences shape how people think, \
                   learn, focus, and communicate."
                .into(),
            questions: vec![single(
                "q_definition",
                "Which statement best defines neurodiversity?",
                &[
                    (
                        "medical_condition",
                        "A medical condition that needs to be cured",
                    ),
                    (
                        "natural_variation",
                        "The natural variation in how human brains work",
                    ),
                    ("learning_style", "A trendy name for different learning styles"),
                    ("rare_trait", "A rare trait affecting very few people"),
                ],
                "natural_variation",
            )],
        },
        SlideConfig {
            id: "myths-and-facts".into(),
            title: "Myths and facts".into(),
            body: "Misconceptions about neurodivergent people are common and shape \
                   hiring, promotion, and everyday collaboration. Read each statement \
                   carefully; some below are flatly wrong."
                .into(),
            questions: vec![QuestionConfig {
                id: "q_myths".into(),
                prompt: "Select ALL the statements that are incorrect.".into(),
                kind: QuestionKind::Multi,
                choices: vec![
                    ChoiceConfig {
                        id: "myth_intelligence".into(),
                        label: "Neurodivergent people are less intelligent".into(),
                    },
                    ChoiceConfig {
                        id: "fact_strengths".into(),
                        label: "Neurodivergent people often have distinctive strengths"
                            .into(),
                    },
                    ChoiceConfig {
                        id: "myth_outgrow".into(),
                        label: "Children outgrow autism and ADHD as adults".into(),
                    },
                    ChoiceConfig {
                        id: "fact_spectrum".into(),
                        label: "Traits vary widely from person to person".into(),
                    },
                    ChoiceConfig {
                        id: "myth_visible".into(),
                        label: "You can always tell when someone is neurodivergent".into(),
                    },
                ],
                answer: None,
                answer_set: vec![
                    "myth_intelligence".into(),
                    "myth_outgrow".into(),
                    "myth_visible".into(),
                ],
                max_selections: Some(3),
                scored: true,
            }],
        },
        SlideConfig {
            id: "inclusive-language".into(),
            title: "Inclusive language".into(),
            body: "Words signal whether differences are treated as deficits or as \
                   part of normal human variety. Inclusive descriptions focus on the \
                   person and what they bring, not on a diagnosis."
                .into(),
            questions: vec![single(
                "q_language",
                "Which is the most inclusive way to describe a neurodivergent colleague?",
                &[
                    ("suffers_from", "\"She suffers from ADHD\""),
                    ("despite", "\"He performs well despite being autistic\""),
                    (
                        "thinks_differently",
                        "\"They think differently and bring real strengths to the team\"",
                    ),
                    ("special_needs", "\"She is a special-needs employee\""),
                ],
                "thinks_differently",
            )],
        },
        SlideConfig {
            id: "inclusion-at-work".into(),
            title: "Inclusion at work".into(),
            body: "Small adjustments unlock large contributions: clear written \
                   instructions, flexible working patterns, quiet spaces, and \
                   judging output rather than conformity. Inclusion-first teams \
                   design for the whole range of minds from the start."
                .into(),
            questions: vec![],
        },
        SlideConfig {
            id: "quiz".into(),
            title: "Final quiz".into(),
            body: "Two last questions to check what stuck.".into(),
            questions: vec![
                single(
                    "q_prevalence",
                    "Roughly what share of the population is estimated to be neurodivergent?",
                    &[
                        ("one_percent", "About 1%"),
                        ("five_percent", "About 5%"),
                        ("fifteen_twenty", "Around 15-20%"),
                        ("half", "Over 50%"),
                    ],
                    "fifteen_twenty",
                ),
                single(
                    "q_practice",
                    "Which of these is an inclusion-first workplace practice?",
                    &[
                        (
                            "open_plan_only",
                            "Requiring everyone to work in a busy open-plan office",
                        ),
                        (
                            "written_instructions",
                            "Offering clear written instructions alongside meetings",
                        ),
                        (
                            "disclosure_required",
                            "Requiring a diagnosis before any adjustment is made",
                        ),
                        ("identical_process", "Applying one identical process to everyone"),
                    ],
                    "written_instructions",
                ),
            ],
        },
    ]
}

/// Return the stock `lesson.toml` content with a documentation banner.
///
/// The output round-trips: writing it to `lesson.toml` and loading it yields
/// exactly the built-in lesson.
pub fn stock_config_toml() -> String {
    let config = LessonConfig::default();
    let body = toml::to_string_pretty(&config)
        .unwrap_or_else(|e| format!("# failed to serialize stock config: {e}"));
    format!(
        "# neuro-niche lesson configuration\n\
         #\n\
         # Everything below is the stock lesson. Delete the sections you do not\n\
         # want to override; a missing lesson.toml means \"use all defaults\".\n\
         # Defining any [[slides]] table replaces the whole stock slide deck.\n\
         #\n\
         # Choice ids are the scoring key. Relabel choices freely; change ids\n\
         # only together with the matching `answer` / `answer_set` entries.\n\n\
         {body}"
    )
}
