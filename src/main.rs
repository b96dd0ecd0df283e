use clap::{Parser, Subcommand};
use neuro_niche::certificate::{self, Branding, FontSet};
use neuro_niche::completions::CompletionLog;
use neuro_niche::config::{self, LessonConfig};
use neuro_niche::lesson::Lesson;
use neuro_niche::runner::{Console, Runner};
use neuro_niche::{output, share};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "neuro-niche")]
#[command(about = "Interactive neurodiversity micro-lesson for the terminal")]
#[command(long_about = "\
Interactive neurodiversity micro-lesson for the terminal

Four content slides, a final quiz, and a printable certificate. Completions
are appended to a CSV log; each finished attempt produces a timestamped PNG
certificate under the certificates directory.

Lesson flow:

  entry (name + email)
  ├── Slide 1: What is neurodiversity?      (1 question)
  ├── Slide 2: Myths and facts              (select-all, exact set scored)
  ├── Slide 3: Inclusive language           (1 question)
  ├── Slide 4: Inclusion at work            (content only)
  ├── Slide 5: Final quiz                   (2 questions)
  └── finish → score, log row, certificate, optional share link

Everything is configurable through lesson.toml — course identity, output
paths, certificate fonts, and the entire slide deck with its answer key.
A missing lesson.toml means \"use the built-in lesson\".

Run 'neuro-niche gen-config' to print a documented lesson.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Lesson configuration file
    #[arg(long, default_value = "lesson.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the interactive lesson
    Run {
        /// Persist session state here and resume an interrupted attempt
        #[arg(long)]
        state_file: Option<PathBuf>,
        /// Public URL of the hosted lesson, enables the share link
        #[arg(long)]
        app_url: Option<String>,
    },
    /// Regenerate a certificate for a name and score
    Certificate {
        /// Learner name as it should appear on the certificate
        name: String,
        /// Achieved score
        score: u32,
    },
    /// List recorded completions
    Log {
        /// Emit raw CSV instead of the aligned listing
        #[arg(long)]
        csv: bool,
    },
    /// Print the share link for a public app URL
    Share {
        /// Public URL of the hosted lesson
        app_url: String,
    },
    /// Validate the lesson configuration without running
    Check,
    /// Print a stock lesson.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = LessonConfig::load_or_default(&cli.config)?;
    let lesson = Lesson::from_config(&config)?;

    match cli.command {
        Command::Run {
            state_file,
            app_url,
        } => {
            let mut runner = Runner::new(&lesson, &config, Console, state_file);
            runner.run(app_url.as_deref())?;
        }
        Command::Certificate { name, score } => {
            if score > lesson.max_score() {
                return Err(format!(
                    "score {score} is out of range (this lesson scores 0-{})",
                    lesson.max_score()
                )
                .into());
            }
            let fonts = FontSet::load(
                config.certificate.font_regular.as_deref(),
                config.certificate.font_bold.as_deref(),
            );
            let branding = Branding {
                brand: config.course.brand.clone(),
                tagline: config.course.tagline.clone(),
                course_title: config.course.title.clone(),
                issuer: config.course.issuer.clone(),
            };
            let certificate = certificate::issue(
                &name,
                score,
                lesson.max_score(),
                &branding,
                &fonts,
                &config.certificate.file_prefix,
                &config.paths.certificates_dir,
                chrono::Utc::now(),
            )?;
            println!(
                "Certificate written: {}",
                config
                    .paths
                    .certificates_dir
                    .join(&certificate.filename)
                    .display()
            );
        }
        Command::Log { csv } => {
            let log = CompletionLog::new(&config.paths.completion_log);
            if csv {
                print!("{}", log.to_csv_string()?);
            } else {
                output::print_lines(&output::format_log_listing(&log.read_all()));
            }
        }
        Command::Share { app_url } => {
            println!("{}", share::share_url(&app_url)?);
        }
        Command::Check => {
            println!("==> Checking {}", cli.config.display());
            config.validate()?;
            output::print_lines(&output::format_check(&lesson));
            println!("==> Lesson is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
