//! LearnAnySkills terminal client
//!
//! Browses courses, generates lesson content and tracks progress against a
//! learning platform backend.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use learnaskill_core::format::{format_duration, lesson_slug};
use learnaskill_core::pages::{
    CourseDetailPage, CourseListPage, HomePage, LessonPage, ProgressPage,
};
use learnaskill_core::{
    ClientConfig, FileStore, LearnApi, PageError, UpdateProgressRequest, UserIdentity,
};
use tracing_subscriber::EnvFilter;

/// LearnAnySkills - AI-assisted courses in the terminal
#[derive(Parser, Debug)]
#[command(name = "learnaskill")]
#[command(version, about, long_about = None)]
struct Args {
    /// Backend base URL
    #[arg(long, value_name = "URL", env = "NEXT_PUBLIC_API_URL", global = true)]
    api_url: Option<String>,

    /// Directory holding persisted client state
    #[arg(long, value_name = "DIR", env = "LEARNASKILL_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Landing page with featured courses
    Home,
    /// All courses
    Courses,
    /// Course overview and its lessons
    Course {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Lessons of a course
    Lessons {
        #[arg(value_name = "COURSE_ID")]
        course_id: i64,
    },
    /// Lesson page; `--begin` generates the full content
    Lesson {
        #[arg(value_name = "ID")]
        id: String,
        #[arg(long)]
        begin: bool,
    },
    /// Learning progress per course
    Progress {
        /// Show another user's progress instead of the local one
        #[arg(long, value_name = "ID")]
        user: Option<String>,
    },
    /// Record progress on a lesson
    UpdateProgress {
        #[arg(value_name = "LESSON_ID")]
        lesson_id: i64,
        #[arg(long, value_name = "N")]
        percent: Option<u32>,
        #[arg(long, value_name = "N")]
        minutes: Option<u32>,
        #[arg(long)]
        completed: bool,
    },
    /// Backend health check
    Health,
    /// Print the local anonymous user id
    Whoami,
    /// Forget the local anonymous user id
    Forget,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", failure_line(&e));
            if let Some(page) = e.downcast_ref::<PageError>() {
                eprintln!("{} -> {}", page.back_label(), page.back_link());
            }
            ExitCode::from(1)
        }
    }
}

/// Top-level failure with its whole cause chain.
fn failure_line(e: &anyhow::Error) -> String {
    format!("Error: {e:#}")
}

fn resolve_config(args: &Args) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(url) = args.api_url.as_deref().filter(|u| !u.trim().is_empty()) {
        config.base_url = url.trim().to_string();
    }
    if let Some(dir) = &args.data_dir {
        config.data_dir = Some(dir.clone());
    }
    config
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = resolve_config(&args);
    tracing::debug!(base_url = %config.base_url, data_dir = ?config.data_dir, "resolved config");

    let api = LearnApi::from_config(&config);
    let identity = match config.state_file() {
        Some(path) => UserIdentity::new(FileStore::new(path)),
        None => UserIdentity::detached(),
    };

    match args.command {
        Command::Home => println!("{}", HomePage::load(&api)?),
        Command::Courses => println!("{}", CourseListPage::load(&api)?),
        Command::Course { id } => println!("{}", CourseDetailPage::load(&api, &id)?),
        Command::Lessons { course_id } => {
            let listing = api
                .get_course_lessons(course_id)
                .with_context(|| format!("listing lessons of course {course_id}"))?;
            println!("{}", listing.course_title);
            println!();
            for lesson in &listing.lessons {
                let ready = if lesson.content_available() { "*" } else { " " };
                println!(
                    "{ready} {:>2}. [{}] {} ({})",
                    lesson.lesson_number,
                    lesson.id,
                    lesson.title,
                    format_duration(&lesson.estimated_duration)
                );
                println!("       {}", lesson_slug(&listing.course_title, &lesson.title));
            }
        }
        Command::Lesson { id, begin } => {
            let mut page = LessonPage::load(&api, &identity, &id)?;
            if begin && page.call_to_action().is_some() {
                println!("Generating lesson content...");
                page.begin(&api, &identity)?;
            }
            println!("{page}");
        }
        Command::Progress { user } => {
            let user_id = match user {
                Some(user) => user,
                None => identity.user_id()?,
            };
            println!("{}", ProgressPage::load(&api, &user_id)?);
        }
        Command::UpdateProgress {
            lesson_id,
            percent,
            minutes,
            completed,
        } => {
            let mut input = UpdateProgressRequest::new(identity.user_id()?);
            input.completion_percentage = percent;
            input.time_spent_minutes = minutes;
            input.is_completed = completed.then_some(true);
            let result = api
                .update_progress(lesson_id, &input)
                .with_context(|| format!("updating progress for lesson {lesson_id}"))?;
            println!("{}", result.message);
            if let Some(progress) = result.progress {
                println!(
                    "lesson {}: {}% complete, {} min, completed: {}",
                    progress.lesson_id,
                    progress.completion_percentage,
                    progress.time_spent_minutes,
                    progress.is_completed
                );
            }
        }
        Command::Health => {
            let health = api.check_health().context("backend health check failed")?;
            println!("{} {} ({})", health.service, health.version, health.status);
        }
        Command::Whoami => {
            println!("{}", identity.user_id()?);
            match config.state_file() {
                Some(path) => println!("stored in {}", path.display()),
                None => println!("not persisted"),
            }
        }
        Command::Forget => {
            identity.clear_user_data()?;
            println!("Cleared local user data");
        }
    }
    Ok(())
}
