use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use aula::api::{ApiClient, ApiError, TokenStore};
use aula::certificate::{Certificate, DEFAULT_STUDENT_NAME};
use aula::course::model::{CourseId, Lesson, LessonId, LessonKind};
use aula::course::progression;
use aula::kardex::{self, GradeStatus};
use aula::player::CoursePlayer;
use aula::tutor::{TutorClient, TutorError};
use aula::Config;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "aula")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the platform and store the session token
    Login {
        /// Account email
        email: String,
        /// Account password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Discard the stored session token
    Logout,
    /// List the course catalog
    Courses,
    /// Show a course's modules, lessons and progress
    Show {
        /// Course id
        course_id: u64,
    },
    /// Mark a lesson complete
    Complete {
        /// Course id
        course_id: u64,
        /// Lesson id (defaults to the lesson up next)
        lesson_id: Option<u64>,
    },
    /// Ask the AI tutor to explain a lesson
    Explain {
        /// Course id
        course_id: u64,
        /// Lesson id (defaults to the lesson up next)
        lesson_id: Option<u64>,
    },
    /// Issue a completion certificate for a finished course
    Certificate {
        /// Course id
        course_id: u64,
        /// Student name printed on the certificate
        #[arg(long, default_value = DEFAULT_STUDENT_NAME)]
        name: String,
        /// Output path (defaults into the certificates directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Browse or add to the community portfolio
    Portfolio {
        #[command(subcommand)]
        command: PortfolioCommands,
    },
    /// Show the academic kardex (grade history)
    Kardex,
    /// Catalog management (teacher and admin accounts)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
enum PortfolioCommands {
    /// List uploaded projects
    List,
    /// Upload a project file (.jpg, .png or .pdf)
    Upload {
        /// Project title
        title: String,
        /// Short description
        #[arg(short, long, default_value = "")]
        description: String,
        /// File to upload
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Create a course in the catalog
    CreateCourse {
        /// Course title
        title: String,
        /// Course description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Thumbnail URL
        #[arg(long, default_value = "https://picsum.photos/400/225")]
        thumbnail: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aula=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    let result = match cli.command {
        Commands::Login { email, password } => login(&config, &email, password).await,
        Commands::Logout => logout(),
        Commands::Courses => list_courses(&config).await,
        Commands::Show { course_id } => show_course(&config, CourseId::new(course_id)).await,
        Commands::Complete { course_id, lesson_id } => {
            complete_lesson(&config, CourseId::new(course_id), lesson_id.map(LessonId::new)).await
        }
        Commands::Explain { course_id, lesson_id } => {
            explain_lesson(&config, CourseId::new(course_id), lesson_id.map(LessonId::new)).await
        }
        Commands::Certificate { course_id, name, output } => {
            issue_certificate(&config, CourseId::new(course_id), &name, output).await
        }
        Commands::Portfolio { command } => match command {
            PortfolioCommands::List => list_projects(&config).await,
            PortfolioCommands::Upload { title, description, file } => {
                upload_project(&config, &title, &description, &file).await
            }
        },
        Commands::Kardex => show_kardex(&config).await,
        Commands::Admin { command } => match command {
            AdminCommands::CreateCourse { title, description, thumbnail } => {
                create_course(&config, &title, &description, &thumbnail).await
            }
        },
    };

    if let Err(error) = &result {
        print_hint(error);
    }
    result
}

/// One-line followup for errors with an obvious next step.
///
/// The whole cause chain is searched, so an API rejection wrapped in a
/// session error still produces the login hint.
fn print_hint(error: &anyhow::Error) {
    let requires_login = error
        .chain()
        .any(|cause| cause.downcast_ref::<ApiError>().is_some_and(ApiError::requires_login));
    let tutor_recoverable = error
        .chain()
        .any(|cause| cause.downcast_ref::<TutorError>().is_some_and(TutorError::is_recoverable));

    if requires_login {
        eprintln!("Hint: run `aula login <email>` to start a session.");
    } else if tutor_recoverable {
        eprintln!("Hint: the tutor request can be retried.");
    }
}

/// Client carrying the stored session token
fn authenticated_client(config: &Config) -> Result<ApiClient> {
    let token = TokenStore::get_token()?;
    Ok(ApiClient::with_token(config.api_base_url.clone(), token))
}

async fn login(config: &Config, email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => {
            print!("Password: ");
            std::io::stdout().flush()?;
            let mut line = String::new();
            std::io::stdin().read_line(&mut line)?;
            line.trim_end().to_string()
        }
    };

    let client = ApiClient::new(config.api_base_url.clone());
    let auth = client.login(email, &password).await.context("Login failed")?;
    TokenStore::set_token(&auth.token)?;

    println!("Logged in as {} ({:?})", auth.user.name, auth.user.role);
    println!("Session token stored: {}", TokenStore::mask_token(&auth.token));
    if auth.user.role.can_manage_courses() {
        println!("Catalog management is available under `aula admin`.");
    }
    Ok(())
}

fn logout() -> Result<()> {
    if TokenStore::has_token() {
        TokenStore::delete_token()?;
        println!("Logged out.");
    } else {
        println!("No session to discard.");
    }
    Ok(())
}

async fn list_courses(config: &Config) -> Result<()> {
    let client = authenticated_client(config)?;
    let courses = client.fetch_courses().await?;

    if courses.is_empty() {
        println!("The catalog is empty.");
        return Ok(());
    }

    for course in &courses {
        // Catalog entries come without module trees; the progress figure
        // is the server's display hint.
        println!("[{:>4}] {}  {}", course.id, progress_bar(course.progress), course.title);
        if !course.description.is_empty() {
            println!("       {}", course.description);
        }
    }
    Ok(())
}

async fn show_course(config: &Config, course_id: CourseId) -> Result<()> {
    let client = authenticated_client(config)?;
    let course = client.fetch_course(course_id).await?;
    let player = CoursePlayer::new(course);

    print_course_tree(&player);
    Ok(())
}

fn print_course_tree(player: &CoursePlayer) {
    let course = player.course();
    println!("{}  {} {}%", course.title, progress_bar(player.progress()), player.progress());
    println!();

    let active = player.active_lesson().map(|l| l.id);
    for module in course.modules_in_order() {
        println!("  {}", module.title);
        let locks = progression::lock_states(module);
        for (index, lesson) in module.lessons_in_order().into_iter().enumerate() {
            let marker = if lesson.is_completed {
                "✔"
            } else if locks[index] {
                "🔒"
            } else if active == Some(lesson.id) {
                "▶"
            } else {
                "·"
            };
            println!("    {} [{:>4}] {}{}", marker, lesson.id, lesson.title, lesson_tag(lesson));
        }
    }

    println!();
    if player.is_complete() {
        println!("Course complete. Issue your certificate with `aula certificate {}`.", course.id);
    } else if let Some(next) = player.active_lesson() {
        println!("Up next: {} [{}]", next.title, next.id);
        if let Some(url) = next.watch_url() {
            println!("Watch:   {}", url);
        }
    } else {
        println!("This course has no lessons yet.");
    }
}

fn lesson_tag(lesson: &Lesson) -> String {
    match lesson.kind {
        LessonKind::Quiz => match lesson.score {
            Some(score) => format!("  (quiz, score {score}%)"),
            None => "  (quiz)".to_string(),
        },
        LessonKind::Video => String::new(),
    }
}

async fn complete_lesson(
    config: &Config,
    course_id: CourseId,
    lesson_id: Option<LessonId>,
) -> Result<()> {
    let client = authenticated_client(config)?;
    let course = client.fetch_course(course_id).await?;
    let mut player = CoursePlayer::new(course);

    let target = match lesson_id.or_else(|| player.active_lesson().map(|l| l.id)) {
        Some(id) => id,
        None => {
            println!("This course has no lessons to complete.");
            return Ok(());
        }
    };

    player.complete_lesson(&client, target).await?;
    println!("Lesson {} completed. Course progress: {}%", target, player.progress());

    if player.is_complete() {
        println!("Course complete. Issue your certificate with `aula certificate {}`.", course_id);
    } else if let Some(next) = progression::select_initial_lesson(player.course()) {
        println!("Up next: {} [{}]", next.title, next.id);
    }
    Ok(())
}

async fn explain_lesson(
    config: &Config,
    course_id: CourseId,
    lesson_id: Option<LessonId>,
) -> Result<()> {
    let client = authenticated_client(config)?;
    let course = client.fetch_course(course_id).await?;
    let mut player = CoursePlayer::new(course);

    let lesson = match lesson_id {
        // Explicit ids go through the session's lock check before any
        // prompt is built.
        Some(id) => player.open_lesson(id)?,
        None => match player.active_lesson() {
            Some(lesson) => lesson,
            None => {
                println!("This course has no lessons to explain.");
                return Ok(());
            }
        },
    };

    let tutor = TutorClient::from_env(config.tutor_model.clone())?;
    let explanation = tutor.explain_lesson(lesson).await?;

    println!("{}", lesson.title);
    println!();
    println!("{}", explanation);
    Ok(())
}

async fn issue_certificate(
    config: &Config,
    course_id: CourseId,
    name: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let client = authenticated_client(config)?;
    let course = client.fetch_course(course_id).await?;

    let issued_on = chrono::Local::now().date_naive();
    let cert = Certificate::for_course(&course, name, issued_on)?;

    let output = match output {
        Some(path) => path,
        None => {
            let dir = Config::certificates_dir()?;
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            dir.join(format!("course-{}.md", course_id))
        }
    };
    cert.save(&output)?;

    println!("Certificate for \"{}\" written to {}", course.title, output.display());
    Ok(())
}

async fn list_projects(config: &Config) -> Result<()> {
    let client = authenticated_client(config)?;
    let projects = client.fetch_projects().await?;

    if projects.is_empty() {
        println!("No projects uploaded yet. Be the first!");
        return Ok(());
    }

    for project in &projects {
        let tag = if project.is_pdf() { "PDF" } else { "IMG" };
        let date = project
            .created_on()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| project.created_at.clone());
        println!("[{}] {}  ({})", tag, project.title, date);
        if !project.description.is_empty() {
            println!("      {}", project.description);
        }
        println!("      {}", project.file_path);
    }
    Ok(())
}

async fn upload_project(
    config: &Config,
    title: &str,
    description: &str,
    file: &std::path::Path,
) -> Result<()> {
    let client = authenticated_client(config)?;
    let project = client.upload_project(title, description, file).await?;
    println!("Uploaded \"{}\" as project {}.", project.title, project.id);
    Ok(())
}

async fn show_kardex(config: &Config) -> Result<()> {
    let client = authenticated_client(config)?;
    let records = client.fetch_kardex().await?;

    if records.is_empty() {
        println!("No grades recorded yet.");
        return Ok(());
    }

    for record in &records {
        let status = match record.status {
            GradeStatus::Pass => "Pass",
            GradeStatus::Fail => "FAIL",
        };
        println!(
            "{:<8} {:<40} {:>5.1}  {}",
            record.quarter, record.course_name, record.grade, status
        );
    }

    let summary = kardex::summarize(&records);
    println!();
    match summary.average {
        Some(average) => println!(
            "{} courses, {} passed, {} failed. Average grade {:.1}",
            summary.courses, summary.passed, summary.failed, average
        ),
        None => println!("{} courses.", summary.courses),
    }
    Ok(())
}

async fn create_course(
    config: &Config,
    title: &str,
    description: &str,
    thumbnail: &str,
) -> Result<()> {
    let client = authenticated_client(config)?;
    client.create_course(title, description, thumbnail).await?;
    println!("Course \"{}\" created.", title);
    Ok(())
}

/// Ten-segment progress bar for catalog and course views
fn progress_bar(percent: u8) -> String {
    let filled = (percent.min(100) as usize) / 10;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(10 - filled))
}
