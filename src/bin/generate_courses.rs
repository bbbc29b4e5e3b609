use std::process::ExitCode;

use clap::Parser;

use learnhub::config::{AppConfig, is_development_env};
use learnhub::db;
use learnhub::generator::{CourseGenerator, check_request};

#[derive(Parser, Debug)]
#[command(name = "generate-courses", about = "Generate courses from a JSON description")]
struct Args {
    /// JSON object: {"courses": [{organization, number, run, fields, user?}, ...]}
    courses: String,

    /// Treat this run as a development environment regardless of APP_ENV.
    #[arg(long)]
    dev: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Reject the environment and document before any database settings are needed.
    let _ = dotenvy::dotenv();
    let app_env = std::env::var("APP_ENV").unwrap_or_default();
    let development = args.dev || is_development_env(&app_env);
    let courses = match check_request(&args.courses, development) {
        Ok(courses) => courses,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let pool = match db::init_pool(&config.database_url, config.db_max_connections).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to connect to database: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = db::run_migrations(&pool).await {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let generator = CourseGenerator::new(&pool, config.fallback_user.clone());
    let report = generator.generate(&courses).await;
    for skipped in &report.skipped {
        log::debug!("Skipped course #{}: {}", skipped.index, skipped.reasons.join("; "));
    }
    ExitCode::SUCCESS
}
