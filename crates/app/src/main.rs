use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use game_core::model::{QuizId, TopicId, UserId};
use serde::Serialize;
use services::{Clock, GameConfig, LearningService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::{Cli, Commands};

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:"
        || trimmed.starts_with("sqlite://")
        || trimmed.contains("mode=memory")
    {
        return trimmed.to_owned();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its directory so the pool can open it.
fn prepare_sqlite_file(db_url: &str) -> Result<()> {
    let Some(path) = db_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid --db value: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("creating {}", path.display()))?;
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let out = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{out}");
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let db_url = normalize_sqlite_url(&cli.db);
    prepare_sqlite_file(&db_url)?;

    let service = LearningService::new_sqlite(&db_url, Clock::system(), GameConfig::from_env())
        .await
        .with_context(|| format!("opening {db_url}"))?;
    let compact = cli.compact;

    match cli.command {
        Commands::Topics => print_json(&service.get_topics().await?, compact),
        Commands::Topic { topic_id } => {
            let topic = service.get_topic(&TopicId::new(topic_id)?).await?;
            print_json(&topic, compact)
        }
        Commands::CompleteTopic { user, topic_id } => {
            let reply = service
                .complete_topic(&TopicId::new(topic_id)?, &UserId::new(user)?)
                .await?;
            print_json(&reply, compact)
        }
        Commands::Quiz { quiz_id } => {
            let quiz = service.get_quiz(&QuizId::new(quiz_id)?).await?;
            print_json(&quiz, compact)
        }
        Commands::SubmitQuiz {
            user,
            quiz_id,
            answers,
        } => {
            let reply = service
                .submit_quiz(&QuizId::new(quiz_id)?, &UserId::new(user)?, answers)
                .await?;
            print_json(&reply, compact)
        }
        Commands::Resources => print_json(&service.get_resources().await?, compact),
        Commands::CompleteResource { user } => {
            let reply = service.complete_resource(&UserId::new(user)?).await?;
            print_json(&reply, compact)
        }
        Commands::Progress { user } => {
            let report = service.get_progress(&UserId::new(user)?).await?;
            print_json(&report, compact)
        }
        Commands::Recommendations => print_json(&service.get_recommendations().await?, compact),
        Commands::Feedback {
            user,
            topic_id,
            rating,
            comment,
        } => {
            let reply = service
                .submit_feedback(&UserId::new(user)?, &TopicId::new(topic_id)?, rating, &comment)
                .await?;
            print_json(&reply, compact)
        }
        Commands::Challenges => print_json(&service.get_challenges().await?, compact),
        Commands::Start { user } => {
            let reply = service.start_game(&UserId::new(user)?).await?;
            print_json(&reply, compact)
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        tracing::error!(error = %err, "command failed");
        eprintln!("{err:#}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_urls_pass_through() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:file:demo?mode=memory&cache=shared"),
            "sqlite:file:demo?mode=memory&cache=shared"
        );
    }

    #[test]
    fn relative_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:data/dev.sqlite3");
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/dev.sqlite3"));
    }
}
