//! Command-line definition for the `learn` binary.

use clap::{Parser, Subcommand};
use game_core::model::Answer;

/// Gamified learning platform: catalog reads, XP, and progress.
#[derive(Parser, Debug)]
#[command(name = "learn")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// SQLite database URL or file path
    #[arg(long, global = true, env = "LEARN_DB_URL", default_value = "sqlite:dev.sqlite3")]
    pub db: String,

    /// Print compact JSON instead of pretty-printed output
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every topic
    Topics,
    /// Show one topic with its quizzes
    Topic { topic_id: String },
    /// Mark a topic finished for a user
    CompleteTopic {
        #[arg(long)]
        user: String,
        topic_id: String,
    },
    /// Show one quiz
    Quiz { quiz_id: String },
    /// Grade answers to a quiz
    SubmitQuiz {
        #[arg(long)]
        user: String,
        quiz_id: String,
        /// Answer as QUESTION_ID=OPTION, repeatable
        #[arg(long = "answer", value_parser = parse_answer)]
        answers: Vec<Answer>,
    },
    /// List every resource
    Resources,
    /// Mark a resource finished for a user
    CompleteResource {
        #[arg(long)]
        user: String,
    },
    /// Show a user's progress across the catalog
    Progress {
        #[arg(long)]
        user: String,
    },
    /// List recommended topics
    Recommendations,
    /// Rate a topic
    Feedback {
        #[arg(long)]
        user: String,
        topic_id: String,
        #[arg(long)]
        rating: u8,
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// List challenges
    Challenges,
    /// Create a user's ledger and completion record
    Start {
        #[arg(long)]
        user: String,
    },
}

fn parse_answer(raw: &str) -> Result<Answer, String> {
    let (question, option) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected QUESTION_ID=OPTION, got `{raw}`"))?;
    Answer::new(question, option).map_err(|e| e.to_string())
}
