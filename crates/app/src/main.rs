mod render;
mod repl;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use render::{render_notification, render_session, toggle_label, TerminalTheme};
use repl::Interactive;
use resume_search_core::{
    default_preference_path, ClientConfig, DisplayPreferenceStore, FeedbackSubmitter, HttpBackend,
    Notification, NotificationCenter, NotificationKind, SearchSession, SessionState,
    DEFAULT_API_URL,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "resume-search", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Search service base URL
    #[arg(long, env = "RESUME_SEARCH_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// API key sent with search requests
    #[arg(long, env = "RESUME_SEARCH_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Where the display preference is stored
    #[arg(long, env = "RESUME_SEARCH_PREFS")]
    prefs_file: Option<PathBuf>,

    /// Disable terminal colors.
    #[arg(long, default_value_t = false)]
    plain: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive search session (the default).
    Interactive,
    /// Run one search and print the ranked sentences.
    Search {
        /// Job requirement to match
        #[arg(long, default_value = "")]
        query: String,
        /// Number of results; values below 1 are raised to 1.
        #[arg(long, default_value = "5", allow_hyphen_values = true)]
        top_k: i64,
        /// Skip the LLM reranking pass.
        #[arg(long, default_value_t = false)]
        no_rerank: bool,
    },
    /// Send a relevance judgment for one sentence.
    Feedback {
        /// Query the judgment refers to
        #[arg(long, default_value = "")]
        query: String,
        /// Sentence hash of the result
        #[arg(long)]
        sentence_hash: String,
        #[arg(long, value_enum)]
        verdict: Verdict,
    },
    /// Show or change the display preference.
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Verdict {
    Relevant,
    NotRelevant,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ThemeAction {
    Show,
    Dark,
    Light,
    Toggle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::new(&cli.api_url, cli.api_key.clone())?;
    let backend = HttpBackend::new(config);
    let prefs_path = match &cli.prefs_file {
        Some(path) => path.clone(),
        None => default_preference_path()
            .context("cannot place the display preference file, pass --prefs-file")?,
    };
    let preferences = DisplayPreferenceStore::load(prefs_path);
    let theme = TerminalTheme::new(!cli.plain);
    preferences.subscribe(theme.clone());

    info!(
        version = app_version,
        api_url = %backend.config().base_url(),
        started_at = %Utc::now().to_rfc3339(),
        "resume-search boot"
    );

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => {
            let notifications = NotificationCenter::new();
            Interactive {
                session: Arc::new(SearchSession::new(backend.clone())),
                feedback: Arc::new(FeedbackSubmitter::new(backend, notifications.clone())),
                notifications,
                preferences,
                theme,
            }
            .run()
            .await?;
        }
        Command::Search {
            query,
            top_k,
            no_rerank,
        } => {
            let session = SearchSession::new(backend);
            session.set_query(query);
            session.set_top_k(top_k);
            session.set_rerank(!no_rerank);

            let state = session.submit().await.state;
            print!("{}", render_session(&state, &theme.palette()));
            search_outcome(&state)?;
        }
        Command::Feedback {
            query,
            sentence_hash,
            verdict,
        } => {
            let notifications = NotificationCenter::new();
            let submitter = FeedbackSubmitter::new(backend, notifications);
            let notification = submitter
                .send_feedback(query, sentence_hash, matches!(verdict, Verdict::Relevant))
                .await;
            println!("{}", render_notification(&notification, &theme.palette()));
            feedback_outcome(&notification)?;
        }
        Command::Theme { action } => {
            match action {
                ThemeAction::Show => {}
                ThemeAction::Dark => preferences.set(true)?,
                ThemeAction::Light => preferences.set(false)?,
                ThemeAction::Toggle => {
                    preferences.toggle()?;
                }
            }
            let dark_mode = preferences.get();
            println!(
                "{} (switch: {}) stored in {}",
                if dark_mode { "dark" } else { "light" },
                toggle_label(dark_mode),
                preferences.path().display()
            );
        }
    }

    Ok(())
}

// The rendered output already shows the message; the exit error only names the command.
fn search_outcome(state: &SessionState) -> anyhow::Result<()> {
    if state.error.is_some() {
        anyhow::bail!("search failed");
    }
    Ok(())
}

fn feedback_outcome(notification: &Notification) -> anyhow::Result<()> {
    if notification.kind == NotificationKind::Error {
        anyhow::bail!("feedback failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_search_exits_without_repeating_the_detail() {
        let state = SessionState {
            error: Some("index unavailable".to_string()),
            ..SessionState::default()
        };
        let error = search_outcome(&state).expect_err("error state must fail the command");
        assert_eq!(format!("{error:#}"), "search failed");

        assert!(search_outcome(&SessionState::default()).is_ok());
    }

    #[test]
    fn failed_feedback_exits_with_a_short_error() {
        let error = feedback_outcome(&Notification::error("Feedback failed"))
            .expect_err("error notification must fail the command");
        assert_eq!(error.to_string(), "feedback failed");

        assert!(feedback_outcome(&Notification::success("Marked Relevant")).is_ok());
    }
}
