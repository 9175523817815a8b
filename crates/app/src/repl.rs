use crate::render::{render_form, render_header, render_notification, render_session, TerminalTheme};
use resume_search_core::{
    DisplayPreferenceStore, FeedbackSubmitter, HttpBackend, NotificationCenter, SearchSession,
    Submission,
};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

const HELP: &str = "\
Type a job requirement and press enter to search.
  :search           resubmit the current query as-is
  :k <n>            number of results (minimum 1)
  :rerank [on|off]  toggle or set LLM reranking
  :rel <n|hash>     mark a result relevant
  :irrel <n|hash>   mark a result not relevant
  :theme            switch between dark and light mode
  :show             redraw the current view
  :help             this text
  :quit             leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Search(String),
    Resubmit,
    TopK(String),
    Rerank(Option<bool>),
    Feedback { target: String, is_relevant: bool },
    Theme,
    Show,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(command) = line.strip_prefix(':') else {
        return Input::Search(line.to_string());
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let argument = parts.next().map(str::to_string);

    match (name, argument) {
        ("search" | "s", None) => Input::Resubmit,
        ("k" | "top", Some(value)) => Input::TopK(value),
        ("rerank", None) => Input::Rerank(None),
        ("rerank", Some(value)) => match value.as_str() {
            "on" | "true" | "yes" => Input::Rerank(Some(true)),
            "off" | "false" | "no" => Input::Rerank(Some(false)),
            _ => Input::Unknown(line.to_string()),
        },
        ("rel" | "relevant", Some(target)) => Input::Feedback {
            target,
            is_relevant: true,
        },
        ("irrel" | "notrel", Some(target)) => Input::Feedback {
            target,
            is_relevant: false,
        },
        ("theme" | "dark", None) => Input::Theme,
        ("show", None) => Input::Show,
        ("help" | "h", None) => Input::Help,
        ("quit" | "q" | "exit", None) => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    }
}

enum Event {
    SearchDone(Submission),
    FeedbackDone,
}

pub struct Interactive {
    pub session: Arc<SearchSession<HttpBackend>>,
    pub feedback: Arc<FeedbackSubmitter<HttpBackend, NotificationCenter>>,
    pub notifications: NotificationCenter,
    pub preferences: DisplayPreferenceStore,
    pub theme: TerminalTheme,
}

impl Interactive {
    pub async fn run(self) -> anyhow::Result<()> {
        self.run_with(BufReader::new(tokio::io::stdin())).await
    }

    /// Drives the session from `input` until end of input or `:quit`. Lines that are
    /// not valid UTF-8 are skipped.
    pub async fn run_with<R>(self, input: R) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let (events, mut completed) = mpsc::unbounded_channel::<Event>();
        let mut lines = input.lines();

        self.redraw();
        println!("{HELP}");

        loop {
            tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        if !self.handle_input(parse_input(&line), &events) {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(error) if error.kind() == io::ErrorKind::InvalidData => {
                        warn!(error = %error, "skipping unreadable input line");
                        println!("could not read input");
                    }
                    Err(error) => return Err(error.into()),
                },
                Some(event) = completed.recv() => match event {
                    Event::SearchDone(submission) if submission.applied => {
                        println!("{}", render_session(&submission.state, &self.theme.palette()));
                    }
                    Event::SearchDone(submission) => {
                        debug!(seq = submission.seq, "superseded search finished");
                    }
                    Event::FeedbackDone => {}
                },
            }
            self.flush_notifications();
        }

        Ok(())
    }

    /// Returns false when the user asked to leave.
    fn handle_input(&self, input: Input, events: &mpsc::UnboundedSender<Event>) -> bool {
        match input {
            Input::Search(query) => {
                self.session.set_query(query);
                self.spawn_search(events);
            }
            Input::Resubmit => self.spawn_search(events),
            Input::TopK(raw) => match raw.parse::<i64>() {
                Ok(value) => println!("Results: {}", self.session.set_top_k(value)),
                Err(_) => println!("not a number: {raw}"),
            },
            Input::Rerank(value) => {
                let rerank = value.unwrap_or(!self.session.state().rerank);
                self.session.set_rerank(rerank);
                println!("[{}] Use LLM Reranking", if rerank { "x" } else { " " });
            }
            Input::Feedback {
                target,
                is_relevant,
            } => self.spawn_feedback(&target, is_relevant, events),
            Input::Theme => match self.preferences.toggle() {
                Ok(_) => self.redraw(),
                Err(error) => warn!(error = %error, "could not save display preference"),
            },
            Input::Show => {
                self.redraw();
                for notification in self.notifications.active() {
                    println!("{}", render_notification(&notification, &self.theme.palette()));
                }
            }
            Input::Help => println!("{HELP}"),
            Input::Quit => return false,
            Input::Empty => {}
            Input::Unknown(line) => println!("unknown command: {line} (:help lists commands)"),
        }
        true
    }

    fn spawn_search(&self, events: &mpsc::UnboundedSender<Event>) {
        let attempt = self.session.begin();
        print!("{}", render_session(&self.session.state(), &self.theme.palette()));

        let session = Arc::clone(&self.session);
        let events = events.clone();
        tokio::spawn(async move {
            let submission = session.resolve(attempt).await;
            let _ = events.send(Event::SearchDone(submission));
        });
    }

    fn spawn_feedback(&self, target: &str, is_relevant: bool, events: &mpsc::UnboundedSender<Event>) {
        let found = match target.parse::<usize>() {
            Ok(position) => self.session.result_by_position(position),
            Err(_) => self.session.result_by_hash(target),
        };
        let Some(result) = found else {
            println!("no displayed result {target}");
            return;
        };

        // Feedback carries whatever query is in the input right now.
        let query = self.session.state().query;
        let feedback = Arc::clone(&self.feedback);
        let events = events.clone();
        tokio::spawn(async move {
            feedback
                .send_feedback(query, result.sentence_hash, is_relevant)
                .await;
            let _ = events.send(Event::FeedbackDone);
        });
    }

    fn flush_notifications(&self) {
        let palette = self.theme.palette();
        for notification in self.notifications.take_new() {
            println!("{}", render_notification(&notification, &palette));
        }
    }

    fn redraw(&self) {
        let state = self.session.state();
        let palette = self.theme.palette();
        println!("{}", render_header(&palette, self.theme.is_dark()));
        println!("{}", render_form(&state, &palette));
        print!("{}", render_session(&state, &palette));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resume_search_core::{ClientConfig, DEFAULT_API_URL};
    use tempfile::tempdir;

    fn interactive(preferences: DisplayPreferenceStore) -> anyhow::Result<Interactive> {
        let backend = HttpBackend::new(ClientConfig::new(DEFAULT_API_URL, None)?);
        let notifications = NotificationCenter::new();
        Ok(Interactive {
            session: Arc::new(SearchSession::new(backend.clone())),
            feedback: Arc::new(FeedbackSubmitter::new(backend, notifications.clone())),
            notifications,
            preferences,
            theme: TerminalTheme::new(false),
        })
    }

    #[tokio::test]
    async fn invalid_utf8_line_is_skipped_and_session_continues() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let repl = interactive(DisplayPreferenceStore::load(dir.path().join("prefs.json")))?;
        let session = Arc::clone(&repl.session);

        let input: &[u8] = b"caf\xe9 engineer\n:k 9\n:rerank off\n";
        repl.run_with(BufReader::new(input)).await?;

        let state = session.state();
        assert_eq!(state.top_k, 9);
        assert!(!state.rerank);
        assert!(state.query.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn end_of_input_ends_the_session() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let repl = interactive(DisplayPreferenceStore::load(dir.path().join("prefs.json")))?;
        let input: &[u8] = b"";
        repl.run_with(BufReader::new(input)).await
    }

    #[test]
    fn plain_text_is_a_search() {
        assert_eq!(
            parse_input("  senior backend engineer  "),
            Input::Search("senior backend engineer".to_string())
        );
        assert_eq!(parse_input("   "), Input::Empty);
    }

    #[test]
    fn commands_are_recognised() {
        assert_eq!(parse_input(":search"), Input::Resubmit);
        assert_eq!(parse_input(":k -4"), Input::TopK("-4".to_string()));
        assert_eq!(parse_input(":rerank"), Input::Rerank(None));
        assert_eq!(parse_input(":rerank off"), Input::Rerank(Some(false)));
        assert_eq!(parse_input(":theme"), Input::Theme);
        assert_eq!(parse_input(":q"), Input::Quit);
    }

    #[test]
    fn feedback_targets_position_or_hash() {
        assert_eq!(
            parse_input(":rel 2"),
            Input::Feedback {
                target: "2".to_string(),
                is_relevant: true
            }
        );
        assert_eq!(
            parse_input(":irrel abc123"),
            Input::Feedback {
                target: "abc123".to_string(),
                is_relevant: false
            }
        );
    }

    #[test]
    fn malformed_commands_are_unknown() {
        assert_eq!(parse_input(":rel"), Input::Unknown(":rel".to_string()));
        assert_eq!(parse_input(":rerank maybe"), Input::Unknown(":rerank maybe".to_string()));
        assert_eq!(parse_input(":frobnicate"), Input::Unknown(":frobnicate".to_string()));
    }
}
