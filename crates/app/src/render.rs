use resume_search_core::{Notification, NotificationKind, PreferenceObserver, SessionState};
use std::fmt::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const TITLE: &str = "Resume Search";
pub const QUERY_PLACEHOLDER: &str = "Enter job requirement...";
pub const RERANK_LABEL: &str = "Use LLM Reranking";
const SKELETON_ROWS: usize = 3;
const SKELETON: &str = "░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░";

/// ANSI colors for one theme. Empty strings disable styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: &'static str,
    pub muted: &'static str,
    pub accent: &'static str,
    pub success: &'static str,
    pub error: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub const DARK: Palette = Palette {
        text: "\x1b[97m",
        muted: "\x1b[90m",
        accent: "\x1b[94m",
        success: "\x1b[92m",
        error: "\x1b[91m",
        reset: "\x1b[0m",
    };

    pub const LIGHT: Palette = Palette {
        text: "\x1b[30m",
        muted: "\x1b[37m",
        accent: "\x1b[34m",
        success: "\x1b[32m",
        error: "\x1b[31m",
        reset: "\x1b[0m",
    };

    pub const PLAIN: Palette = Palette {
        text: "",
        muted: "",
        accent: "",
        success: "",
        error: "",
        reset: "",
    };
}

/// Observer that keeps the terminal palette in step with the dark-mode preference.
#[derive(Debug, Clone)]
pub struct TerminalTheme {
    dark: Arc<AtomicBool>,
    styled: bool,
}

impl TerminalTheme {
    pub fn new(styled: bool) -> Self {
        Self {
            dark: Arc::new(AtomicBool::new(false)),
            styled,
        }
    }

    pub fn is_dark(&self) -> bool {
        self.dark.load(Ordering::Relaxed)
    }

    pub fn palette(&self) -> Palette {
        match (self.styled, self.is_dark()) {
            (false, _) => Palette::PLAIN,
            (true, true) => Palette::DARK,
            (true, false) => Palette::LIGHT,
        }
    }
}

impl PreferenceObserver for TerminalTheme {
    fn apply(&self, dark_mode: bool) {
        self.dark.store(dark_mode, Ordering::Relaxed);
    }
}

/// Label of the theme switch: it names the mode you would switch to.
pub fn toggle_label(dark_mode: bool) -> &'static str {
    if dark_mode {
        "Light Mode"
    } else {
        "Dark Mode"
    }
}

pub fn render_header(palette: &Palette, dark_mode: bool) -> String {
    format!(
        "{}{TITLE}{}  {}[{}]{}",
        palette.accent,
        palette.reset,
        palette.muted,
        toggle_label(dark_mode),
        palette.reset
    )
}

pub fn render_form(state: &SessionState, palette: &Palette) -> String {
    let query = if state.query.is_empty() {
        format!("{}{QUERY_PLACEHOLDER}{}", palette.muted, palette.reset)
    } else {
        state.query.clone()
    };
    format!(
        "Query: {query}\nResults: {}  [{}] {RERANK_LABEL}",
        state.top_k,
        if state.rerank { "x" } else { " " }
    )
}

/// Inline error region, skeletons while loading, otherwise the result list.
pub fn render_session(state: &SessionState, palette: &Palette) -> String {
    let mut out = String::new();

    if let Some(error) = &state.error {
        let _ = writeln!(out, "{}! {error}{}", palette.error, palette.reset);
    }

    if state.loading {
        for _ in 0..SKELETON_ROWS {
            let _ = writeln!(out, "{}{SKELETON}{}", palette.muted, palette.reset);
        }
        return out;
    }

    for (index, result) in state.results.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}[{}] Source: {}{}",
            palette.muted,
            index + 1,
            result.source_label(),
            palette.reset
        );
        let _ = writeln!(
            out,
            "    {}Score: {}{}",
            palette.muted,
            result.score_label(),
            palette.reset
        );
        let _ = writeln!(out, "    {}{}{}", palette.text, result.text, palette.reset);
        if let Some(justification) = result.justification_text() {
            let _ = writeln!(out, "    {}> {justification}{}", palette.muted, palette.reset);
        }
        let _ = writeln!(
            out,
            "    {}Relevant: :rel {}  Not Relevant: :irrel {}{}  ({})",
            palette.accent,
            index + 1,
            index + 1,
            palette.reset,
            result.sentence_hash
        );
    }

    out
}

pub fn render_notification(notification: &Notification, palette: &Palette) -> String {
    let (color, mark) = match notification.kind {
        NotificationKind::Success => (palette.success, "✓"),
        NotificationKind::Error => (palette.error, "✗"),
    };
    format!("{color}{mark} {}{}", notification.message, palette.reset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resume_search_core::SearchResult;

    fn result(hash: &str, score: Option<f64>, justification: Option<&str>) -> SearchResult {
        SearchResult {
            sentence_hash: hash.to_string(),
            text: format!("text for {hash}"),
            source: None,
            score,
            justification: justification.map(str::to_string),
        }
    }

    #[test]
    fn three_results_render_with_four_decimal_scores_and_no_error() {
        let state = SessionState {
            query: "backend engineer".to_string(),
            results: vec![
                result("h1", Some(0.912_345), Some("Strong backend match")),
                result("h2", Some(0.5), None),
                result("h3", Some(0.123_44), None),
            ],
            ..SessionState::default()
        };

        let rendered = render_session(&state, &Palette::PLAIN);

        assert_eq!(rendered.matches("Source: Unknown").count(), 3);
        assert!(rendered.contains("Score: 0.9123"));
        assert!(rendered.contains("Score: 0.5000"));
        assert!(rendered.contains("Score: 0.1234"));
        assert!(rendered.contains("> Strong backend match"));
        assert_eq!(rendered.matches("> ").count(), 1);
        assert!(!rendered.contains('!'));
    }

    #[test]
    fn error_region_is_shown_alongside_previous_results() {
        let state = SessionState {
            results: vec![result("h1", Some(0.7), None)],
            error: Some("index unavailable".to_string()),
            ..SessionState::default()
        };

        let rendered = render_session(&state, &Palette::PLAIN);
        assert!(rendered.starts_with("! index unavailable\n"));
        assert_eq!(rendered.matches("! ").count(), 1);
        assert!(rendered.contains("text for h1"));
    }

    #[test]
    fn loading_shows_skeletons_instead_of_results() {
        let state = SessionState {
            results: vec![result("h1", Some(0.7), None)],
            loading: true,
            ..SessionState::default()
        };

        let rendered = render_session(&state, &Palette::PLAIN);
        assert_eq!(rendered.lines().count(), SKELETON_ROWS);
        assert!(!rendered.contains("h1"));
    }

    #[test]
    fn missing_score_renders_blank() {
        let state = SessionState {
            results: vec![result("h1", None, None)],
            ..SessionState::default()
        };
        assert!(render_session(&state, &Palette::PLAIN).contains("Score: \n"));
    }

    #[test]
    fn theme_observer_switches_palette() {
        let theme = TerminalTheme::new(true);
        assert_eq!(theme.palette(), Palette::LIGHT);
        theme.apply(true);
        assert_eq!(theme.palette(), Palette::DARK);
        assert_eq!(TerminalTheme::new(false).palette(), Palette::PLAIN);
    }

    #[test]
    fn header_and_form_follow_state() {
        assert!(render_header(&Palette::PLAIN, false).ends_with("[Dark Mode]"));
        assert!(render_header(&Palette::PLAIN, true).ends_with("[Light Mode]"));

        let form = render_form(&SessionState::default(), &Palette::PLAIN);
        assert_eq!(form, format!("Query: {QUERY_PLACEHOLDER}\nResults: 5  [x] {RERANK_LABEL}"));
    }

    #[test]
    fn notifications_carry_their_message() {
        let rendered =
            render_notification(&Notification::error("Feedback failed"), &Palette::PLAIN);
        assert_eq!(rendered, "✗ Feedback failed");
    }
}
