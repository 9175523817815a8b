use crate::models::clamp_top_k;
use crate::traits::SearchBackend;
use crate::{SearchError, SearchRequest, SearchResult, SessionState};
use parking_lot::Mutex;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// What a single `submit` call ended with.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// Sequence number of this attempt.
    pub seq: u64,
    /// False when a newer attempt was issued before this one resolved; its response
    /// was discarded.
    pub applied: bool,
    /// Session state right after the attempt resolved.
    pub state: SessionState,
}

/// A search that has been started but not yet sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchAttempt {
    pub seq: u64,
    pub request: SearchRequest,
}

struct Inner {
    state: SessionState,
    issued: u64,
}

/// Owns the search session state and drives the search request lifecycle.
///
/// Overlapping submits are allowed. Every attempt gets a sequence number and only the
/// most recently issued attempt may write `results`, `error` and `loading`.
pub struct SearchSession<B> {
    backend: B,
    inner: Mutex<Inner>,
}

impl<B> SearchSession<B>
where
    B: SearchBackend + Send + Sync,
{
    pub fn new(backend: B) -> Self {
        Self::with_state(backend, SessionState::default())
    }

    pub fn with_state(backend: B, state: SessionState) -> Self {
        Self {
            backend,
            inner: Mutex::new(Inner { state, issued: 0 }),
        }
    }

    pub fn state(&self) -> SessionState {
        self.inner.lock().state.clone()
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.inner.lock().state.query = query.into();
    }

    /// Stores `value` clamped to at least 1 and returns the stored value.
    pub fn set_top_k(&self, value: i64) -> usize {
        let top_k = clamp_top_k(value);
        self.inner.lock().state.top_k = top_k;
        top_k
    }

    pub fn set_rerank(&self, rerank: bool) {
        self.inner.lock().state.rerank = rerank;
    }

    /// 1-based lookup into the displayed result list.
    pub fn result_by_position(&self, position: usize) -> Option<SearchResult> {
        let inner = self.inner.lock();
        position
            .checked_sub(1)
            .and_then(|index| inner.state.results.get(index))
            .cloned()
    }

    pub fn result_by_hash(&self, sentence_hash: &str) -> Option<SearchResult> {
        self.inner
            .lock()
            .state
            .results
            .iter()
            .find(|result| result.sentence_hash == sentence_hash)
            .cloned()
    }

    pub async fn submit(&self) -> Submission {
        let attempt = self.begin();
        self.resolve(attempt).await
    }

    /// Clears the error, marks the session loading and issues a new sequence number.
    /// The returned attempt still has to be passed to [`SearchSession::resolve`].
    pub fn begin(&self) -> SearchAttempt {
        let attempt = {
            let mut inner = self.inner.lock();
            inner.issued += 1;
            inner.state.error = None;
            inner.state.loading = true;
            SearchAttempt {
                seq: inner.issued,
                request: inner.state.to_request(),
            }
        };
        info!(
            seq = attempt.seq,
            query = %attempt.request.query,
            top_k = attempt.request.top_k,
            rerank = attempt.request.rerank,
            "search submitted"
        );
        attempt
    }

    pub async fn resolve(&self, attempt: SearchAttempt) -> Submission {
        let outcome = self.backend.search(&attempt.request).await;
        self.complete(attempt.seq, outcome)
    }

    fn complete(&self, seq: u64, outcome: Result<Vec<SearchResult>, SearchError>) -> Submission {
        let mut inner = self.inner.lock();
        if seq != inner.issued {
            debug!(seq, latest = inner.issued, "discarding stale search response");
            return Submission {
                seq,
                applied: false,
                state: inner.state.clone(),
            };
        }

        match outcome {
            Ok(results) => {
                if has_duplicate_hashes(&results) {
                    warn!(seq, "search response contains duplicate sentence hashes");
                }
                info!(seq, count = results.len(), "search completed");
                inner.state.results = results;
            }
            Err(error) => {
                warn!(seq, error = %error, "search failed");
                inner.state.error = Some(error.user_message());
            }
        }
        inner.state.loading = false;

        Submission {
            seq,
            applied: true,
            state: inner.state.clone(),
        }
    }
}

fn has_duplicate_hashes(results: &[SearchResult]) -> bool {
    let mut seen = HashSet::with_capacity(results.len());
    results
        .iter()
        .any(|result| !seen.insert(result.sentence_hash.as_str()))
}
