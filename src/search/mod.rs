// Progressive query-relaxation search.
//
// A free-text lookup that returns nothing is retried with the last word of
// the query dropped, until an attempt yields results or no words remain.
// Recording names are noisy ("The Matrix Reloaded 2003 ARD HD"), so the
// longest matching word-prefix is usually the actual title.

use std::future::Future;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::search::normalize::{normalize_record, ImageOptions, NormalizedRecord};
use crate::services::tmdb::{Listing, LookupPage, MediaKind, TmdbClient};

pub mod normalize;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A newer search for the same surface superseded this one.
    #[error("search superseded by a newer request")]
    Cancelled,

    /// The caller asked for an operation that does not exist for this
    /// media kind. This is a caller bug, not a transient failure.
    #[error("unsupported media kind: {0}")]
    UnsupportedMediaKind(MediaKind),
}

/// Final result of one search invocation. Constructed once, immutable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    pub total_pages: u32,
    pub records: Vec<NormalizedRecord>,
    /// The query text of the attempt that produced `records` (possibly
    /// shorter than the input, possibly empty on exhaustion).
    pub matched_text: String,
}

/// One lookup attempt against the remote database. Implemented by
/// [`ListingLookup`] for real searches and by canned pages in tests.
pub trait Lookup {
    fn lookup(&self, query: &str) -> impl Future<Output = Result<LookupPage>> + Send;
}

/// A TMDB listing bound to a page and language, usable as the relaxation
/// loop's lookup function.
pub struct ListingLookup<'a> {
    pub client: &'a TmdbClient,
    pub listing: Listing,
    pub page: u32,
    pub language: String,
}

impl Lookup for ListingLookup<'_> {
    fn lookup(&self, query: &str) -> impl Future<Output = Result<LookupPage>> + Send {
        self.client
            .list(&self.listing, query, self.page, &self.language)
    }
}

/// Search for `text`, dropping trailing words on empty results.
///
/// Lookup failures are logged and treated as an empty page for that
/// attempt; the loop keeps relaxing. An N-word query issues at most N+1
/// attempts, the last one with an empty query string.
pub async fn relaxed_search<L: Lookup>(
    lookup: &L,
    text: &str,
    implied_kind: Option<MediaKind>,
    images: &ImageOptions,
    cancel: &CancellationToken,
) -> Result<SearchOutcome, SearchError> {
    if text.is_empty() {
        return Ok(SearchOutcome::default());
    }

    let mut words: Vec<&str> = text.split(' ').collect();
    let mut candidate = text.to_string();
    let mut iteration = 0u32;

    loop {
        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }

        // Attempts are strictly sequential; a cancelled token wins the
        // race so a stale loop can never deliver an outcome.
        let page = tokio::select! {
            _ = cancel.cancelled() => return Err(SearchError::Cancelled),
            result = lookup.lookup(&candidate) => match result {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(
                        "Lookup failed for {:?} (attempt {}): {:#}",
                        candidate, iteration, e
                    );
                    LookupPage::default()
                }
            },
        };

        let records: Vec<NormalizedRecord> = page
            .results
            .iter()
            .filter_map(|raw| normalize_record(raw, implied_kind, images))
            .collect();

        if !records.is_empty() || candidate.is_empty() || words.is_empty() {
            return Ok(SearchOutcome {
                total_pages: page.total_pages,
                records,
                matched_text: candidate,
            });
        }

        words.pop();
        candidate = words.join(" ");
        iteration += 1;
        tracing::debug!("No results, relaxing query to {:?} (attempt {})", candidate, iteration);
    }
}

/// Hands out one live search per UI surface: starting a new search cancels
/// the token of the previous one, so a relaxation loop still in flight
/// terminates with [`SearchError::Cancelled`] instead of delivering stale
/// results.
#[derive(Default)]
pub struct SearchSession {
    current: std::sync::Mutex<Option<CancellationToken>>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any search in progress and issue the token for a new one.
    pub fn begin(&self) -> CancellationToken {
        let mut current = self.current.lock().unwrap();
        if let Some(previous) = current.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        *current = Some(token.clone());
        token
    }

    /// Run a relaxed search under a fresh token for this surface.
    pub async fn search<L: Lookup>(
        &self,
        lookup: &L,
        text: &str,
        implied_kind: Option<MediaKind>,
        images: &ImageOptions,
    ) -> Result<SearchOutcome, SearchError> {
        let token = self.begin();
        relaxed_search(lookup, text, implied_kind, images, &token).await
    }
}
