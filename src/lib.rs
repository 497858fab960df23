// tmdb-lookup - TMDB metadata lookup for locally recorded video files.
//
// The core is a progressive query-relaxation search: a free-text title
// lookup that strips trailing words and retries until the remote database
// returns a match or the query is exhausted.

pub mod config;
pub mod details;
pub mod filename;
pub mod search;
pub mod services;

pub use config::AppConfig;
pub use search::normalize::{normalize_record, ImageOptions, NormalizedRecord};
pub use search::{relaxed_search, ListingLookup, Lookup, SearchError, SearchOutcome, SearchSession};
pub use services::tmdb::{Listing, LookupPage, MediaKind, RawRecord, TmdbClient};
