// TMDB API client
// API Documentation: https://developer.themoviedb.org/reference/intro/getting-started

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Deserializer};

const TMDB_API_BASE: &str = "https://api.themoviedb.org/3";

/// Language used to refetch details when the localized overview is empty.
const FALLBACK_LANGUAGE: &str = "en";

/// Classification of a search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Movie,
    Tv,
    Person,
}

impl MediaKind {
    /// Parse the `media_type` field of a multi-search entry. Empty or
    /// unrecognized values (collections, networks, ...) yield `None`.
    pub fn from_raw(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(MediaKind::Movie),
            "tv" => Some(MediaKind::Tv),
            "person" => Some(MediaKind::Person),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
            MediaKind::Person => "person",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Listing selector for a search request. `Multi` is the only mode that
/// uses the free-text query; the others are fixed movie listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Multi,
    NowPlaying,
    Upcoming,
    Popular,
    Similar(i64),
    Recommendations(i64),
    TopRated,
}

impl Listing {
    fn path(&self) -> String {
        match self {
            Listing::Multi => "/search/multi".to_string(),
            Listing::NowPlaying => "/movie/now_playing".to_string(),
            Listing::Upcoming => "/movie/upcoming".to_string(),
            Listing::Popular => "/movie/popular".to_string(),
            Listing::Similar(ident) => format!("/movie/{}/similar", ident),
            Listing::Recommendations(ident) => format!("/movie/{}/recommendations", ident),
            Listing::TopRated => "/movie/top_rated".to_string(),
        }
    }

    /// Media kind implied by a fixed-kind listing. Entries of the movie
    /// listings carry no `media_type` field of their own.
    pub fn implied_kind(&self) -> Option<MediaKind> {
        match self {
            Listing::Multi => None,
            _ => Some(MediaKind::Movie),
        }
    }
}

/// The API omits or nulls string fields freely depending on media kind;
/// absent values deserialize to empty strings rather than errors.
fn empty_if_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One page of search results as returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupPage {
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub results: Vec<RawRecord>,
}

/// A single unprocessed result entry. The set of populated fields varies
/// by media kind (movies carry `title`/`release_date`, series carry
/// `name`/`first_air_date`, persons carry `name`/`profile_path`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub media_type: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub title: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub name: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub release_date: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub first_air_date: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub poster_path: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub backdrop_path: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub profile_path: String,
}

impl RawRecord {
    /// Identifier as a display string, empty when the entry has no id.
    pub fn ident(&self) -> String {
        self.id.map(|id| id.to_string()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductionCompany {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Network {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Creator {
    pub name: String,
}

/// Credits response (cast and crew)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    pub cast: Option<Vec<CastMember>>,
    pub crew: Option<Vec<CrewMember>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    pub id: i64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrewMember {
    pub id: i64,
    pub name: String,
    pub job: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Videos {
    #[serde(default)]
    pub results: Vec<VideoEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoEntry {
    pub name: Option<String>,
    pub key: Option<String>,
    pub site: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Releases {
    pub countries: Option<Vec<ReleaseCountry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseCountry {
    pub iso_3166_1: String,
    pub certification: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentRatings {
    pub results: Option<Vec<ContentRating>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentRating {
    pub iso_3166_1: String,
    pub rating: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonSummary {
    pub id: i64,
    pub season_number: i32,
    pub episode_count: Option<i32>,
    pub air_date: Option<String>,
    pub name: Option<String>,
}

/// Detailed movie info
#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetails {
    pub id: i64,
    pub title: String,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<i32>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub genres: Option<Vec<Genre>>,
    pub production_countries: Option<Vec<ProductionCountry>>,
    pub production_companies: Option<Vec<ProductionCompany>>,
    pub videos: Option<Videos>,
    pub credits: Option<Credits>,
    pub releases: Option<Releases>,
}

/// Detailed TV show info
#[derive(Debug, Clone, Deserialize)]
pub struct TvDetails {
    pub id: i64,
    pub name: String,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub first_air_date: Option<String>,
    pub origin_country: Option<Vec<String>>,
    pub number_of_seasons: Option<i32>,
    pub number_of_episodes: Option<i32>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub genres: Option<Vec<Genre>>,
    pub created_by: Option<Vec<Creator>>,
    pub networks: Option<Vec<Network>>,
    pub seasons: Option<Vec<SeasonSummary>>,
    pub credits: Option<Credits>,
    pub content_ratings: Option<ContentRatings>,
}

/// Detailed person info with combined movie and TV credits
#[derive(Debug, Clone, Deserialize)]
pub struct PersonDetails {
    pub id: i64,
    pub name: String,
    pub biography: Option<String>,
    pub birthday: Option<String>,
    pub place_of_birth: Option<String>,
    pub gender: Option<i64>,
    pub also_known_as: Option<Vec<String>>,
    pub popularity: Option<f64>,
    pub profile_path: Option<String>,
    pub movie_credits: Option<PersonCredits>,
    pub tv_credits: Option<PersonCredits>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonCredits {
    pub cast: Option<Vec<PersonCredit>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonCredit {
    pub title: Option<String>,
    pub name: Option<String>,
    pub character: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
}

/// Season details including episode list
#[derive(Debug, Clone, Deserialize)]
pub struct SeasonDetails {
    pub id: i64,
    pub name: String,
    pub season_number: i32,
    pub air_date: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub episodes: Option<Vec<EpisodeInfo>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EpisodeInfo {
    pub id: i64,
    pub name: String,
    pub episode_number: i32,
    pub overview: Option<String>,
    pub still_path: Option<String>,
}

/// TMDB HTTP client. The API key is injected at construction; there is no
/// process-global key state.
pub struct TmdbClient {
    client: Client,
    api_key: String,
}

impl TmdbClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    /// Create client from the TMDB_API_KEY environment variable
    pub fn from_env() -> Option<Self> {
        std::env::var("TMDB_API_KEY").ok().map(Self::new)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {} from TMDB", what))?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse TMDB {} response", what))
    }

    fn listing_url(&self, listing: &Listing, query: &str, page: u32, language: &str) -> String {
        let mut url = format!(
            "{}{}?api_key={}&language={}&page={}",
            TMDB_API_BASE,
            listing.path(),
            self.api_key,
            language,
            page
        );
        if matches!(listing, Listing::Multi) {
            url.push_str(&format!("&query={}", urlencoding::encode(query)));
        }
        url
    }

    /// Fetch one page of a listing. The free-text query is only sent for
    /// `Listing::Multi`; the fixed listings ignore it.
    pub async fn list(
        &self,
        listing: &Listing,
        query: &str,
        page: u32,
        language: &str,
    ) -> Result<LookupPage> {
        let url = self.listing_url(listing, query, page, language);
        self.get_json(&url, "search results").await
    }

    fn movie_details_url(&self, ident: i64, language: &str) -> String {
        format!(
            "{}/movie/{}?api_key={}&language={}&append_to_response=videos,credits,releases",
            TMDB_API_BASE, ident, self.api_key, language
        )
    }

    /// Get detailed movie info. Falls back to English when the localized
    /// overview is empty.
    pub async fn movie_details(&self, ident: i64, language: &str) -> Result<MovieDetails> {
        let url = self.movie_details_url(ident, language);
        let details: MovieDetails = self.get_json(&url, "movie details").await?;

        if details.overview.as_deref().unwrap_or("").is_empty() && language != FALLBACK_LANGUAGE {
            tracing::debug!("Empty overview for movie {} in {}, refetching in English", ident, language);
            let url = self.movie_details_url(ident, FALLBACK_LANGUAGE);
            return self.get_json(&url, "movie details").await;
        }
        Ok(details)
    }

    fn tv_details_url(&self, ident: i64, language: &str) -> String {
        format!(
            "{}/tv/{}?api_key={}&language={}&append_to_response=credits,content_ratings",
            TMDB_API_BASE, ident, self.api_key, language
        )
    }

    /// Get detailed TV show info. Falls back to English when the localized
    /// overview is empty.
    pub async fn tv_details(&self, ident: i64, language: &str) -> Result<TvDetails> {
        let url = self.tv_details_url(ident, language);
        let details: TvDetails = self.get_json(&url, "TV details").await?;

        if details.overview.as_deref().unwrap_or("").is_empty() && language != FALLBACK_LANGUAGE {
            tracing::debug!("Empty overview for series {} in {}, refetching in English", ident, language);
            let url = self.tv_details_url(ident, FALLBACK_LANGUAGE);
            return self.get_json(&url, "TV details").await;
        }
        Ok(details)
    }

    fn person_details_url(&self, ident: i64, language: &str) -> String {
        format!(
            "{}/person/{}?api_key={}&language={}&append_to_response=movie_credits,tv_credits",
            TMDB_API_BASE, ident, self.api_key, language
        )
    }

    /// Get person info with movie and TV credits. Falls back to English
    /// when the localized biography is empty.
    pub async fn person_details(&self, ident: i64, language: &str) -> Result<PersonDetails> {
        let url = self.person_details_url(ident, language);
        let details: PersonDetails = self.get_json(&url, "person details").await?;

        if details.biography.as_deref().unwrap_or("").is_empty() && language != FALLBACK_LANGUAGE {
            tracing::debug!("Empty biography for person {} in {}, refetching in English", ident, language);
            let url = self.person_details_url(ident, FALLBACK_LANGUAGE);
            return self.get_json(&url, "person details").await;
        }
        Ok(details)
    }

    /// Get season details including the episode list
    pub async fn season_details(
        &self,
        tv_ident: i64,
        season_number: i32,
        language: &str,
    ) -> Result<SeasonDetails> {
        let url = format!(
            "{}/tv/{}/season/{}?api_key={}&language={}",
            TMDB_API_BASE, tv_ident, season_number, self.api_key, language
        );
        self.get_json(&url, "season details").await
    }
}
