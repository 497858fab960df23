// Display-ready assembly of TMDB detail responses.
//
// Everything here is string-shaped on purpose: the consumer is an
// on-screen panel that renders labels, not a data store.

use anyhow::Result;

use crate::search::normalize::{year_from_date, ImageOptions};
use crate::search::SearchError;
use crate::services::tmdb::{
    Credits, MediaKind, MovieDetails, PersonDetails, SeasonDetails, TmdbClient, TvDetails,
};

/// Certification shown when no German release rating is known.
const UNRATED_CERTIFICATION: &str = "100";

/// Flat, display-ready detail record for a movie or series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleInfo {
    pub title: String,
    pub overview: String,
    pub tagline: String,
    pub year: String,
    /// Average vote with one decimal, e.g. `"8.1"`.
    pub rating: String,
    pub votes: String,
    pub votes_brackets: String,
    /// `"136 min"` for movies, `"5 Seasons / 62 Episodes"` for series.
    pub runtime: String,
    pub country: String,
    pub genre: String,
    pub cast: String,
    pub crew: String,
    pub director: String,
    pub author: String,
    pub studio: String,
    /// One line per season, empty for movies.
    pub seasons: String,
    pub certification: String,
    pub full_description: String,
}

/// Display-ready person record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonInfo {
    pub name: String,
    pub biography: String,
    pub birthday: String,
    pub place_of_birth: String,
    pub gender: String,
    pub aliases: String,
    pub popularity: String,
    /// Combined movie and TV credit lines, newest first.
    pub credits: String,
}

/// One row of the cast browser list.
#[derive(Debug, Clone, PartialEq)]
pub struct CastRow {
    pub title: String,
    pub cover_url: String,
    pub ident: String,
}

/// One row of the season browser list (a season header or an episode).
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonRow {
    pub title: String,
    pub cover_url: String,
    pub overview: String,
    pub ident: String,
}

/// Fetch and assemble details for a movie or series. Persons have no
/// title sheet; asking for one is a caller bug.
pub async fn title_info(
    client: &TmdbClient,
    kind: MediaKind,
    ident: i64,
    language: &str,
) -> Result<TitleInfo> {
    match kind {
        MediaKind::Movie => Ok(movie_info(&client.movie_details(ident, language).await?)),
        MediaKind::Tv => Ok(tv_info(&client.tv_details(ident, language).await?)),
        MediaKind::Person => Err(SearchError::UnsupportedMediaKind(MediaKind::Person).into()),
    }
}

/// Fetch and assemble a person sheet.
pub async fn person_info(client: &TmdbClient, ident: i64, language: &str) -> Result<PersonInfo> {
    Ok(assemble_person(&client.person_details(ident, language).await?))
}

/// Fetch the cast browser rows for a movie or series.
pub async fn cast_info(
    client: &TmdbClient,
    kind: MediaKind,
    ident: i64,
    language: &str,
    images: &ImageOptions,
) -> Result<Vec<CastRow>> {
    let credits = match kind {
        MediaKind::Movie => client.movie_details(ident, language).await?.credits,
        MediaKind::Tv => client.tv_details(ident, language).await?.credits,
        MediaKind::Person => {
            return Err(SearchError::UnsupportedMediaKind(MediaKind::Person).into())
        }
    };
    Ok(cast_rows(&credits.unwrap_or_default(), images))
}

/// Fetch the season browser rows for a series: one header row per season
/// followed by its episodes.
pub async fn season_info(
    client: &TmdbClient,
    tv_ident: i64,
    language: &str,
    images: &ImageOptions,
) -> Result<Vec<SeasonRow>> {
    let details = client.tv_details(tv_ident, language).await?;
    let mut rows = Vec::new();
    for summary in details.seasons.unwrap_or_default() {
        let season = client
            .season_details(tv_ident, summary.season_number, language)
            .await?;
        rows.extend(season_rows(&season, images));
    }
    Ok(rows)
}

fn join_names<I: IntoIterator<Item = String>>(names: I, separator: &str) -> String {
    names.into_iter().collect::<Vec<_>>().join(separator)
}

fn format_rating(vote_average: Option<f64>) -> String {
    format!("{:.1}", vote_average.unwrap_or(0.0))
}

/// Cast block: one `"Name (Character)"` line per member, trailing newline
/// included so blocks concatenate cleanly in the full description.
fn cast_block(credits: &Credits) -> String {
    let mut block = String::new();
    for member in credits.cast.as_deref().unwrap_or_default() {
        block.push_str(&format!(
            "{} ({})\n",
            member.name,
            member.character.as_deref().unwrap_or("")
        ));
    }
    block
}

fn crew_block(credits: &Credits) -> (String, String, String) {
    let mut block = String::new();
    let mut directors = Vec::new();
    let mut authors = Vec::new();
    for member in credits.crew.as_deref().unwrap_or_default() {
        let job = member.job.as_deref().unwrap_or("");
        block.push_str(&format!("{} ({})\n", member.name, job));
        match job {
            "Director" => directors.push(member.name.clone()),
            "Screenplay" | "Writer" => authors.push(member.name.clone()),
            _ => {}
        }
    }
    (block, directors.join("\n"), authors.join("\n"))
}

fn full_description(info: &TitleInfo) -> String {
    format!(
        "{}\n{}, {}, {}\n\n{}\n\n{}\n{}\n{}",
        info.tagline, info.genre, info.country, info.year, info.overview, info.cast, info.crew,
        info.seasons
    )
}

/// Assemble the display record for a movie.
pub fn movie_info(details: &MovieDetails) -> TitleInfo {
    let credits = details.credits.clone().unwrap_or_default();
    let (crew, director, author) = crew_block(&credits);
    let votes = details.vote_count.unwrap_or(0).to_string();

    let mut info = TitleInfo {
        title: details.title.clone(),
        overview: details.overview.clone().unwrap_or_default(),
        tagline: details.tagline.clone().unwrap_or_default(),
        year: year_from_date(details.release_date.as_deref().unwrap_or("")).to_string(),
        rating: format_rating(details.vote_average),
        votes_brackets: format!("({})", votes),
        votes,
        runtime: details
            .runtime
            .map(|minutes| format!("{} min", minutes))
            .unwrap_or_default(),
        country: join_names(
            details
                .production_countries
                .iter()
                .flatten()
                .map(|c| c.iso_3166_1.clone()),
            "/",
        ),
        genre: join_names(
            details.genres.iter().flatten().map(|g| g.name.clone()),
            ", ",
        ),
        cast: cast_block(&credits),
        crew,
        director,
        author,
        studio: join_names(
            details
                .production_companies
                .iter()
                .flatten()
                .map(|c| c.name.clone()),
            ", ",
        ),
        seasons: String::new(),
        certification: movie_certification(details),
        full_description: String::new(),
    };
    info.full_description = full_description(&info);
    info
}

/// Assemble the display record for a series.
pub fn tv_info(details: &TvDetails) -> TitleInfo {
    let credits = details.credits.clone().unwrap_or_default();
    let (crew, _directors, _authors) = crew_block(&credits);
    let votes = details.vote_count.unwrap_or(0).to_string();

    let mut seasons = String::new();
    for season in details.seasons.iter().flatten() {
        // Season 0 is the specials bucket and stays out of the summary.
        if season.season_number >= 1 {
            seasons.push_str(&format!(
                "Season {}: {} Episodes ({})\n",
                season.season_number,
                season.episode_count.unwrap_or(0),
                year_from_date(season.air_date.as_deref().unwrap_or(""))
            ));
        }
    }

    let mut info = TitleInfo {
        title: details.name.clone(),
        overview: details.overview.clone().unwrap_or_default(),
        tagline: details.tagline.clone().unwrap_or_default(),
        year: year_from_date(details.first_air_date.as_deref().unwrap_or("")).to_string(),
        rating: format_rating(details.vote_average),
        votes_brackets: format!("({})", votes),
        votes,
        runtime: format!(
            "{} Seasons / {} Episodes",
            details.number_of_seasons.unwrap_or(0),
            details.number_of_episodes.unwrap_or(0)
        ),
        country: details
            .origin_country
            .clone()
            .unwrap_or_default()
            .join("/"),
        genre: join_names(
            details.genres.iter().flatten().map(|g| g.name.clone()),
            ", ",
        ),
        cast: cast_block(&credits),
        crew,
        // Series are directed per-episode; the creators go in the author slot.
        director: "Various".to_string(),
        author: join_names(
            details.created_by.iter().flatten().map(|c| c.name.clone()),
            "\n",
        ),
        studio: join_names(
            details.networks.iter().flatten().map(|n| n.name.clone()),
            ", ",
        ),
        seasons,
        certification: tv_certification(details),
        full_description: String::new(),
    };
    info.full_description = full_description(&info);
    info
}

fn movie_certification(details: &MovieDetails) -> String {
    details
        .releases
        .as_ref()
        .and_then(|releases| releases.countries.as_deref())
        .and_then(|countries| countries.iter().find(|c| c.iso_3166_1 == "DE"))
        .and_then(|country| country.certification.as_deref())
        .map(|certification| certification.trim_matches('+').to_string())
        .unwrap_or_else(|| UNRATED_CERTIFICATION.to_string())
}

fn tv_certification(details: &TvDetails) -> String {
    details
        .content_ratings
        .as_ref()
        .and_then(|ratings| ratings.results.as_deref())
        .and_then(|results| results.iter().find(|r| r.iso_3166_1 == "DE"))
        .and_then(|result| result.rating.as_deref())
        .map(|rating| rating.trim_matches('+').to_string())
        .unwrap_or_else(|| UNRATED_CERTIFICATION.to_string())
}

/// Assemble the display record for a person.
pub fn assemble_person(details: &PersonDetails) -> PersonInfo {
    let gender = match details.gender {
        Some(1) => "female",
        Some(2) => "male",
        Some(3) => "divers",
        _ => "None",
    };

    let mut credit_lines = Vec::new();
    for credit in details
        .movie_credits
        .as_ref()
        .and_then(|credits| credits.cast.as_deref())
        .unwrap_or_default()
    {
        credit_lines.push(format!(
            "{} {} ({})",
            credit.release_date.as_deref().unwrap_or(""),
            credit.title.as_deref().unwrap_or(""),
            credit.character.as_deref().unwrap_or("")
        ));
    }
    for credit in details
        .tv_credits
        .as_ref()
        .and_then(|credits| credits.cast.as_deref())
        .unwrap_or_default()
    {
        credit_lines.push(format!(
            "{} {} ({})",
            credit.first_air_date.as_deref().unwrap_or(""),
            credit.name.as_deref().unwrap_or(""),
            credit.character.as_deref().unwrap_or("")
        ));
    }
    // Lines start with the date, so a reverse sort is newest-first.
    credit_lines.sort_by(|a, b| b.cmp(a));

    PersonInfo {
        name: details.name.clone(),
        biography: details.biography.clone().unwrap_or_default(),
        birthday: details.birthday.clone().unwrap_or_default(),
        place_of_birth: details.place_of_birth.clone().unwrap_or_default(),
        gender: gender.to_string(),
        aliases: details.also_known_as.clone().unwrap_or_default().join(","),
        popularity: format!("{:.1}", details.popularity.unwrap_or(0.0)),
        credits: credit_lines.join("\n"),
    }
}

/// Rows for the cast browser: `"Name (Character)"` with a profile cover.
pub fn cast_rows(credits: &Credits, images: &ImageOptions) -> Vec<CastRow> {
    let mut rows = Vec::new();
    for member in credits.cast.as_deref().unwrap_or_default() {
        rows.push(CastRow {
            title: format!(
                "{} ({})",
                member.name,
                member.character.as_deref().unwrap_or("")
            ),
            cover_url: format!(
                "{}/{}/{}",
                images.base_url,
                images.cover_size,
                member.profile_path.as_deref().unwrap_or("")
            ),
            ident: member.id.to_string(),
        });
    }
    rows
}

/// Rows for one season: a header row followed by its episodes.
pub fn season_rows(season: &SeasonDetails, images: &ImageOptions) -> Vec<SeasonRow> {
    let mut rows = Vec::new();
    rows.push(SeasonRow {
        title: format!(
            "{} ({})",
            season.name,
            year_from_date(season.air_date.as_deref().unwrap_or(""))
        ),
        cover_url: format!(
            "{}/{}/{}",
            images.base_url,
            images.cover_size,
            season.poster_path.as_deref().unwrap_or("")
        ),
        overview: season.overview.clone().unwrap_or_default(),
        ident: season.id.to_string(),
    });

    for episode in season.episodes.as_deref().unwrap_or_default() {
        rows.push(SeasonRow {
            title: format!("{:>6} {}", episode.episode_number, episode.name),
            cover_url: format!(
                "{}/{}/{}",
                images.base_url,
                images.cover_size,
                episode.still_path.as_deref().unwrap_or("")
            ),
            overview: episode.overview.clone().unwrap_or_default(),
            ident: episode.id.to_string(),
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn matrix_details() -> MovieDetails {
        serde_json::from_value(json!({
            "id": 603,
            "title": "The Matrix",
            "overview": "A computer hacker learns the truth.",
            "tagline": "Welcome to the Real World.",
            "release_date": "1999-03-31",
            "runtime": 136,
            "vote_average": 8.12,
            "vote_count": 21862,
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
            "production_countries": [{"iso_3166_1": "US"}, {"iso_3166_1": "AU"}],
            "production_companies": [{"name": "Warner Bros."}, {"name": "Village Roadshow"}],
            "credits": {
                "cast": [
                    {"id": 6384, "name": "Keanu Reeves", "character": "Neo"},
                    {"id": 2975, "name": "Laurence Fishburne", "character": "Morpheus"}
                ],
                "crew": [
                    {"id": 9339, "name": "Lilly Wachowski", "job": "Director"},
                    {"id": 9340, "name": "Lana Wachowski", "job": "Director"},
                    {"id": 9340, "name": "Lana Wachowski", "job": "Screenplay"}
                ]
            },
            "releases": {
                "countries": [
                    {"iso_3166_1": "US", "certification": "R"},
                    {"iso_3166_1": "DE", "certification": "16+"}
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_movie_info_basic_fields() {
        let info = movie_info(&matrix_details());

        assert_eq!(info.title, "The Matrix");
        assert_eq!(info.year, "1999");
        assert_eq!(info.rating, "8.1");
        assert_eq!(info.votes, "21862");
        assert_eq!(info.votes_brackets, "(21862)");
        assert_eq!(info.runtime, "136 min");
        assert_eq!(info.country, "US/AU");
        assert_eq!(info.genre, "Action, Science Fiction");
        assert_eq!(info.studio, "Warner Bros., Village Roadshow");
        assert_eq!(info.seasons, "");
    }

    #[test]
    fn test_movie_info_cast_and_crew() {
        let info = movie_info(&matrix_details());

        assert_eq!(info.cast, "Keanu Reeves (Neo)\nLaurence Fishburne (Morpheus)\n");
        assert_eq!(info.director, "Lilly Wachowski\nLana Wachowski");
        assert_eq!(info.author, "Lana Wachowski");
        assert!(info.crew.contains("Lilly Wachowski (Director)\n"));
    }

    #[test]
    fn test_movie_certification_strips_plus_sign() {
        let info = movie_info(&matrix_details());
        assert_eq!(info.certification, "16");
    }

    #[test]
    fn test_movie_without_german_release_is_unrated() {
        let details: MovieDetails =
            serde_json::from_value(json!({"id": 1, "title": "Obscure"})).unwrap();
        let info = movie_info(&details);

        assert_eq!(info.certification, "100");
        assert_eq!(info.rating, "0.0");
        assert_eq!(info.runtime, "");
        assert_eq!(info.year, "");
    }

    #[test]
    fn test_movie_full_description_layout() {
        let info = movie_info(&matrix_details());
        assert!(info.full_description.starts_with(
            "Welcome to the Real World.\nAction, Science Fiction, US/AU, 1999\n\n"
        ));
        assert!(info.full_description.contains("A computer hacker learns the truth."));
        assert!(info.full_description.contains("Keanu Reeves (Neo)"));
    }

    fn breaking_bad_details() -> TvDetails {
        serde_json::from_value(json!({
            "id": 1396,
            "name": "Breaking Bad",
            "overview": "A chemistry teacher turns to crime.",
            "first_air_date": "2008-01-20",
            "origin_country": ["US"],
            "number_of_seasons": 5,
            "number_of_episodes": 62,
            "vote_average": 8.9,
            "vote_count": 12000,
            "genres": [{"id": 18, "name": "Drama"}],
            "created_by": [{"name": "Vince Gilligan"}],
            "networks": [{"name": "AMC"}],
            "seasons": [
                {"id": 3572, "season_number": 0, "episode_count": 10, "air_date": "2009-02-17"},
                {"id": 3573, "season_number": 1, "episode_count": 7, "air_date": "2008-01-20"},
                {"id": 3575, "season_number": 2, "episode_count": 13, "air_date": "2009-03-08"}
            ],
            "content_ratings": {
                "results": [{"iso_3166_1": "DE", "rating": "16"}]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_tv_info_fields() {
        let info = tv_info(&breaking_bad_details());

        assert_eq!(info.title, "Breaking Bad");
        assert_eq!(info.year, "2008");
        assert_eq!(info.runtime, "5 Seasons / 62 Episodes");
        assert_eq!(info.country, "US");
        assert_eq!(info.director, "Various");
        assert_eq!(info.author, "Vince Gilligan");
        assert_eq!(info.studio, "AMC");
        assert_eq!(info.certification, "16");
        // Specials (season 0) are skipped.
        assert_eq!(
            info.seasons,
            "Season 1: 7 Episodes (2008)\nSeason 2: 13 Episodes (2009)\n"
        );
    }

    #[test]
    fn test_person_info_mapping() {
        let details: PersonDetails = serde_json::from_value(json!({
            "id": 6384,
            "name": "Keanu Reeves",
            "biography": "Canadian actor.",
            "birthday": "1964-09-02",
            "place_of_birth": "Beirut, Lebanon",
            "gender": 2,
            "also_known_as": ["KeanuReeves", "Киану Ривз"],
            "popularity": 45.678,
            "movie_credits": {
                "cast": [
                    {"title": "The Matrix", "character": "Neo", "release_date": "1999-03-31"},
                    {"title": "John Wick", "character": "John Wick", "release_date": "2014-10-22"}
                ]
            },
            "tv_credits": {
                "cast": [
                    {"name": "Swedish Dicks", "character": "Tex", "first_air_date": "2016-09-15"}
                ]
            }
        }))
        .unwrap();

        let info = assemble_person(&details);
        assert_eq!(info.gender, "male");
        assert_eq!(info.popularity, "45.7");
        assert_eq!(info.aliases, "KeanuReeves,Киану Ривз");

        // Newest credit first, movies and series interleaved by date.
        let lines: Vec<&str> = info.credits.lines().collect();
        assert_eq!(lines[0], "2016-09-15 Swedish Dicks (Tex)");
        assert_eq!(lines[1], "2014-10-22 John Wick (John Wick)");
        assert_eq!(lines[2], "1999-03-31 The Matrix (Neo)");
    }

    #[test]
    fn test_person_gender_fallback() {
        let details: PersonDetails =
            serde_json::from_value(json!({"id": 1, "name": "Unknown"})).unwrap();
        assert_eq!(assemble_person(&details).gender, "None");
    }

    #[test]
    fn test_cast_rows() {
        let credits: Credits = serde_json::from_value(json!({
            "cast": [
                {"id": 6384, "name": "Keanu Reeves", "character": "Neo", "profile_path": "/keanu.jpg"},
                {"id": 2975, "name": "Laurence Fishburne", "character": "Morpheus"}
            ]
        }))
        .unwrap();

        let rows = cast_rows(&credits, &ImageOptions::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Keanu Reeves (Neo)");
        assert_eq!(rows[0].cover_url, "http://image.tmdb.org/t/p/w342//keanu.jpg");
        assert_eq!(rows[0].ident, "6384");
        assert_eq!(rows[1].cover_url, "http://image.tmdb.org/t/p/w342/");
    }

    #[test]
    fn test_season_rows() {
        let season: SeasonDetails = serde_json::from_value(json!({
            "id": 3573,
            "name": "Season 1",
            "season_number": 1,
            "air_date": "2008-01-20",
            "overview": "The first season.",
            "poster_path": "/s1.jpg",
            "episodes": [
                {"id": 62085, "name": "Pilot", "episode_number": 1, "overview": "It begins."},
                {"id": 62086, "name": "Cat's in the Bag...", "episode_number": 2}
            ]
        }))
        .unwrap();

        let rows = season_rows(&season, &ImageOptions::default());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].title, "Season 1 (2008)");
        assert_eq!(rows[0].ident, "3573");
        assert_eq!(rows[1].title, "     1 Pilot");
        assert_eq!(rows[1].overview, "It begins.");
        assert_eq!(rows[2].title, "     2 Cat's in the Bag...");
        assert_eq!(rows[2].overview, "");
    }
}
