// Turns recording and video file names into searchable title text.

use std::sync::LazyLock;

use regex::Regex;

/// Everything from the first release tag onwards is scene noise.
static RELEASE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s+(x264|x265|h264|avc|720p|1080p|1080i|pal|german|english|ws|dvdrip|unrated|retail|web\s?dl|bdrip|bluray|dts|dtsd|anime|ac3(?:md|d)?|dvdscr|complete|internal|xvid|divx|dubbed|dd51|dvdr[59]?|webhd(?:tv)?(?:rip)?|webrip|hdtv(?:rip)?|hdrip|ituneshd|repack|sync)\b.*$",
    )
    .unwrap()
});

/// Season/episode marker and everything after it.
static EPISODE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\bs\d+e\d+.*$").unwrap());

static EDITION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\[?(director's cut|uncut)\]?").unwrap());

static PARENTHESIZED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(.*\)").unwrap());

/// Derive a search query from a file name or recording title.
///
/// Strips any directory prefix and extension-style separators, then cuts
/// the name at the first release tag or SxxExx marker and drops
/// parenthesized suffixes.
pub fn clean_title(name: &str) -> String {
    let base = name.rsplit('/').next().unwrap_or(name);

    let spaced: String = base
        .chars()
        .map(|c| match c {
            '.' | '_' | '+' | '-' => ' ',
            other => other,
        })
        .collect();

    let without_edition = EDITION_TAG.replace_all(&spaced, "");
    let without_release = RELEASE_TAG.replace(&without_edition, "");
    let without_episode = EPISODE_TAG.replace(&without_release, "");
    let without_parens = PARENTHESIZED.replace_all(&without_episode, "");

    without_parens
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Script ranges the remote database has no usable entries for. Queries
/// containing them only ever produce mismatches, so they are rejected
/// outright.
const UNSUPPORTED_SCRIPT_RANGES: &[(u32, u32)] = &[
    (0x0600, 0x06FF),   // Arabic
    (0x1100, 0x11FF),   // Hangul Jamo
    (0x2E80, 0x2EFF),   // CJK Radicals Supplement
    (0x3000, 0x303F),   // CJK Symbols and Punctuation
    (0x3040, 0x309F),   // Hiragana
    (0x30A0, 0x30FF),   // Katakana
    (0x3130, 0x318F),   // Hangul Compatibility Jamo
    (0x3400, 0x4DBF),   // CJK Unified Ideographs Extension A
    (0x4E00, 0x9FFF),   // CJK Unified Ideographs
    (0xAC00, 0xD7AF),   // Hangul Syllables
    (0xF900, 0xFAFF),   // CJK Compatibility Ideographs
    (0x20000, 0x2A6DF), // CJK Unified Ideographs Extension B
];

fn is_unsupported_script(c: char) -> bool {
    let code = c as u32;
    UNSUPPORTED_SCRIPT_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&code))
}

/// Reject text in scripts the search cannot resolve; returns the input
/// unchanged otherwise.
pub fn reject_unsupported_scripts(text: &str) -> &str {
    if text.chars().any(is_unsupported_script) {
        ""
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_release_name() {
        assert_eq!(
            clean_title("The.Matrix.GERMAN.DL.1080p.BluRay.x264-GROUP.mkv"),
            "The Matrix"
        );
    }

    #[test]
    fn test_release_tag_cut_keeps_prefix_only() {
        assert_eq!(
            clean_title("Blade_Runner_2049_720p_WEBRip"),
            "Blade Runner 2049"
        );
    }

    #[test]
    fn test_episode_marker_is_cut() {
        assert_eq!(clean_title("Show.Name.S01E05.Episode.Title"), "Show Name");
    }

    #[test]
    fn test_directory_prefix_is_stripped() {
        assert_eq!(
            clean_title("/media/movies/Heat.1995.DVDRip.avi"),
            "Heat 1995"
        );
    }

    #[test]
    fn test_parenthesized_suffix_is_dropped() {
        assert_eq!(clean_title("Series Name (234)"), "Series Name");
    }

    #[test]
    fn test_directors_cut_marker_is_removed() {
        assert_eq!(
            clean_title("Aliens.Director's.Cut.1080p.BluRay"),
            "Aliens"
        );
    }

    #[test]
    fn test_plain_title_passes_through() {
        assert_eq!(clean_title("The Martian"), "The Martian");
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        assert_eq!(clean_title("Some___Odd...Name"), "Some Odd Name");
    }

    #[test]
    fn test_cjk_text_is_rejected() {
        assert_eq!(reject_unsupported_scripts("千と千尋の神隠し"), "");
        assert_eq!(reject_unsupported_scripts("올드보이"), "");
    }

    #[test]
    fn test_latin_and_cyrillic_pass_through() {
        assert_eq!(reject_unsupported_scripts("The Matrix"), "The Matrix");
        assert_eq!(reject_unsupported_scripts("Сталкер"), "Сталкер");
    }
}
