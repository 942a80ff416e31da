use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

pub(crate) const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "avi", "mp4", "mpg", "webm", "mov", "ogg", "wmv", "flv", "m4v",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum EpisodeNumber {
    Numbered(u64),
    Opening,
    Ending,
}

impl EpisodeNumber {
    pub(crate) fn number(self) -> Option<u64> {
        match self {
            Self::Numbered(number) => Some(number),
            Self::Opening | Self::Ending => None,
        }
    }
}

impl fmt::Display for EpisodeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numbered(number) => write!(f, "{number}"),
            Self::Opening => f.write_str("OP"),
            Self::Ending => f.write_str("ED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedName {
    pub(crate) series: String,
    pub(crate) number: EpisodeNumber,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Episode {
    pub(crate) filename: String,
    pub(crate) series: String,
    pub(crate) number: EpisodeNumber,
}

impl Episode {
    pub(crate) fn from_entry(filename: &str, is_dir: bool) -> Result<Self, ParseFailure> {
        if is_dir {
            return Err(ParseFailure::Directory(filename.to_string()));
        }
        let parsed = parse_filename(filename)?;
        Ok(Self {
            filename: filename.to_string(),
            series: parsed.series,
            number: parsed.number,
        })
    }
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.series, self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ParseFailure {
    #[error("{0} is a directory")]
    Directory(String),
    #[error("{0} does not have a recognized video extension")]
    UnsupportedExtension(String),
    #[error("abandoning parse of {0}: no series name found")]
    MissingSeries(String),
    #[error("abandoning parse of {0}: episode number is too large")]
    NumberOutOfRange(String),
}

impl ParseFailure {
    // Directories and non-video files are skipped quietly.
    pub(crate) fn is_reportable(&self) -> bool {
        matches!(self, Self::MissingSeries(_) | Self::NumberOutOfRange(_))
    }
}

struct Patterns {
    metadata: Regex,
    repeated_spaces: Regex,
    episode_numbers: Vec<Regex>,
    opening: Regex,
    ending: Regex,
    series: Vec<Regex>,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("literal pattern should compile")
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| Patterns {
    metadata: compile(r"[(\[].*?[)\]]"),
    repeated_spaces: compile(r" {2,}"),
    // Tried in order, first match wins.
    episode_numbers: vec![
        // S01E01
        compile(r"(?i)\bS[0-9]+E([0-9]+)\b"),
        // 01v2
        compile(r"(?i)\b([0-9]+)v[0-9]+\b"),
        // - 01
        compile(r"(?i)\s-\s([0-9]+)\b"),
        // ep01, ep 01
        compile(r"(?i)ep ?([0-9]+)\b"),
        // ep. 01
        compile(r"(?i)ep\. ([0-9]+)\b"),
        // 01
        compile(r"(?i)\b([0-9]+)\b"),
    ],
    opening: compile(r"(?i)\bOP[0-9]*\b"),
    ending: compile(r"(?i)\bED[0-9]*\b"),
    // Each captures the series name in group 1; the last one takes everything.
    series: vec![
        // bento S1E01
        compile(r"(?i)^(.*?)\sS[0-9]+E[0-9]+\b"),
        // bento ep01, bento ep. 01
        compile(r"(?i)^(.*?)\sep\.?\s*[0-9]+\b"),
        // bento - 01, bento - OP
        compile(r"(?i)^(.*?)\s-\s(?:[0-9]|Special|OVA|OP|ED)"),
        // bento 01, bento OP
        compile(r"(?i)^(.*?)\s(?:[0-9]|OP[0-9]*\b|ED[0-9]*\b|Special|OVA\b)"),
        // bento
        compile(r"^(.*)$"),
    ],
});

pub(crate) fn parse_filename(filename: &str) -> Result<ParsedName, ParseFailure> {
    let stem = strip_video_extension(filename)
        .ok_or_else(|| ParseFailure::UnsupportedExtension(filename.to_string()))?;
    let cleaned = clean_stem(stem);
    let number = episode_number(&cleaned)
        .ok_or_else(|| ParseFailure::NumberOutOfRange(filename.to_string()))?;
    let series = series_name(&cleaned)
        .ok_or_else(|| ParseFailure::MissingSeries(filename.to_string()))?;
    Ok(ParsedName { series, number })
}

pub(crate) fn strip_video_extension(filename: &str) -> Option<&str> {
    let (stem, extension) = filename.rsplit_once('.')?;
    let extension = extension.to_ascii_lowercase();
    VIDEO_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(stem)
}

pub(crate) fn clean_stem(stem: &str) -> String {
    let patterns = &*PATTERNS;
    let spaced = stem.replace('_', " ");
    let spaced = patterns.repeated_spaces.replace_all(&spaced, " ");
    let stripped = patterns.metadata.replace_all(&spaced, "");
    patterns
        .repeated_spaces
        .replace_all(stripped.trim(), " ")
        .into_owned()
}

// None only when the first matching rule captured more digits than fit.
fn episode_number(cleaned: &str) -> Option<EpisodeNumber> {
    let patterns = &*PATTERNS;
    let digits = patterns
        .episode_numbers
        .iter()
        .find_map(|rule| rule.captures(cleaned).and_then(|caps| caps.get(1)));
    if let Some(digits) = digits {
        return digits.as_str().parse::<u64>().ok().map(EpisodeNumber::Numbered);
    }

    Some(if patterns.opening.is_match(cleaned) {
        EpisodeNumber::Opening
    } else if patterns.ending.is_match(cleaned) {
        EpisodeNumber::Ending
    } else {
        // Specials, OVAs and anything without a marker (films, mostly) sort first.
        EpisodeNumber::Numbered(0)
    })
}

fn series_name(cleaned: &str) -> Option<String> {
    PATTERNS.series.iter().find_map(|rule| {
        let name = rule.captures(cleaned)?.get(1)?.as_str().trim();
        (!name.is_empty()).then(|| name.to_string())
    })
}
