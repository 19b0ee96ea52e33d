//! Media types and `Accept` header parsing.
//!
//! Matching is on the `type/subtype` essence only: names are compared
//! case-insensitively and parameters other than `q` are dropped.

use core::cmp::Reverse;
use core::fmt;
use core::str::FromStr;

use crate::error::MediaTypeError;

/// A concrete `type/subtype` media type, stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType {
    essence: String,
    slash: usize,
}

impl MediaType {
    pub fn parse(s: &str) -> Result<Self, MediaTypeError> {
        let (top, sub) = split_essence(s)?;
        if top == "*" || sub == "*" {
            return Err(MediaTypeError::Wildcard(s.trim().to_string()));
        }
        Ok(Self::from_parts(top, sub))
    }

    fn from_parts(top: &str, sub: &str) -> Self {
        let essence = format!("{}/{}", top.to_ascii_lowercase(), sub.to_ascii_lowercase());
        Self {
            essence,
            slash: top.len(),
        }
    }

    pub fn type_(&self) -> &str {
        &self.essence[..self.slash]
    }

    pub fn subtype(&self) -> &str {
        &self.essence[self.slash + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.essence
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.essence)
    }
}

impl FromStr for MediaType {
    type Err = MediaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Quality value in thousandths (`q=0.5` is `Quality(500)`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quality(u16);

impl Quality {
    pub const MAX: Quality = Quality(1000);
    pub const ZERO: Quality = Quality(0);

    /// Parse an RFC 9110 `qvalue`: at most three decimals, within `[0, 1]`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let (int, frac) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if frac.len() > 3 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let mut thousandths: u16 = 0;
        for (i, b) in frac.bytes().enumerate() {
            thousandths += u16::from(b - b'0') * [100, 10, 1][i];
        }
        match int {
            "0" => Some(Quality(thousandths)),
            "1" if thousandths == 0 => Some(Quality::MAX),
            _ => None,
        }
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.0 / 1000, self.0 % 1000)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pattern {
    Any,
    Type(String),
    Exact(MediaType),
}

/// One entry of an `Accept` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRange {
    pattern: Pattern,
    quality: Quality,
}

impl MediaRange {
    /// Parse a single range such as `application/*;q=0.8`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = split_unquoted(s, ';');
        let essence = parts.next()?;
        let (top, sub) = split_essence(essence).ok()?;

        let pattern = match (top, sub) {
            ("*", "*") => Pattern::Any,
            ("*", _) => return None,
            (t, "*") => Pattern::Type(t.to_ascii_lowercase()),
            (t, s) => Pattern::Exact(MediaType::from_parts(t, s)),
        };

        let mut quality = Quality::MAX;
        for param in parts {
            let Some((name, value)) = param.split_once('=') else {
                continue;
            };
            if name.trim().eq_ignore_ascii_case("q") {
                quality = Quality::parse(value)?;
            }
        }

        Some(Self { pattern, quality })
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn is_wildcard(&self) -> bool {
        !matches!(self.pattern, Pattern::Exact(_))
    }

    pub fn matches(&self, media_type: &MediaType) -> bool {
        match &self.pattern {
            Pattern::Any => true,
            Pattern::Type(t) => media_type.type_() == t,
            Pattern::Exact(m) => m == media_type,
        }
    }

    /// 2 for exact, 1 for `type/*`, 0 for `*/*`.
    fn specificity(&self) -> u8 {
        match self.pattern {
            Pattern::Any => 0,
            Pattern::Type(_) => 1,
            Pattern::Exact(_) => 2,
        }
    }
}

impl fmt::Display for MediaRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pattern {
            Pattern::Any => f.write_str("*/*")?,
            Pattern::Type(t) => write!(f, "{t}/*")?,
            Pattern::Exact(m) => write!(f, "{m}")?,
        }
        if self.quality != Quality::MAX {
            write!(f, ";q={}", self.quality)?;
        }
        Ok(())
    }
}

/// Parsed `Accept` header, ordered from most to least preferred.
///
/// Invalid entries are skipped rather than rejecting the whole header. An empty
/// preference list means the client expressed no preference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptPreferences {
    ranges: Vec<MediaRange>,
}

impl AcceptPreferences {
    pub fn parse(header: &str) -> Self {
        let mut ranges: Vec<MediaRange> = split_unquoted(header, ',')
            .filter(|s| !s.trim().is_empty())
            .filter_map(MediaRange::parse)
            .collect();
        // Stable: equal quality and specificity keep header order.
        ranges.sort_by_key(|r| (Reverse(r.quality), Reverse(r.specificity())));
        Self { ranges }
    }

    /// Preferences from an optional header value; absent means no preference.
    pub fn from_header(header: Option<&str>) -> Self {
        header.map(Self::parse).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MediaRange> {
        self.ranges.iter()
    }

    /// True when an exact `q=0` range names this media type.
    pub fn excludes(&self, media_type: &MediaType) -> bool {
        self.ranges
            .iter()
            .any(|r| r.quality.is_zero() && !r.is_wildcard() && r.matches(media_type))
    }
}

fn split_essence(s: &str) -> Result<(&str, &str), MediaTypeError> {
    let s = s.split(';').next().unwrap_or("").trim();
    if s.is_empty() {
        return Err(MediaTypeError::Empty);
    }
    let (top, sub) = s
        .split_once('/')
        .ok_or_else(|| MediaTypeError::MissingSlash(s.to_string()))?;
    if !is_token(top) || !is_token(sub) {
        return Err(MediaTypeError::InvalidToken(s.to_string()));
    }
    Ok((top, sub))
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

/// Split on `sep`, ignoring separators inside double-quoted strings.
fn split_unquoted(s: &str, sep: char) -> impl Iterator<Item = &str> {
    let mut in_quotes = false;
    let mut escaped = false;
    s.split(move |c: char| {
        if escaped {
            escaped = false;
            return false;
        }
        match c {
            '\\' if in_quotes => {
                escaped = true;
                false
            }
            '"' => {
                in_quotes = !in_quotes;
                false
            }
            c => c == sep && !in_quotes,
        }
    })
}
