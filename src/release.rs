//! Release versions and picking which one to install.

use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

static VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^v?(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:\.(\d+))?",
        r"(?:[._-]?(stable|beta|b|rc|RC|alpha|a|patch|pl|p)((?:[.-]?\d+)*)?)?",
        r"([.-]?dev)?",
        r"(?:\+\S+)?$",
    ))
    .expect("constant regex pattern is valid")
});

/// Where a tagged version sits relative to the plain release of the same numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    Alpha,
    Beta,
    Candidate,
    Final,
    Post,
}

#[derive(Debug, Clone)]
pub struct Version {
    numbers: [u64; 4],
    stage: Stage,
    stage_number: Vec<u64>,
    dev: bool,
    raw: String,
}

impl Version {
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let caps = VERSION_REGEX.captures(text)?;

        let mut numbers = [0u64; 4];
        for (i, slot) in numbers.iter_mut().enumerate() {
            if let Some(m) = caps.get(i + 1) {
                *slot = m.as_str().parse().ok()?;
            }
        }

        let stage = match caps.get(5).map(|m| m.as_str()) {
            None | Some("stable") => Stage::Final,
            Some("alpha") | Some("a") => Stage::Alpha,
            Some("beta") | Some("b") => Stage::Beta,
            Some("rc") | Some("RC") => Stage::Candidate,
            Some(_) => Stage::Post,
        };

        let stage_number = caps
            .get(6)
            .map(|m| {
                m.as_str()
                    .split(['.', '-'])
                    .filter(|s| !s.is_empty())
                    .filter_map(|s| s.parse().ok())
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            numbers,
            stage,
            stage_number,
            dev: caps.get(7).is_some(),
            raw: text.to_string(),
        })
    }

    /// Alpha, beta, candidate and dev builds.
    pub fn is_prerelease(&self) -> bool {
        self.dev || self.stage < Stage::Final
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.numbers
            .cmp(&other.numbers)
            .then(self.stage.cmp(&other.stage))
            .then_with(|| self.stage_number.cmp(&other.stage_number))
            // a dev build comes before the build it leads up to
            .then(other.dev.cmp(&self.dev))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Install this release.
    Install(Version),
    /// The requested version is not among the releases.
    Missing(String),
    /// Nothing qualifies, e.g. only pre-releases without `preview`.
    NoneAvailable,
}

/// Choose the release to install from `releases`.
///
/// A `requested` version must match one of the releases exactly (by version
/// ordering). Otherwise the highest release wins, skipping pre-releases unless
/// `preview` is set.
pub fn select_release(releases: &[Version], requested: Option<&str>, preview: bool) -> Selection {
    if let Some(requested) = requested {
        return match Version::parse(requested)
            .and_then(|wanted| releases.iter().find(|r| **r == wanted).cloned())
        {
            Some(found) => Selection::Install(found),
            None => Selection::Missing(requested.to_string()),
        };
    }

    releases
        .iter()
        .filter(|r| preview || !r.is_prerelease())
        .max()
        .cloned()
        .map(Selection::Install)
        .unwrap_or(Selection::NoneAvailable)
}
