use crate::config::{EmptyWhitelist, FilterConfig};
use crate::ConfigError;
use regex::Regex;

/// Outcome of checking a candidate URL against the admission patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Admission {
    /// URL may be fetched
    Admitted,
    /// No file-type pattern matched
    WrongFileType,
    /// No whitelist pattern matched
    NotWhitelisted,
    /// A blacklist pattern matched
    Blacklisted,
}

impl Admission {
    /// Returns true if the URL may be fetched
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted)
    }
}

/// Compiled whitelist, blacklist and file-type patterns
///
/// Each pattern sequence is compiled into a single alternation. Matching is an
/// unanchored search anywhere in the URL string; anchors must be written into
/// the patterns themselves (`html?$`).
#[derive(Debug, Clone)]
pub struct PatternFilter {
    whitelist: Option<Regex>,
    blacklist: Option<Regex>,
    file_types: Option<Regex>,
    empty_whitelist: EmptyWhitelist,
}

impl PatternFilter {
    /// Compiles the three pattern sequences
    ///
    /// # Returns
    ///
    /// * `Ok(PatternFilter)` - All patterns compiled
    /// * `Err(ConfigError::InvalidPattern)` - The first pattern that failed to compile
    pub fn new(
        whitelist: &[String],
        blacklist: &[String],
        file_types: &[String],
        empty_whitelist: EmptyWhitelist,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            whitelist: compile_alternation(whitelist)?,
            blacklist: compile_alternation(blacklist)?,
            file_types: compile_alternation(file_types)?,
            empty_whitelist,
        })
    }

    /// Builds a filter from the `[filter]` configuration section
    pub fn from_config(config: &FilterConfig) -> Result<Self, ConfigError> {
        Self::new(
            &config.whitelist,
            &config.blacklist,
            &config.file_types,
            config.empty_whitelist,
        )
    }

    /// Checks a URL, in order: file type, whitelist, blacklist
    ///
    /// # Examples
    ///
    /// ```
    /// use tinytrip::config::EmptyWhitelist;
    /// use tinytrip::url::{Admission, PatternFilter};
    ///
    /// let filter = PatternFilter::new(
    ///     &["example\\.com".to_string()],
    ///     &["/private".to_string()],
    ///     &["html?$".to_string()],
    ///     EmptyWhitelist::AdmitAll,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(filter.check("https://example.com/a.html"), Admission::Admitted);
    /// assert_eq!(filter.check("https://example.com/a.pdf"), Admission::WrongFileType);
    /// ```
    pub fn check(&self, url: &str) -> Admission {
        // An empty file-type sequence never matches, so it admits nothing.
        if !matches(&self.file_types, url) {
            return Admission::WrongFileType;
        }

        let whitelisted = match &self.whitelist {
            Some(re) => re.is_match(url),
            None => self.empty_whitelist == EmptyWhitelist::AdmitAll,
        };
        if !whitelisted {
            return Admission::NotWhitelisted;
        }

        if matches(&self.blacklist, url) {
            return Admission::Blacklisted;
        }

        Admission::Admitted
    }

    /// Returns true if the URL passes all three checks
    pub fn admit(&self, url: &str) -> bool {
        self.check(url).is_admitted()
    }
}

fn matches(re: &Option<Regex>, url: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(url))
}

/// Joins patterns into `(?:p1)|(?:p2)|...`; an empty sequence yields None
fn compile_alternation(patterns: &[String]) -> Result<Option<Regex>, ConfigError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    // Compile each pattern alone first so a failure names its pattern.
    for pattern in patterns {
        Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
    }

    let joined = patterns
        .iter()
        .map(|p| format!("(?:{})", p))
        .collect::<Vec<_>>()
        .join("|");

    Regex::new(&joined)
        .map(Some)
        .map_err(|source| ConfigError::InvalidPattern {
            pattern: joined,
            source,
        })
}
