use serde::Deserialize;

/// Main configuration structure for Tinytrip
///
/// Every section and key is optional in the TOML file; missing values fall
/// back to the defaults of the reference command line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub filter: FilterConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Maximum number of fetches in flight at once
    pub concurrency: u32,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Maximum number of link hops from the seed URL
    pub max_depth: Option<u32>,

    /// Maximum number of URLs claimed during the run
    pub max_pages: Option<u64>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            concurrency: 1,
            user_agent: format!(
                "Mozilla/5.0 (compatible; tinytrip/{})",
                env!("CARGO_PKG_VERSION")
            ),
            max_depth: None,
            max_pages: None,
        }
    }
}

/// How an empty whitelist is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyWhitelist {
    /// No whitelist means no restriction
    #[default]
    AdmitAll,
    /// No whitelist means nothing can be admitted
    AdmitNone,
}

/// URL admission patterns
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FilterConfig {
    /// Regexes of which at least one must appear in a URL
    pub whitelist: Vec<String>,

    /// Regexes of which none may appear in a URL
    pub blacklist: Vec<String>,

    /// Regexes for acceptable target file types
    pub file_types: Vec<String>,

    pub empty_whitelist: EmptyWhitelist,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            whitelist: Vec::new(),
            blacklist: Vec::new(),
            file_types: vec![DEFAULT_FILE_TYPES.to_string()],
            empty_whitelist: EmptyWhitelist::default(),
        }
    }
}

/// Default file-type pattern: URLs ending in `html` or `htm`
pub const DEFAULT_FILE_TYPES: &str = "html?$";

/// Persistence strategy for fetched pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// Zip archive with one HTML entry per page, written as pages arrive
    #[default]
    Archive,
    /// One JSON object mapping URL to page content, written at the end
    Document,
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    pub mode: OutputMode,

    /// Output file; derived from the mode and seed URL when unset
    pub path: Option<String>,
}

/// Default archive location of the reference command line
pub const DEFAULT_ARCHIVE_PATH: &str = "data/out.zip";
