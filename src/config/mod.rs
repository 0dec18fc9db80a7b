//! Feed settings: loading, typing, and validation.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── source     # SettingsSource trait, TOML file, overrides, layering
//! ├── types/     # ConfigError, ConfigDiagnostics, Key
//! ├── util       # config discovery, path resolution
//! └── mod.rs     # FeedConfig (this file)
//! ```
//!
//! Text settings are HTML-encoded once at load time and are used verbatim by
//! the feed renderer. Path settings stay raw because they address the
//! filesystem and never reach the document.

pub mod source;
pub mod types;
mod util;

pub use source::{Layered, Overrides, SettingsFile, SettingsSource};
pub use types::{ConfigDiagnostics, ConfigError, Key};
pub use util::{find_config_file, resolve_dir};

use crate::utils::html;
use std::path::{Path, PathBuf};

// ============================================================================
// FeedConfig
// ============================================================================

/// Channel metadata rendered into the feed header. All fields are encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodcastInfo {
    pub title: String,
    pub homepage: String,
    pub language: String,
    pub copyright: String,
    pub subtitle: String,
    pub author: String,
    /// Used for both `<itunes:summary>` and `<description>`.
    pub summary: String,
    pub explicit: bool,
    pub email: String,
    pub artwork_url: String,
    pub category: String,
    pub sub_category: String,
    pub rss_url: String,
}

/// Immutable settings for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedConfig {
    /// Directory scanned for episodes; the feed is written here too.
    pub directory: PathBuf,
    /// Encoded prefix joined with each file name to form enclosure URLs.
    pub url_prefix: String,
    pub minify: bool,
    pub podcast: PodcastInfo,
    /// Extension filter such as `.mp3`; empty accepts every file.
    pub extension_filter: String,
    pub output_filename: String,
    pub backup_first: bool,
    /// Skip files whose tags cannot be read instead of aborting.
    pub skip_unreadable: bool,
    /// When false the CLI waits for Enter before exiting.
    pub auto_close: bool,
}

impl FeedConfig {
    /// Load and type every setting from `source`.
    ///
    /// Missing text settings become empty strings. The three core flags
    /// (`Minify`, `Explicit`, `BackupExistingFeedFirst`) are required.
    pub fn load(source: &dyn SettingsSource) -> Result<Self, ConfigError> {
        let settings = Reader { source };

        Ok(Self {
            directory: PathBuf::from(settings.raw(Key::DIRECTORY_PATH)),
            url_prefix: settings.text(Key::URL_PREFIX),
            minify: settings.flag(Key::MINIFY)?,
            podcast: PodcastInfo {
                title: settings.text(Key::PODCAST_TITLE),
                homepage: settings.text(Key::PODCAST_HOMEPAGE),
                language: settings.text(Key::LANGUAGE),
                copyright: settings.text(Key::COPYRIGHT),
                subtitle: settings.text(Key::SUBTITLE),
                author: settings.text(Key::AUTHOR),
                summary: settings.text(Key::DESCRIPTION_SUMMARY),
                explicit: settings.flag(Key::EXPLICIT)?,
                email: settings.text(Key::EMAIL),
                artwork_url: settings.text(Key::ARTWORK_URL),
                category: settings.text(Key::CATEGORY),
                sub_category: settings.text(Key::SUB_CATEGORY),
                rss_url: settings.text(Key::PODCAST_RSS_URL),
            },
            extension_filter: settings.raw(Key::FILE_EXTENSION_FILTER),
            output_filename: settings.raw(Key::OUTPUT_FILENAME),
            backup_first: settings.flag(Key::BACKUP_EXISTING_FEED_FIRST)?,
            skip_unreadable: settings.flag_or(Key::SKIP_UNREADABLE_FILES, false)?,
            auto_close: settings.flag_or(Key::AUTO_CLOSE, true)?,
        })
    }

    /// Resolve `~` and a relative `directory` against `root`.
    pub fn with_root(mut self, root: &Path) -> Self {
        self.directory = resolve_dir(&self.directory.to_string_lossy(), root);
        self
    }

    /// Full path of the feed file.
    pub fn output_path(&self) -> PathBuf {
        self.directory.join(&self.output_filename)
    }

    /// Validate settings, printing warnings and returning collected errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let diag = self.diagnose();
        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    /// Collect diagnostics without printing.
    pub fn diagnose(&self) -> ConfigDiagnostics {
        let mut diag = ConfigDiagnostics::new();

        if self.output_filename.trim().is_empty() {
            diag.error_with_hint(
                Key::OUTPUT_FILENAME,
                "output filename is empty",
                format!("set {}, e.g.: \"feed.xml\"", Key::OUTPUT_FILENAME),
            );
        } else if Path::new(&self.output_filename).components().count() != 1 {
            diag.error(
                Key::OUTPUT_FILENAME,
                "must be a plain file name inside the episode directory",
            );
        }

        if self.directory.as_os_str().is_empty() {
            diag.warn(
                Key::DIRECTORY_PATH,
                "not set, no episodes will be collected and the feed is written to the current directory",
            );
        }

        if !self.url_prefix.is_empty() && !self.url_prefix.ends_with('/') {
            diag.warn_with_hint(
                Key::URL_PREFIX,
                "does not end with `/`, file names are appended as-is",
                format!("e.g.: \"{}/\"", self.url_prefix),
            );
        }

        let urls = [
            (Key::PODCAST_HOMEPAGE, &self.podcast.homepage),
            (Key::ARTWORK_URL, &self.podcast.artwork_url),
            (Key::PODCAST_RSS_URL, &self.podcast.rss_url),
        ];
        for (key, value) in urls {
            check_url(key, value, &mut diag);
        }

        diag
    }
}

/// Warn when a non-empty URL setting is not an absolute http(s) URL.
fn check_url(key: Key, value: &str, diag: &mut ConfigDiagnostics) {
    if value.is_empty() {
        return;
    }
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        Ok(parsed) => diag.warn_with_hint(
            key,
            format!("scheme '{}' is not http or https", parsed.scheme()),
            "use format like https://example.com",
        ),
        Err(e) => diag.warn_with_hint(
            key,
            format!("invalid URL: {e}"),
            "use format like https://example.com",
        ),
    }
}

// ============================================================================
// Reader
// ============================================================================

/// Typed access to a settings source.
struct Reader<'a> {
    source: &'a dyn SettingsSource,
}

impl Reader<'_> {
    /// Raw value, empty when unset.
    fn raw(&self, key: Key) -> String {
        self.source.get(key.as_str()).unwrap_or_default()
    }

    /// HTML-encoded value, empty when unset.
    fn text(&self, key: Key) -> String {
        html::escape(&self.raw(key)).into_owned()
    }

    fn flag(&self, key: Key) -> Result<bool, ConfigError> {
        match self.source.get(key.as_str()) {
            Some(value) => parse_bool(key, &value),
            None => Err(ConfigError::Missing(key)),
        }
    }

    fn flag_or(&self, key: Key, default: bool) -> Result<bool, ConfigError> {
        match self.source.get(key.as_str()) {
            Some(value) => parse_bool(key, &value),
            None => Ok(default),
        }
    }
}

/// Parse `true`/`false`, case-insensitive, surrounding whitespace ignored.
fn parse_bool(key: Key, value: &str) -> Result<bool, ConfigError> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ConfigError::InvalidBool {
            key,
            value: value.to_string(),
        })
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Overrides holding every required setting, for building test configs.
#[cfg(test)]
pub fn test_settings(extra: &[(&str, &str)]) -> Overrides {
    let mut settings: Overrides = [
        ("DirectoryPath", ""),
        ("UrlPrefix", "http://x/"),
        ("Minify", "false"),
        ("PodcastTitle", "Test Cast"),
        ("PodcastHomepage", "https://example.com"),
        ("Language", "en-us"),
        ("Copyright", "2024 Test"),
        ("Subtitle", "A test show"),
        ("Author", "Tester"),
        ("DescriptionSummary", "About the show"),
        ("Explicit", "false"),
        ("Email", "host@example.com"),
        ("ArtworkUrl", "https://example.com/art.jpg"),
        ("Category", "Technology"),
        ("SubCategory", "Podcasting"),
        ("PodcastRssUrl", "https://example.com/feed.xml"),
        ("FileExtensionFilter", ".mp3"),
        ("OutputFilename", "feed.xml"),
        ("BackupExistingFeedFirst", "false"),
    ]
    .into_iter()
    .collect();
    for (key, value) in extra {
        settings.set(*key, *value);
    }
    settings
}

/// Load a `FeedConfig` from [`test_settings`], panicking on error.
#[cfg(test)]
pub fn test_config(extra: &[(&str, &str)]) -> FeedConfig {
    FeedConfig::load(&test_settings(extra)).unwrap()
}

// ============================================================================
// tests
// ============================================================================
