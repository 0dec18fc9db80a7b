//! Type-safe setting keys.

use crate::logger::paint;
use owo_colors::Style;
use std::fmt;

/// Name of a setting in the settings file.
///
/// Used with `ConfigDiagnostics` and `ConfigError` so that messages always
/// name the exact key the user has to edit.
///
/// # Example
///
/// ```ignore
/// diag.error(Key::OUTPUT_FILENAME, "must not be empty");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key(pub &'static str);

impl Key {
    pub const DIRECTORY_PATH: Self = Self("DirectoryPath");
    pub const URL_PREFIX: Self = Self("UrlPrefix");
    pub const MINIFY: Self = Self("Minify");
    pub const PODCAST_TITLE: Self = Self("PodcastTitle");
    pub const PODCAST_HOMEPAGE: Self = Self("PodcastHomepage");
    pub const LANGUAGE: Self = Self("Language");
    pub const COPYRIGHT: Self = Self("Copyright");
    pub const SUBTITLE: Self = Self("Subtitle");
    pub const AUTHOR: Self = Self("Author");
    pub const DESCRIPTION_SUMMARY: Self = Self("DescriptionSummary");
    pub const EXPLICIT: Self = Self("Explicit");
    pub const EMAIL: Self = Self("Email");
    pub const ARTWORK_URL: Self = Self("ArtworkUrl");
    pub const CATEGORY: Self = Self("Category");
    pub const SUB_CATEGORY: Self = Self("SubCategory");
    pub const PODCAST_RSS_URL: Self = Self("PodcastRssUrl");
    pub const FILE_EXTENSION_FILTER: Self = Self("FileExtensionFilter");
    pub const OUTPUT_FILENAME: Self = Self("OutputFilename");
    pub const BACKUP_EXISTING_FEED_FIRST: Self = Self("BackupExistingFeedFirst");
    pub const AUTO_CLOSE: Self = Self("AutoClose");
    pub const SKIP_UNREADABLE_FILES: Self = Self("SkipUnreadableFiles");

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = format!("`{}`", self.0);
        f.write_str(&paint(name, Style::new().bright_blue()))
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        self.0
    }
}
