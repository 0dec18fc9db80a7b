//! Settings sources.
//!
//! A source answers one question: "what is the raw value of this key?".
//! The loader in [`super::FeedConfig::load`] does all typing and encoding,
//! so sources stay trivial and easy to fake in tests.
//!
//! | Source         | Backing                                    |
//! |----------------|--------------------------------------------|
//! | `SettingsFile` | flat TOML file (`castfeed.toml`)           |
//! | `Overrides`    | in-memory map (CLI flags, tests)           |
//! | `Layered`      | ordered list, first source with a value wins |

use super::ConfigError;
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fmt, fs,
    path::{Path, PathBuf},
};

/// Key/value settings lookup.
pub trait SettingsSource {
    /// Raw value of `key`, or `None` when the source does not set it.
    fn get(&self, key: &str) -> Option<String>;
}

// ============================================================================
// SettingsFile
// ============================================================================

/// A single scalar setting value as written in TOML.
///
/// `Minify = true` and `Minify = "True"` both end up as text for the loader.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Text(String),
    Flag(bool),
    Number(i64),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Flag(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Settings file contents, one top-level key per setting.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct SettingsFile {
    /// Absolute path of the file this was read from (internal use only)
    #[serde(skip)]
    pub path: PathBuf,

    directory_path: Option<SettingValue>,
    url_prefix: Option<SettingValue>,
    minify: Option<SettingValue>,
    podcast_title: Option<SettingValue>,
    podcast_homepage: Option<SettingValue>,
    language: Option<SettingValue>,
    copyright: Option<SettingValue>,
    subtitle: Option<SettingValue>,
    author: Option<SettingValue>,
    description_summary: Option<SettingValue>,
    explicit: Option<SettingValue>,
    email: Option<SettingValue>,
    artwork_url: Option<SettingValue>,
    category: Option<SettingValue>,
    sub_category: Option<SettingValue>,
    podcast_rss_url: Option<SettingValue>,
    file_extension_filter: Option<SettingValue>,
    output_filename: Option<SettingValue>,
    backup_existing_feed_first: Option<SettingValue>,
    auto_close: Option<SettingValue>,
    skip_unreadable_files: Option<SettingValue>,
}

impl SettingsFile {
    /// Load settings from file path.
    ///
    /// Returns the parsed file plus any keys it did not recognize.
    pub fn from_path(path: &Path) -> Result<(Self, Vec<String>), ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let (mut file, ignored) = Self::parse_with_ignored(&content)?;
        file.path = path.to_path_buf();
        Ok((file, ignored))
    }

    /// Parse TOML content, collecting any unknown keys.
    pub fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let file = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((file, ignored))
    }

    /// Directory containing the settings file.
    pub fn root(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

impl SettingsSource for SettingsFile {
    fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "DirectoryPath" => &self.directory_path,
            "UrlPrefix" => &self.url_prefix,
            "Minify" => &self.minify,
            "PodcastTitle" => &self.podcast_title,
            "PodcastHomepage" => &self.podcast_homepage,
            "Language" => &self.language,
            "Copyright" => &self.copyright,
            "Subtitle" => &self.subtitle,
            "Author" => &self.author,
            "DescriptionSummary" => &self.description_summary,
            "Explicit" => &self.explicit,
            "Email" => &self.email,
            "ArtworkUrl" => &self.artwork_url,
            "Category" => &self.category,
            "SubCategory" => &self.sub_category,
            "PodcastRssUrl" => &self.podcast_rss_url,
            "FileExtensionFilter" => &self.file_extension_filter,
            "OutputFilename" => &self.output_filename,
            "BackupExistingFeedFirst" => &self.backup_existing_feed_first,
            "AutoClose" => &self.auto_close,
            "SkipUnreadableFiles" => &self.skip_unreadable_files,
            _ => return None,
        };
        value.as_ref().map(ToString::to_string)
    }
}

// ============================================================================
// Overrides / Layered
// ============================================================================

/// In-memory settings.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    values: BTreeMap<String, String>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Set a value only when `value` is `Some`.
    pub fn set_opt<T: ToString>(&mut self, key: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.values.insert(key.to_string(), value.to_string());
        }
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl SettingsSource for Overrides {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Ordered stack of sources; the first one that sets a key wins.
pub struct Layered<'a> {
    layers: Vec<&'a dyn SettingsSource>,
}

impl<'a> Layered<'a> {
    pub fn new(layers: Vec<&'a dyn SettingsSource>) -> Self {
        Self { layers }
    }
}

impl SettingsSource for Layered<'_> {
    fn get(&self, key: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.get(key))
    }
}
