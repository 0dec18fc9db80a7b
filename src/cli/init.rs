//! Settings file generation.

use crate::log;
use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Generate the settings file template with comments.
pub fn generate_config_template() -> String {
    format!(
        r#"# castfeed settings (v{version})
# Text values are HTML-encoded when loaded; write them as plain text.

# Episode directory; the feed is written here too.
# Relative paths are resolved against this file's directory.
DirectoryPath = "episodes"
# Only files with this extension become episodes; "" takes every file.
FileExtensionFilter = ".mp3"
# Prepended to each file name to form the enclosure URL and GUID.
UrlPrefix = "https://example.com/episodes/"
# Feed file name inside DirectoryPath.
OutputFilename = "feed.xml"

Minify = false
BackupExistingFeedFirst = true
# Skip episodes whose tags cannot be read instead of aborting the run.
SkipUnreadableFiles = false
# Set to false to wait for Enter before exiting.
AutoClose = true

PodcastTitle = "My Podcast"
PodcastHomepage = "https://example.com"
PodcastRssUrl = "https://example.com/episodes/feed.xml"
Language = "en-us"
Copyright = "All rights reserved"
Subtitle = ""
Author = ""
DescriptionSummary = ""
Explicit = false
Email = ""
ArtworkUrl = "https://example.com/artwork.jpg"
Category = "Technology"
SubCategory = "Podcasting"
"#,
        version = env!("CARGO_PKG_VERSION")
    )
}

/// Write the template to `path`. Refuses to overwrite unless `force`.
pub fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "settings file '{}' already exists, use --force to overwrite",
            path.display()
        );
    }

    fs::write(path, generate_config_template())
        .with_context(|| format!("Failed to write settings file '{}'", path.display()))?;

    log!("init"; "wrote {}", path.display());
    Ok(())
}
