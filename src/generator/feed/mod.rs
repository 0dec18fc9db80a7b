//! Podcast feed generation pipeline.
//!
//! collect → sort → read tags → render → (minify) → (check) → write
//!
//! The whole document is built in memory before anything on disk is touched,
//! so a failing episode never leaves a partial feed or a stray backup.

pub mod podcast;

use crate::{
    config::FeedConfig,
    generator::{
        check::{CheckError, check_feed},
        minify::minify_xml,
        write::{WriteOutcome, write_feed},
    },
    library::{TagError, TitleReader, collect_files, sort_newest_first},
    log,
    logger::ProgressLine,
    utils::plural::plural_count,
};
use podcast::{FeedItem, render_document};
use std::{io, path::PathBuf};
use thiserror::Error;

/// Pipeline failures, one variant per stage.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to read episode directory `{}`", path.display())]
    Collect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Tag(#[from] TagError),

    #[error("generated feed did not pass the check")]
    Check(#[from] CheckError),

    #[error("failed to write feed `{}`", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FeedError {
    /// Process exit code for this failure.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Collect { .. } => 3,
            Self::Tag(_) => 4,
            Self::Write { .. } => 5,
            Self::Check(_) => 6,
        }
    }
}

/// Per-run switches that are not part of the settings file.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Validate the document with the `rss` parser before writing.
    pub check: bool,
    /// Render only; leave the filesystem untouched.
    pub dry_run: bool,
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct FeedReport {
    pub document: String,
    pub items: usize,
    /// Files dropped because their tags could not be read.
    pub skipped: Vec<PathBuf>,
    /// `None` on dry runs.
    pub output: Option<WriteOutcome>,
}

/// Episodes of one run, in feed order.
pub struct PodcastFeed<'a> {
    config: &'a FeedConfig,
    items: Vec<FeedItem>,
    skipped: Vec<PathBuf>,
}

impl<'a> PodcastFeed<'a> {
    /// Collect, order, and title every episode in the configured directory.
    pub fn collect(config: &'a FeedConfig, reader: &dyn TitleReader) -> Result<Self, FeedError> {
        let mut files = collect_files(&config.directory, &config.extension_filter).map_err(
            |source| FeedError::Collect {
                path: config.directory.clone(),
                source,
            },
        )?;
        sort_newest_first(&mut files);
        log!("scan"; "{} in {}", plural_count(files.len(), "episode"), config.directory.display());

        let progress = ProgressLine::new(&[("tags", files.len())]);
        let mut items = Vec::with_capacity(files.len());
        let mut skipped = Vec::new();
        for file in files {
            let title = match reader.read_title(&file.path) {
                Ok(title) => title,
                Err(e) if config.skip_unreadable => {
                    log!("warning"; "skipping {}: {}", file.name, e.source);
                    skipped.push(file.path);
                    progress.inc("tags");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            progress.inc("tags");
            items.push(FeedItem { file, title });
        }
        progress.finish();

        Ok(Self {
            config,
            items,
            skipped,
        })
    }

    #[cfg(test)]
    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    /// Render the document, minified when configured.
    pub fn to_xml(&self) -> String {
        let xml = render_document(&self.config.podcast, &self.items, &self.config.url_prefix);
        if self.config.minify {
            minify_xml(&xml)
        } else {
            xml
        }
    }
}

/// Run the whole pipeline for `config`.
pub fn build_feed(
    config: &FeedConfig,
    reader: &dyn TitleReader,
    options: BuildOptions,
) -> Result<FeedReport, FeedError> {
    let feed = PodcastFeed::collect(config, reader)?;
    let document = feed.to_xml();

    if options.check {
        let report = check_feed(&document)?;
        log!("check"; "ok, {} parsed", plural_count(report.items, "item"));
    }

    let output = if options.dry_run {
        None
    } else {
        let path = config.output_path();
        let outcome = write_feed(&path, &document, config.backup_first)
            .map_err(|source| FeedError::Write { path, source })?;
        Some(outcome)
    };

    log!("feed"; "{}", plural_count(feed.items.len(), "item"));

    Ok(FeedReport {
        items: feed.items.len(),
        skipped: feed.skipped,
        document,
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FeedConfig, test_config};
    use std::{collections::HashMap, fs, path::Path};

    /// Titles keyed by file name; unknown names fail like a corrupt file.
    struct FakeReader(HashMap<&'static str, &'static str>);

    impl FakeReader {
        fn new(titles: &[(&'static str, &'static str)]) -> Self {
            Self(titles.iter().copied().collect())
        }
    }

    impl TitleReader for FakeReader {
        fn read_title(&self, path: &Path) -> Result<String, TagError> {
            let name = path.file_name().unwrap().to_str().unwrap();
            self.0
                .get(name)
                .map(|t| t.to_string())
                .ok_or_else(|| TagError::new(path, "invalid MPEG frame header"))
        }
    }

    fn config_for(dir: &Path, extra: &[(&str, &str)]) -> FeedConfig {
        let dir = dir.to_string_lossy().into_owned();
        let mut settings = vec![("DirectoryPath", dir.as_str())];
        settings.extend_from_slice(extra);
        test_config(&settings)
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_item_count_matches_filter() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ep1.mp3"), b"1").unwrap();
        fs::write(dir.path().join("ep2.mp3"), b"22").unwrap();
        fs::write(dir.path().join("cover.jpg"), b"img").unwrap();
        let config = config_for(dir.path(), &[]);
        let reader = FakeReader::new(&[("ep1.mp3", "One"), ("ep2.mp3", "Two")]);

        let report = build_feed(&config, &reader, BuildOptions::default()).unwrap();
        assert_eq!(report.items, 2);

        let written = fs::read_to_string(dir.path().join("feed.xml")).unwrap();
        assert_eq!(written, report.document);
        assert_eq!(written.matches("<item>").count(), 2);
        assert!(written.contains("<guid isPermaLink=\"false\">http://x/ep1.mp3</guid>"));
        assert!(written.contains("<enclosure url=\"http://x/ep2.mp3\" length=\"2\" type=\"audio/mpeg\" />"));
    }

    #[test]
    fn test_no_filter_includes_every_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.mp3"), b"").unwrap();
        fs::write(dir.path().join("b.ogg"), b"").unwrap();
        let config = config_for(dir.path(), &[("FileExtensionFilter", "")]);
        let reader = FakeReader::new(&[("a.mp3", "A"), ("b.ogg", "B")]);

        let options = BuildOptions {
            dry_run: true,
            ..BuildOptions::default()
        };
        let report = build_feed(&config, &reader, options).unwrap();
        assert_eq!(report.items, 2);
    }

    #[test]
    fn test_items_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.mp3", "b.mp3", "c.mp3"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let config = config_for(dir.path(), &[]);
        let reader = FakeReader::new(&[("a.mp3", "A"), ("b.mp3", "B"), ("c.mp3", "C")]);

        let feed = PodcastFeed::collect(&config, &reader).unwrap();
        let times: Vec<_> = feed.items().iter().map(|i| i.file.created).collect();
        assert!(times.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_missing_directory_yields_empty_feed() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&dir.path().join("not-there"), &[]);
        let reader = FakeReader::new(&[]);

        let options = BuildOptions {
            dry_run: true,
            ..BuildOptions::default()
        };
        let report = build_feed(&config, &reader, options).unwrap();
        assert_eq!(report.items, 0);
        assert!(!report.document.contains("<item>"));
        assert!(report.document.ends_with("\t</channel>\n</rss>\n"));
    }

    #[test]
    fn test_empty_directory_writes_header_and_footer() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path(), &[]);

        let report = build_feed(&config, &FakeReader::new(&[]), BuildOptions::default()).unwrap();
        assert_eq!(report.items, 0);
        let written = fs::read_to_string(dir.path().join("feed.xml")).unwrap();
        assert!(written.starts_with("<?xml"));
        assert!(!written.contains("<item>"));
    }

    #[test]
    fn test_backup_then_fresh_content() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ep1.mp3"), b"x").unwrap();
        fs::write(dir.path().join("feed.xml"), "stale feed").unwrap();
        let config = config_for(dir.path(), &[("BackupExistingFeedFirst", "true")]);

        let report = build_feed(
            &config,
            &FakeReader::new(&[("ep1.mp3", "Fresh")]),
            BuildOptions::default(),
        )
        .unwrap();

        let backups: Vec<String> = dir_entries(dir.path())
            .into_iter()
            .filter(|n| n.starts_with("feed.xml.backup"))
            .collect();
        assert_eq!(backups.len(), 1);
        let stamp = backups[0].trim_start_matches("feed.xml.backup");
        assert_eq!(stamp.len(), 14);
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(
            fs::read_to_string(dir.path().join(&backups[0])).unwrap(),
            "stale feed"
        );

        let written = fs::read_to_string(dir.path().join("feed.xml")).unwrap();
        assert!(written.contains("<title>Fresh</title>"));
        assert_eq!(
            report.output.unwrap().backup,
            Some(dir.path().join(&backups[0]))
        );
    }

    #[test]
    fn test_bad_tag_aborts_without_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("good.mp3"), b"x").unwrap();
        fs::write(dir.path().join("bad.mp3"), b"x").unwrap();
        fs::write(dir.path().join("feed.xml"), "previous").unwrap();
        let config = config_for(dir.path(), &[("BackupExistingFeedFirst", "true")]);
        let before = dir_entries(dir.path());

        let err = build_feed(
            &config,
            &FakeReader::new(&[("good.mp3", "Good")]),
            BuildOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, FeedError::Tag(_)));
        assert_eq!(err.exit_code(), 4);
        assert_eq!(dir_entries(dir.path()), before);
        assert_eq!(
            fs::read_to_string(dir.path().join("feed.xml")).unwrap(),
            "previous"
        );
    }

    #[test]
    fn test_skip_unreadable_opt_in() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("good.mp3"), b"x").unwrap();
        fs::write(dir.path().join("bad.mp3"), b"x").unwrap();
        let config = config_for(dir.path(), &[("SkipUnreadableFiles", "true")]);

        let options = BuildOptions {
            dry_run: true,
            ..BuildOptions::default()
        };
        let report = build_feed(&config, &FakeReader::new(&[("good.mp3", "Good")]), options).unwrap();
        assert_eq!(report.items, 1);
        assert_eq!(report.skipped, vec![dir.path().join("bad.mp3")]);
        assert!(report.output.is_none());
        assert!(!dir.path().join("feed.xml").exists());
    }

    #[test]
    fn test_minify_applied_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ep1.mp3"), b"x").unwrap();
        let config = config_for(dir.path(), &[("Minify", "true")]);

        let report = build_feed(
            &config,
            &FakeReader::new(&[("ep1.mp3", "One")]),
            BuildOptions::default(),
        )
        .unwrap();
        assert!(!report.document.contains('\n'));
        assert!(report.document.contains("<item><title>One</title><pubDate>"));
        assert!(report.document.ends_with("</channel></rss>"));
        assert_eq!(minify_xml(&report.document), report.document);
    }

    #[test]
    fn test_check_passes_for_rendered_feed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ep1.mp3"), b"x").unwrap();
        let config = config_for(dir.path(), &[]);
        let options = BuildOptions {
            check: true,
            dry_run: true,
        };

        let report = build_feed(&config, &FakeReader::new(&[("ep1.mp3", "One")]), options).unwrap();
        assert_eq!(report.items, 1);
    }

    #[test]
    fn test_check_failure_keeps_cause() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path(), &[("PodcastHomepage", "not a url")]);
        let options = BuildOptions {
            check: true,
            dry_run: false,
        };

        let err = build_feed(&config, &FakeReader::new(&[]), options).unwrap_err();
        assert!(matches!(err, FeedError::Check(CheckError::Invalid(_))));
        assert_eq!(err.exit_code(), 6);
        assert!(std::error::Error::source(&err).is_some());
        assert!(!dir.path().join("feed.xml").exists());
    }

    #[test]
    fn test_collect_error_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, b"").unwrap();
        let config = config_for(&file, &[]);

        let err = build_feed(&config, &FakeReader::new(&[]), BuildOptions::default()).unwrap_err();
        assert!(matches!(err, FeedError::Collect { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_write_error_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path(), &[("OutputFilename", "sub/feed.xml")]);

        let err = build_feed(&config, &FakeReader::new(&[]), BuildOptions::default()).unwrap_err();
        assert!(matches!(err, FeedError::Write { .. }));
        assert_eq!(err.exit_code(), 5);
    }
}
