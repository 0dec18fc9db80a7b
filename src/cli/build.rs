//! `build` command: settings → feed file.

use super::BuildArgs;
use crate::{
    config::{
        ConfigError, FeedConfig, Key, Layered, Overrides, SettingsFile, SettingsSource,
        find_config_file,
    },
    generator::feed::{BuildOptions, FeedReport, build_feed},
    library::LoftyReader,
    log, logger,
    utils::plural::plural_count,
};
use anyhow::{Context, Result};
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

/// Load settings, run the pipeline, and optionally pause before exit.
pub fn run_build(config_name: &Path, args: &BuildArgs) -> Result<()> {
    logger::set_verbose(args.verbose);
    // stdout carries the document
    logger::set_stderr(args.stdout);

    let config = load_config(config_name, args)?;
    let options = BuildOptions {
        check: args.check,
        dry_run: args.stdout,
    };

    let report = build_feed(&config, &LoftyReader, options)?;
    if args.stdout {
        write_document(&mut io::stdout().lock(), &report.document)
            .context("Failed to write feed to stdout")?;
    }
    print_report(&report);

    if !config.auto_close {
        wait_for_enter()?;
    }
    Ok(())
}

/// Resolve the settings file, layer CLI overrides on top, and validate.
pub fn load_config(config_name: &Path, args: &BuildArgs) -> Result<FeedConfig> {
    let path = find_config_file(config_name)
        .ok_or_else(|| ConfigError::NotFound(config_name.to_path_buf()))?;
    let (file, ignored) = SettingsFile::from_path(&path)?;
    if !ignored.is_empty() {
        log!("warning"; "unknown keys in {}, ignoring:", path.display());
        for key in &ignored {
            eprintln!("- {key}");
        }
    }

    let cwd = std::env::current_dir().context("Failed to get current working directory")?;
    let overrides = cli_overrides(args, &cwd);
    let config = FeedConfig::load(&Layered::new(vec![&overrides as &dyn SettingsSource, &file]))?.with_root(file.root());
    config.validate()?;

    crate::debug!("config"; "loaded {}", path.display());
    Ok(config)
}

/// Settings given on the command line. `--dir` is taken relative to `cwd`.
fn cli_overrides(args: &BuildArgs, cwd: &Path) -> Overrides {
    let mut overrides = Overrides::new();
    let dir = args.dir.as_ref().map(|dir| absolute(dir, cwd));
    overrides
        .set_opt(
            Key::DIRECTORY_PATH.as_str(),
            dir.as_ref().map(|d| d.display()),
        )
        .set_opt(Key::OUTPUT_FILENAME.as_str(), args.output.as_ref())
        .set_opt(Key::URL_PREFIX.as_str(), args.url_prefix.as_ref())
        .set_opt(Key::MINIFY.as_str(), args.minify)
        .set_opt(Key::BACKUP_EXISTING_FEED_FIRST.as_str(), args.backup)
        .set_opt(
            Key::SKIP_UNREADABLE_FILES.as_str(),
            args.skip_unreadable.then_some(true),
        );
    overrides
}

fn absolute(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Emit the feed exactly as it would be written to disk.
fn write_document(out: &mut impl Write, document: &str) -> io::Result<()> {
    out.write_all(document.as_bytes())?;
    out.flush()
}

fn print_report(report: &FeedReport) {
    if !report.skipped.is_empty() {
        log!("warning"; "skipped {}", plural_count(report.skipped.len(), "unreadable file"));
    }
    if let Some(output) = &report.output {
        crate::debug!(
            "feed";
            "{} in {} bytes to {}",
            plural_count(report.items, "item"),
            report.document.len(),
            output.path.display()
        );
    }
}

fn wait_for_enter() -> Result<()> {
    eprint!("Process complete. Press Enter to close.");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_only_given_flags() {
        let args = BuildArgs {
            minify: Some(true),
            ..BuildArgs::default()
        };
        let overrides = cli_overrides(&args, Path::new("/work"));
        assert_eq!(overrides.get("Minify").as_deref(), Some("true"));
        assert_eq!(overrides.get("DirectoryPath"), None);
        assert_eq!(overrides.get("SkipUnreadableFiles"), None);
        assert_eq!(overrides.get("BackupExistingFeedFirst"), None);
    }

    #[test]
    fn test_cli_overrides_relative_dir() {
        let args = BuildArgs {
            dir: Some(PathBuf::from("episodes")),
            output: Some("rss.xml".into()),
            skip_unreadable: true,
            ..BuildArgs::default()
        };
        let overrides = cli_overrides(&args, Path::new("/work"));
        assert_eq!(
            overrides.get("DirectoryPath").as_deref(),
            Some(Path::new("/work/episodes").display().to_string().as_str())
        );
        assert_eq!(overrides.get("OutputFilename").as_deref(), Some("rss.xml"));
        assert_eq!(overrides.get("SkipUnreadableFiles").as_deref(), Some("true"));
    }

    #[test]
    fn test_load_config_from_file_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("castfeed.toml");
        std::fs::write(
            &path,
            "DirectoryPath = \"episodes\"\nOutputFilename = \"feed.xml\"\nUrlPrefix = \"http://x/\"\n\
             Minify = false\nExplicit = true\nBackupExistingFeedFirst = false\n",
        )
        .unwrap();

        let args = BuildArgs {
            minify: Some(true),
            ..BuildArgs::default()
        };
        let config = load_config(&path, &args).unwrap();
        assert!(config.minify);
        assert!(config.podcast.explicit);
        assert_eq!(config.directory, dir.path().join("episodes"));
    }

    #[test]
    fn test_document_output_is_plain_xml() {
        let dir = tempfile::tempdir().unwrap();
        let episodes = dir.path().to_string_lossy().into_owned();
        let config = crate::config::test_config(&[("DirectoryPath", episodes.as_str())]);
        let options = BuildOptions {
            check: false,
            dry_run: true,
        };
        let report = build_feed(&config, &LoftyReader, options).unwrap();

        let mut captured = Vec::new();
        write_document(&mut captured, &report.document).unwrap();
        let text = String::from_utf8(captured).unwrap();
        assert!(text.starts_with("<?xml"), "{text}");
        assert!(text.ends_with("</rss>\n"));
        assert!(!text.contains('\x1b'));
        assert_eq!(text, report.document);
        assert!(!dir.path().join("feed.xml").exists());
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.toml"), &BuildArgs::default()).unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn test_load_config_invalid_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("castfeed.toml");
        std::fs::write(
            &path,
            "OutputFilename = \"\"\nMinify = false\nExplicit = false\nBackupExistingFeedFirst = false\n",
        )
        .unwrap();

        let err = load_config(&path, &BuildArgs::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Diagnostics(_))
        ));
    }
}
