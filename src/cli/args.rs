//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Podcast feed generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Settings file path, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = "castfeed.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a commented settings file template
    #[command(visible_alias = "i")]
    Init {
        /// Overwrite an existing settings file
        #[arg(short, long)]
        force: bool,
    },

    /// Scan the episode directory and write the feed
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },
}

/// Build arguments; each one overrides the matching setting
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Episode directory (overrides `DirectoryPath`)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// Feed file name inside the episode directory (overrides `OutputFilename`)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Enclosure URL prefix (overrides `UrlPrefix`)
    #[arg(short, long, value_hint = clap::ValueHint::Url)]
    pub url_prefix: Option<String>,

    /// Minify the feed (overrides `Minify`)
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Back up an existing feed before overwriting (overrides `BackupExistingFeedFirst`)
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub backup: Option<bool>,

    /// Skip files whose tags cannot be read instead of aborting
    #[arg(long)]
    pub skip_unreadable: bool,

    /// Parse the generated feed back and validate it before writing
    #[arg(long)]
    pub check: bool,

    /// Print the feed to stdout instead of writing it
    #[arg(long)]
    pub stdout: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_build_flags() {
        let cli = Cli::try_parse_from([
            "castfeed", "build", "-d", "/srv/pod", "-m", "--backup=false", "--check",
        ])
        .unwrap();
        let Commands::Build { build_args } = cli.command else {
            panic!("expected build");
        };
        assert_eq!(build_args.dir, Some(PathBuf::from("/srv/pod")));
        assert_eq!(build_args.minify, Some(true));
        assert_eq!(build_args.backup, Some(false));
        assert!(build_args.check);
        assert!(!build_args.stdout);
        assert_eq!(cli.config, PathBuf::from("castfeed.toml"));
    }

    #[test]
    fn test_parse_init_with_config() {
        let cli = Cli::try_parse_from(["castfeed", "-C", "show.toml", "init", "--force"]).unwrap();
        assert!(matches!(cli.command, Commands::Init { force: true }));
        assert_eq!(cli.config, PathBuf::from("show.toml"));
    }
}
