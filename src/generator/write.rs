//! Feed file output with optional backup of the previous feed.

use crate::log;
use chrono::{Local, NaiveDateTime};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Where the feed ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub path: PathBuf,
    /// Renamed previous feed, if one was backed up.
    pub backup: Option<PathBuf>,
}

/// Backup suffix layout, `yyyyMMddHHmmss`.
pub const BACKUP_STAMP: &str = "%Y%m%d%H%M%S";

/// `<path>.backup<yyyyMMddHHmmss>`
pub fn backup_path(path: &Path, at: NaiveDateTime) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".backup{}", at.format(BACKUP_STAMP)));
    PathBuf::from(name)
}

/// Write `document` to `path`, first renaming an existing file when `backup_first` is set.
///
/// The backup is stamped with the local wall clock.
pub fn write_feed(path: &Path, document: &str, backup_first: bool) -> io::Result<WriteOutcome> {
    write_feed_at(path, document, backup_first, Local::now().naive_local())
}

/// [`write_feed`] with an explicit backup timestamp.
pub fn write_feed_at(
    path: &Path,
    document: &str,
    backup_first: bool,
    now: NaiveDateTime,
) -> io::Result<WriteOutcome> {
    let backup = if backup_first && path.is_file() {
        let target = backup_path(path, now);
        // Never clobber an earlier backup
        if target.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("backup target '{}' already exists", target.display()),
            ));
        }
        fs::rename(path, &target)?;
        log!("backup"; "{}", display_name(&target));
        Some(target)
    } else {
        None
    };

    fs::write(path, document)?;
    log!("write"; "{}", display_name(path));

    Ok(WriteOutcome {
        path: path.to_path_buf(),
        backup,
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
