//! Episode file collection and ordering.

use crate::{debug, log};
use std::{
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};

/// One candidate media file, captured at collection time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    /// File name including extension, used in enclosure URLs.
    pub name: String,
    /// Creation time, or modification time where the filesystem has no birth time.
    pub created: SystemTime,
    pub len: u64,
}

impl FileEntry {
    fn from_dir_entry(entry: &fs::DirEntry, metadata: &fs::Metadata) -> io::Result<Self> {
        let created = metadata.created().or_else(|_| metadata.modified())?;
        Ok(Self {
            path: entry.path(),
            name: entry.file_name().to_string_lossy().into_owned(),
            created,
            len: metadata.len(),
        })
    }
}

/// List regular files directly inside `dir` that match `filter`.
///
/// An empty filter accepts every file. A missing directory yields an empty
/// list rather than an error; any other read failure is returned.
pub fn collect_files(dir: &Path, filter: &str) -> io::Result<Vec<FileEntry>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log!("scan"; "directory '{}' does not exist, feed will be empty", dir.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        // Follows symlinks; dangling links are skipped
        let metadata = match fs::metadata(entry.path()) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        };
        if !metadata.is_file() {
            continue;
        }
        if !matches_extension(Path::new(&entry.file_name()), filter) {
            debug!("scan"; "skipping {}", entry.file_name().to_string_lossy());
            continue;
        }
        files.push(FileEntry::from_dir_entry(&entry, &metadata)?);
    }

    Ok(files)
}

/// Case-insensitive extension match. `.mp3` and `mp3` are equivalent filters.
pub fn matches_extension(path: &Path, filter: &str) -> bool {
    let wanted = filter.trim().trim_start_matches('.');
    if filter.trim().is_empty() {
        return true;
    }
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

/// Order newest first. Stable: equal timestamps keep enumeration order.
pub fn sort_newest_first(files: &mut [FileEntry]) {
    files.sort_by(|a, b| b.created.cmp(&a.created));
}
