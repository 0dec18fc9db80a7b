//! Episode title extraction from embedded audio tags.

use lofty::prelude::*;
use lofty::probe::Probe;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for tag reading failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A media file could not be parsed as audio.
#[derive(Debug, Error)]
#[error("failed to read tags from `{}`: {source}", path.display())]
pub struct TagError {
    pub path: PathBuf,
    #[source]
    pub source: BoxError,
}

impl TagError {
    pub fn new(path: &Path, source: impl Into<BoxError>) -> Self {
        Self {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}

/// Reads the title of one media file.
pub trait TitleReader {
    /// Title from the file's tags; empty when the file has no title tag.
    fn read_title(&self, path: &Path) -> Result<String, TagError>;
}

/// Tag reader backed by lofty (ID3v1/v2, APE, Vorbis comments, MP4 atoms, ...).
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyReader;

impl TitleReader for LoftyReader {
    fn read_title(&self, path: &Path) -> Result<String, TagError> {
        let tagged_file = Probe::open(path)
            .map_err(|e| TagError::new(path, e))?
            .guess_file_type()
            .map_err(|e| TagError::new(path, e))?
            .read()
            .map_err(|e| TagError::new(path, e))?;

        // Prefer the format's primary tag, fall back to whatever is present
        let title = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
            .and_then(|tag| tag.title().map(|t| t.into_owned()))
            .unwrap_or_default();

        Ok(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// `count` MPEG-1 Layer III frames (128 kbps, 44.1 kHz), 417 bytes each.
    fn mpeg_frames(count: usize) -> Vec<u8> {
        let mut frame = vec![0u8; 417];
        frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
        frame.repeat(count)
    }

    /// ID3v2.3 tag holding one ISO-8859-1 `TIT2` frame.
    fn id3v23_title(title: &str) -> Vec<u8> {
        let body_len = u32::try_from(title.len() + 1).unwrap();
        let mut frame = b"TIT2".to_vec();
        frame.extend_from_slice(&body_len.to_be_bytes());
        frame.extend_from_slice(&[0, 0]); // frame flags
        frame.push(0); // text encoding
        frame.extend_from_slice(title.as_bytes());

        // Tag size is syncsafe: 7 bits per byte
        let size = u32::try_from(frame.len()).unwrap();
        let mut tag = b"ID3\x03\x00\x00".to_vec();
        tag.extend((0..4).rev().map(|i| ((size >> (7 * i)) & 0x7F) as u8));
        tag.extend(frame);
        tag
    }

    #[test]
    fn test_lofty_reads_id3v2_title() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ep1.mp3");
        let mut bytes = id3v23_title("Hello & World");
        bytes.extend(mpeg_frames(5));
        fs::write(&path, bytes).unwrap();

        assert_eq!(LoftyReader.read_title(&path).unwrap(), "Hello & World");
    }

    #[test]
    fn test_lofty_untagged_audio_has_empty_title() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ep2.mp3");
        fs::write(&path, mpeg_frames(5)).unwrap();

        assert_eq!(LoftyReader.read_title(&path).unwrap(), "");
    }

    #[test]
    fn test_lofty_truncated_tag_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ep3.mp3");
        let mut bytes = id3v23_title("Cut short");
        bytes.truncate(12);
        fs::write(&path, bytes).unwrap();

        let err = LoftyReader.read_title(&path).unwrap_err();
        assert_eq!(err.path, path);
    }

    #[test]
    fn test_lofty_rejects_non_audio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ep1.mp3");
        fs::write(&path, b"this is plain text, not an mpeg stream").unwrap();

        let err = LoftyReader.read_title(&path).unwrap_err();
        assert_eq!(err.path, path);
        assert!(err.to_string().contains("ep1.mp3"));
    }

    #[test]
    fn test_lofty_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LoftyReader.read_title(&dir.path().join("gone.mp3")).is_err());
    }

    #[test]
    fn test_tag_error_source_chain() {
        let err = TagError::new(Path::new("x.mp3"), "truncated header");
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("truncated header"));
    }
}
