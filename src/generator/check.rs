//! Read-back validation of a rendered feed.

use rss::{
    Channel,
    validation::{Validate, ValidationError},
};
use thiserror::Error;

/// Why a rendered feed was rejected.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("not readable as RSS")]
    Parse(#[source] rss::Error),

    #[error("RSS validation failed")]
    Invalid(#[source] ValidationError),
}

/// What the parser saw in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub title: String,
    pub items: usize,
}

/// Parse `document` as RSS and run the `rss` crate's validation rules.
pub fn check_feed(document: &str) -> Result<CheckReport, CheckError> {
    let channel = Channel::read_from(document.as_bytes()).map_err(CheckError::Parse)?;
    channel.validate().map_err(CheckError::Invalid)?;

    Ok(CheckReport {
        title: channel.title().to_string(),
        items: channel.items().len(),
    })
}
