//! Shared helpers: dates, HTML escaping, pluralization.

pub mod date;
pub mod html;
pub mod plural;
