//! Feed document generation and output.
//!
//! | Module   | Purpose                                    |
//! |----------|--------------------------------------------|
//! | `feed`   | pipeline and RSS/iTunes rendering          |
//! | `minify` | whitespace collapse                        |
//! | `check`  | parse-back validation with the `rss` crate |
//! | `write`  | backup and write the feed file             |

pub mod check;
pub mod feed;
pub mod minify;
pub mod write;
