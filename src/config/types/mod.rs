//! Configuration utility types.
//!
//! | Module   | Purpose                                      |
//! |----------|----------------------------------------------|
//! | `error`  | Configuration error and diagnostic types     |
//! | `field`  | Setting key names                            |

mod error;
mod field;

pub use error::{ConfigDiagnostics, ConfigError};
pub use field::Key;
