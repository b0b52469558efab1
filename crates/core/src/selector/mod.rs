//! Job selection from a command line path argument.
//!
//! The argument is either a single file name, a wildcard pattern such as
//! `*.txt`, or either of those prefixed with a directory. Wildcards are only
//! expanded in the final path component.

mod error;
mod select;
mod wildcard;

pub use error::SelectorError;
pub use select::{select_jobs, split_argument, JobSelection};
pub use wildcard::{has_wildcard, WildcardPattern};
