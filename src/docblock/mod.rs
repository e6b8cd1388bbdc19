//! PHPDoc block tokenization and tag lookup.
//!
//! # Submodules
//!
//! - [`tags`]: splitting a comment body into [`DocTag`]s and a tag value
//!   into tokens.
//! - [`query`]: finding the N-th tag of a kind and telling the `$name`
//!   token apart from the type token.

mod query;
mod tags;

pub use query::{TagMatch, find_all_tags, find_tag, find_tag_at_line, tag_exists, try_find_tag};
pub use tags::{DocTag, DocTagKind, parse_php_doc, strip_comment_delimiters};
