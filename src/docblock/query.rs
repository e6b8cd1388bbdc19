//! Finding tags of a given kind and splitting `$name` from the type.
//!
//! After `@param` / `@var` / `@return` there is usually either
//! `$var_name type [comment]` or just `type [comment]`.  A complex type
//! such as `(string|(int|false))[]` is written without spaces, so the type
//! is always a single value token.

use serde::Serialize;

use super::tags::{DocTag, DocTagKind, parse_php_doc};
use crate::error::DocblockError;

/// The variable name and type string found next to one tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagMatch {
    /// Variable name without the `$`; empty when the tag names none.
    pub var_name: String,
    /// The raw type string; empty when the tag carries no type.
    pub type_str: String,
    /// Best-effort source line of the tag.
    pub line: Option<i32>,
}

impl TagMatch {
    pub(crate) fn from_tag(tag: &DocTag) -> Self {
        let first = tag.value_token(0);
        let second = tag.value_token(first.len());

        let (var_name, type_str) = if let Some(name) = first.strip_prefix('$') {
            (name, second)
        } else if let Some(name) = second.strip_prefix('$') {
            (name, first)
        } else {
            ("", first)
        };

        TagMatch {
            var_name: var_name.to_string(),
            type_str: type_str.to_string(),
            line: tag.line,
        }
    }
}

/// Tokenize `phpdoc`, logging and swallowing a malformed block.
fn tags_of(phpdoc: &str, declaration_line: i32) -> Vec<DocTag> {
    match parse_php_doc(phpdoc, declaration_line) {
        Ok(tags) => tags,
        Err(err) => {
            tracing::warn!("{err}");
            Vec::new()
        }
    }
}

/// Find the `occurrence`-th (0-based) tag of `kind` and split its value.
///
/// Returns `None` when the block has fewer matching tags.
///
/// ```
/// # use phpdoc_types::docblock::{find_tag, DocTagKind};
/// let m = find_tag("* @param A[] $a some text", DocTagKind::Param, 0).unwrap();
/// assert_eq!((m.var_name.as_str(), m.type_str.as_str()), ("a", "A[]"));
/// ```
pub fn find_tag(phpdoc: &str, kind: DocTagKind, occurrence: usize) -> Option<TagMatch> {
    find_tag_at_line(phpdoc, 0, kind, occurrence)
}

/// Like [`find_tag`], computing tag lines from `declaration_line`.
pub fn find_tag_at_line(
    phpdoc: &str,
    declaration_line: i32,
    kind: DocTagKind,
    occurrence: usize,
) -> Option<TagMatch> {
    nth_of_kind(&tags_of(phpdoc, declaration_line), kind, occurrence)
}

/// Like [`find_tag_at_line`], but a malformed block is an error instead of
/// a logged warning.
///
/// ```
/// # use phpdoc_types::docblock::{try_find_tag, DocTagKind};
/// assert!(try_find_tag("* @param int $a\n@return int", 0, DocTagKind::Returns, 0).is_err());
/// ```
pub fn try_find_tag(
    phpdoc: &str,
    declaration_line: i32,
    kind: DocTagKind,
    occurrence: usize,
) -> Result<Option<TagMatch>, DocblockError> {
    let tags = parse_php_doc(phpdoc, declaration_line)?;
    Ok(nth_of_kind(&tags, kind, occurrence))
}

fn nth_of_kind(tags: &[DocTag], kind: DocTagKind, occurrence: usize) -> Option<TagMatch> {
    tags.iter()
        .filter(|tag| tag.kind == kind)
        .nth(occurrence)
        .map(TagMatch::from_tag)
}

/// Every tag of `kind`, in order.
pub fn find_all_tags(phpdoc: &str, declaration_line: i32, kind: DocTagKind) -> Vec<TagMatch> {
    tags_of(phpdoc, declaration_line)
        .iter()
        .filter(|tag| tag.kind == kind)
        .map(TagMatch::from_tag)
        .collect()
}

/// Whether any tag of `kind` is present, e.g. `@kphp-inline`.
pub fn tag_exists(phpdoc: &str, kind: DocTagKind) -> bool {
    tags_of(phpdoc, 0).iter().any(|tag| tag.kind == kind)
}
