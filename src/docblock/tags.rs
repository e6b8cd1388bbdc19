//! PHPDoc tag tokenization.
//!
//! This submodule turns the body of one documentation comment into an
//! ordered list of [`DocTag`]s, and splits a tag's free-text value into
//! whitespace-delimited tokens (see [`DocTag::value_token`]).
//!
//! The tokenizer expects the text the compiler's lexer keeps for a doc
//! comment: everything after the opening `/*` and before the closing `*/`,
//! so every physical line begins (after optional indentation) with a `*`:
//!
//! ```text
//! *
//!  * @param int $a
//!  * @return string
//!
//! ```
//!
//! Use [`strip_comment_delimiters`] when holding the full `/** ... */`.

use serde::Serialize;

use crate::error::DocblockError;

/// The kind of a documentation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocTagKind {
    Param,
    Var,
    Returns,
    KphpInline,
    KphpInfer,
    KphpRequired,
    KphpLibExport,
    KphpSync,
    KphpDisableWarnings,
    KphpExternFuncInfo,
    KphpPureFunction,
    KphpTemplate,
    KphpReturn,
    KphpMemcacheClass,
    KphpImmutableClass,
    KphpTlClass,
    KphpConst,
    /// Any tag name not listed above.  Such tags are kept verbatim.
    Unknown,
}

/// Every recognised tag spelling.  The first spelling listed for a kind is
/// its canonical name.
const TAG_NAMES: &[(&str, DocTagKind)] = &[
    ("@param", DocTagKind::Param),
    ("@var", DocTagKind::Var),
    ("@type", DocTagKind::Var),
    ("@return", DocTagKind::Returns),
    ("@returns", DocTagKind::Returns),
    ("@kphp-inline", DocTagKind::KphpInline),
    ("@kphp-infer", DocTagKind::KphpInfer),
    ("@kphp-required", DocTagKind::KphpRequired),
    ("@kphp-lib-export", DocTagKind::KphpLibExport),
    ("@kphp-sync", DocTagKind::KphpSync),
    ("@kphp-disable-warnings", DocTagKind::KphpDisableWarnings),
    ("@kphp-extern-func-info", DocTagKind::KphpExternFuncInfo),
    ("@kphp-pure-function", DocTagKind::KphpPureFunction),
    ("@kphp-template", DocTagKind::KphpTemplate),
    ("@kphp-return", DocTagKind::KphpReturn),
    ("@kphp-memcache-class", DocTagKind::KphpMemcacheClass),
    ("@kphp-immutable-class", DocTagKind::KphpImmutableClass),
    ("@kphp-tl-class", DocTagKind::KphpTlClass),
    ("@kphp-const", DocTagKind::KphpConst),
];

impl DocTagKind {
    /// Map a literal tag token (e.g. `@param`) to its kind.
    pub fn from_name(name: &str) -> Self {
        TAG_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, kind)| kind)
            .unwrap_or(DocTagKind::Unknown)
    }

    /// The canonical spelling of this kind, or `None` for `Unknown`.
    pub fn canonical_name(self) -> Option<&'static str> {
        TAG_NAMES
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|&(name, _)| name)
    }

    /// Whether this tag carries a type expression in its value.
    pub fn carries_type(self) -> bool {
        matches!(self, DocTagKind::Param | DocTagKind::Var | DocTagKind::Returns)
    }
}

/// One `@`-prefixed annotation together with its continuation lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocTag {
    pub kind: DocTagKind,
    /// The tag token as written, e.g. `"@param"`.
    pub name: String,
    /// Text after the tag token; continuation lines are joined with a space.
    pub value: String,
    /// Best-effort source line of the last line the tag spans, when the
    /// declaration line is known.
    pub line: Option<i32>,
}

/// In `Type ...$name` the token before the space swallows ` ...`.
const VARIADIC_DOTS: &[u8] = b" ...$";

impl DocTag {
    /// Extract the whitespace-delimited token starting at `offset`.
    ///
    /// Leading spaces of the whole value are skipped first and added to
    /// `offset`, so that chaining works:
    ///
    /// ```
    /// # use phpdoc_types::docblock::parse_php_doc;
    /// let tags = parse_php_doc("* @param   A[] $a comment", 0).unwrap();
    /// let first = tags[0].value_token(0);
    /// let second = tags[0].value_token(first.len());
    /// assert_eq!((first, second), ("A[]", "$a"));
    /// ```
    ///
    /// A token followed by ` ...$` is extended to include ` ...` (but not
    /// the `$`), so `A ...$args` tokenizes as `A ...` then `$args`.
    pub fn value_token(&self, offset: usize) -> &str {
        let bytes = self.value.as_bytes();
        let len = bytes.len();

        let leading = bytes.iter().take_while(|&&b| b == b' ').count();
        let mut start = offset + leading;
        while start < len && bytes[start] == b' ' {
            start += 1;
        }
        if start >= len {
            return "";
        }

        let Some(space) = memchr::memchr(b' ', &bytes[start..]).map(|p| start + p) else {
            return self.value.get(start..).unwrap_or("");
        };

        let mut end = space;
        if len > space + VARIADIC_DOTS.len() && bytes[space..].starts_with(VARIADIC_DOTS) {
            // leave `$` for the next token
            end += VARIADIC_DOTS.len() - 1;
        }
        self.value.get(start..end).unwrap_or("")
    }
}

/// Strip the `/*` and `*/` delimiters from a full doc comment.
///
/// `"/** @var int */"` becomes `"* @var int "`, which is exactly what
/// [`parse_php_doc`] expects.  Text without the delimiters is returned
/// unchanged.
pub fn strip_comment_delimiters(comment: &str) -> &str {
    let trimmed = comment.trim();
    let Some(inner) = trimmed.strip_prefix("/*") else {
        return comment;
    };
    inner.strip_suffix("*/").unwrap_or(inner)
}

/// Split a doc comment body into tags.
///
/// `declaration_line` is the 1-based line of the declaration the comment
/// documents; pass `0` when it is unknown and no per-tag lines are wanted.
///
/// Text before the first tag is free-form description and is dropped.
/// A line that has content before its leading `*` makes the whole block
/// malformed.
pub fn parse_php_doc(phpdoc: &str, declaration_line: i32) -> Result<Vec<DocTag>, DocblockError> {
    let lines = split_comment_lines(phpdoc)?;

    let total = lines.len() as i32;
    let mut tags: Vec<DocTag> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if line.starts_with('@') {
            let (name, value) = match line.find(' ') {
                Some(pos) => (&line[..pos], &line[pos + 1..]),
                None => (line.as_str(), ""),
            };
            tags.push(DocTag {
                kind: DocTagKind::from_name(name),
                name: name.to_string(),
                value: value.to_string(),
                line: None,
            });
        } else if let Some(open) = tags.last_mut() {
            open.value.push(' ');
            open.value.push_str(line);
        }

        // The open tag ends up on its last line, continuations included.
        if let Some(open) = tags.last_mut() {
            open.line = tag_line(declaration_line, total, i as i32);
        }
    }

    Ok(tags)
}

/// Run the two-state scanner: strip indentation, one `*`, and the
/// indentation after it from every physical line.
fn split_comment_lines(phpdoc: &str) -> Result<Vec<String>, DocblockError> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut have_star = false;

    for (offset, c) in phpdoc.char_indices() {
        if !have_star {
            match c {
                ' ' | '\t' => continue,
                '*' => {
                    have_star = true;
                    continue;
                }
                found => return Err(DocblockError::Malformed { offset, found }),
            }
        }
        match c {
            '\n' => {
                if current.ends_with('\r') {
                    current.pop();
                }
                lines.push(std::mem::take(&mut current));
                have_star = false;
            }
            ' ' | '\t' if current.is_empty() => {}
            _ => current.push(c),
        }
    }
    lines.push(current);

    Ok(lines)
}

/// Tags are read bottom-up from the declaration; the closing `*/` line
/// sits between the last tag and the declaration.
fn tag_line(declaration_line: i32, total_lines: i32, index: i32) -> Option<i32> {
    if declaration_line <= 0 {
        return None;
    }
    let line = declaration_line - (total_lines - index);
    Some(line.min(declaration_line - 2))
}
