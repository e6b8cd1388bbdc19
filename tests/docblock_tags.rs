//! Tests for docblock tokenization and tag queries.
//!
//! These exercise the public API of `phpdoc_types::docblock`: splitting a
//! comment body into tags, splitting a tag value into tokens, and finding
//! the `$name` / type pair next to the N-th tag of a kind.

use phpdoc_types::docblock::*;
use phpdoc_types::error::DocblockError;

// ─── Helper ─────────────────────────────────────────────────────────────────

/// Find the `@var` tag at `occurrence` and return `(var_name, type_str)`.
fn var_tag(phpdoc: &str, occurrence: usize) -> Option<(String, String)> {
    find_tag(phpdoc, DocTagKind::Var, occurrence).map(|m| (m.var_name, m.type_str))
}

fn pair(var_name: &str, type_str: &str) -> Option<(String, String)> {
    Some((var_name.to_string(), type_str.to_string()))
}

// ─── Variable name / type disambiguation ────────────────────────────────────

#[test]
fn var_name_before_type() {
    assert_eq!(var_tag("* @var $a bool ", 0), pair("a", "bool"));
}

#[test]
fn var_name_after_type() {
    assert_eq!(var_tag("* @var bool $a ", 0), pair("a", "bool"));
}

#[test]
fn extra_spaces_between_tokens() {
    assert_eq!(var_tag(" *@var    bool    $a   ", 0), pair("a", "bool"));
    assert_eq!(var_tag(" *@var    $a    bool   ", 0), pair("a", "bool"));
}

#[test]
fn type_alias_tag_with_comment() {
    assert_eq!(
        var_tag("* @type $variable int|string comment ", 0),
        pair("variable", "int|string")
    );
}

#[test]
fn unknown_tag_is_not_a_var() {
    assert_eq!(var_tag("* @nothing $variable int|string comment", 0), None);
}

#[test]
fn comment_without_tags() {
    assert_eq!(var_tag("* only comment", 0), None);
}

#[test]
fn var_after_other_tag() {
    assert_eq!(
        var_tag("* @deprecated \n* @var $k Exception|false", 0),
        pair("k", "Exception|false")
    );
}

#[test]
fn type_without_var_name() {
    assert_eq!(var_tag("* @var mixed some comment", 0), pair("", "mixed"));
}

#[test]
fn type_string_is_kept_verbatim() {
    assert_eq!(
        var_tag("* @var string|(false|int)[]?", 0),
        pair("", "string|(false|int)[]?")
    );
}

#[test]
fn var_name_without_type() {
    assert_eq!(var_tag("* @var $a", 0), pair("a", ""));
}

#[test]
fn trailing_words_are_commentary() {
    assert_eq!(var_tag("* @type hello world", 0), pair("", "hello"));
}

#[test]
fn empty_tag_value() {
    assert_eq!(var_tag("*   @type   ", 0), pair("", ""));
}

#[test]
fn occurrence_counts_only_matching_kind() {
    let doc = "* @param $aa A \n* @var $a A  \n* @param BB $b \n* @var $b B   ";
    assert_eq!(var_tag(doc, 0), pair("a", "A"));
    assert_eq!(var_tag(doc, 1), pair("b", "B"));
    assert_eq!(var_tag(doc, 2), None);

    let first = find_tag(doc, DocTagKind::Param, 0).unwrap();
    assert_eq!((first.var_name.as_str(), first.type_str.as_str()), ("aa", "A"));
    let second = find_tag(doc, DocTagKind::Param, 1).unwrap();
    assert_eq!((second.var_name.as_str(), second.type_str.as_str()), ("b", "BB"));
}

#[test]
fn variadic_param_keeps_dots_with_type() {
    let found = find_tag("* @param A ...$args the rest", DocTagKind::Param, 0).unwrap();
    assert_eq!(found.var_name, "args");
    assert_eq!(found.type_str, "A ...");
}

#[test]
fn dots_without_variable_are_not_swallowed() {
    let found = find_tag("* @param A ...", DocTagKind::Param, 0).unwrap();
    assert_eq!(found.var_name, "");
    assert_eq!(found.type_str, "A");
}

#[test]
fn missing_kind_is_not_found() {
    let doc = "* @param int $x\n * @return void";
    assert!(find_tag(doc, DocTagKind::Var, 0).is_none());
    assert!(!tag_exists(doc, DocTagKind::KphpInline));
}

#[test]
fn directive_exists() {
    let doc = "*\n * @kphp-inline\n * @param int $x\n ";
    assert!(tag_exists(doc, DocTagKind::KphpInline));
    assert!(tag_exists(doc, DocTagKind::Param));
    assert!(!tag_exists(doc, DocTagKind::KphpSync));
}

#[test]
fn malformed_block_has_no_tags() {
    let doc = "* @var int\nnot a comment line";
    assert!(find_tag(doc, DocTagKind::Var, 0).is_none());
    assert!(!tag_exists(doc, DocTagKind::Var));
}

#[test]
fn find_all_returns_every_occurrence() {
    let doc = "* @param int $a\n * @param string $b\n * @return void";
    let params = find_all_tags(doc, 0, DocTagKind::Param);
    let names: Vec<&str> = params.iter().map(|m| m.var_name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

// ─── Tag tokenizer ──────────────────────────────────────────────────────────

#[test]
fn splits_name_and_value() {
    let tags = parse_php_doc("*\n * @param int $a first\n * @return string\n ", 0).unwrap();
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[0].name, "@param");
    assert_eq!(tags[0].kind, DocTagKind::Param);
    assert_eq!(tags[0].value, "int $a first");
    assert_eq!(tags[1].kind, DocTagKind::Returns);
    // the closing line is blank and still adds its separating space
    assert_eq!(tags[1].value, "string ");
    assert_eq!(tags[0].line, None);
}

#[test]
fn continuation_lines_are_joined() {
    let tags = parse_php_doc("* @param int $a the first\n *   value\n * @return void", 0).unwrap();
    assert_eq!(tags[0].value, "int $a the first value");
    assert_eq!(tags[1].value, "void");
}

#[test]
fn leading_description_is_dropped() {
    let tags = parse_php_doc("*\n * Does things.\n *\n * @var int\n ", 0).unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].value, "int ");
}

#[test]
fn tag_without_value() {
    let tags = parse_php_doc("* @kphp-inline", 0).unwrap();
    assert_eq!(tags[0].name, "@kphp-inline");
    assert_eq!(tags[0].value, "");
    assert_eq!(tags[0].kind, DocTagKind::KphpInline);
}

#[test]
fn unknown_tags_are_kept() {
    let tags = parse_php_doc("* @deprecated use other\n * @kphp-something-new x", 0).unwrap();
    assert_eq!(tags.len(), 2);
    assert!(tags.iter().all(|t| t.kind == DocTagKind::Unknown));
    assert_eq!(tags[1].name, "@kphp-something-new");
    assert_eq!(tags[1].value, "x");
}

#[test]
fn tabs_after_star_are_dropped() {
    let tags = parse_php_doc("*\t@var\tint", 0).unwrap();
    assert_eq!(tags[0].name, "@var\tint");
}

#[test]
fn windows_line_endings() {
    let tags = parse_php_doc("*\r\n * @var int\r\n ", 0).unwrap();
    assert_eq!(tags[0].value, "int ");
    assert_eq!(tags[0].value_token(0), "int");
}

#[test]
fn tag_lines_count_back_from_declaration() {
    // 1: /**
    // 2:  * @param int $a
    // 3:  * @return string
    // 4:  */
    // 5: function f($a) {}
    let tags = parse_php_doc("*\n * @param int $a\n * @return string\n ", 5).unwrap();
    assert_eq!(tags[0].line, Some(2));
    assert_eq!(tags[1].line, Some(3));
}

#[test]
fn tag_line_never_passes_closing_line() {
    // single-line comment directly above the declaration
    let tags = parse_php_doc("* @var int ", 7).unwrap();
    assert_eq!(tags[0].line, Some(5));
}

#[test]
fn tag_line_follows_continuation_lines() {
    // 1: /**
    // 2:  * @param int $a
    // 3:  *   described here
    // 4:  * @return void
    // 5:  */
    // 6: function f($a) {}
    let tags = parse_php_doc("*\n * @param int $a\n *   described here\n * @return void\n ", 6).unwrap();
    assert_eq!(tags[0].value, "int $a described here");
    assert_eq!(tags[0].line, Some(3));
    assert_eq!(tags[1].line, Some(4));
}

#[test]
fn find_tag_reports_line() {
    let found = find_tag_at_line("*\n * @param int $a\n ", 4, DocTagKind::Param, 0).unwrap();
    assert_eq!(found.line, Some(2));
}

#[test]
fn try_find_tag_surfaces_malformed_block() {
    let doc = "* @var int\n garbage";
    assert_eq!(find_tag(doc, DocTagKind::Var, 0), None);
    assert_eq!(
        try_find_tag(doc, 0, DocTagKind::Var, 0),
        Err(DocblockError::Malformed {
            offset: 12,
            found: 'g'
        })
    );

    let found = try_find_tag("* @var int $x", 0, DocTagKind::Var, 0).unwrap();
    assert_eq!(found.map(|m| m.var_name), Some("x".to_string()));
    assert_eq!(try_find_tag("* @var int $x", 0, DocTagKind::Var, 1), Ok(None));
}

#[test]
fn content_before_star_is_malformed() {
    let err = parse_php_doc("* @var int\n garbage", 0).unwrap_err();
    assert_eq!(
        err,
        DocblockError::Malformed {
            offset: 12,
            found: 'g'
        }
    );
}

#[test]
fn blank_line_without_star_is_malformed() {
    let err = parse_php_doc("*\n\n* @var int", 0).unwrap_err();
    assert!(matches!(err, DocblockError::Malformed { found: '\n', .. }));
}

#[test]
fn empty_block_has_no_tags() {
    assert!(parse_php_doc("", 0).unwrap().is_empty());
    assert!(parse_php_doc("   ", 0).unwrap().is_empty());
}

// ─── Tag value tokenizer ────────────────────────────────────────────────────

#[test]
fn value_tokens_chain_by_length() {
    let tags = parse_php_doc("* @param    (string|int)[]   $arr  comment", 0).unwrap();
    let first = tags[0].value_token(0);
    let second = tags[0].value_token(first.len());
    assert_eq!(first, "(string|int)[]");
    assert_eq!(second, "$arr");
}

#[test]
fn value_token_past_end_is_empty() {
    let tags = parse_php_doc("* @var int", 0).unwrap();
    assert_eq!(tags[0].value_token(3), "");
    assert_eq!(tags[0].value_token(100), "");
}

// ─── Helpers ────────────────────────────────────────────────────────────────

#[test]
fn strips_comment_delimiters() {
    assert_eq!(strip_comment_delimiters("/** @var int */"), "* @var int ");
    assert_eq!(strip_comment_delimiters("  /**\n * @var int\n */\n"), "*\n * @var int\n ");
    assert_eq!(strip_comment_delimiters("* @var int"), "* @var int");
}

#[test]
fn tag_kind_names() {
    assert_eq!(DocTagKind::from_name("@returns"), DocTagKind::Returns);
    assert_eq!(DocTagKind::from_name("@type"), DocTagKind::Var);
    assert_eq!(DocTagKind::from_name("@kphp-const"), DocTagKind::KphpConst);
    assert_eq!(DocTagKind::from_name("@Param"), DocTagKind::Unknown);
    assert_eq!(DocTagKind::Returns.canonical_name(), Some("@return"));
    assert_eq!(DocTagKind::Unknown.canonical_name(), None);
    assert!(DocTagKind::Param.carries_type());
    assert!(!DocTagKind::KphpInline.carries_type());
}
