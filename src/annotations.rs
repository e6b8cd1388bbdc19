//! Everything one docblock says about its declaration.
//!
//! [`DocAnnotations::collect`] tokenizes a docblock once, parses the type
//! of every `@param`, `@var` and `@return` tag, and records which compiler
//! directives (`@kphp-inline`, `@kphp-required`, ...) are present.
//!
//! Each tag's type is parsed on its own: a syntax error in one `@param`
//! is reported and the remaining tags are still processed.

use serde::Serialize;

use crate::context::DeclarationContext;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::docblock::{DocTagKind, TagMatch, parse_php_doc};
use crate::error::TypeParseError;
use crate::type_parser::{TypeEnv, TypeRuleParser};
use crate::types::TypeNode;

/// A type-carrying tag and the result of parsing its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypedTag {
    pub kind: DocTagKind,
    /// Variable name without `$`; empty if the tag names none.
    pub var_name: String,
    pub type_str: String,
    pub line: Option<i32>,
    /// `None` when the type is missing or failed to parse.
    pub ty: Option<TypeNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocAnnotations {
    /// `@param` tags in declaration order.
    pub params: Vec<TypedTag>,
    /// The first `@var` / `@type` tag.
    pub var: Option<TypedTag>,
    /// The first `@return` / `@returns` tag.
    pub returns: Option<TypedTag>,
    /// Directive tags present, in first-seen order.
    pub directives: Vec<DocTagKind>,
    /// Names of unrecognised tags, kept as written.
    pub unknown_tags: Vec<String>,
}

impl DocAnnotations {
    /// Collect the annotations of one doc comment body.
    ///
    /// Problems go to `sink`; a malformed block yields empty annotations.
    pub fn collect(
        phpdoc: &str,
        ctx: &DeclarationContext,
        env: TypeEnv<'_>,
        sink: &dyn DiagnosticSink,
    ) -> Self {
        let mut out = Self::default();

        let tags = match parse_php_doc(phpdoc, ctx.declaration_line) {
            Ok(tags) => tags,
            Err(err) => {
                let line = (ctx.declaration_line > 0).then_some(ctx.declaration_line);
                sink.report(Diagnostic::error(line, err.to_string()));
                return out;
            }
        };

        for tag in &tags {
            match tag.kind {
                DocTagKind::Param | DocTagKind::Var | DocTagKind::Returns => {
                    let typed = parse_tag_type(tag.kind, TagMatch::from_tag(tag), ctx, env, sink);
                    match tag.kind {
                        DocTagKind::Param => out.params.push(typed),
                        DocTagKind::Var if out.var.is_none() => out.var = Some(typed),
                        DocTagKind::Returns if out.returns.is_none() => out.returns = Some(typed),
                        _ => {}
                    }
                }
                DocTagKind::Unknown => out.unknown_tags.push(tag.name.clone()),
                directive => {
                    if !out.directives.contains(&directive) {
                        out.directives.push(directive);
                    }
                }
            }
        }

        out
    }

    /// The `@param` documenting `$name` (given without `$`).
    pub fn param(&self, name: &str) -> Option<&TypedTag> {
        self.params.iter().find(|p| p.var_name == name)
    }

    pub fn has_directive(&self, kind: DocTagKind) -> bool {
        self.directives.contains(&kind)
    }

    pub fn is_inline(&self) -> bool {
        self.has_directive(DocTagKind::KphpInline)
    }

    /// Every type-carrying tag: params, then `@var`, then `@return`.
    pub fn typed_tags(&self) -> impl Iterator<Item = &TypedTag> {
        self.params
            .iter()
            .chain(self.var.iter())
            .chain(self.returns.iter())
    }
}

fn parse_tag_type(
    kind: DocTagKind,
    found: TagMatch,
    ctx: &DeclarationContext,
    env: TypeEnv<'_>,
    sink: &dyn DiagnosticSink,
) -> TypedTag {
    let tag_name = kind.canonical_name().unwrap_or("@?");

    let ty = if found.type_str.is_empty() {
        sink.report(Diagnostic::warning(
            found.line,
            format!("{tag_name} without a type"),
        ));
        None
    } else {
        match TypeRuleParser::new(ctx, env).parse_from_type_string(&found.type_str) {
            Ok(parsed) => {
                parsed.report_warnings(sink, found.line);
                if let Some(name) = parsed.unknown_classes.first() {
                    let err = TypeParseError::UnresolvedClass { name: name.clone() };
                    sink.report(Diagnostic::error(found.line, err.to_string()));
                }
                Some(parsed.node)
            }
            Err(err) => {
                sink.report(Diagnostic::error(
                    found.line,
                    format!("{err} in {tag_name} {}", found.type_str),
                ));
                None
            }
        }
    };

    TypedTag {
        kind,
        var_name: found.var_name,
        type_str: found.type_str,
        line: found.line,
        ty,
    }
}
