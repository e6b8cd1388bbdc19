//! PHPDoc type expression parser.
//!
//! Turns a type string such as `(\VK\A|false)[]`, `tuple<int, string>` or
//! `A ...` into a [`TypeNode`].  The grammar is small enough that there is
//! no separate lexer; the parser walks the bytes of the input directly:
//!
//! ```text
//! TypeExpr   := ArrayExpr ('|' ArrayExpr)*
//! ArrayExpr  := SimpleType ('[' ']')*
//! SimpleType := '(' TypeExpr ')'
//!             | keyword | 'self'
//!             | ('tuple' | '\tuple' | 'future' | '\future') NestedArgs
//!             | ['@tl\'] ClassName
//! NestedArgs := '<' TypeExpr (',' TypeExpr)* '>'
//!             | '(' TypeExpr (',' TypeExpr)* ')'
//! ```
//!
//! Keywords are matched case-sensitively by prefix, longest spelling first
//! (`integer` before `int`, `boolean` before `bool`).
//!
//! Nesting is capped by [`Config::max_type_depth`] twice over: once for
//! parentheses and generic argument lists, once for the number of `[]`
//! layers (the variadic suffix counts as one) on any path through the
//! type.
//!
//! Class names that are not yet in the class table do not fail the parse:
//! they become [`ClassRef::Pending`] nodes and are listed in
//! [`ParsedType::unknown_classes`], so a type may mention classes declared
//! later in the same compilation unit.  Deciding whether that is an error
//! is left to the caller once the whole type string has been parsed.

use crate::config::Config;
use crate::context::DeclarationContext;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::TypeParseError;
use crate::names::NameResolver;
use crate::symbols::ClassLookup;
use crate::types::{ClassRef, GenericKind, PrimitiveType, TypeNode};

/// `T ...` after a complete type means "zero or more `T`".
const VARIADIC_SUFFIX: &str = " ...";

/// Shorthand for the configured TL namespace.
const TL_NAMESPACE_SHORTHAND: &str = "@tl\\";

const BARE_BOOL_WARNING: &str =
    "Do not use |bool in phpdoc, use |false instead\n(if you really need bool, specify |boolean)";

#[derive(Debug, Clone, Copy)]
enum Keyword {
    Primitive(PrimitiveType),
    Array,
    SelfClass,
    Nested(GenericKind),
}

/// Longest spelling first wherever one keyword prefixes another.
const KEYWORDS: &[(&str, Keyword)] = &[
    ("string", Keyword::Primitive(PrimitiveType::String)),
    ("self", Keyword::SelfClass),
    ("integer", Keyword::Primitive(PrimitiveType::Int)),
    ("int", Keyword::Primitive(PrimitiveType::Int)),
    ("boolean", Keyword::Primitive(PrimitiveType::Bool)),
    ("bool", Keyword::Primitive(PrimitiveType::Bool)),
    ("float", Keyword::Primitive(PrimitiveType::Float)),
    ("false", Keyword::Primitive(PrimitiveType::False)),
    ("future", Keyword::Nested(GenericKind::Future)),
    ("double", Keyword::Primitive(PrimitiveType::Float)),
    ("mixed", Keyword::Primitive(PrimitiveType::Mixed)),
    ("null", Keyword::Primitive(PrimitiveType::Mixed)),
    ("true", Keyword::Primitive(PrimitiveType::Bool)),
    ("tuple", Keyword::Nested(GenericKind::Tuple)),
    ("array", Keyword::Array),
    ("void", Keyword::Primitive(PrimitiveType::Void)),
    ("\\tuple", Keyword::Nested(GenericKind::Tuple)),
    ("\\future", Keyword::Nested(GenericKind::Future)),
];

/// The collaborators a parse reads from.
#[derive(Clone, Copy)]
pub struct TypeEnv<'a> {
    pub classes: &'a dyn ClassLookup,
    pub resolver: &'a dyn NameResolver,
    pub config: &'a Config,
}

impl<'a> TypeEnv<'a> {
    pub fn new(
        classes: &'a dyn ClassLookup,
        resolver: &'a dyn NameResolver,
        config: &'a Config,
    ) -> Self {
        Self {
            classes,
            resolver,
            config,
        }
    }
}

/// Result of a successful top-level parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedType {
    pub node: TypeNode,
    /// Fully-qualified names not found in the class table, first-seen order.
    pub unknown_classes: Vec<String>,
    /// Non-fatal style warnings.
    pub warnings: Vec<String>,
}

impl ParsedType {
    pub fn report_warnings(&self, sink: &dyn DiagnosticSink, line: Option<i32>) {
        for warning in &self.warnings {
            sink.report(Diagnostic::warning(line, warning.as_str()));
        }
    }
}

/// Input text and the current byte offset into it.
#[derive(Debug)]
struct Cursor<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> Cursor<'s> {
    fn new(src: &'s str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + ahead).copied()
    }

    fn rest(&self) -> &'s str {
        self.src.get(self.pos..).unwrap_or("")
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Consume `literal` if the input continues with it.
    fn eat(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    fn skip_spaces(&mut self) {
        while self.peek() == Some(b' ') {
            self.pos += 1;
        }
    }
}

/// A parsed node and the most `[]` layers on any path through it.
struct Layered {
    node: TypeNode,
    arrays: usize,
}

impl Layered {
    fn leaf(node: TypeNode) -> Self {
        Self { node, arrays: 0 }
    }
}

fn is_class_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'\\' || b == b'_'
}

/// Parser for one type string.  Create one per top-level parse.
pub struct TypeRuleParser<'a> {
    env: TypeEnv<'a>,
    ctx: &'a DeclarationContext,
    unknown_classes: Vec<String>,
    warnings: Vec<String>,
}

impl<'a> TypeRuleParser<'a> {
    pub fn new(ctx: &'a DeclarationContext, env: TypeEnv<'a>) -> Self {
        Self {
            env,
            ctx,
            unknown_classes: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Parse a complete type string.
    ///
    /// The whole input must be consumed, except for a trailing ` ...`
    /// which wraps the parsed type into an array.
    pub fn parse_from_type_string(mut self, type_str: &str) -> Result<ParsedType, TypeParseError> {
        let mut cur = Cursor::new(type_str);
        let mut parsed = self.parse_type_expression(&mut cur, 0)?;

        if cur.rest() == VARIADIC_SUFFIX {
            parsed = self.wrap_array(parsed, cur.pos)?;
            cur.pos = type_str.len();
        }

        if !cur.at_end() {
            return Err(TypeParseError::TrailingInput { offset: cur.pos });
        }

        Ok(ParsedType {
            node: parsed.node,
            unknown_classes: self.unknown_classes,
            warnings: self.warnings,
        })
    }

    fn parse_type_expression(
        &mut self,
        cur: &mut Cursor<'_>,
        depth: usize,
    ) -> Result<Layered, TypeParseError> {
        let limit = self.env.config.max_type_depth;
        if depth > limit {
            return Err(TypeParseError::TooDeep {
                limit,
                offset: cur.pos,
            });
        }

        let start = cur.pos;
        let first = self.parse_type_array(cur, depth)?;
        let mut has_raw_bool = &cur.src[start..cur.pos] == "bool";

        let mut rest = Vec::new();
        while cur.peek() == Some(b'|') {
            cur.pos += 1;
            let start = cur.pos;
            rest.push(self.parse_type_array(cur, depth)?);
            has_raw_bool |= &cur.src[start..cur.pos] == "bool";
        }

        if rest.is_empty() {
            return Ok(first);
        }
        if has_raw_bool {
            self.warnings.push(BARE_BOOL_WARNING.to_string());
        }

        let mut arrays = first.arrays;
        let mut arms = Vec::with_capacity(rest.len() + 1);
        arms.push(first.node);
        for arm in rest {
            arrays = arrays.max(arm.arrays);
            arms.push(arm.node);
        }
        Ok(Layered {
            node: TypeNode::Union(arms),
            arrays,
        })
    }

    fn parse_type_array(
        &mut self,
        cur: &mut Cursor<'_>,
        depth: usize,
    ) -> Result<Layered, TypeParseError> {
        let mut parsed = self.parse_simple_type(cur, depth)?;
        while cur.peek() == Some(b'[') {
            if cur.peek_at(1) != Some(b']') {
                return Err(TypeParseError::UnmatchedBrackets { offset: cur.pos });
            }
            parsed = self.wrap_array(parsed, cur.pos)?;
            cur.pos += 2;
        }
        Ok(parsed)
    }

    /// Add one `[]` layer written at `offset`.
    fn wrap_array(&self, inner: Layered, offset: usize) -> Result<Layered, TypeParseError> {
        let limit = self.env.config.max_type_depth;
        if inner.arrays >= limit {
            return Err(TypeParseError::TooDeep { limit, offset });
        }
        Ok(Layered {
            node: TypeNode::array_of(inner.node),
            arrays: inner.arrays + 1,
        })
    }

    fn parse_simple_type(
        &mut self,
        cur: &mut Cursor<'_>,
        depth: usize,
    ) -> Result<Layered, TypeParseError> {
        let Some(first) = cur.peek() else {
            return Err(TypeParseError::UnexpectedEnd { offset: cur.pos });
        };

        if first == b'(' {
            cur.pos += 1;
            let inner = self.parse_type_expression(cur, depth + 1)?;
            if cur.peek() != Some(b')') {
                return Err(TypeParseError::UnmatchedParen { offset: cur.pos });
            }
            cur.pos += 1;
            return Ok(inner);
        }

        let start = cur.pos;
        if let Some(&(_, keyword)) = KEYWORDS.iter().find(|(spelling, _)| cur.eat(spelling)) {
            return match keyword {
                Keyword::Primitive(p) => Ok(Layered::leaf(TypeNode::Primitive(p))),
                Keyword::Array => Ok(Layered::leaf(TypeNode::untyped_array())),
                Keyword::SelfClass => match self.ctx.enclosing_class {
                    Some(class) if class.is_trait() => Err(TypeParseError::TraitAsTypeHint {
                        name: class.name.to_string(),
                    }),
                    Some(class) => Ok(Layered::leaf(TypeNode::Class(ClassRef::Resolved(class)))),
                    None => Err(TypeParseError::SelfOutsideClass { offset: start }),
                },
                Keyword::Nested(kind) => self.parse_nested_type_rule(cur, depth, kind),
            };
        }

        let has_tl_prefix = cur.eat(TL_NAMESPACE_SHORTHAND);
        let Some(c) = cur.peek() else {
            return Err(TypeParseError::UnexpectedEnd { offset: cur.pos });
        };
        let starts_class_name = c == b'\\'
            || c.is_ascii_uppercase()
            || (has_tl_prefix && (c.is_ascii_lowercase() || c == b'_'));

        if starts_class_name {
            let name_start = cur.pos;
            while cur.peek().is_some_and(is_class_name_byte) {
                cur.pos += 1;
            }
            let written = &cur.src[name_start..cur.pos];
            if !written.trim_matches('\\').is_empty() {
                let relative = if has_tl_prefix {
                    format!("{}{}", self.env.config.tl_namespace_prefix, written)
                } else {
                    written.to_string()
                };
                return self.class_reference(&relative).map(Layered::leaf);
            }
        }

        Err(TypeParseError::UnknownTypeName {
            input: cur.src.to_string(),
            offset: start,
        })
    }

    /// `<A, B>` or `(A, B)` after `tuple` / `future`.
    fn parse_nested_type_rule(
        &mut self,
        cur: &mut Cursor<'_>,
        depth: usize,
        kind: GenericKind,
    ) -> Result<Layered, TypeParseError> {
        let closer = match cur.peek() {
            Some(b'<') => b'>',
            Some(b'(') => b')',
            Some(_) => return Err(TypeParseError::ExpectedOpener { offset: cur.pos }),
            None => return Err(TypeParseError::UnexpectedEnd { offset: cur.pos }),
        };
        cur.pos += 1;
        cur.skip_spaces();
        if cur.peek() == Some(closer) {
            return Err(TypeParseError::EmptyArguments { offset: cur.pos });
        }

        let mut args = Vec::new();
        let mut arrays = 0;
        loop {
            let arg = self.parse_type_expression(cur, depth + 1)?;
            arrays = arrays.max(arg.arrays);
            args.push(arg.node);
            cur.skip_spaces();
            match cur.peek() {
                None => return Err(TypeParseError::UnexpectedEnd { offset: cur.pos }),
                Some(c) if c == closer => {
                    cur.pos += 1;
                    break;
                }
                Some(b',') => {
                    cur.pos += 1;
                    cur.skip_spaces();
                }
                Some(_) => {
                    return Err(TypeParseError::ExpectedSeparator {
                        closer: closer as char,
                        offset: cur.pos,
                    });
                }
            }
        }

        Ok(Layered {
            node: TypeNode::Generic(kind, args),
            arrays,
        })
    }

    fn class_reference(&mut self, relative: &str) -> Result<TypeNode, TypeParseError> {
        let name = self.env.resolver.resolve(self.ctx, relative, '\\');
        match self.env.classes.lookup_class(&name) {
            Some(class) if class.is_trait() => Err(TypeParseError::TraitAsTypeHint {
                name: class.name.to_string(),
            }),
            Some(class) => Ok(TypeNode::Class(ClassRef::Resolved(class))),
            None => {
                if !self.unknown_classes.contains(&name) {
                    self.unknown_classes.push(name.clone());
                }
                Ok(TypeNode::Class(ClassRef::Pending(name)))
            }
        }
    }
}

/// Parse `type_str` the way the compiler does for a declaration.
///
/// Style warnings go to `sink` at the declaration's line.  A type naming
/// any class that is still undeclared once the whole string has been
/// parsed fails with [`TypeParseError::UnresolvedClass`] naming the first
/// such class.
pub fn phpdoc_parse_type(
    type_str: &str,
    ctx: &DeclarationContext,
    env: TypeEnv<'_>,
    sink: &dyn DiagnosticSink,
) -> Result<TypeNode, TypeParseError> {
    let parsed = TypeRuleParser::new(ctx, env).parse_from_type_string(type_str)?;

    let line = (ctx.declaration_line > 0).then_some(ctx.declaration_line);
    parsed.report_warnings(sink, line);

    if let Some(first) = parsed.unknown_classes.first() {
        return Err(TypeParseError::UnresolvedClass {
            name: first.clone(),
        });
    }
    Ok(parsed.node)
}
