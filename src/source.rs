//! PHP source scanning.
//!
//! The checker needs three things from a PHP file: the class-likes it
//! declares (to fill the class table), the `namespace` and `use`
//! statements in effect (to resolve relative names), and every `/** */`
//! docblock together with the line of the declaration that follows it.
//!
//! [`scan_source`] parses the file with `mago_syntax`, walks the top-level
//! and namespace statements for the first two, and reads docblocks from
//! the program's trivia.

use std::collections::HashMap;

use mago_span::HasSpan;
use mago_syntax::ast::*;

use crate::context::DeclarationContext;
use crate::symbols::{ClassKind, ClassLookup};

/// The `namespace` and imports in effect for part of a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub namespace: String,
    pub uses: HashMap<String, String>,
}

/// A class, interface, trait or enum declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredClass {
    /// Fully-qualified name without a leading `\`.
    pub name: String,
    pub kind: ClassKind,
    pub line: i32,
}

/// A doc comment and what it is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocblockSite {
    /// Comment body: the text after `/*` and before `*/`.
    pub body: String,
    /// Line of the first code after the comment; `0` at end of file.
    pub declaration_line: i32,
    /// Fully-qualified name of the class whose body contains the comment.
    pub enclosing_class: Option<String>,
    /// Index into [`SourceFile::scopes`].
    pub scope: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFile {
    pub scopes: Vec<Scope>,
    pub classes: Vec<DeclaredClass>,
    pub docblocks: Vec<DocblockSite>,
}

impl SourceFile {
    /// Build the declaration context for a docblock of this file.
    pub fn context_for(&self, site: &DocblockSite, classes: &dyn ClassLookup) -> DeclarationContext {
        let scope = self.scopes.get(site.scope).cloned().unwrap_or_default();
        DeclarationContext {
            namespace: scope.namespace,
            uses: scope.uses,
            enclosing_class: site
                .enclosing_class
                .as_deref()
                .and_then(|name| classes.lookup_class(name)),
            declaration_line: site.declaration_line,
        }
    }
}

/// Byte range of a class-like body, `{` to `}`.
struct ClassBody {
    name: String,
    start: usize,
    end: usize,
}

/// Byte offsets of line starts, for offset → 1-based line lookups.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(content: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(memchr::memchr_iter(b'\n', content.as_bytes()).map(|p| p + 1));
        Self { starts }
    }

    fn line(&self, offset: usize) -> i32 {
        self.starts.partition_point(|&start| start <= offset) as i32
    }
}

/// Scan one PHP file.
///
/// A file the parser cannot handle yields only the empty global scope.
pub fn scan_source(content: &str) -> SourceFile {
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let arena = bumpalo::Bump::new();
        let file_id = mago_database::file::FileId::new("input.php");
        let program = mago_syntax::parser::parse_file_content(&arena, file_id, content);

        let lines = LineIndex::new(content);
        let mut scanner = Scanner {
            lines: &lines,
            file: SourceFile {
                scopes: vec![Scope::default()],
                ..SourceFile::default()
            },
            scope_starts: vec![0],
            bodies: Vec::new(),
        };
        scanner.walk_statements(program.statements.iter(), 0);
        scanner.collect_docblocks(program.trivia.as_slice(), content);
        scanner.file
    }));

    match result {
        Ok(file) => file,
        Err(_) => {
            tracing::error!("parser panicked while scanning source");
            SourceFile {
                scopes: vec![Scope::default()],
                ..SourceFile::default()
            }
        }
    }
}

struct Scanner<'l> {
    lines: &'l LineIndex,
    file: SourceFile,
    /// Start offset of each scope, parallel to `file.scopes`.
    scope_starts: Vec<usize>,
    bodies: Vec<ClassBody>,
}

impl Scanner<'_> {
    fn walk_statements<'a>(&mut self, statements: impl Iterator<Item = &'a Statement<'a>>, scope: usize) {
        for statement in statements {
            match statement {
                Statement::Namespace(namespace) => {
                    let name = namespace.name.as_ref().map(|ident| ident.value()).unwrap_or("");
                    self.file.scopes.push(Scope {
                        namespace: name.trim_matches('\\').to_string(),
                        uses: HashMap::new(),
                    });
                    self.scope_starts.push(namespace.span().start.offset as usize);
                    let inner = self.file.scopes.len() - 1;
                    self.walk_statements(namespace.statements().iter(), inner);
                }
                Statement::Use(use_stmt) => {
                    record_use_items(&use_stmt.items, &mut self.file.scopes[scope].uses);
                }
                Statement::Class(class) => self.declare(
                    scope,
                    &class.name,
                    ClassKind::Class,
                    (class.left_brace, class.right_brace),
                ),
                Statement::Interface(iface) => self.declare(
                    scope,
                    &iface.name,
                    ClassKind::Interface,
                    (iface.left_brace, iface.right_brace),
                ),
                Statement::Trait(trait_def) => self.declare(
                    scope,
                    &trait_def.name,
                    ClassKind::Trait,
                    (trait_def.left_brace, trait_def.right_brace),
                ),
                Statement::Enum(enum_def) => self.declare(
                    scope,
                    &enum_def.name,
                    ClassKind::Class,
                    (enum_def.left_brace, enum_def.right_brace),
                ),
                _ => {}
            }
        }
    }

    fn declare(
        &mut self,
        scope: usize,
        name: &LocalIdentifier,
        kind: ClassKind,
        (left_brace, right_brace): (mago_span::Span, mago_span::Span),
    ) {
        let namespace = &self.file.scopes[scope].namespace;
        let fqn = if namespace.is_empty() {
            name.value.to_string()
        } else {
            format!("{namespace}\\{}", name.value)
        };

        self.file.classes.push(DeclaredClass {
            name: fqn.clone(),
            kind,
            line: self.lines.line(name.span.start.offset as usize),
        });
        self.bodies.push(ClassBody {
            name: fqn,
            start: left_brace.start.offset as usize,
            end: right_brace.end.offset as usize,
        });
    }

    fn collect_docblocks(&mut self, trivia: &[Trivia<'_>], content: &str) {
        for (index, t) in trivia.iter().enumerate() {
            if !matches!(t.kind, TriviaKind::DocBlockComment) {
                continue;
            }
            let offset = t.span.start.offset as usize;
            let body = t.value.strip_prefix("/*").unwrap_or(t.value);
            let body = body.strip_suffix("*/").unwrap_or(body);

            let declaration_line = next_code_offset(trivia, index, content)
                .map(|code| self.lines.line(code))
                .unwrap_or(0);
            let enclosing_class = self
                .bodies
                .iter()
                .find(|b| b.start < offset && offset < b.end)
                .map(|b| b.name.clone());
            let scope = self.scope_starts.iter().rposition(|&start| start <= offset).unwrap_or(0);

            self.file.docblocks.push(DocblockSite {
                body: body.to_string(),
                declaration_line,
                enclosing_class,
                scope,
            });
        }
    }
}

/// Offset of the first code byte after trivia `index`, skipping any
/// whitespace and comments in between.
fn next_code_offset(trivia: &[Trivia<'_>], index: usize, content: &str) -> Option<usize> {
    let bytes = content.as_bytes();
    let mut pos = trivia[index].span.end.offset as usize;
    for t in &trivia[index + 1..] {
        let gap = bytes.get(pos..t.span.start.offset as usize);
        if !gap.is_some_and(|g| g.iter().all(u8::is_ascii_whitespace)) {
            break;
        }
        pos = t.span.end.offset as usize;
    }
    let rest = bytes.get(pos..)?;
    rest.iter()
        .position(|b| !b.is_ascii_whitespace())
        .map(|skip| pos + skip)
}

/// Record the class imports of one `use` statement.
fn record_use_items(items: &UseItems, uses: &mut HashMap<String, String>) {
    match items {
        UseItems::Sequence(seq) => {
            for item in seq.items.iter() {
                add_import(item, None, uses);
            }
        }
        UseItems::TypedSequence(seq) => {
            if seq.r#type.is_function() || seq.r#type.is_const() {
                return;
            }
            for item in seq.items.iter() {
                add_import(item, None, uses);
            }
        }
        UseItems::TypedList(list) => {
            if list.r#type.is_function() || list.r#type.is_const() {
                return;
            }
            for item in list.items.iter() {
                add_import(item, Some(list.namespace.value()), uses);
            }
        }
        UseItems::MixedList(list) => {
            for maybe_typed in list.items.iter() {
                if let Some(t) = &maybe_typed.r#type
                    && (t.is_function() || t.is_const())
                {
                    continue;
                }
                add_import(&maybe_typed.item, Some(list.namespace.value()), uses);
            }
        }
    }
}

fn add_import(item: &UseItem, group_prefix: Option<&str>, uses: &mut HashMap<String, String>) {
    let name = item.name.value();
    let fqn = match group_prefix {
        Some(prefix) => format!("{}\\{}", prefix.trim_end_matches('\\'), name),
        None => name.to_string(),
    };
    let fqn = fqn.trim_start_matches('\\');
    let alias = match &item.alias {
        Some(alias) => alias.identifier.value,
        None => fqn.rsplit('\\').next().unwrap_or(fqn),
    };
    uses.insert(alias.to_string(), fqn.to_string());
}
