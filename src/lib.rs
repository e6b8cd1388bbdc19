//! PHPDoc annotations and type expressions for a PHP-to-native compiler.
//!
//! The compiler front end hands this crate a documentation comment and a
//! tag kind; it gets back the variable name and type written next to the
//! tag, and a typed AST for that type:
//!
//! ```
//! use phpdoc_types::{
//!     ClassTable, Config, DeclarationContext, DiagnosticLog, DocTagKind, TypeEnv,
//!     UseAliasResolver, find_tag, phpdoc_parse_type,
//! };
//!
//! let found = find_tag("* @param $ids int[] some ids", DocTagKind::Param, 0).unwrap();
//! assert_eq!(found.var_name, "ids");
//!
//! let classes = ClassTable::new();
//! let config = Config::default();
//! let env = TypeEnv::new(&classes, &UseAliasResolver, &config);
//! let ctx = DeclarationContext::new();
//! let ty = phpdoc_parse_type(&found.type_str, &ctx, env, &DiagnosticLog::new()).unwrap();
//! assert_eq!(ty.to_string(), "int[]");
//! ```
//!
//! # Modules
//!
//! - [`docblock`]: tag tokenizer, tag value tokenizer, tag queries.
//! - [`type_parser`]: recursive-descent parser producing [`TypeNode`]s.
//! - [`types`]: the type AST.
//! - [`symbols`], [`names`], [`diagnostics`], [`context`]: the compiler
//!   services the parser talks to, with ready-made implementations.
//! - [`annotations`]: everything one docblock declares.
//! - [`source`] and [`check`]: scanning PHP files and checking the
//!   docblocks of a whole project.
//! - [`config`]: settings loaded from TOML.

pub mod annotations;
pub mod check;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod docblock;
pub mod error;
pub mod names;
pub mod source;
pub mod symbols;
pub mod type_parser;
pub mod types;

pub use annotations::{DocAnnotations, TypedTag};
pub use check::{CheckReport, Checker, FileReport};
pub use config::Config;
pub use context::DeclarationContext;
pub use diagnostics::{Diagnostic, DiagnosticLog, DiagnosticSink, Severity};
pub use docblock::{
    DocTag, DocTagKind, TagMatch, find_all_tags, find_tag, parse_php_doc,
    strip_comment_delimiters, tag_exists, try_find_tag,
};
pub use error::{ConfigError, DocblockError, TypeParseError};
pub use names::{NameResolver, UseAliasResolver};
pub use symbols::{ClassHandle, ClassKind, ClassLookup, ClassTable};
pub use type_parser::{ParsedType, TypeEnv, TypeRuleParser, phpdoc_parse_type};
pub use types::{ClassRef, GenericKind, PrimitiveType, TypeNode};
