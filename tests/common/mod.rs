#![allow(dead_code)]

use phpdoc_types::{
    ClassHandle, ClassKind, ClassTable, Config, DeclarationContext, ParsedType, TypeEnv,
    TypeParseError, TypeRuleParser, UseAliasResolver,
};

/// A class table and config that outlive the `TypeEnv` borrowed from them.
pub struct TestEnv {
    pub classes: ClassTable,
    pub config: Config,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            classes: ClassTable::new(),
            config: Config::default(),
        }
    }

    /// Helper: a table with the given declarations.
    pub fn with_classes(declared: &[(&str, ClassKind)]) -> Self {
        let env = Self::new();
        for &(name, kind) in declared {
            env.classes.declare(name, kind);
        }
        env
    }

    pub fn env(&self) -> TypeEnv<'_> {
        TypeEnv::new(&self.classes, &UseAliasResolver, &self.config)
    }

    pub fn handle(&self, name: &str) -> ClassHandle {
        ClassHandle::new(name, ClassKind::Class)
    }

    pub fn parse(&self, ctx: &DeclarationContext, type_str: &str) -> Result<ParsedType, TypeParseError> {
        TypeRuleParser::new(ctx, self.env()).parse_from_type_string(type_str)
    }

    /// Parse in the global namespace outside any class.
    pub fn parse_global(&self, type_str: &str) -> Result<ParsedType, TypeParseError> {
        self.parse(&DeclarationContext::new(), type_str)
    }
}
