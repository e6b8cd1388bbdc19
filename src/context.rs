//! The declaration a docblock belongs to.
//!
//! The type parser needs to know which class encloses the documented
//! declaration (to resolve `self`) and which namespace and `use` imports
//! are in effect (to resolve relative class names).

use std::collections::HashMap;

use crate::symbols::ClassHandle;

/// Context of the function, method or property being documented.
#[derive(Debug, Clone, Default)]
pub struct DeclarationContext {
    /// Namespace of the file, without leading or trailing `\`.  Empty for
    /// the global namespace.
    pub namespace: String,
    /// Imported short name (or alias) → fully-qualified name.
    pub uses: HashMap<String, String>,
    /// Class whose body contains the declaration, if any.
    pub enclosing_class: Option<ClassHandle>,
    /// 1-based line of the declaration; `0` when unknown.
    pub declaration_line: i32,
}

impl DeclarationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.trim_matches('\\').to_string();
        self
    }

    /// Add a `use Fqn as Alias;` import.  An empty alias takes the last
    /// segment of the name.
    pub fn with_use(mut self, alias: &str, fqn: &str) -> Self {
        let fqn = fqn.trim_start_matches('\\');
        let alias = if alias.is_empty() {
            fqn.rsplit('\\').next().unwrap_or(fqn)
        } else {
            alias
        };
        self.uses.insert(alias.to_string(), fqn.to_string());
        self
    }

    pub fn with_enclosing_class(mut self, class: ClassHandle) -> Self {
        self.enclosing_class = Some(class);
        self
    }

    pub fn at_line(mut self, line: i32) -> Self {
        self.declaration_line = line;
        self
    }
}
