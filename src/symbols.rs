//! Class symbol table.
//!
//! The type parser only needs to ask "is this fully-qualified class
//! declared, and is it a trait?".  [`ClassLookup`] is that question;
//! [`ClassTable`] is a ready-made, thread-safe answer to it that the
//! project checker fills while scanning sources.
//!
//! Names are stored without a leading `\` (e.g. `"VK\Api\User"`).

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::Serialize;
use ustr::Ustr;

/// What sort of class-like a declaration is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Class,
    Interface,
    Trait,
}

/// A declared class-like, as handed out by a [`ClassLookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ClassHandle {
    /// Fully-qualified name without a leading `\`.
    pub name: Ustr,
    pub kind: ClassKind,
}

impl ClassHandle {
    pub fn new(name: &str, kind: ClassKind) -> Self {
        Self {
            name: Ustr::from(name.strip_prefix('\\').unwrap_or(name)),
            kind,
        }
    }

    pub fn is_trait(&self) -> bool {
        self.kind == ClassKind::Trait
    }
}

/// Read access to the set of declared classes.
pub trait ClassLookup {
    /// Look up a fully-qualified name (no leading `\`).
    fn lookup_class(&self, fqn: &str) -> Option<ClassHandle>;
}

/// In-memory class table keyed by fully-qualified name.
///
/// Declarations go through `&self`, so one table can be shared between the
/// pass that registers classes and the passes that parse docblocks.
#[derive(Debug, Default)]
pub struct ClassTable {
    classes: RwLock<HashMap<Ustr, ClassHandle>>,
}

impl ClassTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class-like.  A later declaration of the same name
    /// replaces the earlier one.
    pub fn declare(&self, name: &str, kind: ClassKind) -> ClassHandle {
        let handle = ClassHandle::new(name, kind);
        self.classes.write().insert(handle.name, handle);
        handle
    }

    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.read().is_empty()
    }
}

impl ClassLookup for ClassTable {
    fn lookup_class(&self, fqn: &str) -> Option<ClassHandle> {
        let name = fqn.strip_prefix('\\').unwrap_or(fqn);
        // Avoid interning names that were never declared.
        let key = Ustr::from_existing(name)?;
        self.classes.read().get(&key).copied()
    }
}
