//! The parsed type AST.
//!
//! A [`TypeNode`] is immutable once the parser returns it: later passes
//! wrap it, never edit it in place.  Its [`Display`](std::fmt::Display)
//! output is canonical text that parses back to an equal tree.

use std::fmt;

use serde::Serialize;

use crate::symbols::ClassHandle;

/// Built-in scalar-ish types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Int,
    Float,
    String,
    Bool,
    /// The `false` singleton, used for "value or false" returns.
    False,
    /// `mixed` / `null`: any value.
    Mixed,
    Void,
    /// Element type of an untyped `array`.
    Unknown,
}

impl PrimitiveType {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveType::Int => "int",
            PrimitiveType::Float => "float",
            PrimitiveType::String => "string",
            PrimitiveType::Bool => "bool",
            PrimitiveType::False => "false",
            PrimitiveType::Mixed => "mixed",
            PrimitiveType::Void => "void",
            PrimitiveType::Unknown => "unknown",
        }
    }
}

/// Wrapper kinds taking an argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenericKind {
    Tuple,
    Future,
}

impl GenericKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GenericKind::Tuple => "tuple",
            GenericKind::Future => "future",
        }
    }
}

/// A reference to a user class, either found in the class table or still
/// waiting for its declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassRef {
    Resolved(ClassHandle),
    /// Fully-qualified name (no leading `\`) not declared at parse time.
    Pending(String),
}

impl ClassRef {
    /// Fully-qualified name without a leading `\`.
    pub fn name(&self) -> &str {
        match self {
            ClassRef::Resolved(handle) => handle.name.as_str(),
            ClassRef::Pending(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeNode {
    Primitive(PrimitiveType),
    /// `T[]`, `array` (element [`PrimitiveType::Unknown`]) or `T ...`.
    ArrayOf(Box<TypeNode>),
    /// `A|B|C`; always at least two arms.
    Union(Vec<TypeNode>),
    Class(ClassRef),
    /// `tuple<A, B>` / `future<A>`; never empty.
    Generic(GenericKind, Vec<TypeNode>),
}

impl TypeNode {
    pub fn array_of(inner: TypeNode) -> Self {
        TypeNode::ArrayOf(Box::new(inner))
    }

    /// The untyped `array`.
    pub fn untyped_array() -> Self {
        TypeNode::array_of(TypeNode::Primitive(PrimitiveType::Unknown))
    }

    /// Names of all [`ClassRef::Pending`] references, in source order.
    pub fn unresolved_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_unresolved(&mut names);
        names
    }

    fn collect_unresolved<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            TypeNode::Primitive(_) => {}
            TypeNode::ArrayOf(inner) => inner.collect_unresolved(out),
            TypeNode::Union(arms) | TypeNode::Generic(_, arms) => {
                for arm in arms {
                    arm.collect_unresolved(out);
                }
            }
            TypeNode::Class(class) => {
                if let ClassRef::Pending(name) = class
                    && !out.contains(&name.as_str())
                {
                    out.push(name);
                }
            }
        }
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Primitive(p) => f.write_str(p.as_str()),
            TypeNode::ArrayOf(inner) => match inner.as_ref() {
                TypeNode::Primitive(PrimitiveType::Unknown) => f.write_str("array"),
                TypeNode::Union(_) => write!(f, "({inner})[]"),
                _ => write!(f, "{inner}[]"),
            },
            TypeNode::Union(arms) => {
                for (i, arm) in arms.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    match arm {
                        TypeNode::Union(_) => write!(f, "({arm})")?,
                        _ => write!(f, "{arm}")?,
                    }
                }
                Ok(())
            }
            TypeNode::Class(class) => write!(f, "\\{}", class.name()),
            TypeNode::Generic(kind, args) => {
                write!(f, "{}<", kind.as_str())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
        }
    }
}
