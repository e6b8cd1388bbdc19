//! Class name resolution against `namespace` and `use` statements.
//!
//! Given a name as written in a docblock, produce the fully-qualified name
//! under which it is looked up in the class table:
//!
//!   - `\Foo\Bar`  → `Foo\Bar` (already fully qualified)
//!   - `Bar`       → `Imported\Bar` if `use Imported\Bar;`, else `Ns\Bar`
//!   - `Sub\Bar`   → `Imported\Sub\Bar` if `Sub` is an import, else `Ns\Sub\Bar`
//!
//! `self` never reaches the resolver; the type parser maps it to the
//! enclosing class itself.

use crate::context::DeclarationContext;

/// Maps a (possibly relative) class name to a canonical one.
pub trait NameResolver {
    /// Resolve `relative` in `ctx`.  The result has no leading separator
    /// and uses `separator` between segments.
    fn resolve(&self, ctx: &DeclarationContext, relative: &str, separator: char) -> String;
}

/// Resolver following PHP's rules for class names.
#[derive(Debug, Clone, Copy, Default)]
pub struct UseAliasResolver;

impl NameResolver for UseAliasResolver {
    fn resolve(&self, ctx: &DeclarationContext, relative: &str, separator: char) -> String {
        let qualified = if let Some(absolute) = relative.strip_prefix('\\') {
            absolute.to_string()
        } else {
            let first_segment = relative.split('\\').next().unwrap_or(relative);
            match ctx.uses.get(first_segment) {
                Some(imported) => format!("{}{}", imported, &relative[first_segment.len()..]),
                None if ctx.namespace.is_empty() => relative.to_string(),
                None => format!("{}\\{}", ctx.namespace, relative),
            }
        };

        if separator == '\\' {
            qualified
        } else {
            qualified.replace('\\', &separator.to_string())
        }
    }
}
