//! Public entry point for module resolution.

use cause_ir::ast::Module;
use cause_ir::StringInterner;

use super::ModuleChecker;
use crate::{ImportProvider, TypeError, TypeTable};

/// Resolve a module: build its [`TypeTable`] and collect every resolution
/// error.
///
/// The table is always returned, even with errors, so diagnostics can
/// render types. Evaluation must not start unless the error list is empty.
///
/// ```text
/// let (table, errors) = resolve(&module, &interner, &library);
/// if errors.is_empty() {
///     // evaluate
/// }
/// ```
#[tracing::instrument(level = "debug", skip_all, fields(path = %module.path))]
pub fn resolve(
    module: &Module,
    interner: &StringInterner,
    imports: &dyn ImportProvider,
) -> (TypeTable, Vec<TypeError>) {
    let mut checker = ModuleChecker::new(&module.arena, interner, imports);
    checker.check_module_scope(&module.declarations);
    let (table, errors) = checker.finish();
    tracing::debug!(
        types = table.len(),
        errors = errors.len(),
        "resolution complete"
    );
    (table, errors)
}
