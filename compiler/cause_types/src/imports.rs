//! Import seam.
//!
//! Cross-file module resolution is done by the host. The resolver only needs
//! the signature of each imported function; the evaluator asks the same
//! provider-side library for the implementation.

use crate::FunctionType;

/// Source of importable functions.
pub trait ImportProvider {
    /// Signature of `name` exported by module `path`.
    fn lookup(&self, path: &str, name: &str) -> Option<FunctionType>;

    /// Functions visible in every module without an import.
    fn prelude(&self) -> Vec<(&'static str, FunctionType)> {
        Vec::new()
    }
}

/// Provider with nothing to import.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoImports;

impl ImportProvider for NoImports {
    fn lookup(&self, _path: &str, _name: &str) -> Option<FunctionType> {
        None
    }
}
