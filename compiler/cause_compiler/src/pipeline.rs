//! The pipeline: build, resolve, evaluate.

use cause_diagnostic::build_error;
use cause_eval::{buffer_handler, CoreLibrary, EvalMode, InterpreterBuilder, SharedHostHandler};
use cause_ir::parse_tree::ParsedFile;
use cause_ir::{lower, StringInterner};
use cause_types::resolve;

use crate::output::{ErrorPhase, RunOutput};

/// Configuration for one run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Function called after the module is loaded.
    pub entry: String,
    pub mode: EvalMode,
    /// Overrides the mode's loop iteration limit.
    pub runaway_loop_threshold: Option<usize>,
    /// Outermost handler. A buffering handler is used when unset.
    pub host: Option<SharedHostHandler>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            entry: "main".to_owned(),
            mode: EvalMode::default(),
            runaway_loop_threshold: None,
            host: None,
        }
    }
}

/// Build, resolve and evaluate `file`, calling `config.entry` with no
/// arguments. Resolution errors stop the run before evaluation.
#[tracing::instrument(level = "debug", skip_all, fields(path = %file.path))]
pub fn run_file(file: &ParsedFile, config: &RunConfig) -> RunOutput {
    let interner = StringInterner::new();

    let module = match lower(file, &interner) {
        Ok(module) => module,
        Err(errors) => {
            let diagnostics = errors.iter().map(build_error).collect();
            return RunOutput::failed(ErrorPhase::Build, diagnostics, Vec::new());
        }
    };

    let library = CoreLibrary;
    let (table, errors) = resolve(&module, &interner, &library);
    if !errors.is_empty() {
        tracing::debug!(errors = errors.len(), "resolution failed");
        let diagnostics = errors
            .iter()
            .map(|e| e.to_diagnostic(&table, &interner))
            .collect();
        return RunOutput::failed(ErrorPhase::Resolve, diagnostics, Vec::new());
    }

    let host = config.host.clone().unwrap_or_else(buffer_handler);
    let mut builder = InterpreterBuilder::new(&interner, &module.arena, &table)
        .mode(config.mode.clone())
        .host_handler(host.clone());
    if let Some(limit) = config.runaway_loop_threshold {
        builder = builder.runaway_loop_threshold(Some(limit));
    }
    let mut interpreter = builder.build();

    let result = interpreter
        .load_module(&module)
        .and_then(|()| interpreter.call_function(&config.entry, Vec::new()));
    let debug_output = host.output();
    match result {
        Ok(value) => RunOutput {
            success: true,
            value: Some(interpreter.display(&value)),
            debug_output,
            diagnostics: Vec::new(),
            error_phase: None,
        },
        Err(e) => RunOutput::failed(ErrorPhase::Runtime, vec![e.to_diagnostic()], debug_output),
    }
}
