//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use cause_ir::{ExprArena, StringInterner};
use cause_patterns::Value;
use cause_types::{TypeId, TypeTable};

use super::{CoreNames, Interpreter};
use crate::diagnostics::CallStack;
use crate::effects::HandlerStack;
use crate::eval_mode::{EvalConfig, EvalMode};
use crate::host_handler::SharedHostHandler;
use crate::library::CoreLibrary;
use crate::Environment;

/// Builder for [`Interpreter`].
///
/// The default mode is [`EvalMode::Interpret`]. Tests should pick
/// [`EvalMode::TestRun`] so runaway recursion fails fast.
pub struct InterpreterBuilder<'a> {
    interner: &'a StringInterner,
    arena: &'a ExprArena,
    types: &'a TypeTable,
    mode: EvalMode,
    /// Set by [`InterpreterBuilder::runaway_loop_threshold`]; wins over the mode.
    loop_limit: Option<usize>,
    loop_limit_set: bool,
    host: Option<SharedHostHandler>,
}

impl<'a> InterpreterBuilder<'a> {
    pub fn new(interner: &'a StringInterner, arena: &'a ExprArena, types: &'a TypeTable) -> Self {
        Self {
            interner,
            arena,
            types,
            mode: EvalMode::default(),
            loop_limit: None,
            loop_limit_set: false,
            host: None,
        }
    }

    /// Set the evaluation mode. Limits follow the mode unless overridden.
    #[must_use]
    pub fn mode(mut self, mode: EvalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Override the mode's loop iteration limit; `None` removes it.
    #[must_use]
    pub fn runaway_loop_threshold(mut self, limit: Option<usize>) -> Self {
        self.loop_limit = limit;
        self.loop_limit_set = true;
        self
    }

    /// Install the outermost handler, consulted when no `effect for`
    /// frame matches.
    #[must_use]
    pub fn host_handler(mut self, host: SharedHostHandler) -> Self {
        self.host = Some(host);
        self
    }

    pub fn build(self) -> Interpreter<'a> {
        let mut config = EvalConfig::for_mode(&self.mode);
        if self.loop_limit_set {
            config.runaway_loop_threshold = self.loop_limit;
        }
        let library = CoreLibrary;
        let mut env = Environment::new();
        define_builtins(&mut env, self.interner, self.types, library);
        // Module declarations live one level below the builtins, so they
        // may shadow them.
        env.push_scope();

        Interpreter {
            interner: self.interner,
            arena: self.arena,
            types: self.types,
            env,
            handlers: HandlerStack::new(),
            call_stack: CallStack::new(config.max_recursion_depth),
            mode: self.mode,
            config,
            host: self.host,
            library,
            names: CoreNames::new(self.interner),
            next_frame: 0,
            loop_target: None,
            return_target: None,
            host_ticks: 0,
        }
    }
}

/// Bind the builtin values and prelude natives in the global scope.
fn define_builtins(
    env: &mut Environment,
    interner: &StringInterner,
    types: &TypeTable,
    library: CoreLibrary,
) {
    let type_name = |id: TypeId| types.get(id).name;
    env.define_global(type_name(TypeId::TRUE), Value::boolean(true));
    env.define_global(type_name(TypeId::FALSE), Value::boolean(false));
    for id in [TypeId::DEBUG, TypeId::ASSUMPTION_BROKEN] {
        env.define_global(type_name(id), Value::Constructor(id));
    }
    for native in library.prelude_natives() {
        env.define_global(interner.intern(native.name), Value::Native(native));
    }
}
