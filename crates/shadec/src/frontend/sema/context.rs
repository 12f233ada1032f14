//! Per-pass analysis state

use super::scope::SymbolTable;
use crate::common::{CompileError, CompileResult};
use crate::frontend::ast::Type;

/// Return bookkeeping for the function being checked
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnFrame {
    pub expected: Type,
    pub has_returned: bool,
}

/// State shared by every check of one pass over a program
#[derive(Debug, Default)]
pub struct AnalysisContext<'a> {
    pub symbols: SymbolTable<'a>,
    loop_depth: usize,
    returns: Vec<ReturnFrame>,
}

impl<'a> AnalysisContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a loop or switch body
    pub fn enter_loop(&mut self) {
        self.loop_depth += 1;
    }

    pub fn exit_loop(&mut self) {
        debug_assert!(self.loop_depth > 0, "loop depth underflow");
        self.loop_depth = self.loop_depth.saturating_sub(1);
    }

    pub fn in_loop(&self) -> bool {
        self.loop_depth > 0
    }

    pub fn loop_depth(&self) -> usize {
        self.loop_depth
    }

    /// Start checking a function returning `expected`. A `void` function
    /// counts as having returned already.
    pub fn push_return(&mut self, expected: Type) {
        let has_returned = expected.is_void();
        self.returns.push(ReturnFrame {
            expected,
            has_returned,
        });
    }

    pub fn pop_return(&mut self) -> CompileResult<ReturnFrame> {
        self.returns
            .pop()
            .ok_or_else(|| CompileError::internal("return frame stack underflow"))
    }

    /// Frame of the innermost function, if any
    pub fn current_return(&mut self) -> Option<&mut ReturnFrame> {
        self.returns.last_mut()
    }
}
