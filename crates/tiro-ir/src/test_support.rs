//! A small harness for building functions by hand in tests: a thin wrapper
//! over `Function` that hides the boilerplate of wiring up predecessors and
//! terminators while leaving the real `Function` API reachable for
//! assertions.

use tiro_util::Symbol;

use crate::block::Block;
use crate::entities::{Local, Phi};
use crate::function::{Function, FunctionType};
use crate::ids::{BlockId, LocalId};
use crate::stmt::Stmt;
use crate::terminator::{BranchType, Terminator};
use crate::value::{BinaryOp, Constant, RValue};

pub struct TestFunction {
    func: Function,
}

impl TestFunction {
    pub fn new() -> Self {
        TestFunction {
            func: Function::new(Symbol::intern("test"), FunctionType::Normal),
        }
    }

    pub fn function(&self) -> &Function {
        &self.func
    }

    pub fn function_mut(&mut self) -> &mut Function {
        &mut self.func
    }

    /// Consumes the harness, returning the `Function` built so far.
    pub fn into_function(self) -> Function {
        self.func
    }

    pub fn entry(&self) -> BlockId {
        self.func.entry()
    }

    pub fn exit(&self) -> BlockId {
        self.func.exit()
    }

    pub fn make_block(&mut self, label: Option<&str>) -> BlockId {
        self.func.push_block(Block::new(label.map(Symbol::intern)))
    }

    pub fn set_jump(&mut self, id: BlockId, target: BlockId) {
        self.func.block_mut(id).set_terminator(Terminator::Jump { target });
        self.func.block_mut(target).append_predecessor(id);
    }

    /// Terminates `id` with a `Branch`, synthesizing a throwaway condition
    /// local — callers that only care about CFG shape don't need to supply
    /// one.
    pub fn set_branch(&mut self, id: BlockId, target: BlockId, fallthrough: BlockId) {
        let value = self.define(id, RValue::Constant(Constant::True));
        self.func.block_mut(id).set_terminator(Terminator::Branch {
            kind: BranchType::IfTrue,
            value,
            target,
            fallthrough,
        });
        self.func.block_mut(target).append_predecessor(id);
        self.func.block_mut(fallthrough).append_predecessor(id);
    }

    pub fn has_predecessor(&self, id: BlockId, pred: BlockId) -> bool {
        self.func.block(id).predecessors().contains(&pred)
    }

    /// Appends a fresh `Define` for `rvalue` at the end of `block`'s
    /// statement list and returns its `LocalId`.
    pub fn define(&mut self, block: BlockId, rvalue: RValue) -> LocalId {
        let local = self.func.push_local(Local::new(rvalue));
        self.func.block_mut(block).append_stmt(Stmt::Define { local });
        local
    }

    pub fn define_constant(&mut self, block: BlockId, constant: Constant) -> LocalId {
        self.define(block, RValue::Constant(constant))
    }

    pub fn define_binary_op(&mut self, block: BlockId, op: BinaryOp, a: LocalId, b: LocalId) -> LocalId {
        self.define(block, RValue::BinaryOp(op, a, b))
    }

    /// Defines a phi with the given initial operands, inserting its
    /// `Define` at the front of `block`'s statement list so it stays within
    /// the leading phi prefix.
    pub fn define_phi(&mut self, block: BlockId, operands: Vec<LocalId>) -> LocalId {
        let phi_id = self.func.push_phi(Phi::with_operands(operands));
        let local = self.func.push_local(Local::new(RValue::Phi(phi_id)));
        self.func
            .block_mut(block)
            .insert_stmt(0, Stmt::Define { local });
        local
    }

    /// Overwrites a phi's operand list, e.g. once a loop-carried value that
    /// didn't exist yet at `define_phi` time has been defined.
    pub fn set_phi_operands(&mut self, block: BlockId, local: LocalId, operands: Vec<LocalId>) {
        let _ = block;
        let RValue::Phi(phi_id) = self.func.local(local).value() else {
            panic!("set_phi_operands: local is not a phi");
        };
        *self.func.phi_mut(phi_id) = Phi::with_operands(operands);
    }
}

impl Default for TestFunction {
    fn default() -> Self {
        Self::new()
    }
}
