//! `Function`: the entity store. Owns six arenas and the entry/exit block
//! ids; every other piece of this crate borrows a `&Function` to resolve ids
//! into the values they name.

use tiro_util::index_vec::IndexVec;
use tiro_util::Symbol;

use crate::block::Block;
use crate::entities::{Local, LocalList, Param, Phi, Record};
use crate::ids::{BlockId, LocalId, LocalListId, ParamId, PhiId, RecordId};
use crate::stmt::Stmt;
use crate::terminator::Terminator;
use crate::value::RValue;

/// Whether a function can be called directly or needs a closure environment.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FunctionType {
    Normal,
    Closure,
}

/// An SSA function: six id-addressed arenas plus the two blocks every
/// function is guaranteed to have.
///
/// On construction, two blocks are registered: `entry` (no predecessors,
/// unterminated) and `exit` (already terminated with `Terminator::Exit`).
/// Every other block, param, local, phi, local list and record is created
/// later through the `push_*` constructors.
#[derive(Clone, Debug)]
pub struct Function {
    name: Symbol,
    kind: FunctionType,
    blocks: IndexVec<BlockId, Block>,
    params: IndexVec<ParamId, Param>,
    locals: IndexVec<LocalId, Local>,
    phis: IndexVec<PhiId, Phi>,
    local_lists: IndexVec<LocalListId, LocalList>,
    records: IndexVec<RecordId, Record>,
    entry: BlockId,
    exit: BlockId,
}

impl Function {
    pub fn new(name: Symbol, kind: FunctionType) -> Self {
        let mut blocks = IndexVec::new();
        let entry = blocks.push(Block::new(Some(Symbol::intern("entry"))));
        let mut exit_block = Block::new(Some(Symbol::intern("exit")));
        exit_block.set_terminator(Terminator::Exit);
        let exit = blocks.push(exit_block);

        Function {
            name,
            kind,
            blocks,
            params: IndexVec::new(),
            locals: IndexVec::new(),
            phis: IndexVec::new(),
            local_lists: IndexVec::new(),
            records: IndexVec::new(),
            entry,
            exit,
        }
    }

    pub fn name(&self) -> Symbol {
        self.name
    }

    pub fn kind(&self) -> FunctionType {
        self.kind
    }

    pub fn entry(&self) -> BlockId {
        self.entry
    }

    pub fn exit(&self) -> BlockId {
        self.exit
    }

    // --- constructors -------------------------------------------------

    pub fn push_block(&mut self, block: Block) -> BlockId {
        self.blocks.push(block)
    }

    pub fn push_param(&mut self, param: Param) -> ParamId {
        self.params.push(param)
    }

    pub fn push_local(&mut self, local: Local) -> LocalId {
        self.locals.push(local)
    }

    pub fn push_phi(&mut self, phi: Phi) -> PhiId {
        self.phis.push(phi)
    }

    pub fn push_local_list(&mut self, list: LocalList) -> LocalListId {
        self.local_lists.push(list)
    }

    pub fn push_record(&mut self, record: Record) -> RecordId {
        self.records.push(record)
    }

    // --- accessors ------------------------------------------------------

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id]
    }

    pub fn block_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id]
    }

    pub fn param(&self, id: ParamId) -> &Param {
        &self.params[id]
    }

    pub fn param_mut(&mut self, id: ParamId) -> &mut Param {
        &mut self.params[id]
    }

    pub fn local(&self, id: LocalId) -> &Local {
        &self.locals[id]
    }

    pub fn local_mut(&mut self, id: LocalId) -> &mut Local {
        &mut self.locals[id]
    }

    pub fn phi(&self, id: PhiId) -> &Phi {
        &self.phis[id]
    }

    pub fn phi_mut(&mut self, id: PhiId) -> &mut Phi {
        &mut self.phis[id]
    }

    pub fn local_list(&self, id: LocalListId) -> &LocalList {
        &self.local_lists[id]
    }

    pub fn local_list_mut(&mut self, id: LocalListId) -> &mut LocalList {
        &mut self.local_lists[id]
    }

    pub fn record(&self, id: RecordId) -> &Record {
        &self.records[id]
    }

    pub fn record_mut(&mut self, id: RecordId) -> &mut Record {
        &mut self.records[id]
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn local_count(&self) -> usize {
        self.locals.len()
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn phi_count_total(&self) -> usize {
        self.phis.len()
    }

    pub fn local_list_count(&self) -> usize {
        self.local_lists.len()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn block_ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.blocks.indices()
    }

    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        self.blocks.iter_enumerated()
    }

    pub fn locals(&self) -> impl Iterator<Item = (LocalId, &Local)> {
        self.locals.iter_enumerated()
    }

    pub fn params(&self) -> impl Iterator<Item = (ParamId, &Param)> {
        self.params.iter_enumerated()
    }

    // --- phi bookkeeping -------------------------------------------------

    fn is_phi_define(&self, stmt: &Stmt) -> bool {
        match stmt {
            Stmt::Define { local } => self.locals[*local].value().is_phi(),
            Stmt::Assign { .. } => false,
        }
    }

    /// The length of `block`'s leading phi prefix: the run of `Define`
    /// statements whose local's rvalue is `Phi`/`Phi0`, scanning until the
    /// first statement that isn't one.
    pub fn phi_count(&self, block: BlockId) -> usize {
        self.blocks[block]
            .stmts()
            .iter()
            .take_while(|stmt| self.is_phi_define(stmt))
            .count()
    }

    /// Demotes `local_id` from a phi to an ordinary value: overwrites its
    /// defining rvalue with `new_value` and rotates the `Define` statement
    /// out of the phi prefix to immediately follow the remaining phis, so
    /// the "phis are a contiguous prefix" invariant survives.
    ///
    /// # Panics
    ///
    /// Panics (debug-asserts) if `new_value` is itself a phi, or if
    /// `local_id` is not defined by a `Define` within `block`'s phi prefix —
    /// both are program bugs, not recoverable conditions.
    pub fn remove_phi(&mut self, block: BlockId, local_id: LocalId, new_value: RValue) {
        debug_assert!(
            !new_value.is_phi(),
            "remove_phi: new_value must not itself be a phi"
        );

        let phi_end = self.phi_count(block);
        self.locals[local_id].set_value(new_value);

        let stmts = self.blocks[block].raw_stmts_mut();
        let old_pos = stmts[..phi_end]
            .iter()
            .position(|stmt| matches!(stmt, Stmt::Define { local } if *local == local_id))
            .expect("remove_phi: local is not defined among block's leading phis");

        stmts[old_pos..phi_end].rotate_left(1);
    }
}
