//! Basic blocks: an ordered statement list terminated by exactly one
//! `Terminator`, plus the predecessor bookkeeping that makes up the CFG.

use tiro_util::span::SourceRange;
use tiro_util::Symbol;

use crate::ids::BlockId;
use crate::stmt::Stmt;
use crate::terminator::Terminator;

/// A basic block.
///
/// `sealed` and `filled` are bookkeeping flags for the SSA-construction
/// algorithm used by the (out-of-scope) lowering collaborator: a block is
/// sealed once no further predecessors may be added, and filled once no
/// further statements may be appended. Nothing in this crate enforces those
/// flags itself; they are state the builder reads and writes.
#[derive(Clone, Debug)]
pub struct Block {
    label: Option<Symbol>,
    sealed: bool,
    filled: bool,
    predecessors: Vec<BlockId>,
    stmts: Vec<Stmt>,
    terminator: Terminator,
    source_range: Option<SourceRange>,
}

impl Block {
    /// Creates a new, unsealed, unfilled, unterminated block with no
    /// predecessors and no statements.
    pub fn new(label: Option<Symbol>) -> Self {
        Block {
            label,
            sealed: false,
            filled: false,
            predecessors: Vec::new(),
            stmts: Vec::new(),
            terminator: Terminator::None,
            source_range: None,
        }
    }

    pub fn label(&self) -> Option<Symbol> {
        self.label
    }

    pub fn sealed(&self) -> bool {
        self.sealed
    }

    pub fn set_sealed(&mut self, sealed: bool) {
        self.sealed = sealed;
    }

    pub fn filled(&self) -> bool {
        self.filled
    }

    pub fn set_filled(&mut self, filled: bool) {
        self.filled = filled;
    }

    pub fn source_range(&self) -> Option<SourceRange> {
        self.source_range
    }

    pub fn set_source_range(&mut self, range: SourceRange) {
        self.source_range = Some(range);
    }

    pub fn terminator(&self) -> &Terminator {
        &self.terminator
    }

    pub fn set_terminator(&mut self, terminator: Terminator) {
        self.terminator = terminator;
    }

    pub fn predecessors(&self) -> &[BlockId] {
        &self.predecessors
    }

    pub fn predecessor(&self, index: usize) -> BlockId {
        self.predecessors[index]
    }

    pub fn predecessor_count(&self) -> usize {
        self.predecessors.len()
    }

    /// Appends `predecessor` unconditionally. Duplicates are permitted and
    /// meaningful: a conditional branch with both arms targeting the same
    /// block contributes two predecessor entries.
    pub fn append_predecessor(&mut self, predecessor: BlockId) {
        self.predecessors.push(predecessor);
    }

    /// Finds the first occurrence of `old` and overwrites it with `new`,
    /// intentionally ignoring any further duplicates.
    pub fn replace_predecessor(&mut self, old: BlockId, new: BlockId) {
        if let Some(slot) = self.predecessors.iter_mut().find(|p| **p == old) {
            *slot = new;
        }
    }

    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    pub fn stmt(&self, index: usize) -> Stmt {
        self.stmts[index]
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    pub fn append_stmt(&mut self, stmt: Stmt) {
        self.stmts.push(stmt);
    }

    pub fn insert_stmt(&mut self, index: usize, stmt: Stmt) {
        self.stmts.insert(index, stmt);
    }

    pub fn insert_stmts(&mut self, index: usize, stmts: &[Stmt]) {
        self.stmts.splice(index..index, stmts.iter().copied());
    }

    /// Removes every statement for which `predicate` returns `true`,
    /// preserving the relative order of the rest.
    pub fn remove_stmts_if(&mut self, mut predicate: impl FnMut(&Stmt) -> bool) {
        self.stmts.retain(|stmt| !predicate(stmt));
    }

    pub(crate) fn raw_stmts_mut(&mut self) -> &mut Vec<Stmt> {
        &mut self.stmts
    }
}
