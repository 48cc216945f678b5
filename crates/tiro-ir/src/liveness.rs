//! SSA liveness: per-value live ranges (a definition interval plus per-block
//! live-in intervals) computed with a single backward scan and a worklist
//! for cross-block propagation.

use log::trace;
use tiro_util::index_vec::{Idx, IndexVec};

use crate::function::Function;
use crate::ids::{BlockId, LocalId};
use crate::stmt::Stmt;
use crate::terminator::Terminator;
use crate::value::{Aggregate, LValue, RValue};

/// A single interval where a value is live within one block.
///
/// For the definition interval, `start` is the statement index of the
/// defining `Define`; for a live-in interval, `start` is always 0 (the
/// value is already alive on block entry). `end` is the index of the last
/// statement in `block` that uses the value, or `block.stmt_count()` if the
/// last use is the terminator (or the value is merely live-through).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LiveInterval {
    pub block: BlockId,
    pub start: u32,
    pub end: u32,
}

/// The live range of a single SSA value: one definition interval plus a
/// sorted-by-block sequence of live-in intervals.
#[derive(Clone, Debug)]
pub struct LiveRange {
    def: LiveInterval,
    live_in: Vec<(BlockId, u32)>,
}

impl LiveRange {
    fn new(def: LiveInterval) -> Self {
        LiveRange {
            def,
            live_in: Vec::new(),
        }
    }

    /// The definition interval: the value's defining block, statement index
    /// and last use within that same block.
    pub fn definition(&self) -> LiveInterval {
        self.def
    }

    /// True if the value has no uses at all (its definition interval has
    /// zero length).
    pub fn dead(&self) -> bool {
        self.def.start == self.def.end
    }

    /// Every block this value is live-in to, as `LiveInterval`s with
    /// `start == 0`.
    pub fn live_in_intervals(&self) -> impl Iterator<Item = LiveInterval> + '_ {
        self.live_in.iter().map(|&(block, end)| LiveInterval {
            block,
            start: 0,
            end,
        })
    }

    /// True if this value is live on entry to `block`.
    pub fn live_in(&self, block: BlockId) -> bool {
        self.live_in.iter().any(|&(b, _)| b == block)
    }

    /// True if `stmt` is the last use of this value within `block`
    /// (definition block or live-in block alike).
    ///
    /// # Panics
    ///
    /// Debug-asserts that the value is actually live in `block` — querying
    /// last-use for a block the value never reaches is a caller bug.
    pub fn last_use(&self, block: BlockId, stmt: u32) -> bool {
        if block == self.def.block {
            stmt == self.def.end
        } else {
            let end = self
                .live_in
                .iter()
                .find(|&&(b, _)| b == block)
                .map(|&(_, end)| end);
            debug_assert!(end.is_some(), "last_use: value is not live in block");
            end == Some(stmt)
        }
    }

    /// Extends the interval for `block` so it reaches `stmt`. If `block` is
    /// the defining block, extends the definition interval's end in place.
    /// Otherwise ensures a live-in interval exists (creating one starting at
    /// 0 on first use) and extends its end.
    ///
    /// Returns `true` iff a new live-in interval was created, i.e. this is
    /// the first time the value is recognized as live-in to `block`.
    fn extend(&mut self, block: BlockId, stmt: u32) -> bool {
        if block == self.def.block {
            if stmt > self.def.end {
                self.def.end = stmt;
            }
            false
        } else if let Some(entry) = self.live_in.iter_mut().find(|(b, _)| *b == block) {
            if stmt > entry.1 {
                entry.1 = stmt;
            }
            false
        } else {
            self.live_in.push((block, stmt));
            true
        }
    }
}

/// Liveness information for every SSA value in a function.
pub struct Liveness {
    ranges: IndexVec<LocalId, Option<LiveRange>>,
    live_sets: IndexVec<BlockId, Vec<LocalId>>,
}

impl Liveness {
    /// Runs the backward-scan liveness computation over `func`.
    pub fn compute(func: &Function) -> Self {
        let mut ranges: IndexVec<LocalId, Option<LiveRange>> = IndexVec::new();
        ranges.resize_with(LocalId::from_usize(func.local_count()), || None);

        // Step 1: pre-seed every local with a zero-length definition
        // interval at its defining site.
        for (block_id, block) in func.blocks() {
            for (stmt_idx, stmt) in block.stmts().iter().enumerate() {
                if let Stmt::Define { local } = stmt {
                    let def = LiveInterval {
                        block: block_id,
                        start: stmt_idx as u32,
                        end: stmt_idx as u32,
                    };
                    ranges[*local] = Some(LiveRange::new(def));
                }
            }
        }

        let mut liveness = Liveness {
            ranges,
            live_sets: IndexVec::new(),
        };
        let mut work: Vec<BlockId> = Vec::new();

        // Step 2: single backward scan per block — terminator first (it
        // executes last), then statements right-to-left.
        for (block_id, block) in func.blocks() {
            let terminator_pos = block.stmt_count() as u32;
            visit_terminator_operands(block.terminator(), |raw| {
                let value = liveness.normalize(func, raw);
                liveness.extend_and_propagate(func, value, block_id, terminator_pos, &mut work);
            });

            for (stmt_idx, stmt) in block.stmts().iter().enumerate().rev() {
                visit_stmt_operands(func, stmt, |raw| {
                    let value = liveness.normalize(func, raw);
                    liveness.extend_and_propagate(
                        func,
                        value,
                        block_id,
                        stmt_idx as u32,
                        &mut work,
                    );
                });
            }
        }

        // Step 3: phi operands are uses at the end of the corresponding
        // predecessor, not at the phi block itself.
        for (block_id, block) in func.blocks() {
            let phi_prefix = func.phi_count(block_id);
            for stmt in &block.stmts()[..phi_prefix] {
                let Stmt::Define { local } = stmt else {
                    continue;
                };
                let RValue::Phi(phi_id) = func.local(*local).value() else {
                    continue;
                };
                let phi = func.phi(phi_id);
                for (k, &operand) in phi.operands().iter().enumerate() {
                    let pred = block.predecessor(k);
                    let value = liveness.normalize(func, operand);
                    let pred_end = func.block(pred).stmt_count() as u32;
                    liveness.extend_and_propagate(func, value, pred, pred_end, &mut work);
                }
            }
        }

        liveness.materialize_live_sets(func);
        trace!(
            "liveness: computed ranges for {} locals over {} blocks",
            func.local_count(),
            func.block_count()
        );
        liveness
    }

    /// Aggregate member references alias the underlying aggregate for
    /// liveness purposes — a `GetAggregateMember` local never materializes
    /// as a runtime value on its own.
    fn normalize(&self, func: &Function, value: LocalId) -> LocalId {
        match func.local(value).value() {
            RValue::GetAggregateMember { aggregate, .. } => aggregate,
            _ => value,
        }
    }

    fn extend_and_propagate(
        &mut self,
        func: &Function,
        value: LocalId,
        block: BlockId,
        stmt: u32,
        work: &mut Vec<BlockId>,
    ) {
        let Some(range) = self.ranges[value].as_mut() else {
            return;
        };
        if range.extend(block, stmt) {
            work.push(block);
        }
        self.propagate(func, value, work);
    }

    /// Drains `work`, extending the live range of `value` through every
    /// predecessor of each worklist entry until no further block gains a
    /// new live-in interval.
    fn propagate(&mut self, func: &Function, value: LocalId, work: &mut Vec<BlockId>) {
        while let Some(block) = work.pop() {
            for &pred in func.block(block).predecessors() {
                let Some(range) = self.ranges[value].as_mut() else {
                    continue;
                };
                let pred_end = func.block(pred).stmt_count() as u32;
                if range.extend(pred, pred_end) {
                    work.push(pred);
                }
            }
        }
    }

    fn materialize_live_sets(&mut self, func: &Function) {
        self.live_sets
            .resize_with(BlockId::from_usize(func.block_count()), Vec::new);
        for (local, range) in self.ranges.iter_enumerated() {
            let Some(range) = range else { continue };
            for interval in range.live_in_intervals() {
                self.live_sets[interval.block].push(local);
            }
        }
    }

    /// The live range of `local`, or `None` if `local` has no definition
    /// (out of range, or never defined — a closed `Function` never has
    /// this, but a partially-built one might).
    pub fn live_range(&self, local: LocalId) -> Option<&LiveRange> {
        self.ranges.get(local).and_then(|r| r.as_ref())
    }

    /// Every value live on entry to `block`, in ascending `LocalId` order.
    pub fn live_in_values(&self, block: BlockId) -> &[LocalId] {
        self.live_sets
            .get(block)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn visit_lvalue_operands(lvalue: &LValue, mut visit: impl FnMut(LocalId)) {
    match *lvalue {
        LValue::Param(_) | LValue::Module(_) => {}
        LValue::Closure { env, .. } => visit(env),
        LValue::Field { object, .. } | LValue::TupleField { object, .. } => visit(object),
        LValue::Index { object, index } => {
            visit(object);
            visit(index);
        }
    }
}

fn visit_rvalue_operands(func: &Function, rvalue: &RValue, mut visit: impl FnMut(LocalId)) {
    match *rvalue {
        RValue::UseLValue(ref lvalue) => visit_lvalue_operands(lvalue, visit),
        RValue::UseLocal(local) => visit(local),
        RValue::Phi(_) | RValue::Phi0 | RValue::Constant(_) | RValue::OuterEnvironment => {}
        RValue::BinaryOp(_, a, b) => {
            visit(a);
            visit(b);
        }
        RValue::UnaryOp(_, a) => visit(a),
        RValue::Call { func: callee, args } => {
            visit(callee);
            for &arg in func.local_list(args).as_slice() {
                visit(arg);
            }
        }
        RValue::Aggregate(Aggregate::Method { instance, .. }) => visit(instance),
        RValue::Aggregate(Aggregate::IteratorNext { iterator }) => visit(iterator),
        RValue::GetAggregateMember { aggregate, .. } => visit(aggregate),
        RValue::MethodCall { method, args } => {
            visit(method);
            for &arg in func.local_list(args).as_slice() {
                visit(arg);
            }
        }
        RValue::MakeEnvironment { parent, .. } => visit(parent),
        RValue::MakeClosure { env, func: closure_fn } => {
            visit(env);
            visit(closure_fn);
        }
        RValue::MakeIterator { container } => visit(container),
        RValue::Record(record_id) => {
            for &(_, value) in func.record(record_id).entries() {
                visit(value);
            }
        }
        RValue::Container(_, args) | RValue::Format(args) => {
            for &arg in func.local_list(args).as_slice() {
                visit(arg);
            }
        }
        RValue::Error => {}
    }
}

fn visit_stmt_operands(func: &Function, stmt: &Stmt, mut visit: impl FnMut(LocalId)) {
    match *stmt {
        Stmt::Assign { ref target, value } => {
            visit_lvalue_operands(target, &mut visit);
            visit(value);
        }
        Stmt::Define { local } => {
            let rvalue = func.local(local).value();
            visit_rvalue_operands(func, &rvalue, visit);
        }
    }
}

fn visit_terminator_operands(terminator: &Terminator, mut visit: impl FnMut(LocalId)) {
    match *terminator {
        Terminator::None | Terminator::Jump { .. } | Terminator::Exit => {}
        Terminator::Branch { value, .. } | Terminator::Return { value, .. } => visit(value),
        Terminator::AssertFail { expr, message, .. } => {
            visit(expr);
            visit(message);
        }
        Terminator::Never { .. } => {}
    }
}
