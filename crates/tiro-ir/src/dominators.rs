//! The dominator tree, computed with the iterative Cooper–Harvey–Kennedy
//! algorithm over a reverse-postorder numbering.

use log::debug;
use tiro_util::index_vec::{Idx, IndexVec};

use crate::function::Function;
use crate::ids::BlockId;
use crate::rpo::ReversePostorderTraversal;

const UNDEFINED: usize = usize::MAX;

/// The dominator tree of a function's reachable blocks.
///
/// Unreachable blocks have no immediate dominator; queries involving them
/// report "does not dominate / is not dominated" rather than failing.
pub struct DominatorTree {
    /// `rpo_number[block]` — position of `block` in reverse postorder, or
    /// `UNDEFINED` if unreachable.
    rpo_number: IndexVec<BlockId, usize>,
    /// `rpo_number` inverted: the block at each RPO position.
    rpo_order: Vec<BlockId>,
    /// `idom[block]`, indexed by RPO position; `UNDEFINED` if unreachable.
    idom: Vec<usize>,
}

impl DominatorTree {
    /// Runs the fixpoint computation over `func` and returns the resulting
    /// tree.
    pub fn compute(func: &Function) -> Self {
        let rpo = ReversePostorderTraversal::new(func);
        let rpo_order: Vec<BlockId> = rpo.iter().collect();

        let mut rpo_number = IndexVec::with_capacity(func.block_count());
        rpo_number.resize(BlockId::from_usize(func.block_count()), UNDEFINED);
        for (position, &block) in rpo_order.iter().enumerate() {
            rpo_number[block] = position;
        }

        let entry_pos = 0usize;
        let mut idom = vec![UNDEFINED; rpo_order.len()];
        idom[entry_pos] = entry_pos;

        let mut changed = true;
        let mut iterations = 0usize;
        while changed {
            changed = false;
            iterations += 1;
            for position in 1..rpo_order.len() {
                let block = rpo_order[position];
                let mut new_idom = UNDEFINED;

                for &pred in func.block(block).predecessors() {
                    let pred_pos = match rpo_number.get(pred) {
                        Some(&p) if p != UNDEFINED => p,
                        _ => continue,
                    };
                    if idom[pred_pos] == UNDEFINED {
                        continue;
                    }
                    new_idom = if new_idom == UNDEFINED {
                        pred_pos
                    } else {
                        intersect(pred_pos, new_idom, &idom)
                    };
                }

                if new_idom != UNDEFINED && idom[position] != new_idom {
                    idom[position] = new_idom;
                    changed = true;
                }
            }
        }

        debug!(
            "dominators: converged after {} iteration(s) over {} reachable blocks",
            iterations,
            rpo_order.len()
        );

        DominatorTree {
            rpo_number,
            rpo_order,
            idom,
        }
    }

    /// The immediate dominator of `block`. Returns `block` itself if it is
    /// the entry block, and `None` if `block` is unreachable.
    pub fn immediate_dominator(&self, block: BlockId) -> Option<BlockId> {
        let pos = self.position(block)?;
        let idom_pos = self.idom[pos];
        if idom_pos == UNDEFINED {
            None
        } else {
            Some(self.rpo_order[idom_pos])
        }
    }

    /// Every block whose immediate dominator is exactly `block`.
    pub fn immediately_dominated(&self, block: BlockId) -> Vec<BlockId> {
        let Some(pos) = self.position(block) else {
            return Vec::new();
        };
        self.rpo_order
            .iter()
            .enumerate()
            .filter(|&(child_pos, _)| child_pos != pos && self.idom[child_pos] == pos)
            .map(|(_, &child)| child)
            .collect()
    }

    /// True iff `a` dominates `b`: every path from entry to `b` passes
    /// through `a`. A block dominates itself.
    pub fn dominates(&self, a: BlockId, b: BlockId) -> bool {
        if a == b {
            return true;
        }
        let (Some(mut pos), Some(pos_a)) = (self.position(b), self.position(a)) else {
            return false;
        };

        // Walk up the idom chain from `b` towards entry; entry is its own
        // idom, so this always terminates.
        while self.idom[pos] != pos {
            pos = self.idom[pos];
            if pos == pos_a {
                return true;
            }
        }
        false
    }

    /// True iff `a` dominates `b` and `a != b`.
    pub fn dominates_strict(&self, a: BlockId, b: BlockId) -> bool {
        a != b && self.dominates(a, b)
    }

    fn position(&self, block: BlockId) -> Option<usize> {
        match self.rpo_number.get(block) {
            Some(&p) if p != UNDEFINED => Some(p),
            _ => None,
        }
    }
}

/// Walks two RPO positions up the partially-built idom chain until they
/// meet: the finger with the larger RPO number always moves to its idom,
/// since a higher RPO number can never dominate a lower one.
fn intersect(mut a: usize, mut b: usize, idom: &[usize]) -> usize {
    while a != b {
        while a > b {
            a = idom[a];
        }
        while b > a {
            b = idom[b];
        }
    }
    a
}
