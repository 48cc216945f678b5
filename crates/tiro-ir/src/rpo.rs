//! Reverse-postorder traversal: the canonical order for forward data-flow
//! analyses, and the order the dominator tree is computed over.

use std::cell::OnceCell;

use log::trace;
use tiro_util::index_vec::Idx;

use crate::function::Function;
use crate::ids::BlockId;

/// A lazily-computed reverse-postorder listing of the blocks reachable from
/// `entry`.
///
/// The postorder vector materializes on the first call to `iter`, `len` or
/// `is_empty`, via an iterative depth-first search; every subsequent query
/// reads the cached vector. Unreachable blocks never appear. The entry block
/// is always first in the reverse-postorder sequence.
pub struct ReversePostorderTraversal<'a> {
    func: &'a Function,
    postorder: OnceCell<Vec<BlockId>>,
}

impl<'a> ReversePostorderTraversal<'a> {
    /// Borrows `func` without walking it; the postorder vector is not
    /// computed until something actually asks for it.
    pub fn new(func: &'a Function) -> Self {
        ReversePostorderTraversal {
            func,
            postorder: OnceCell::new(),
        }
    }

    fn postorder(&self) -> &[BlockId] {
        self.postorder.get_or_init(|| {
            let postorder = compute_postorder(self.func);
            trace!(
                "rpo: {} of {} blocks reachable from entry",
                postorder.len(),
                self.func.block_count()
            );
            postorder
        })
    }

    /// Iterates block ids in reverse-postorder.
    pub fn iter(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.postorder().iter().rev().copied()
    }

    /// The number of blocks reachable from entry.
    pub fn len(&self) -> usize {
        self.postorder().len()
    }

    pub fn is_empty(&self) -> bool {
        self.postorder().is_empty()
    }

    /// The underlying function, for callers that want both the traversal
    /// and direct block access.
    pub fn function(&self) -> &Function {
        self.func
    }
}

/// Iterative depth-first postorder: blocks are pushed to the result the
/// moment all their successors have been visited. A block already on the
/// current DFS stack is not revisited (back-edges are the only case where a
/// successor can already be "in progress").
fn compute_postorder(func: &Function) -> Vec<BlockId> {
    enum Frame {
        Enter(BlockId),
        Finish(BlockId),
    }

    let mut visited = vec![false; func.block_count()];
    let mut postorder = Vec::new();
    let mut stack = vec![Frame::Enter(func.entry())];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(id) => {
                if visited[id.index()] {
                    continue;
                }
                visited[id.index()] = true;
                stack.push(Frame::Finish(id));

                let mut successors = Vec::new();
                func.block(id).terminator().visit_targets(|target| {
                    successors.push(target);
                });
                for succ in successors.into_iter().rev() {
                    if !visited[succ.index()] {
                        stack.push(Frame::Enter(succ));
                    }
                }
            }
            Frame::Finish(id) => postorder.push(id),
        }
    }

    postorder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestFunction;

    #[test]
    fn minimal_function_rpo_is_entry_then_exit() {
        let mut tf = TestFunction::new();
        tf.set_jump(tf.entry(), tf.exit());

        let rpo = ReversePostorderTraversal::new(tf.function());
        let order: Vec<_> = rpo.iter().collect();
        assert_eq!(order, vec![tf.entry(), tf.exit()]);
    }

    #[test]
    fn tree_postorder_matches_worked_example() {
        // entry -> branch _ B G
        // B -> branch _ A D
        // D -> branch _ C E
        // G -> jump I
        // I -> jump H
        let mut tf = TestFunction::new();
        let a = tf.make_block(Some("A"));
        let b = tf.make_block(Some("B"));
        let c = tf.make_block(Some("C"));
        let d = tf.make_block(Some("D"));
        let e = tf.make_block(Some("E"));
        let g = tf.make_block(Some("G"));
        let h = tf.make_block(Some("H"));
        let i = tf.make_block(Some("I"));

        tf.set_branch(tf.entry(), b, g);
        tf.set_branch(b, a, d);
        tf.set_branch(d, c, e);
        tf.set_jump(g, i);
        tf.set_jump(i, h);
        // A, C, E, H are leaves of this tree and stay unterminated; RPO only
        // cares about reachability and successor order, not well-formedness.

        let rpo = ReversePostorderTraversal::new(tf.function());
        let order: Vec<_> = rpo.iter().collect();
        let expected_postorder = vec![a, c, e, d, b, h, i, g, tf.entry()];
        let expected_rpo: Vec<_> = expected_postorder.into_iter().rev().collect();
        assert_eq!(order, expected_rpo);
    }

    #[test]
    fn unreachable_blocks_are_excluded() {
        let mut tf = TestFunction::new();
        let unreachable = tf.make_block(Some("dead"));
        tf.set_jump(unreachable, tf.exit());
        tf.set_jump(tf.entry(), tf.exit());

        let rpo = ReversePostorderTraversal::new(tf.function());
        assert!(!rpo.iter().any(|b| b == unreachable));
    }
}
