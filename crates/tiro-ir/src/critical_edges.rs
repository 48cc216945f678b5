//! Critical-edge splitting: introduces an empty intermediate block on every
//! edge `u -> v` where `u` has multiple successors and `v` has multiple
//! predecessors, so that later SSA transforms have an unambiguous place to
//! insert edge-specific code.

use log::debug;
use tiro_util::Symbol;

use crate::block::Block;
use crate::function::Function;
use crate::ids::BlockId;
use crate::terminator::Terminator;

/// Which arm of a `Branch` terminator a split targets. `Branch` is the only
/// terminator with two outgoing edges, so this is the only case that needs
/// disambiguation when both arms point at the same critical target.
enum EdgeSlot {
    Target,
    Fallthrough,
}

/// Splits every critical edge in `func`. Returns `true` if at least one edge
/// was split; a second call on the same function always returns `false`,
/// since a split never introduces a new critical edge (the inserted block
/// has exactly one predecessor and one successor).
pub fn split_critical_edges(func: &mut Function) -> bool {
    let mut changed = false;
    let mut split_count = 0usize;

    let block_ids: Vec<BlockId> = func.block_ids().collect();
    for u in block_ids {
        let (target, fallthrough) = match *func.block(u).terminator() {
            Terminator::Branch {
                target, fallthrough, ..
            } => (target, fallthrough),
            _ => continue,
        };

        if func.block(target).predecessor_count() >= 2 {
            split_edge(func, u, target, EdgeSlot::Target);
            changed = true;
            split_count += 1;
        }
        if func.block(fallthrough).predecessor_count() >= 2 {
            split_edge(func, u, fallthrough, EdgeSlot::Fallthrough);
            changed = true;
            split_count += 1;
        }
    }

    debug!("critical-edges: split {split_count} edge(s)");
    changed
}

/// Splits the single edge `u -> v` through slot `slot`, assuming it has
/// already been confirmed critical. Allocates a fresh block `w` with a
/// single `Jump(v)` terminator and predecessor `[u]`, redirects the named
/// arm of `u`'s terminator to `w`, and replaces one occurrence of `u` in
/// `v`'s predecessor list with `w`.
fn split_edge(func: &mut Function, u: BlockId, v: BlockId, slot: EdgeSlot) {
    let label = Symbol::intern(&format!(
        "{}_{}",
        func.block(u).label().map(|s| s.to_string()).unwrap_or_default(),
        func.block(v).label().map(|s| s.to_string()).unwrap_or_default(),
    ));

    let mut w_block = Block::new(Some(label));
    w_block.set_terminator(Terminator::Jump { target: v });
    w_block.append_predecessor(u);
    let w = func.push_block(w_block);

    let mut terminator = *func.block(u).terminator();
    if let Terminator::Branch {
        target, fallthrough, ..
    } = &mut terminator
    {
        match slot {
            EdgeSlot::Target => *target = w,
            EdgeSlot::Fallthrough => *fallthrough = w,
        }
    }
    func.block_mut(u).set_terminator(terminator);

    func.block_mut(v).replace_predecessor(u, w);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestFunction;

    #[test]
    fn back_edge_diamond_splits_both_critical_edges() {
        // entry -> branch _ A B
        // A -> jump exit
        // B -> branch _ exit A   (A is fallthrough)
        let mut tf = TestFunction::new();
        let a = tf.make_block(Some("A"));
        let b = tf.make_block(Some("B"));

        tf.set_branch(tf.entry(), a, b);
        tf.set_jump(a, tf.exit());
        tf.set_branch(b, tf.exit(), a);

        assert!(tf.has_predecessor(a, tf.entry()));
        assert!(tf.has_predecessor(a, b));

        let changed = split_critical_edges(tf.function_mut());
        assert!(changed);

        assert!(!tf.has_predecessor(a, tf.entry()));
        assert!(!tf.has_predecessor(a, b));

        let new_entry_a = match tf.function().block(tf.entry()).terminator() {
            Terminator::Branch { target, .. } => *target,
            _ => unreachable!(),
        };
        let new_b_a = match tf.function().block(b).terminator() {
            Terminator::Branch { fallthrough, .. } => *fallthrough,
            _ => unreachable!(),
        };

        assert!(tf.has_predecessor(new_entry_a, tf.entry()));
        assert!(tf.has_predecessor(a, new_entry_a));
        assert!(tf.has_predecessor(new_b_a, b));
        assert!(tf.has_predecessor(a, new_b_a));

        let mut all = vec![tf.entry(), a, b, tf.exit(), new_entry_a, new_b_a];
        all.sort_by_key(|id| format!("{id:?}"));
        all.dedup();
        assert_eq!(all.len(), 6);

        assert!(!split_critical_edges(tf.function_mut()));
    }

    #[test]
    fn shared_branch_target_splits_into_two_distinct_blocks() {
        // entry -> branch _ A A, where A also has another predecessor.
        let mut tf = TestFunction::new();
        let a = tf.make_block(Some("A"));
        let other = tf.make_block(Some("other"));

        tf.set_branch(tf.entry(), a, a);
        tf.set_jump(other, a);
        tf.set_jump(a, tf.exit());

        assert!(split_critical_edges(tf.function_mut()));
        match tf.function().block(tf.entry()).terminator() {
            Terminator::Branch {
                target, fallthrough, ..
            } => assert_ne!(target, fallthrough),
            _ => unreachable!(),
        }
    }
}
