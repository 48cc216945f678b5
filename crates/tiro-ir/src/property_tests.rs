//! Property-based checks over randomly generated small CFGs. The worked
//! examples in `rpo.rs`, `dominators.rs`, `critical_edges.rs` and friends
//! each fix one shape; these tests instead draw many shapes and check the
//! invariants that are supposed to hold regardless of which one comes up.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

use crate::critical_edges::split_critical_edges;
use crate::function::Function;
use crate::ids::BlockId;
use crate::rpo::ReversePostorderTraversal;
use crate::stmt::Stmt;
use crate::terminator::Terminator;
use crate::test_support::TestFunction;
use crate::value::{Constant, RValue};

#[derive(Clone, Debug)]
struct EdgeDecision {
    branch: bool,
    other: u8,
    tail_kind: u8,
}

impl Arbitrary for EdgeDecision {
    fn arbitrary(g: &mut Gen) -> Self {
        EdgeDecision {
            branch: bool::arbitrary(g),
            other: u8::arbitrary(g),
            tail_kind: u8::arbitrary(g),
        }
    }
}

/// A small CFG shape: a chain of `extra_blocks` interior blocks between
/// `entry` and `exit`. Block `i` always has an edge to block `i + 1`
/// (guaranteeing every block stays reachable) and, when `branch` is set, a
/// second edge to an arbitrary later block, so merge points and critical
/// edges occur without any generated shape being malformed.
#[derive(Clone, Debug)]
struct CfgShape {
    extra_blocks: u8,
    decisions: Vec<EdgeDecision>,
}

impl Arbitrary for CfgShape {
    fn arbitrary(g: &mut Gen) -> Self {
        let extra_blocks = u8::arbitrary(g) % 7;
        let decisions = (0..=extra_blocks).map(|_| EdgeDecision::arbitrary(g)).collect();
        CfgShape { extra_blocks, decisions }
    }
}

/// Builds the CFG `shape` describes. The last edge before `exit` is also
/// where `Return`/`AssertFail`/`Never` terminators get exercised, since that
/// is the only position in this chain where `target == exit` holds by
/// construction. Every interior block also gets an ordinary local definition
/// (aliasing a single entry-block constant), and every merge point gets a
/// phi with one operand per predecessor.
fn build(shape: &CfgShape) -> Function {
    let mut tf = TestFunction::new();
    let mut blocks = vec![tf.entry()];
    for _ in 0..shape.extra_blocks {
        blocks.push(tf.make_block(None));
    }
    blocks.push(tf.exit());

    let zero = tf.define_constant(tf.entry(), Constant::Integer(0));
    let tail = blocks.len() - 2;

    for (i, decision) in shape.decisions.iter().enumerate() {
        let next = blocks[i + 1];
        let other_range_len = blocks.len() - (i + 1);
        let other = blocks[i + 1 + (decision.other as usize % other_range_len)];

        if i == tail {
            match decision.tail_kind % 5 {
                0 => tf.set_jump(blocks[i], next),
                1 => tf.set_branch(blocks[i], next, other),
                2 => {
                    let value = tf.define(blocks[i], RValue::UseLocal(zero));
                    tf.function_mut()
                        .block_mut(blocks[i])
                        .set_terminator(Terminator::Return { value, target: next });
                }
                3 => {
                    let expr = tf.define(blocks[i], RValue::UseLocal(zero));
                    let message = tf.define(blocks[i], RValue::UseLocal(zero));
                    tf.function_mut().block_mut(blocks[i]).set_terminator(
                        Terminator::AssertFail { expr, message, target: next },
                    );
                }
                _ => tf
                    .function_mut()
                    .block_mut(blocks[i])
                    .set_terminator(Terminator::Never { target: next }),
            }
        } else if decision.branch {
            tf.set_branch(blocks[i], next, other);
        } else {
            tf.set_jump(blocks[i], next);
        }
    }

    for &block in &blocks[1..blocks.len() - 1] {
        let pred_count = tf.function().block(block).predecessor_count();
        if pred_count > 1 {
            tf.define_phi(block, vec![zero; pred_count]);
        }
        tf.define(block, RValue::UseLocal(zero));
    }

    tf.into_function()
}

#[quickcheck]
fn every_local_has_exactly_one_defining_statement(shape: CfgShape) -> bool {
    let func = build(&shape);
    func.locals().all(|(local_id, _)| {
        let count = func
            .blocks()
            .flat_map(|(_, block)| block.stmts().iter().copied())
            .filter(|stmt| stmt.defined_local() == Some(local_id))
            .count();
        count == 1
    })
}

#[quickcheck]
fn phi_operand_count_matches_predecessor_count(shape: CfgShape) -> bool {
    let func = build(&shape);
    func.blocks().all(|(block_id, block)| {
        let prefix = func.phi_count(block_id);
        block.stmts()[..prefix].iter().all(|stmt| {
            let Some(local) = stmt.defined_local() else { return true };
            let RValue::Phi(phi_id) = func.local(local).value() else { return true };
            func.phi(phi_id).operand_count() == block.predecessor_count()
        })
    })
}

#[quickcheck]
fn reachable_blocks_are_always_terminated(shape: CfgShape) -> bool {
    let func = build(&shape);
    let rpo = ReversePostorderTraversal::new(&func);
    rpo.iter().all(|b: BlockId| *func.block(b).terminator() != Terminator::None)
}

#[quickcheck]
fn exit_bound_terminators_target_exit(shape: CfgShape) -> bool {
    let func = build(&shape);
    let exit = func.exit();
    func.blocks().all(|(_, block)| match *block.terminator() {
        Terminator::Return { target, .. }
        | Terminator::AssertFail { target, .. }
        | Terminator::Never { target } => target == exit,
        _ => true,
    })
}

#[quickcheck]
fn split_critical_edges_is_idempotent(shape: CfgShape) -> bool {
    let mut func = build(&shape);
    split_critical_edges(&mut func);
    !split_critical_edges(&mut func)
}

#[quickcheck]
fn split_critical_edges_leaves_no_critical_edge_behind(shape: CfgShape) -> bool {
    let mut func = build(&shape);
    split_critical_edges(&mut func);
    func.blocks().all(|(_, block)| match *block.terminator() {
        Terminator::Branch { target, fallthrough, .. } => {
            func.block(target).predecessor_count() <= 1
                && func.block(fallthrough).predecessor_count() <= 1
        }
        _ => true,
    })
}
