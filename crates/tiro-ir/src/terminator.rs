//! The outgoing control flow of a block.

use crate::ids::{BlockId, LocalId};

/// The condition tested by a `Terminator::Branch`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BranchType {
    IfTrue,
    IfFalse,
    IfNull,
    IfNotNull,
}

/// A block's single outgoing control-flow instruction.
///
/// Every reachable block must be terminated with something other than
/// `None` before analyses run. `Return`, `AssertFail` and `Never` all carry
/// a `target` that must equal `Function::exit`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Terminator {
    /// Initial value; must be replaced before the block is sealed.
    None,
    Jump { target: BlockId },
    Branch {
        kind: BranchType,
        value: LocalId,
        target: BlockId,
        fallthrough: BlockId,
    },
    /// `target` must be `Function::exit`.
    Return { value: LocalId, target: BlockId },
    /// Only ever the terminator of the exit block.
    Exit,
    /// `target` must be `Function::exit`.
    AssertFail {
        expr: LocalId,
        message: LocalId,
        target: BlockId,
    },
    /// A diverging statement (e.g. a panic). `target` must be
    /// `Function::exit`.
    Never { target: BlockId },
}

impl Terminator {
    /// Invokes `callback` once per outgoing control-flow target, in a fixed
    /// order (`target` before `fallthrough` for `Branch`).
    pub fn visit_targets(&self, mut callback: impl FnMut(BlockId)) {
        match *self {
            Terminator::None | Terminator::Exit => {}
            Terminator::Jump { target } => callback(target),
            Terminator::Branch {
                target, fallthrough, ..
            } => {
                callback(target);
                callback(fallthrough);
            }
            Terminator::Return { target, .. }
            | Terminator::AssertFail { target, .. }
            | Terminator::Never { target } => callback(target),
        }
    }

    /// The number of outgoing control-flow targets (0, 1 or 2).
    pub fn target_count(&self) -> usize {
        let mut count = 0;
        self.visit_targets(|_| count += 1);
        count
    }

    /// Overwrites every target equal to `old` with `new`. Used by
    /// critical-edge splitting to redirect a single outgoing edge.
    pub fn replace_target(&mut self, old: BlockId, new: BlockId) {
        match self {
            Terminator::Jump { target } if *target == old => *target = new,
            Terminator::Branch {
                target, fallthrough, ..
            } => {
                if *target == old {
                    *target = new;
                }
                if *fallthrough == old {
                    *fallthrough = new;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiro_util::index_vec::Idx;

    #[test]
    fn jump_has_one_target() {
        let t = Terminator::Jump {
            target: BlockId::from_usize(1),
        };
        assert_eq!(t.target_count(), 1);
    }

    #[test]
    fn branch_has_two_targets_even_when_equal() {
        let b = BlockId::from_usize(1);
        let t = Terminator::Branch {
            kind: BranchType::IfTrue,
            value: LocalId::from_usize(0),
            target: b,
            fallthrough: b,
        };
        assert_eq!(t.target_count(), 2);
    }

    #[test]
    fn exit_has_no_targets() {
        assert_eq!(Terminator::Exit.target_count(), 0);
    }

    #[test]
    fn replace_target_rewrites_both_branch_arms_independently() {
        let a = BlockId::from_usize(1);
        let c = BlockId::from_usize(2);
        let mut t = Terminator::Branch {
            kind: BranchType::IfTrue,
            value: LocalId::from_usize(0),
            target: a,
            fallthrough: a,
        };
        t.replace_target(a, c);
        match t {
            Terminator::Branch {
                target, fallthrough, ..
            } => {
                assert_eq!(target, c);
                assert_eq!(fallthrough, c);
            }
            _ => unreachable!(),
        }
    }
}
