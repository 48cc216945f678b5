//! Block-local statements.

use crate::value::LValue;
use crate::ids::LocalId;

/// A single statement within a block's statement list.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Stmt {
    /// A non-SSA store through an lvalue.
    Assign { target: LValue, value: LocalId },
    /// An SSA definition. The defining rvalue is read from `local.value()`,
    /// not carried redundantly on the statement.
    Define { local: LocalId },
}

impl Stmt {
    /// The local this statement defines, if it is a `Define`.
    pub fn defined_local(&self) -> Option<LocalId> {
        match self {
            Stmt::Define { local } => Some(*local),
            Stmt::Assign { .. } => None,
        }
    }
}
