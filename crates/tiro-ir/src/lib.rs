//! The SSA-based intermediate representation shared by every middle-end
//! pass: the entity store (`function`), its id-addressed pieces (`ids`,
//! `block`, `entities`, `value`, `stmt`, `terminator`), and the analyses
//! built over it (`rpo`, `dominators`, `critical_edges`, `liveness`) plus
//! the textual dump format used to inspect it (`dump`).

pub mod block;
pub mod critical_edges;
pub mod dominators;
pub mod dump;
pub mod entities;
pub mod function;
pub mod ids;
pub mod liveness;
pub mod rpo;
pub mod stmt;
pub mod terminator;
pub mod value;

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
mod property_tests;

pub use block::Block;
pub use critical_edges::split_critical_edges;
pub use dominators::DominatorTree;
pub use dump::{dump, dump_function, Dump};
pub use entities::{Local, LocalList, Param, Phi, Record};
pub use function::{Function, FunctionType};
pub use ids::{BlockId, LocalId, LocalListId, ModuleMemberId, ParamId, PhiId, RecordId};
pub use liveness::{LiveInterval, LiveRange, Liveness};
pub use rpo::ReversePostorderTraversal;
pub use stmt::Stmt;
pub use terminator::{BranchType, Terminator};
pub use value::{
    aggregate_type, Aggregate, AggregateKind, AggregateMember, BinaryOp, Constant, ContainerType,
    FloatConstant, LValue, RValue, UnaryOp,
};
