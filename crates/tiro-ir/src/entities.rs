//! The remaining arena-resident entities: parameters, locals, phi operand
//! lists, local lists and records. Each is a small value type stored by id in
//! one of `Function`'s six arenas.

use tiro_util::Symbol;

use crate::ids::LocalId;
use crate::value::RValue;

/// A function parameter. Parameters appear in source order; the i-th
/// parameter is referenced by its `ParamId`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Param {
    name: Symbol,
}

impl Param {
    pub fn new(name: Symbol) -> Self {
        Param { name }
    }

    pub fn name(&self) -> Symbol {
        self.name
    }
}

/// A single SSA value: an optional name (set only for user-declared
/// variables; compiler temporaries are nameless) and the `RValue` that
/// defines it.
///
/// Invariant: exactly one `Stmt::Define` across the whole function
/// references a given `LocalId`, and that local's `value` is the defining
/// rvalue.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Local {
    name: Option<Symbol>,
    value: RValue,
}

impl Local {
    pub fn new(value: RValue) -> Self {
        Local { name: None, value }
    }

    pub fn with_name(name: Symbol, value: RValue) -> Self {
        Local {
            name: Some(name),
            value,
        }
    }

    pub fn name(&self) -> Option<Symbol> {
        self.name
    }

    pub fn set_name(&mut self, name: Option<Symbol>) {
        self.name = name;
    }

    pub fn value(&self) -> RValue {
        self.value
    }

    pub fn set_value(&mut self, value: RValue) {
        self.value = value;
    }
}

/// An ordered sequence of phi operands. Its length must equal the
/// predecessor count of the block that defines the phi; the k-th operand is
/// the value flowing in from the k-th predecessor.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Phi {
    operands: Vec<LocalId>,
}

impl Phi {
    pub fn new() -> Self {
        Phi::default()
    }

    pub fn with_operands(operands: Vec<LocalId>) -> Self {
        Phi { operands }
    }

    pub fn operands(&self) -> &[LocalId] {
        &self.operands
    }

    pub fn operand(&self, index: usize) -> LocalId {
        self.operands[index]
    }

    pub fn set_operand(&mut self, index: usize, local: LocalId) {
        self.operands[index] = local;
    }

    pub fn operand_count(&self) -> usize {
        self.operands.len()
    }

    pub fn append_operand(&mut self, operand: LocalId) {
        self.operands.push(operand);
    }
}

/// An ordered sequence of locals, used for call arguments, container
/// constructors and string-formatting arguments. Stored by id so multiple
/// rvalues may share or replace their operand list.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct LocalList {
    items: Vec<LocalId>,
}

impl LocalList {
    pub fn new() -> Self {
        LocalList::default()
    }

    pub fn from_vec(items: Vec<LocalId>) -> Self {
        LocalList { items }
    }

    pub fn as_slice(&self) -> &[LocalId] {
        &self.items
    }

    pub fn get(&self, index: usize) -> LocalId {
        self.items[index]
    }

    pub fn set(&mut self, index: usize, value: LocalId) {
        self.items[index] = value;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn append(&mut self, value: LocalId) {
        self.items.push(value);
    }

    /// Removes `count` entries starting at `index`.
    pub fn remove(&mut self, index: usize, count: usize) {
        self.items.drain(index..index + count);
    }
}

/// An ordered mapping from field name to value, with unique keys, used to
/// represent compile-time-known record aggregates.
///
/// Stored as a linear vector rather than a hash map: semantic analysis
/// guarantees unique keys, and entry counts are small, so a vector scan is
/// both simpler and faster than hashing.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Record {
    entries: Vec<(Symbol, LocalId)>,
}

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    pub fn entries(&self) -> &[(Symbol, LocalId)] {
        &self.entries
    }

    pub fn get(&self, name: Symbol) -> Option<LocalId> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    /// Inserts `name -> value`, overwriting any existing entry for `name`.
    pub fn insert(&mut self, name: Symbol, value: LocalId) {
        if let Some(slot) = self.entries.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
