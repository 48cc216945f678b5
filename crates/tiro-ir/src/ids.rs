//! Typed identifiers for every entity kind a [`crate::Function`] arena holds.
//!
//! Each id is a newtype around `u32` implementing [`tiro_util::index_vec::Idx`],
//! so that `IndexVec<BlockId, Block>` and `IndexVec<LocalId, Local>` cannot be
//! confused for one another at the type level. `MAX` is the conventional
//! invalid sentinel; no arena ever actually allocates that many entries.

use tiro_util::index_vec::Idx;

macro_rules! define_ir_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            /// The invalid sentinel value for this id type.
            pub const INVALID: $name = $name(u32::MAX);

            /// True if this id is the invalid sentinel.
            #[inline]
            pub fn is_invalid(self) -> bool {
                self == Self::INVALID
            }
        }

        impl Idx for $name {
            #[inline]
            fn from_usize(idx: usize) -> Self {
                assert!(idx < u32::MAX as usize, "{} index {} overflows u32", stringify!($name), idx);
                $name(idx as u32)
            }

            #[inline]
            fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                if self.is_invalid() {
                    write!(f, "{}(invalid)", stringify!($name))
                } else {
                    write!(f, "{}({})", stringify!($name), self.0)
                }
            }
        }
    };
}

define_ir_id!(
    /// Identifies a [`crate::Block`] in a function's block arena.
    BlockId
);
define_ir_id!(
    /// Identifies a [`crate::Param`] in a function's parameter arena.
    ParamId
);
define_ir_id!(
    /// Identifies a [`crate::Local`] in a function's local arena. Local ids
    /// double as SSA value identity: exactly one `Stmt::Define` references a
    /// given `LocalId` across the whole function.
    LocalId
);
define_ir_id!(
    /// Identifies a [`crate::Phi`] in a function's phi arena.
    PhiId
);
define_ir_id!(
    /// Identifies a [`crate::LocalList`] in a function's local-list arena.
    LocalListId
);
define_ir_id!(
    /// Identifies a [`crate::Record`] in a function's record arena.
    RecordId
);
define_ir_id!(
    /// Identifies a module-level variable. The module itself is out of scope
    /// here; this id is carried opaquely by `LValue::Module`.
    ModuleMemberId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_id_types_do_not_compare() {
        let b = BlockId::from_usize(0);
        let l = LocalId::from_usize(0);
        assert_eq!(b.index(), l.index());
        // The point of the newtype is that this would not even compile:
        // assert_eq!(b, l);
    }

    #[test]
    fn invalid_sentinel_is_max() {
        assert!(BlockId::INVALID.is_invalid());
        assert!(!BlockId::from_usize(0).is_invalid());
    }
}
