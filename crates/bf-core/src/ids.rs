use core::fmt;
use core::num::NonZeroU32;

/// Handle of a registered unknown, field or scalar.
///
/// Stored as `position + 1` so `Option<VarId>` costs nothing extra.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VarId(NonZeroU32);

impl VarId {
    /// Handle for the unknown registered at `position`.
    pub fn from_index(position: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(position))
    }

    /// Registration position of this unknown.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }
}

impl fmt::Debug for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "var#{}", self.index())
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "var#{}", self.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_survive_the_offset() {
        for position in [0_u32, 1, 7, 4096] {
            assert_eq!(VarId::from_index(position).index(), position);
        }
        assert_eq!(format!("{}", VarId::from_index(3)), "var#3");
    }

    #[test]
    fn optional_handle_has_no_overhead() {
        assert_eq!(
            core::mem::size_of::<VarId>(),
            core::mem::size_of::<Option<VarId>>()
        );
    }
}
