use std::fmt;

use serde::{Deserialize, Serialize};

/// Discrete class identifier. Negative values are reserved for sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(i32);

impl ClassId {
    /// Sentinel for missing or non-numeric input.
    pub const NO_DATA: ClassId = ClassId(-1);

    /// Class for `index`; indices beyond `i32::MAX` have no class and map to `NO_DATA`.
    #[inline] pub fn new(index: usize) -> Self { i32::try_from(index).map_or(ClassId::NO_DATA, ClassId) }

    #[inline] pub fn is_no_data(self) -> bool { self.0 < 0 }

    /// Class index, or `None` for the no-data sentinel.
    #[inline]
    pub fn index(self) -> Option<usize> {
        if self.0 < 0 { None } else { Some(self.0 as usize) }
    }

    #[inline] pub fn raw(self) -> i32 { self.0 }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index() {
            Some(i) => write!(f, "{i}"),
            None => f.write_str("no data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ClassId;

    #[test]
    fn oversized_index_is_no_data() {
        assert_eq!(ClassId::new(i32::MAX as usize).index(), Some(i32::MAX as usize));
        assert_eq!(ClassId::new(i32::MAX as usize + 1), ClassId::NO_DATA);
    }

    #[test]
    fn sentinel_has_no_index() {
        assert!(ClassId::NO_DATA.is_no_data());
        assert_eq!(ClassId::NO_DATA.index(), None);
        assert_eq!(ClassId::NO_DATA.raw(), -1);
        assert_eq!(ClassId::new(4).index(), Some(4));
    }

    #[test]
    fn serializes_as_plain_integer() {
        assert_eq!(serde_json::to_string(&ClassId::NO_DATA).unwrap(), "-1");
        assert_eq!(serde_json::to_string(&ClassId::new(6)).unwrap(), "6");
    }
}
