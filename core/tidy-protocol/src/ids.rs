use core::fmt;

use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// 1-based paragraph number, scoped to a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[archive(check_bytes)]
#[repr(transparent)] // Same layout as u32
pub struct ParagraphId(pub u32);

impl ParagraphId {
    pub const FIRST: ParagraphId = ParagraphId(1);

    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl From<u32> for ParagraphId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<ParagraphId> for u32 {
    fn from(id: ParagraphId) -> u32 {
        id.0
    }
}

impl fmt::Display for ParagraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
