use std::fmt;

/// Index of a vertex slot. Stable for the lifetime of one simplification run.
#[derive(Default, Hash, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct VertID(pub u32);

impl VertID {
    pub fn id(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for VertID {
    fn from(value: u32) -> Self {
        VertID(value)
    }
}
impl From<VertID> for u32 {
    fn from(value: VertID) -> Self {
        value.0
    }
}
impl From<VertID> for usize {
    fn from(value: VertID) -> Self {
        value.0 as _
    }
}

impl fmt::Display for VertID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}
