use foundation::handles::Handle;

/// Generational element id. A removed id never resolves to a later element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub Handle);

impl ElementId {
    pub fn index(&self) -> u32 {
        self.0.index()
    }
}
