use thiserror::Error;

/// Errors that can occur while building dirty-bit state at runtime
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirtyBitsError {
    /// A bit index does not fit in the mask
    #[error("Dirty bit index {index} is out of range, masks hold {width} bits")]
    IndexOutOfRange { index: usize, width: usize },

    /// A layout declares more members than the mask can track
    #[error("Layout for {type_name} declares {count} {kind}, masks hold {width} bits")]
    LayoutTooWide {
        type_name: &'static str,
        kind: &'static str,
        count: usize,
        width: usize,
    },
}
