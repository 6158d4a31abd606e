pub mod bit_index;
pub mod dirty_bits;
pub mod error;
pub mod layout;

/// Number of bits in each dirty mask
pub const MASK_WIDTH: usize = u64::BITS as usize;
