//! Bitext pipeline types.
mod pair;

pub use pair::PairRecord;
pub use pair::SizeSpec;
