//! Pipeline trait.
use crate::error::Error;

/// A self-contained processing run, configured at construction.
pub trait Pipeline<T> {
    fn run(&self) -> Result<T, Error>;
}
