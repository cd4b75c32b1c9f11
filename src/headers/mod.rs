//! Case-insensitive HTTP header container.
//!
//! Names are normalized to lowercase at the boundary, every lookup inside the container compares
//! lowercase names only. A name that arrives more than once is merged into a single field whose
//! value is joined with `", "` in arrival order.
mod error;
mod map;

pub use error::HeaderError;
pub use map::{Headers, Iter};

#[cfg(test)]
mod test;
