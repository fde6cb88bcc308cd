//! Bounded byte accumulator.
//!
//! [`RingBuffer`] grows like a dynamic array until it reaches its maximum
//! size, then keeps only the most recent `max_size` bytes, overwriting the
//! oldest content without allocating further.

pub mod config;
pub mod error;
pub mod ring;

pub use error::{ConfigError, RingError};
pub use ring::{Mode, RingBuffer};
