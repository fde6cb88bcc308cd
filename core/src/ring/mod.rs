mod buffer;
mod sink;

pub use buffer::{Mode, RingBuffer};
