use std::collections::VecDeque;

/// Naive tail model: keeps the last `cap` bytes ever pushed.
pub struct TailModel {
    inner: VecDeque<u8>,
    cap: usize,
}

impl TailModel {
    pub fn new(cap: usize) -> Self {
        Self {
            inner: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn push(&mut self, data: &[u8]) {
        for &b in data {
            if self.inner.len() == self.cap {
                self.inner.pop_front();
            }
            if self.cap > 0 {
                self.inner.push_back(b);
            }
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.inner.iter().copied().collect()
    }
}

/// Deterministic chunk sizes in `0..=max_chunk` (xorshift).
pub fn chunk_sizes(seed: u64, count: usize, max_chunk: usize) -> Vec<usize> {
    let mut x = seed.max(1);
    (0..count)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            (x % (max_chunk as u64 + 1)) as usize
        })
        .collect()
}

pub fn stream(len: usize) -> Vec<u8> {
    (0..len).map(|i| b'a' + (i % 26) as u8).collect()
}
