use std::fmt;
use std::io;

use super::RingBuffer;

impl io::Write for RingBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(RingBuffer::write(self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Write for RingBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        RingBuffer::write(self, s.as_bytes())
            .map(|_| ())
            .map_err(|_| fmt::Error)
    }
}

/// Renders the logical content as text; invalid UTF-8 is replaced, not rejected.
impl fmt::Display for RingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bytes()))
    }
}
