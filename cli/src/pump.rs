use tailbuf_core::RingBuffer;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinHandle;

use crate::error::CliError;

const CHUNK_SIZE: usize = 16 * 1024;

/// Stream drained into a ring, handed back to the caller once the reader hits EOF.
#[derive(Debug)]
pub struct Captured {
    pub label: &'static str,
    pub ring: RingBuffer,
}

/// Reads `rd` to the end, keeping its tail in `ring` and copying every chunk to
/// `tee` when one is given.
pub async fn pump<R, W>(
    mut rd: R,
    mut tee: Option<W>,
    mut ring: RingBuffer,
    label: &'static str,
) -> Result<Captured, CliError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; CHUNK_SIZE];
    let io_err = |source: std::io::Error| CliError::StreamIo {
        stream: label,
        source,
    };

    loop {
        let n = rd.read(&mut buf).await.map_err(io_err)?;
        if n == 0 {
            break;
        }

        ring.write(&buf[..n])?;

        if let Some(w) = tee.as_mut() {
            w.write_all(&buf[..n]).await.map_err(io_err)?;
        }
    }

    if let Some(w) = tee.as_mut() {
        w.flush().await.map_err(io_err)?;
    }

    tracing::debug!(
        stream = label,
        written = ring.written(),
        retained = ring.len(),
        wrapped = ring.is_wrapped(),
        "stream drained"
    );
    Ok(Captured { label, ring })
}

/// Runs [`pump`] on its own task. The task owns `ring` until it completes.
pub fn spawn_pump<R, W>(
    rd: R,
    tee: Option<W>,
    ring: RingBuffer,
    label: &'static str,
) -> JoinHandle<Result<Captured, CliError>>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(pump(rd, tee, ring, label))
}

pub async fn join(handle: JoinHandle<Result<Captured, CliError>>) -> Result<Captured, CliError> {
    handle.await.map_err(|e| CliError::Join(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_pump_keeps_tail_and_tees_everything() {
        let input: &[u8] = b"0123456789abcdef";
        let mut teed = Vec::new();

        let captured = pump(input, Some(&mut teed), RingBuffer::new(0, 6), "test")
            .await
            .unwrap();

        assert_eq!(teed, input);
        assert_eq!(captured.ring.bytes(), b"abcdef");
        assert_eq!(captured.ring.written(), 16);
        assert_eq!(captured.label, "test");
    }

    #[tokio::test]
    async fn test_pump_larger_than_chunk() {
        let input = vec![7u8; CHUNK_SIZE * 3 + 5];

        let captured = pump(&input[..], None::<Vec<u8>>, RingBuffer::new(0, 100), "big")
            .await
            .unwrap();

        assert_eq!(captured.ring.written(), input.len() as u64);
        assert_eq!(captured.ring.len(), 100);
    }

    #[tokio::test]
    async fn test_spawned_pump_returns_ring() {
        let input: &'static [u8] = b"hello";
        let handle = spawn_pump(input, None::<tokio::io::Sink>, RingBuffer::new(0, 64), "s");

        let captured = join(handle).await.unwrap();
        assert_eq!(captured.ring.to_string(), "hello");
        assert!(!captured.ring.is_wrapped());
    }
}
