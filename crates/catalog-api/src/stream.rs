//! Bridge from the blocking archive writer to a streamed response body
//!
//! The archive is assembled on the blocking pool and handed to the HTTP body
//! in chunks over a bounded channel. A dropped receiver (client gone) turns
//! into `BrokenPipe` on the next write, which aborts assembly. An assembly
//! error is forwarded into the body stream so the connection is aborted
//! rather than completed with a truncated archive.

use axum::body::{Body, Bytes};
use cert_catalog::{write_archive, CertificateRecord};
use std::io::{self, Write};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Bytes buffered before a chunk is handed to the body
pub const CHUNK_SIZE: usize = 16 * 1024;

/// Chunks in flight between the writer and the body
const CHANNEL_CAPACITY: usize = 8;

type Chunk = io::Result<Bytes>;

/// Synchronous writer feeding a response body channel
///
/// Must be used from a blocking thread, never from async context.
pub struct ChannelWriter {
    tx: mpsc::Sender<Chunk>,
    buf: Vec<u8>,
}

impl ChannelWriter {
    pub fn new(tx: mpsc::Sender<Chunk>) -> Self {
        Self {
            tx,
            buf: Vec::with_capacity(CHUNK_SIZE),
        }
    }

    fn send_buffered(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }

        let chunk = std::mem::replace(&mut self.buf, Vec::with_capacity(CHUNK_SIZE));
        self.tx
            .blocking_send(Ok(Bytes::from(chunk)))
            .map_err(|_| closed())
    }
}

fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "response stream closed")
}

impl Write for ChannelWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if self.tx.is_closed() {
            return Err(closed());
        }

        self.buf.extend_from_slice(data);
        if self.buf.len() >= CHUNK_SIZE {
            self.send_buffered()?;
        }

        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.send_buffered()
    }
}

/// Start assembling the bundle for `record` and return it as a streamed body
pub fn stream_archive(record: CertificateRecord) -> Body {
    let id = record.id;
    stream_from(id, move |writer| write_archive(&record, writer))
}

/// Run `produce` on the blocking pool and stream what it writes
///
/// A producer error becomes an error item at the end of the body.
fn stream_from<F>(id: u32, produce: F) -> Body
where
    F: FnOnce(ChannelWriter) -> cert_catalog::Result<()> + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<Chunk>(CHANNEL_CAPACITY);

    tokio::task::spawn_blocking(move || {
        let writer = ChannelWriter::new(tx.clone());

        match produce(writer) {
            Ok(()) => debug!("Bundle for certificate {} complete", id),
            Err(e) => {
                warn!("Bundle for certificate {} aborted: {}", id, e);
                let _ = tx.blocking_send(Err(io::Error::other(e.to_string())));
            }
        }
    });

    let chunks = futures::stream::poll_fn(move |cx| rx.poll_recv(cx));
    Body::from_stream(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cert_catalog::{Catalog, CatalogError};
    use std::io::{Cursor, Read};

    #[test]
    fn test_write_after_receiver_dropped() {
        let (tx, rx) = mpsc::channel::<Chunk>(1);
        drop(rx);

        let mut writer = ChannelWriter::new(tx);
        let err = writer.write(b"data").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_flush_after_receiver_dropped() {
        let (tx, mut rx) = mpsc::channel::<Chunk>(1);

        let mut writer = ChannelWriter::new(tx);
        writer.write_all(b"partial").unwrap();

        rx.close();
        let err = writer.flush().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[tokio::test]
    async fn test_chunks_are_forwarded() {
        let (tx, mut rx) = mpsc::channel::<Chunk>(CHANNEL_CAPACITY);

        let producer = tokio::task::spawn_blocking(move || {
            let mut writer = ChannelWriter::new(tx);
            writer.write_all(&[7u8; CHUNK_SIZE]).unwrap();
            writer.write_all(&[7u8; 10]).unwrap();
            writer.flush().unwrap();
        });

        let mut received = Vec::new();
        let mut chunks = 0;
        while let Some(chunk) = rx.recv().await {
            received.extend_from_slice(&chunk.unwrap());
            chunks += 1;
        }
        producer.await.unwrap();

        assert_eq!(chunks, 2);
        assert_eq!(received.len(), CHUNK_SIZE + 10);
        assert!(received.iter().all(|b| *b == 7));
    }

    #[tokio::test]
    async fn test_streamed_archive_is_complete() {
        let record = Catalog::seeded().unwrap().find_active_by_id(4).unwrap().clone();

        let bytes = axum::body::to_bytes(stream_archive(record), usize::MAX)
            .await
            .unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        assert_eq!(archive.len(), 3);

        let mut instructions = String::new();
        archive
            .by_name("password.txt")
            .unwrap()
            .read_to_string(&mut instructions)
            .unwrap();
        assert!(instructions.contains("- Password: adhoc2024$"));
    }

    #[tokio::test]
    async fn test_producer_error_fails_the_body() {
        let body = stream_from(7, |mut writer| {
            writer.write_all(&[1u8; CHUNK_SIZE + 1])?;
            writer.flush()?;
            Err(CatalogError::Io(io::Error::other("assembly failed")))
        });

        let result = axum::body::to_bytes(body, usize::MAX).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_producer_error_before_any_bytes() {
        let body = stream_from(8, |_writer| Err(CatalogError::NotFound(8)));

        let result = axum::body::to_bytes(body, usize::MAX).await;
        assert!(result.is_err());
    }
}
