//! Line-atomic writer for the primary output stream.

use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

type SharedWriter = Arc<Mutex<Pin<Box<dyn AsyncWrite + Send>>>>;

/// Writes one JSON value per line.
///
/// Clones share the underlying writer; a line is written and flushed while
/// holding the lock, so concurrent emitters never interleave partial lines.
#[derive(Clone)]
pub struct Emitter {
    out: SharedWriter,
}

impl Emitter {
    pub fn new<W>(writer: W) -> Self
    where
        W: AsyncWrite + Send + 'static,
    {
        Self {
            out: Arc::new(Mutex::new(Box::pin(writer))),
        }
    }

    pub async fn emit(&self, value: &Value) -> std::io::Result<()> {
        let mut line = serde_json::to_string(value)?;
        line.push('\n');

        let mut out = self.out.lock().await;
        out.write_all(line.as_bytes()).await?;
        out.flush().await
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter").finish_non_exhaustive()
    }
}
