use bytes::BytesMut;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Growable read buffer with a fill cursor.
///
/// `bytes[..filled]` holds received but not yet consumed bytes. When the buffer is full its
/// length is doubled before the next read.
pub(crate) struct ReadBuffer {
    bytes: BytesMut,
    filled: usize,
}

impl ReadBuffer {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: BytesMut::zeroed(capacity.max(1)),
            filled: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn filled(&self) -> &[u8] {
        &self.bytes[..self.filled]
    }

    pub(crate) fn reserve_read(&mut self) {
        if self.filled == self.bytes.len() {
            let len = self.bytes.len();
            self.bytes.resize(len * 2, 0);
        }
    }

    /// Single read into the unfilled region, returns `0` on end of stream.
    pub(crate) async fn read_from<R>(&mut self, reader: &mut R) -> io::Result<usize>
    where
        R: AsyncRead + Unpin,
    {
        self.reserve_read();
        let read = reader.read(&mut self.bytes[self.filled..]).await?;
        self.filled += read;
        Ok(read)
    }

    /// Discard `n` bytes from the front, shifting the remaining bytes to the start.
    pub(crate) fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.filled);
        self.bytes.copy_within(n..self.filled, 0);
        self.filled -= n;
    }
}

impl std::fmt::Debug for ReadBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ReadBuffer")
            .field("filled", &self.filled)
            .field("capacity", &self.capacity())
            .finish()
    }
}
