//! Chunked transfer coding.
//!
//! A chunk is written as `header`, `chunk`, then [`CHUNK_TRAIL`], where the header is the chunk
//! size in hex followed by CRLF. The body ends with [`LAST_CHUNK`].

/// Written after every chunk of data.
pub const CHUNK_TRAIL: &[u8] = b"\r\n";

/// Zero sized chunk that ends the chunked body, trailer fields may follow.
pub const LAST_CHUNK: &[u8] = b"0\r\n";

const HEX: &[u8; 16] = b"0123456789abcdef";
const HEADER_CAP: usize = 2 * size_of::<usize>() + 2;

/// Chunk size line, e.g: `"1a\r\n"`.
#[derive(Clone, Copy)]
pub struct ChunkHeader {
    bytes: [u8; HEADER_CAP],
    start: usize,
}

impl ChunkHeader {
    /// Encode the size line for a chunk of `len` bytes.
    pub fn new(len: usize) -> Self {
        let mut bytes = [0u8; HEADER_CAP];
        let mut start = HEADER_CAP - 2;
        bytes[start..].copy_from_slice(b"\r\n");

        let mut n = len;
        loop {
            start -= 1;
            bytes[start] = HEX[n & 0xf];
            n >>= 4;
            if n == 0 {
                break;
            }
        }

        Self { bytes, start }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[self.start..]
    }
}

impl std::fmt::Debug for ChunkHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ChunkHeader")
            .field(&String::from_utf8_lossy(self.as_bytes()))
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::ChunkHeader;

    #[test]
    fn chunk_header() {
        assert_eq!(ChunkHeader::new(0).as_bytes(), b"0\r\n");
        assert_eq!(ChunkHeader::new(3).as_bytes(), b"3\r\n");
        assert_eq!(ChunkHeader::new(10).as_bytes(), b"a\r\n");
        assert_eq!(ChunkHeader::new(26).as_bytes(), b"1a\r\n");
        assert_eq!(ChunkHeader::new(1024).as_bytes(), b"400\r\n");
        assert_eq!(
            ChunkHeader::new(usize::MAX).as_bytes().len(),
            2 * size_of::<usize>() + 2
        );
        assert_eq!(
            ChunkHeader::new(0xdead_beef).as_bytes(),
            format!("{:x}\r\n", 0xdead_beef_usize).as_bytes()
        );
    }
}
