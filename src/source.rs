use std::io::{Read, Seek, SeekFrom};

use crate::{Error, Result};

/// Adapts a non-seekable [`Read`] into `Read + Seek` by tracking how many
/// bytes have been consumed and servicing forward seeks by reading-and-
/// discarding. Every typed box reader in this crate is written against
/// `Read + Seek`; this lets the same readers run over a pipe or socket at
/// the cost of rejecting any seek that would go backwards.
pub struct ForwardOnlySeek<R> {
    inner: R,
    pos: u64,
}

impl<R: Read> ForwardOnlySeek<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, pos: 0 }
    }
}

impl<R: Read> Read for ForwardOnlySeek<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl<R: Read> Seek for ForwardOnlySeek<R> {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(p) => p,
            SeekFrom::Current(delta) => (self.pos as i64 + delta) as u64,
            SeekFrom::End(_) => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::Unsupported,
                    "cannot seek from end of a non-seekable source",
                ))
            }
        };
        if target < self.pos {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "cannot seek backwards on a non-seekable source",
            ));
        }
        let mut remaining = target - self.pos;
        let mut sink = [0u8; 4096];
        while remaining > 0 {
            let chunk = remaining.min(sink.len() as u64) as usize;
            self.inner.read_exact(&mut sink[..chunk])?;
            self.pos += chunk as u64;
            remaining -= chunk as u64;
        }
        Ok(self.pos)
    }
}

/// Converts a seek failure that would otherwise surface as a generic I/O
/// error into the crate's own vocabulary where that's clearer to callers.
pub fn require_forward_seek(result: std::io::Result<u64>) -> Result<u64> {
    result.map_err(|e| {
        if e.kind() == std::io::ErrorKind::Unsupported {
            Error::InvalidData("stream does not support the requested seek")
        } else {
            Error::Io(e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn forward_seek_reads_through() {
        let data = b"0123456789".to_vec();
        let mut s = ForwardOnlySeek::new(Cursor::new(data));
        let mut buf = [0u8; 3];
        s.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"012");
        s.seek(SeekFrom::Start(5)).unwrap();
        s.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"567");
    }

    #[test]
    fn backward_seek_fails() {
        let data = b"0123456789".to_vec();
        let mut s = ForwardOnlySeek::new(Cursor::new(data));
        s.seek(SeekFrom::Start(5)).unwrap();
        assert!(s.seek(SeekFrom::Start(2)).is_err());
    }
}
