//! Streamed response accumulation.

use std::io::{ErrorKind, Read};

/// Bytes requested from the stream on each iteration.
pub(crate) const CHUNK: usize = 16 * 1024;

/// Read a response stream to completion into an owned buffer.
///
/// The buffer grows to `total + CHUNK` before every read, each read takes up
/// to `CHUNK` bytes, and a zero-byte read ends the stream. On completion the
/// buffer is trimmed so its length is exactly the number of bytes received;
/// the length, not the capacity, is authoritative. A read error discards the
/// partially accumulated buffer.
pub(crate) fn read_streamed<R: Read>(stream: &mut R) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut total = 0;
    loop {
        buf.resize(total + CHUNK, 0);
        match stream.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    buf.truncate(total);
    buf.shrink_to_fit();
    Ok(buf)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::io::{self, Read};

    use proptest::prelude::*;

    use super::{read_streamed, CHUNK};

    /// Yields at most `step` bytes per read, regardless of how much the
    /// destination slice could hold.
    struct Dribble {
        data: Vec<u8>,
        pos: usize,
        step: usize,
    }

    impl Dribble {
        fn new(data: Vec<u8>, step: usize) -> Self {
            Self { data, pos: 0, step }
        }
    }

    impl Read for Dribble {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self
                .step
                .min(buf.len())
                .min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    /// Yields `good` bytes, then fails every subsequent read.
    struct FailAfter {
        good: usize,
        served: usize,
    }

    impl Read for FailAfter {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served >= self.good {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "dropped"));
            }
            let n = buf.len().min(self.good - self.served);
            buf[..n].fill(0x5a);
            self.served += n;
            Ok(n)
        }
    }

    fn payload(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn empty_stream_yields_empty_buffer() {
        let mut stream = Dribble::new(Vec::new(), CHUNK);
        let buf = read_streamed(&mut stream).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn length_is_exact_around_the_chunk_boundary() {
        for n in [CHUNK - 1, CHUNK, CHUNK * 3 + 7] {
            let data = payload(n);
            let mut stream = Dribble::new(data.clone(), CHUNK);
            let buf = read_streamed(&mut stream).unwrap();
            assert_eq!(buf.len(), n);
            assert_eq!(buf, data);
        }
    }

    #[test]
    fn short_reads_do_not_change_the_result() {
        let data = payload(CHUNK + 123);
        for step in [1, 7, 1000, CHUNK, CHUNK * 2] {
            let mut stream = Dribble::new(data.clone(), step);
            let buf = read_streamed(&mut stream).unwrap();
            assert_eq!(buf, data);
        }
    }

    #[test]
    fn read_failure_discards_partial_data() {
        let mut stream = FailAfter {
            good: CHUNK + 42,
            served: 0,
        };
        assert!(read_streamed(&mut stream).is_err());
    }

    #[test]
    fn interrupted_reads_are_retried() {
        struct Flaky {
            inner: Dribble,
            interrupt_next: bool,
        }

        impl Read for Flaky {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if self.interrupt_next {
                    self.interrupt_next = false;
                    return Err(io::Error::new(io::ErrorKind::Interrupted, "signal"));
                }
                self.interrupt_next = true;
                self.inner.read(buf)
            }
        }

        let data = payload(CHUNK * 2 + 9);
        let mut stream = Flaky {
            inner: Dribble::new(data.clone(), 900),
            interrupt_next: true,
        };
        assert_eq!(read_streamed(&mut stream).unwrap(), data);
    }

    proptest! {
        #[test]
        fn accumulates_exactly_what_was_sent(
            data in proptest::collection::vec(any::<u8>(), 0..CHUNK * 3),
            step in 1..CHUNK * 2,
        ) {
            let mut stream = Dribble::new(data.clone(), step);
            let buf = read_streamed(&mut stream).unwrap();
            prop_assert_eq!(buf, data);
        }
    }
}
