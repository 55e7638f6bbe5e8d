use std::io::{self, Write};
use tracing::trace;

const INITIAL_CAPACITY_LIMIT: usize = 4096;

/// Accumulates output lines in memory and writes them in chunks.
///
/// Lines are written once `threshold` of them are pending, and the remainder
/// when [`LineBuffer::finish`] is called. Pending lines are discarded if the
/// buffer is dropped without finishing.
pub struct LineBuffer<W: Write> {
    writer: W,
    pending: Vec<String>,
    threshold: usize,
    written: u64,
}

impl<W: Write> LineBuffer<W> {
    pub fn new(writer: W, threshold: usize) -> Self {
        let threshold = threshold.max(1);
        Self {
            writer,
            pending: Vec::with_capacity(threshold.min(INITIAL_CAPACITY_LIMIT)),
            threshold,
            written: 0,
        }
    }

    /// Queues a line (without terminator). Returns `true` if this push
    /// triggered a flush.
    pub fn push(&mut self, line: String) -> io::Result<bool> {
        self.pending.push(line);
        if self.pending.len() >= self.threshold {
            self.flush_pending()?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    fn flush_pending(&mut self) -> io::Result<()> {
        for line in self.pending.drain(..) {
            self.writer.write_all(line.as_bytes())?;
            self.writer.write_all(b"\n")?;
            self.written += 1;
        }
        trace!("Flushed chunk, {} lines written so far", self.written);
        Ok(())
    }

    /// Writes the remaining lines, flushes the writer and hands it back.
    pub fn finish(mut self) -> io::Result<W> {
        self.flush_pending()?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}
