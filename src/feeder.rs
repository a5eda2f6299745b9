//! Cuts NAL units out of a blocking byte source using a single working buffer of fixed size.
//!
//! The buffer is filled with one bulk read when the feeder is created. When the
//! [cursor](crate::annexb::next_unit) cannot find a complete unit, the unconsumed tail is moved to
//! the front of the buffer and the freed space is refilled. Memory use is therefore bounded by the
//! buffer capacity regardless of stream length.
//!
//! A NAL unit larger than the whole buffer cannot be represented. When that happens the part that
//! fits is handed out as if the stream had ended there, and scanning resumes with whatever follows.
//! A unit that only reaches the end of a full buffer is flushed the same way, but any zero bytes
//! after it stay in the window, so a terminating start code split by the refill is still found.

use crate::annexb::{self, Scan};
use crate::nal::NalUnit;
use log::*;
use std::io::{self, Read};
use std::ops::Range;

pub struct NalFeeder<R> {
    reader: R,
    buf: Box<[u8]>,
    /// `buf[start..end]` is the live window; bytes before `start` may be overwritten.
    start: usize,
    end: usize,
    /// Set when a full buffer was flushed. Once more input arrives, a start code at the front of
    /// the window means the flushed unit was complete after all.
    unit_may_be_truncated: bool,
    truncated_units: u64,
}
impl<R: Read> NalFeeder<R> {
    /// Allocates the working buffer and performs the first bulk read.
    pub fn new(reader: R, capacity: usize) -> io::Result<NalFeeder<R>> {
        let mut feeder = NalFeeder {
            reader,
            buf: vec![0; capacity].into_boxed_slice(),
            start: 0,
            end: 0,
            unit_may_be_truncated: false,
            truncated_units: 0,
        };
        let read = feeder.refill()?;
        debug!("NalFeeder: initial read of {} bytes into {} byte buffer", read, capacity);
        Ok(feeder)
    }

    /// Returns the next non-empty NAL unit, or `None` once the source is exhausted and no further
    /// unit can be extracted.
    ///
    /// I/O errors from the underlying reader are returned as-is.
    pub fn next_nal(&mut self) -> io::Result<Option<NalUnit<'_>>> {
        loop {
            match self.scan(false) {
                Some(range) if range.is_empty() => {
                    trace!("NalFeeder: skipping empty unit at {}", range.start);
                }
                Some(range) => return Ok(Some(NalUnit::new(range.start, &self.buf[range]))),
                None => {
                    self.compact();
                    let full = self.end == self.buf.len();
                    if self.refill()? == 0 {
                        return Ok(self.flush(full));
                    }
                }
            }
        }
    }

    /// Number of bytes read from the source but not yet handed out as (or skipped past) a unit.
    pub fn buffered(&self) -> usize {
        self.end - self.start
    }

    /// Units handed out incomplete because they did not fit in the working buffer.
    pub fn truncated_units(&self) -> u64 {
        self.truncated_units
    }

    /// Treats the current window as the end of the stream. With a `full` buffer that is only
    /// known to hold for the unit being flushed, which may continue in input not yet read.
    fn flush(&mut self, full: bool) -> Option<NalUnit<'_>> {
        let range = self.scan(true)?;
        if full {
            debug!("NalFeeder: unit at {} reaches the end of the buffer", range.start);
            self.unit_may_be_truncated = true;
        }
        if range.is_empty() {
            None
        } else {
            Some(NalUnit::new(range.start, &self.buf[range]))
        }
    }

    /// Once the bytes following a unit flushed from a full buffer are known, warns if they are
    /// not a start code, as the unit was then cut short.
    fn check_truncation(&mut self, force_flush: bool) {
        if !self.unit_may_be_truncated {
            return;
        }
        let window = &self.buf[self.start..self.end];
        let zeros = window.iter().take_while(|&&b| b == 0x00).count();
        let truncated = match window.get(zeros) {
            Some(&0x01) => zeros < 2,
            Some(_) => true,
            // nothing but zero padding up to the end of the stream
            None if force_flush => false,
            None => return,
        };
        self.unit_may_be_truncated = false;
        if truncated {
            self.truncated_units += 1;
            warn!(
                "NalFeeder: NAL unit does not fit in {} byte working buffer, truncated",
                self.buf.len()
            );
        }
    }

    /// Runs the cursor over the live window, advancing `start` past whatever it consumed, and
    /// returns the position of the unit found (if any) within `buf`.
    fn scan(&mut self, force_flush: bool) -> Option<Range<usize>> {
        self.check_truncation(force_flush);
        let base = self.start;
        match annexb::next_unit(&self.buf[base..self.end], force_flush) {
            Scan::Unit { start, end, next } => {
                self.start = base + next;
                Some(base + start..base + end)
            }
            Scan::NeedMoreInput { keep_from } => {
                self.start = base + keep_from;
                None
            }
        }
    }

    fn compact(&mut self) {
        if self.start > 0 {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }
    }

    /// Reads until the buffer is full or the source reports end of stream, returning the number of
    /// bytes added.
    fn refill(&mut self) -> io::Result<usize> {
        let read = read_up_to(&mut self.reader, &mut self.buf[self.end..])?;
        self.end += read;
        Ok(read)
    }
}

/// Fills as much of `buf` as the reader can supply, stopping early only at end of stream.
pub(crate) fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
