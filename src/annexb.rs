//! Locates NAL Units in the byte-stream framing defined in _ITU-T Recommendation H.264 - Annex B_.
//!
//! A start code is two or more `0x00` bytes followed by `0x01`. [`next_unit()`] works on a single
//! window of bytes and never allocates; the caller owns the buffer and decides what to do when the
//! window runs out before a unit is terminated (see [`crate::feeder`]).

/// Outcome of one call to [`next_unit()`].
///
/// All positions are indices into the window that was scanned.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Scan {
    /// A unit occupies `start..end` of the window, with trailing zero padding already trimmed.
    /// Scanning should resume at `next`, which points at the zero bytes of the terminating start
    /// code so that they can be recognised again. After a forced flush, up to two trimmed zero
    /// bytes at the end of the window are likewise left unconsumed.
    Unit {
        start: usize,
        end: usize,
        next: usize,
    },
    /// The window does not hold a complete unit. Bytes before `keep_from` are consumed; bytes from
    /// `keep_from` onwards must be presented again, followed by more input.
    NeedMoreInput { keep_from: usize },
}

/// Finds the next unit in `window`.
///
/// If `force_flush` is set, the end of the window is taken to be the end of the stream, so a unit
/// that has started but has no terminating start code is returned as the final unit.
pub fn next_unit(window: &[u8], force_flush: bool) -> Scan {
    if window.len() < 3 {
        return Scan::NeedMoreInput { keep_from: 0 };
    }
    let start = match find_start_code(window, 0) {
        Some(code) => code + 3,
        // the last two bytes may be the leading zeros of a start code split by a refill
        None => {
            return Scan::NeedMoreInput {
                keep_from: window.len() - 2,
            }
        }
    };

    match find_terminator(window, start) {
        Some(one) => Scan::Unit {
            start,
            end: trim_trailing_zeros(window, start, one - 2),
            next: one - 2,
        },
        None if force_flush => {
            let end = trim_trailing_zeros(window, start, window.len());
            Scan::Unit {
                start,
                end,
                // trimmed zeros may be the start of a terminator that the window cut off
                next: end.max(window.len() - 2),
            }
        }
        None => Scan::NeedMoreInput { keep_from: start - 3 },
    }
}

/// Position of the first `00 00 01` at or after `from`.
fn find_start_code(window: &[u8], from: usize) -> Option<usize> {
    memchr::memchr_iter(0x01, &window[from..])
        .map(|pos| from + pos)
        .find(|&one| one >= from + 2 && window[one - 2] == 0x00 && window[one - 1] == 0x00)
        .map(|one| one - 2)
}

/// Position of the `0x01` byte ending the first start code that follows the unit beginning at
/// `start`.
fn find_terminator(window: &[u8], start: usize) -> Option<usize> {
    // `start` is preceded by a whole start code, so `one - 2` never underflows, and the 0x01 of
    // that start code stops a match from reaching back before `start`
    memchr::memchr_iter(0x01, &window[start..])
        .map(|pos| start + pos)
        .find(|&one| window[one - 2] == 0x00 && window[one - 1] == 0x00)
}

/// Annex B allows `trailing_zero_8bits` before the next start code; these are dropped, but a unit
/// is never shortened below one byte.
fn trim_trailing_zeros(window: &[u8], start: usize, mut end: usize) -> usize {
    while end > start + 1 && window[end - 1] == 0x00 {
        end -= 1;
    }
    end
}
