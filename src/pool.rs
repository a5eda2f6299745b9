//! A pool holding exactly one output buffer.
//!
//! [`BufferPool::acquire()`] blocks until the previously handed-out [`MediaBuffer`] has been
//! dropped, so a source can never be more than one access unit ahead of its consumer. The buffer
//! may be released from another thread.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

struct Slot {
    buffer: Mutex<Option<Vec<u8>>>,
    released: Condvar,
}
impl Slot {
    fn lock(&self) -> MutexGuard<'_, Option<Vec<u8>>> {
        // a panic while holding the lock cannot leave the Option half-written
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Clone)]
pub struct BufferPool {
    slot: Arc<Slot>,
}
impl BufferPool {
    pub fn new(capacity: usize) -> BufferPool {
        BufferPool {
            slot: Arc::new(Slot {
                buffer: Mutex::new(Some(Vec::with_capacity(capacity))),
                released: Condvar::new(),
            }),
        }
    }

    /// Waits for the buffer to be released, then hands it out emptied.
    ///
    /// Calling this while the same thread still holds the buffer never returns.
    pub fn acquire(&self) -> MediaBuffer {
        let guard = self.slot.lock();
        let mut guard = self
            .slot
            .released
            .wait_while(guard, |buffer| buffer.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        let data = guard.take().unwrap_or_default();
        self.wrap(data)
    }

    /// Hands out the buffer if it is currently available.
    pub fn try_acquire(&self) -> Option<MediaBuffer> {
        let data = self.slot.lock().take()?;
        Some(self.wrap(data))
    }

    pub fn is_available(&self) -> bool {
        self.slot.lock().is_some()
    }

    fn wrap(&self, mut data: Vec<u8>) -> MediaBuffer {
        data.clear();
        MediaBuffer {
            data,
            slot: Arc::clone(&self.slot),
        }
    }
}
impl fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPool")
            .field("available", &self.is_available())
            .finish()
    }
}

/// The pooled buffer, returned to its pool when dropped.
pub struct MediaBuffer {
    data: Vec<u8>,
    slot: Arc<Slot>,
}
impl MediaBuffer {
    pub fn as_vec_mut(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }
}
impl Deref for MediaBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}
impl DerefMut for MediaBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
impl Drop for MediaBuffer {
    fn drop(&mut self) {
        let data = std::mem::take(&mut self.data);
        *self.slot.lock() = Some(data);
        self.slot.released.notify_one();
    }
}
impl fmt::Debug for MediaBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaBuffer")
            .field("len", &self.data.len())
            .finish()
    }
}
