//! The pull interface a muxer drives: [`describe_format()`](FrameSource::describe_format) once,
//! then [`start()`](FrameSource::start), then [`read()`](FrameSource::read) until it reports end of
//! stream or an error, then [`stop()`](FrameSource::stop).
//!
//! Each source owns a [`BufferPool`](crate::pool::BufferPool) of one buffer, so `read()` blocks
//! until the [`AccessUnit`] from the previous call has been dropped. `stop()` must not be called
//! while a `read()` is in progress.

mod avc;
mod yuv;

pub use self::avc::AvcSource;
pub use self::yuv::YuvSource;

use crate::assembler::AccessUnitMeta;
use crate::config::{InputCodec, SourceConfig};
use crate::error::SourceError;
use crate::format::SourceFormat;
use crate::pool::MediaBuffer;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One unit of output: payload bytes in the pooled buffer, plus timestamps and flags.
///
/// Dropping it (or calling [`release()`](AccessUnit::release)) hands the buffer back to the source.
pub struct AccessUnit {
    buffer: MediaBuffer,
    meta: AccessUnitMeta,
}
impl AccessUnit {
    pub(crate) fn new(buffer: MediaBuffer, meta: AccessUnitMeta) -> AccessUnit {
        AccessUnit { buffer, meta }
    }

    pub fn payload(&self) -> &[u8] {
        &self.buffer
    }

    pub fn meta(&self) -> AccessUnitMeta {
        self.meta
    }

    pub fn presentation_time_us(&self) -> i64 {
        self.meta.presentation_time_us
    }

    pub fn decode_time_us(&self) -> i64 {
        self.meta.decode_time_us
    }

    pub fn is_sync_frame(&self) -> bool {
        self.meta.is_sync_frame
    }

    pub fn is_codec_config(&self) -> bool {
        self.meta.is_codec_config
    }

    pub fn release(self) {}
}
impl fmt::Debug for AccessUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessUnit")
            .field("len", &self.buffer.len())
            .field("meta", &self.meta)
            .finish()
    }
}

/// A source of access units, chosen by [`SourceConfig::input_codec`] when it is built.
pub enum FrameSource<R> {
    Avc(AvcSource<R>),
    Yuv(YuvSource<R>),
}
impl FrameSource<File> {
    /// Opens `path` and builds the source `config` asks for.
    pub fn open<P: AsRef<Path>>(config: &SourceConfig, path: P) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        FrameSource::from_config(config, file)
    }
}
impl<R: Read> FrameSource<R> {
    pub fn from_config(config: &SourceConfig, reader: R) -> Result<Self, SourceError> {
        Ok(match config.input_codec {
            InputCodec::Avc => FrameSource::Avc(AvcSource::new(config, reader)?),
            InputCodec::Yuv => FrameSource::Yuv(YuvSource::new(config, reader)?),
        })
    }

    pub fn describe_format(&self) -> SourceFormat {
        match self {
            FrameSource::Avc(s) => s.describe_format(),
            FrameSource::Yuv(s) => s.describe_format(),
        }
    }

    pub fn start(&mut self) {
        match self {
            FrameSource::Avc(s) => s.start(),
            FrameSource::Yuv(s) => s.start(),
        }
    }

    pub fn stop(&mut self) {
        match self {
            FrameSource::Avc(s) => s.stop(),
            FrameSource::Yuv(s) => s.stop(),
        }
    }

    /// Produces the next access unit, blocking until the previous one has been released.
    pub fn read(&mut self) -> Result<AccessUnit, SourceError> {
        match self {
            FrameSource::Avc(s) => s.read(),
            FrameSource::Yuv(s) => s.read(),
        }
    }

    /// Frames produced since the last `start()`; still available after `stop()`.
    pub fn frames_output(&self) -> u64 {
        match self {
            FrameSource::Avc(s) => s.frames_output(),
            FrameSource::Yuv(s) => s.frames_output(),
        }
    }

    /// RFC 6381 codec string of the stream, where the source can know it.
    pub fn codec_string(&self) -> Option<String> {
        match self {
            FrameSource::Avc(s) => s.codec().map(|c| c.to_string()),
            FrameSource::Yuv(_) => None,
        }
    }
}
