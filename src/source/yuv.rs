use super::AccessUnit;
use crate::assembler::AccessUnitMeta;
use crate::config::SourceConfig;
use crate::error::SourceError;
use crate::feeder::read_up_to;
use crate::format::{ColorFormat, Mime, SourceFormat};
use crate::pool::BufferPool;
use log::*;
use std::io::Read;

/// Hands out raw YUV420 frames of `width * height * 3 / 2` bytes, one per read, for an encoder.
pub struct YuvSource<R> {
    reader: R,
    width: u32,
    height: u32,
    color_format: ColorFormat,
    frame_rate: u32,
    max_frames: u64,
    frame_size: usize,
    frames_output: u64,
    pool: BufferPool,
    started: bool,
}
impl<R: Read> YuvSource<R> {
    pub fn new(config: &SourceConfig, reader: R) -> Result<Self, SourceError> {
        config.validate()?;
        let frame_size = config.yuv_frame_size();
        Ok(YuvSource {
            reader,
            width: config.width,
            height: config.height,
            color_format: config.color_format,
            frame_rate: config.frame_rate,
            max_frames: config.max_frames,
            frame_size,
            frames_output: 0,
            pool: BufferPool::new(frame_size),
            started: false,
        })
    }

    pub fn describe_format(&self) -> SourceFormat {
        SourceFormat {
            width: self.width,
            height: self.height,
            color_format: self.color_format,
            mime: Mime::Raw,
        }
    }

    pub fn start(&mut self) {
        self.frames_output = 0;
        self.started = true;
    }

    pub fn stop(&mut self) {
        self.started = false;
        debug!("YuvSource: stopped after {} frames", self.frames_output);
    }

    /// Reads one frame. A short final frame is returned with the bytes that were available.
    pub fn read(&mut self) -> Result<AccessUnit, SourceError> {
        if !self.started {
            return Err(SourceError::NotStarted);
        }
        if self.frames_output >= self.max_frames {
            return Err(SourceError::EndOfStream);
        }
        let mut buffer = self.pool.acquire();
        let data = buffer.as_vec_mut();
        data.resize(self.frame_size, 0);
        let read = read_up_to(&mut self.reader, data)?;
        if read == 0 {
            debug!("YuvSource: end of stream after {} frames", self.frames_output);
            return Err(SourceError::EndOfStream);
        }
        if read < self.frame_size {
            warn!(
                "YuvSource: short frame of {} bytes, expected {}",
                read, self.frame_size
            );
        }
        data.truncate(read);
        let meta = AccessUnitMeta::frame(self.frames_output, self.frame_rate, false);
        self.frames_output += 1;
        Ok(AccessUnit::new(buffer, meta))
    }

    pub fn frames_output(&self) -> u64 {
        self.frames_output
    }
}
