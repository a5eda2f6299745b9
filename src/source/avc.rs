use super::AccessUnit;
use crate::assembler::AccessUnitAssembler;
use crate::config::SourceConfig;
use crate::error::SourceError;
use crate::feeder::NalFeeder;
use crate::format::{ColorFormat, Mime, SourceFormat};
use crate::pool::BufferPool;
use log::*;
use std::io::Read;

/// Passes an H264 Annex B stream through as access units, without re-encoding.
pub struct AvcSource<R> {
    width: u32,
    height: u32,
    color_format: ColorFormat,
    assembler: AccessUnitAssembler<R>,
    pool: BufferPool,
    started: bool,
}
impl<R: Read> AvcSource<R> {
    /// Validates `config` and fills the working buffer with the first read from `reader`.
    pub fn new(config: &SourceConfig, reader: R) -> Result<Self, SourceError> {
        config.validate()?;
        let capacity = config.avc_buffer_capacity();
        let feeder = NalFeeder::new(reader, capacity)?;
        Ok(AvcSource {
            width: config.width,
            height: config.height,
            color_format: config.color_format,
            assembler: AccessUnitAssembler::new(feeder, config.frame_rate, config.max_frames),
            pool: BufferPool::new(capacity),
            started: false,
        })
    }

    pub fn describe_format(&self) -> SourceFormat {
        SourceFormat {
            width: self.width,
            height: self.height,
            color_format: self.color_format,
            mime: Mime::Avc,
        }
    }

    pub fn start(&mut self) {
        self.assembler.reset();
        self.started = true;
        debug!("AvcSource: started {}x{}", self.width, self.height);
    }

    pub fn stop(&mut self) {
        self.assembler.release_scratch();
        self.started = false;
        debug!(
            "AvcSource: stopped after {} frames",
            self.assembler.frames_output()
        );
    }

    pub fn read(&mut self) -> Result<AccessUnit, SourceError> {
        if !self.started {
            return Err(SourceError::NotStarted);
        }
        if self.assembler.limit_reached() {
            debug!("AvcSource: frame limit reached");
            return Err(SourceError::EndOfStream);
        }
        let mut buffer = self.pool.acquire();
        let meta = self.assembler.next_access_unit(buffer.as_vec_mut())?;
        trace!("AvcSource: {:?}, {} bytes", meta, buffer.len());
        Ok(AccessUnit::new(buffer, meta))
    }

    pub fn frames_output(&self) -> u64 {
        self.assembler.frames_output()
    }

    pub fn codec(&self) -> Option<rfc6381_codec::Codec> {
        self.assembler.codec()
    }
}
