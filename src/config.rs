//! Settings a source is built from. Parsing them from a command line or file is left to the
//! caller.

use crate::format::ColorFormat;
use std::fmt;

/// Which kind of elementary stream the input file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputCodec {
    /// Raw YUV420 frames, to be handed to an encoder
    #[default]
    Yuv,
    /// H264 Annex B byte stream, passed through
    Avc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub width: u32,
    pub height: u32,
    pub color_format: ColorFormat,
    /// Frames per second used to derive timestamps.
    pub frame_rate: u32,
    /// No more than this many frames (slice units, for AVC input) are produced.
    pub max_frames: u64,
    pub input_codec: InputCodec,
    /// Overrides the size of the working buffer and the pooled output buffer, which otherwise
    /// default to one frame's worth of bytes.
    pub buffer_capacity: Option<usize>,
}
impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            width: 176,
            height: 144,
            color_format: ColorFormat::Yuv420Planar,
            frame_rate: 30,
            max_frames: 30000,
            input_codec: InputCodec::Yuv,
            buffer_capacity: None,
        }
    }
}
impl SourceConfig {
    /// The smallest buffer that can hold a 4-byte start code plus a header byte.
    pub const MIN_BUFFER_CAPACITY: usize = 5;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.frame_rate == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }
        // raw YUV input never uses the working buffer unless one is asked for explicitly
        if self.input_codec == InputCodec::Avc || self.buffer_capacity.is_some() {
            let cap = self.avc_buffer_capacity();
            if cap < Self::MIN_BUFFER_CAPACITY {
                return Err(ConfigError::BufferTooSmall(cap));
            }
        }
        Ok(())
    }

    /// Bytes in one raw YUV420 frame.
    pub fn yuv_frame_size(&self) -> usize {
        self.width as usize * self.height as usize * 3 / 2
    }

    /// Working buffer size for Annex B input: one luma plane's worth of bytes unless overridden.
    pub fn avc_buffer_capacity(&self) -> usize {
        self.buffer_capacity
            .unwrap_or(self.width as usize * self.height as usize)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroDimension { width: u32, height: u32 },
    ZeroFrameRate,
    /// The requested buffer capacity could not even hold a start code and NAL header.
    BufferTooSmall(usize),
}
impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroDimension { width, height } => {
                write!(f, "frame size {}x{} has a zero dimension", width, height)
            }
            ConfigError::ZeroFrameRate => f.write_str("frame rate must be at least 1"),
            ConfigError::BufferTooSmall(cap) => write!(
                f,
                "buffer capacity {} is below the minimum of {}",
                cap,
                SourceConfig::MIN_BUFFER_CAPACITY
            ),
        }
    }
}
impl std::error::Error for ConfigError {}
