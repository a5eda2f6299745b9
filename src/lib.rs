//! Pull-based access-unit sources for a downstream muxer.
//!
//! An [`source::AvcSource`] scans an H264 _Annex B_ byte stream with a fixed-size working buffer,
//! folds the first SPS and PPS into a single codec-config access unit, and stamps every following
//! NAL unit with a timestamp derived from the configured frame rate. A [`source::YuvSource`] hands
//! out raw frames of fixed size. Both are reached through [`source::FrameSource`].
//!
//! ```
//! use avc_source::config::{InputCodec, SourceConfig};
//! use avc_source::source::FrameSource;
//!
//! let stream = b"\x00\x00\x00\x01\x67\x42\x00\x1e\x00\x00\x00\x01\x68\xce\x3c\x80\x00\x00\x00\x01\x65\x88\x84".to_vec();
//! let config = SourceConfig {
//!     input_codec: InputCodec::Avc,
//!     ..SourceConfig::default()
//! };
//! let mut source = FrameSource::from_config(&config, std::io::Cursor::new(stream)).unwrap();
//! source.start();
//!
//! let config_unit = source.read().unwrap();
//! assert!(config_unit.is_codec_config());
//! drop(config_unit);
//!
//! let idr = source.read().unwrap();
//! assert!(idr.is_sync_frame());
//! assert_eq!(0, idr.presentation_time_us());
//! drop(idr);
//!
//! assert!(source.read().unwrap_err().is_end_of_stream());
//! source.stop();
//! ```

pub mod annexb;
pub mod assembler;
pub mod config;
pub mod error;
pub mod feeder;
pub mod format;
pub mod nal;
pub mod pool;
pub mod source;

pub use crate::error::SourceError;
