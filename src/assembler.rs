//! Turns the NAL units of an Annex B stream into access units for the muxer.
//!
//! The first SPS and first PPS are held back and emitted together as a single codec-config unit.
//! Every other NAL unit becomes one access unit of its own, prefixed by a 4-byte start code and
//! stamped with a timestamp derived from its index and the frame rate. Once the codec-config unit
//! has gone out, parameter sets are no longer intercepted: any later SPS or PPS is passed through
//! like a slice, and a stream whose parameters change part way through is not reconfigured.

use crate::error::SourceError;
use crate::feeder::NalFeeder;
use crate::format;
use crate::nal::{NalUnit, UnitType};
use hex_slice::AsHex;
use log::*;
use std::io::Read;

pub const START_CODE: [u8; 4] = [0, 0, 0, 1];

/// Flags and timestamps the muxer needs alongside each access unit's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessUnitMeta {
    pub presentation_time_us: i64,
    pub decode_time_us: i64,
    pub is_sync_frame: bool,
    pub is_codec_config: bool,
}
impl AccessUnitMeta {
    pub fn codec_config() -> AccessUnitMeta {
        AccessUnitMeta {
            is_codec_config: true,
            ..AccessUnitMeta::default()
        }
    }

    /// Metadata for the `index`th frame, whose presentation and decode times coincide.
    pub fn frame(index: u64, frame_rate: u32, is_sync_frame: bool) -> AccessUnitMeta {
        let time = timestamp_us(index, frame_rate);
        AccessUnitMeta {
            presentation_time_us: time,
            decode_time_us: time,
            is_sync_frame,
            is_codec_config: false,
        }
    }
}

/// `index * 1_000_000 / frame_rate`, truncated.
pub fn timestamp_us(index: u64, frame_rate: u32) -> i64 {
    (u128::from(index) * 1_000_000 / u128::from(frame_rate.max(1))) as i64
}

pub struct AccessUnitAssembler<R> {
    feeder: NalFeeder<R>,
    frame_rate: u32,
    max_frames: u64,
    frames_output: u64,
    config_emitted: bool,
    pending_sps: Option<Vec<u8>>,
    pending_pps: Option<Vec<u8>>,
    /// The SPS that went into the codec config.
    config_sps: Option<Vec<u8>>,
}
impl<R: Read> AccessUnitAssembler<R> {
    pub fn new(feeder: NalFeeder<R>, frame_rate: u32, max_frames: u64) -> Self {
        AccessUnitAssembler {
            feeder,
            frame_rate,
            max_frames,
            frames_output: 0,
            config_emitted: false,
            pending_sps: None,
            pending_pps: None,
            config_sps: None,
        }
    }

    /// Forgets any configuration seen so far and restarts frame numbering from zero.
    ///
    /// The position in the byte stream is not rewound.
    pub fn reset(&mut self) {
        self.frames_output = 0;
        self.config_emitted = false;
        self.config_sps = None;
        self.release_scratch();
    }

    /// Drops parameter sets captured for a codec-config unit that has not been completed.
    pub fn release_scratch(&mut self) {
        self.pending_sps = None;
        self.pending_pps = None;
    }

    pub fn limit_reached(&self) -> bool {
        self.frames_output >= self.max_frames
    }

    /// Number of frame access units produced since the last [`reset()`](Self::reset).
    pub fn frames_output(&self) -> u64 {
        self.frames_output
    }

    pub fn config_emitted(&self) -> bool {
        self.config_emitted
    }

    /// The RFC 6381 codec identifier of the stream, known once the SPS has been captured.
    pub fn codec(&self) -> Option<rfc6381_codec::Codec> {
        self.config_sps
            .as_deref()
            .or(self.pending_sps.as_deref())
            .and_then(format::avc1_codec)
    }

    /// Writes the next access unit's payload into `out` (replacing its contents) and returns its
    /// metadata.
    ///
    /// Fails with [`SourceError::EndOfStream`] once the frame limit has been reached or the feeder
    /// has no more units.
    pub fn next_access_unit(&mut self, out: &mut Vec<u8>) -> Result<AccessUnitMeta, SourceError> {
        if self.limit_reached() {
            debug!("frame limit of {} reached", self.max_frames);
            return Err(SourceError::EndOfStream);
        }
        loop {
            let nal = match self.feeder.next_nal()? {
                Some(nal) => nal,
                None => {
                    debug!("end of stream after {} frames", self.frames_output);
                    return Err(SourceError::EndOfStream);
                }
            };
            let unit_type = nal.unit_type();
            if !self.config_emitted && unit_type == UnitType::SeqParameterSet {
                capture(&mut self.pending_sps, nal);
            } else if !self.config_emitted && unit_type == UnitType::PicParameterSet {
                capture(&mut self.pending_pps, nal);
            } else {
                out.clear();
                out.extend_from_slice(&START_CODE);
                out.extend_from_slice(nal.data());
                let meta = AccessUnitMeta::frame(
                    self.frames_output,
                    self.frame_rate,
                    unit_type == UnitType::IdrSlice,
                );
                self.frames_output += 1;
                if self.frames_output % 10 == 0 {
                    trace!("{} frames output", self.frames_output);
                }
                return Ok(meta);
            }
            if self.emit_codec_config(out) {
                return Ok(AccessUnitMeta::codec_config());
            }
        }
    }

    /// Moves both captured parameter sets into `out` once both are present.
    fn emit_codec_config(&mut self, out: &mut Vec<u8>) -> bool {
        let (sps, pps) = match (self.pending_sps.take(), self.pending_pps.take()) {
            (Some(sps), Some(pps)) => (sps, pps),
            (sps, pps) => {
                self.pending_sps = sps;
                self.pending_pps = pps;
                return false;
            }
        };
        out.clear();
        out.reserve(2 * START_CODE.len() + sps.len() + pps.len());
        out.extend_from_slice(&START_CODE);
        out.extend_from_slice(&sps);
        out.extend_from_slice(&START_CODE);
        out.extend_from_slice(&pps);
        debug!(
            "codec config assembled from {} byte SPS and {} byte PPS",
            sps.len(),
            pps.len()
        );
        self.config_emitted = true;
        self.config_sps = Some(sps);
        true
    }
}

/// Keeps the first parameter set of its kind; later ones before the codec config is complete are
/// ignored.
fn capture(slot: &mut Option<Vec<u8>>, nal: NalUnit<'_>) {
    match slot {
        Some(_) => trace!("ignoring repeated {:?}", nal.unit_type()),
        None => {
            trace!("captured {:?}: {:02x}", nal.unit_type(), nal.data().as_hex());
            *slot = Some(nal.data().to_vec());
        }
    }
}
