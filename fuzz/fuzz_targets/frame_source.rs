//! Drives the whole source over arbitrary input, checking the ordering guarantees of its output.

#![no_main]
use avc_source::config::{InputCodec, SourceConfig};
use avc_source::source::FrameSource;
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let config = SourceConfig {
        input_codec: InputCodec::Avc,
        max_frames: 64,
        buffer_capacity: Some(256),
        ..SourceConfig::default()
    };
    let mut source = FrameSource::from_config(&config, Cursor::new(data)).unwrap();
    source.start();
    let mut config_units = 0;
    let mut frames = 0i64;
    while let Ok(unit) = source.read() {
        assert!(unit.payload().starts_with(&[0, 0, 0, 1]));
        if unit.is_codec_config() {
            config_units += 1;
        } else {
            assert_eq!(frames * 1_000_000 / 30, unit.presentation_time_us());
            assert_eq!(unit.payload()[4] & 0x1f == 5, unit.is_sync_frame());
            frames += 1;
        }
    }
    assert!(config_units <= 1);
    assert!(frames <= 64);
    source.stop();
});
