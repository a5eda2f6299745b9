use avc_source::config::{ConfigError, InputCodec, SourceConfig};
use avc_source::format::Mime;
use avc_source::source::FrameSource;
use avc_source::SourceError;
use hex_literal::hex;
use std::io::{self, Cursor, Read};
use std::sync::mpsc;
use std::thread;

const SPS: [u8; 11] = hex!("67 42 00 1e ab 40 b0 4b 4d 40 40");
const PPS: [u8; 4] = hex!("68 ce 3c 80");
const IDR: [u8; 6] = hex!("65 88 84 0c 21 7f");
const NON_IDR: [u8; 5] = hex!("41 9a 02 1c 80");

fn annexb(units: &[&[u8]]) -> Vec<u8> {
    let mut data = vec![];
    for unit in units {
        data.extend_from_slice(&[0, 0, 0, 1]);
        data.extend_from_slice(unit);
    }
    data
}

fn with_start_code(unit: &[u8]) -> Vec<u8> {
    annexb(&[unit])
}

fn avc_config() -> SourceConfig {
    SourceConfig {
        input_codec: InputCodec::Avc,
        frame_rate: 30,
        ..SourceConfig::default()
    }
}

fn avc_source<R: Read>(config: &SourceConfig, reader: R) -> FrameSource<R> {
    let mut source = FrameSource::from_config(config, reader).unwrap();
    source.start();
    source
}

#[test]
fn config_unit_then_idr() {
    let data = annexb(&[&SPS, &PPS, &IDR]);
    let mut source = FrameSource::from_config(&avc_config(), Cursor::new(data)).unwrap();
    let format = source.describe_format();
    assert_eq!(Mime::Avc, format.mime);
    assert_eq!((176, 144), (format.width, format.height));
    source.start();

    let unit = source.read().unwrap();
    assert!(unit.is_codec_config());
    assert!(!unit.is_sync_frame());
    assert_eq!(&annexb(&[&SPS, &PPS])[..], unit.payload());
    unit.release();

    let unit = source.read().unwrap();
    assert!(!unit.is_codec_config());
    assert!(unit.is_sync_frame());
    assert_eq!(0, unit.presentation_time_us());
    assert_eq!(0, unit.decode_time_us());
    assert_eq!(&with_start_code(&IDR)[..], unit.payload());
    unit.release();

    assert!(source.read().unwrap_err().is_end_of_stream());
    source.stop();
    assert_eq!(1, source.frames_output());
    assert_eq!(
        Some("avc1.42001e".to_string()),
        source.codec_string().map(|s| s.to_lowercase())
    );
}

#[test]
fn frame_limit_of_three() {
    let data = annexb(&[&SPS, &PPS, &IDR, &IDR, &IDR, &IDR]);
    let config = SourceConfig {
        max_frames: 3,
        ..avc_config()
    };
    let mut source = avc_source(&config, Cursor::new(data));
    assert!(source.read().unwrap().is_codec_config());
    for _ in 0..3 {
        assert!(source.read().unwrap().is_sync_frame());
    }
    assert!(source.read().unwrap_err().is_end_of_stream());
}

#[test]
fn zero_frame_limit() {
    let data = annexb(&[&SPS, &PPS, &IDR]);
    let config = SourceConfig {
        max_frames: 0,
        ..avc_config()
    };
    let mut source = avc_source(&config, Cursor::new(data));
    assert!(source.read().unwrap_err().is_end_of_stream());
}

#[test]
fn unterminated_final_unit_is_flushed() {
    let data = annexb(&[&SPS, &PPS, &IDR, &NON_IDR]);
    let mut source = avc_source(&avc_config(), Cursor::new(data));
    source.read().unwrap();
    source.read().unwrap();
    let last = source.read().unwrap();
    assert_eq!(&with_start_code(&NON_IDR)[..], last.payload());
    assert!(!last.is_sync_frame());
    assert_eq!(33_333, last.presentation_time_us());
    drop(last);
    assert!(source.read().unwrap_err().is_end_of_stream());
}

#[test]
fn tiny_input_is_end_of_stream() {
    let mut source = avc_source(&avc_config(), Cursor::new(vec![0u8, 0]));
    assert!(source.read().unwrap_err().is_end_of_stream());
}

#[test]
fn input_without_start_code_is_end_of_stream() {
    let mut source = avc_source(&avc_config(), Cursor::new(vec![0x42u8; 1000]));
    assert!(source.read().unwrap_err().is_end_of_stream());
}

#[test]
fn read_before_start() {
    let data = annexb(&[&SPS, &PPS, &IDR]);
    let mut source = FrameSource::from_config(&avc_config(), Cursor::new(data)).unwrap();
    assert!(matches!(source.read(), Err(SourceError::NotStarted)));
}

#[test]
fn invalid_config_rejected() {
    let config = SourceConfig {
        frame_rate: 0,
        ..avc_config()
    };
    assert!(matches!(
        FrameSource::from_config(&config, Cursor::new(Vec::<u8>::new())),
        Err(SourceError::Config(_))
    ));
}

#[test]
fn frame_too_small_for_avc_buffer() {
    let config = SourceConfig {
        width: 2,
        height: 2,
        ..avc_config()
    };
    let data = annexb(&[&SPS, &PPS, &IDR]);
    assert!(matches!(
        FrameSource::from_config(&config, Cursor::new(data)),
        Err(SourceError::Config(ConfigError::BufferTooSmall(4)))
    ));
}

/// Every working-buffer size able to hold the largest unit gives identical output, so start
/// codes split across a refill boundary are always found.
#[test]
fn output_independent_of_buffer_capacity() {
    let units: Vec<&[u8]> = vec![
        &SPS[..],
        &PPS[..],
        &IDR[..],
        &NON_IDR[..],
        &NON_IDR[..],
        &IDR[..],
        &NON_IDR[..],
    ];
    let mut data = annexb(&units);
    // trailing_zero_8bits after the second slice
    let pad_at = annexb(&units[..4]).len();
    data.splice(pad_at..pad_at, [0u8, 0, 0]).for_each(drop);

    let collect = |capacity: usize| {
        let config = SourceConfig {
            buffer_capacity: Some(capacity),
            ..avc_config()
        };
        let mut source = avc_source(&config, Cursor::new(data.clone()));
        let mut out = vec![];
        loop {
            match source.read() {
                Ok(unit) => out.push((unit.payload().to_vec(), unit.meta())),
                Err(e) => {
                    assert!(e.is_end_of_stream(), "{}", e);
                    return out;
                }
            }
        }
    };

    let reference = collect(data.len());
    assert_eq!(1 + units.len() - 2, reference.len());
    assert_eq!(annexb(&[&SPS, &PPS]), reference[0].0);
    for (i, (payload, meta)) in reference[1..].iter().enumerate() {
        assert_eq!(&with_start_code(units[i + 2]), payload);
        assert_eq!(i as i64 * 1_000_000 / 30, meta.presentation_time_us);
        assert_eq!(units[i + 2][0] & 0x1f == 5, meta.is_sync_frame);
    }
    // the SPS with four bytes of start code on each side
    for capacity in SPS.len() + 8..data.len() {
        assert_eq!(reference, collect(capacity), "capacity={}", capacity);
    }
}

#[test]
fn io_error_is_terminal() {
    struct FailAfter {
        data: Cursor<Vec<u8>>,
    }
    impl Read for FailAfter {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
                n => Ok(n),
            }
        }
    }
    let data = annexb(&[&SPS, &PPS, &IDR, &NON_IDR]);
    let config = SourceConfig {
        buffer_capacity: Some(24),
        ..avc_config()
    };
    let mut source = avc_source(
        &config,
        FailAfter {
            data: Cursor::new(data),
        },
    );
    let mut result = source.read().map(|u| u.meta());
    while result.is_ok() {
        result = source.read().map(|u| u.meta());
    }
    match result {
        Err(SourceError::Io(e)) => assert_eq!(io::ErrorKind::ConnectionReset, e.kind()),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn read_waits_for_release() {
    let data = annexb(&[&SPS, &PPS, &IDR, &NON_IDR]);
    let mut source = avc_source(&avc_config(), Cursor::new(data));
    let config_unit = source.read().unwrap();

    let (tx, rx) = mpsc::channel();
    let consumer = thread::spawn(move || {
        let released_len = config_unit.payload().len();
        tx.send(released_len).unwrap();
        drop(config_unit);
    });
    // blocks until the consumer thread drops the codec-config unit
    let idr = source.read().unwrap();
    assert_eq!(annexb(&[&SPS, &PPS]).len(), rx.recv().unwrap());
    assert!(idr.is_sync_frame());
    consumer.join().unwrap();
}

#[test]
fn yuv_source() {
    let config = SourceConfig {
        width: 2,
        height: 2,
        input_codec: InputCodec::Yuv,
        ..SourceConfig::default()
    };
    let mut source = FrameSource::from_config(&config, Cursor::new(vec![7u8; 12])).unwrap();
    assert_eq!(Mime::Raw, source.describe_format().mime);
    assert_eq!(None, source.codec_string());
    source.start();
    for i in 0..2 {
        let frame = source.read().unwrap();
        assert_eq!(&[7u8; 6][..], frame.payload());
        assert_eq!(i * 1_000_000 / 30, frame.presentation_time_us());
    }
    assert!(source.read().unwrap_err().is_end_of_stream());
    source.stop();
    assert_eq!(2, source.frames_output());
}

#[test]
fn restart_renumbers_frames() {
    let data = annexb(&[&SPS, &PPS, &IDR, &NON_IDR, &SPS, &PPS, &IDR]);
    let mut source = avc_source(&avc_config(), Cursor::new(data));
    for _ in 0..3 {
        source.read().unwrap();
    }
    source.stop();
    assert_eq!(2, source.frames_output());

    source.start();
    assert!(source.read().unwrap().is_codec_config());
    let unit = source.read().unwrap();
    assert!(unit.is_sync_frame());
    assert_eq!(0, unit.presentation_time_us());
}
