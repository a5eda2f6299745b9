use avc_source::config::{InputCodec, SourceConfig};
use avc_source::format::ColorFormat;
use avc_source::source::FrameSource;
use hex_slice::AsHex;
use std::time::Instant;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (path, size) = match (args.next(), args.next()) {
        (Some(path), size) => (path, size),
        _ => {
            eprintln!("Usage: dump path/to/data.h264 [WIDTHxHEIGHT] [FPS] [COLOR]");
            std::process::exit(1);
        }
    };
    let mut config = SourceConfig {
        input_codec: if path.ends_with(".yuv") {
            InputCodec::Yuv
        } else {
            InputCodec::Avc
        },
        ..SourceConfig::default()
    };
    if let Some((w, h)) = size.as_deref().and_then(|s| s.split_once('x')) {
        config.width = w.parse().expect("width");
        config.height = h.parse().expect("height");
    }
    if let Some(fps) = args.next() {
        config.frame_rate = fps.parse().expect("frame rate");
    }
    if let Some(color) = args.next() {
        let value = color.parse().expect("color");
        config.color_format = ColorFormat::from_cli_value(value).expect("unsupported color format");
    }

    let mut source = FrameSource::open(&config, &path).expect("open");
    println!("{:#?}", source.describe_format());

    let start = Instant::now();
    source.start();
    loop {
        match source.read() {
            Ok(unit) => {
                let payload = unit.payload();
                let preview = &payload[..payload.len().min(12)];
                println!(
                    "pts={:>10}us sync={:<5} config={:<5} len={:>7} {:02x}",
                    unit.presentation_time_us(),
                    unit.is_sync_frame(),
                    unit.is_codec_config(),
                    payload.len(),
                    preview.as_hex()
                );
            }
            Err(e) if e.is_end_of_stream() => break,
            Err(e) => {
                eprintln!("read failed: {}", e);
                std::process::exit(1);
            }
        }
    }
    source.stop();
    let elapsed = start.elapsed();

    if let Some(codec) = source.codec_string() {
        println!("codec: {}", codec);
    }
    let frames = source.frames_output();
    println!("{} frames in {} us", frames, elapsed.as_micros());
    if !elapsed.is_zero() {
        println!("{:.2} fps", frames as f64 / elapsed.as_secs_f64());
    }
}
