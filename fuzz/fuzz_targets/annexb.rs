//! Tests the feeder doesn't crash and has consistent output between a working buffer holding the
//! whole input and every smaller buffer still large enough for the largest unit.

#![no_main]
use avc_source::feeder::NalFeeder;
use hex_slice::AsHex;
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fn units(data: &[u8], capacity: usize) -> Vec<Vec<u8>> {
    let mut feeder = NalFeeder::new(Cursor::new(data), capacity).unwrap();
    let mut units = vec![];
    while let Some(nal) = feeder.next_nal().unwrap() {
        assert!(!nal.is_empty());
        assert!(nal.len() <= capacity);
        units.push(nal.data().to_vec());
    }
    units
}

fn start_codes(data: &[u8]) -> Vec<usize> {
    let mut codes = vec![];
    let mut i = 0;
    while i + 3 <= data.len() {
        if data[i..i + 3] == [0, 0, 1] {
            codes.push(i);
            i += 3;
        } else {
            i += 1;
        }
    }
    codes
}

fuzz_target!(|data: &[u8]| {
    let whole = units(data, data.len().max(5));

    // each unit needs its own start code through to the 0x01 of the next one to be in view at
    // once; the last one runs to the end of the input
    let codes = start_codes(data);
    let min_capacity = codes
        .windows(2)
        .map(|w| w[1] + 3 - w[0])
        .chain(codes.last().map(|&c| data.len() - c))
        .max()
        .unwrap_or(0)
        .max(5);

    for capacity in min_capacity..data.len() {
        let split = units(data, capacity);
        assert!(whole == split,
                "inconsistent output.\n\
                capacity:    {}\n\
                input:       {:02x}\n\
                whole:       {:02x?}\n\
                split:       {:02x?}",
                capacity,
                data.as_hex(),
                whole,
                split);
    }
});
