#![no_main]

use libfuzzer_sys::fuzz_target;
use lineio::{BufferConfig, File};
use std::io::Cursor;

// First byte picks the buffer capacities, the rest is stream content.
// Alternates read_line and fixed-size reads; the pieces must tile the input.
fuzz_target!(|input: Vec<u8>| {
    let Some((&selector, data)) = input.split_first() else {
        return;
    };
    let initial = (selector & 0x0f) as usize + 1;
    let max = initial + (selector >> 4) as usize * 3;
    let read_len = (selector as usize % 13) + 1;

    let config = BufferConfig::new(initial, max).unwrap();
    let mut file = File::from_stream(Cursor::new(data.to_vec()), None, config);

    let mut joined = Vec::with_capacity(data.len());
    let mut buf = vec![0u8; read_len];
    let mut take_line = true;
    loop {
        if take_line {
            let line = file.read_line().unwrap();
            if line.is_empty() {
                break;
            }
            joined.extend_from_slice(&line);
        } else {
            let n = file.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            joined.extend_from_slice(&buf[..n]);
        }
        take_line = !take_line;
    }

    assert_eq!(joined, data);
});
