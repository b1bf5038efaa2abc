#![no_main]

use libfuzzer_sys::fuzz_target;
use lineio::{BufferConfig, File};
use std::io::Cursor;

fuzz_target!(|data: Vec<u8>| {
    let configs = vec![
        // Tiny, fixed: every record goes through accumulation
        BufferConfig::new(1, 1).unwrap(),
        // Small with growth
        BufferConfig::new(4, 64).unwrap(),
        // Odd sizes
        BufferConfig::new(7, 100).unwrap(),
        // Default config
        BufferConfig::default(),
    ];

    for config in configs {
        let mut file = File::from_stream(Cursor::new(data.clone()), None, config);
        let lines = file.read_lines().unwrap();

        // Verify: concatenation reproduces the input
        let joined: Vec<u8> = lines.iter().flat_map(|l| l.iter().copied()).collect();
        assert_eq!(joined, data);

        // Verify: every record but the last ends at its only '\n'
        for (i, line) in lines.iter().enumerate() {
            assert!(!line.is_empty());
            let newlines = line.iter().filter(|&&b| b == b'\n').count();
            if i < lines.len() - 1 {
                assert_eq!(newlines, 1);
                assert_eq!(line.last(), Some(&b'\n'));
            } else {
                assert!(newlines <= 1);
            }
        }

        // Verify: the stream stays exhausted
        assert!(file.read_line().unwrap().is_empty());
    }
});
