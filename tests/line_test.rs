// Integration tests for line reads over in-memory streams
// Tests cover: record splitting, buffer growth tiers, line/read interleaving,
// invalidation on write/seek, and round-trip properties

use std::io::Cursor;

use bytes::Bytes;
use lineio::{BufferConfig, File, Origin};
use proptest::prelude::*;
use rstest::rstest;

type MemoryFile = File<Cursor<Vec<u8>>>;

fn memory_file(data: &[u8], initial: usize, max: usize) -> MemoryFile {
    File::from_stream(
        Cursor::new(data.to_vec()),
        None,
        BufferConfig::new(initial, max).unwrap(),
    )
}

fn concat(lines: &[Bytes]) -> Vec<u8> {
    lines.iter().flat_map(|l| l.iter().copied()).collect()
}

// ============================================================================
// Record Splitting
// ============================================================================

#[test]
fn test_three_lines_at_fixed_capacity() {
    let mut file = memory_file(b"AAAAAAAAAAAA\nBB\nCCC\n", 12, 12);

    assert_eq!(file.read_line().unwrap(), &b"AAAAAAAAAAAA\n"[..]);
    assert_eq!(file.read_line().unwrap(), &b"BB\n"[..]);
    assert_eq!(file.read_line().unwrap(), &b"CCC\n"[..]);
    assert!(file.read_line().unwrap().is_empty());
}

#[test]
fn test_empty_stream() {
    let mut file = memory_file(b"", 8, 8);
    assert!(file.read_line().unwrap().is_empty());
    assert!(file.read_lines().unwrap().is_empty());
}

#[test]
fn test_only_newlines() {
    let mut file = memory_file(b"\n\n\n", 2, 2);
    assert_eq!(file.read_lines().unwrap().len(), 3);
}

#[test]
fn test_binary_bytes_are_opaque() {
    let data = b"\x00\xff\r\n\x80\x7f\n";
    let mut file = memory_file(data, 4, 8);
    assert_eq!(
        file.read_lines().unwrap(),
        vec![
            Bytes::from_static(b"\x00\xff\r\n"),
            Bytes::from_static(b"\x80\x7f\n"),
        ]
    );
}

// ============================================================================
// Growth Tiers
// ============================================================================

#[rstest]
#[case::fits_initial(16, 64, 10)]
#[case::one_doubling(16, 64, 20)]
#[case::several_doublings(4, 64, 60)]
#[case::exactly_max(8, 64, 64)]
#[case::just_over_max(8, 64, 65)]
#[case::far_over_max(8, 32, 1000)]
#[case::fixed_capacity(12, 12, 100)]
fn test_long_record_returned_whole(
    #[case] initial: usize,
    #[case] max: usize,
    #[case] len: usize,
) {
    let mut data: Vec<u8> = (0..len - 1).map(|i| b'a' + (i % 26) as u8).collect();
    data.push(b'\n');
    data.extend_from_slice(b"next\n");

    let mut file = memory_file(&data, initial, max);
    assert_eq!(&file.read_line().unwrap()[..], &data[..len]);
    assert_eq!(file.read_line().unwrap(), &b"next\n"[..]);
    assert!(file.read_line().unwrap().is_empty());
}

#[rstest]
#[case(4, 8)]
#[case(8, 8)]
#[case(3, 1024)]
fn test_unterminated_final_record(#[case] initial: usize, #[case] max: usize) {
    let mut file = memory_file(b"first\nno terminator here", initial, max);
    assert_eq!(file.read_line().unwrap(), &b"first\n"[..]);
    assert_eq!(file.read_line().unwrap(), &b"no terminator here"[..]);
    assert!(file.read_line().unwrap().is_empty());
}

// ============================================================================
// Interleaving and Invalidation
// ============================================================================

#[rstest]
#[case(1)]
#[case(5)]
#[case(17)]
#[case(1000)]
fn test_read_after_line_returns_remaining_bytes(#[case] n: usize) {
    let data = b"line one\nline two\nbinary tail \x01\x02\x03";
    let mut file = memory_file(data, 8, 16);

    assert_eq!(file.read_line().unwrap(), &b"line one\n"[..]);

    let mut rest = Vec::new();
    let mut buf = vec![0u8; n];
    loop {
        let got = file.read(&mut buf).unwrap();
        rest.extend_from_slice(&buf[..got]);
        if got < n {
            break;
        }
    }
    assert_eq!(rest, &data[9..]);
}

#[test]
fn test_write_after_partial_line_discards_backlog() {
    let mut file = memory_file(b"aaaa\nbbbb\ncccc\n", 8, 8);

    assert_eq!(file.read_line().unwrap(), &b"aaaa\n"[..]);
    assert_eq!(file.buffered_len(), 3);

    // Raw cursor is at 8; overwrite "b\nc".
    file.write(b"XYZ").unwrap();
    assert_eq!(file.buffered_len(), 0);
    assert_eq!(file.read_line().unwrap(), &b"ccc\n"[..]);

    file.seek(Origin::Start, 0).unwrap();
    assert_eq!(
        file.read_lines().unwrap(),
        vec![
            Bytes::from_static(b"aaaa\n"),
            Bytes::from_static(b"bbbXYZccc\n"),
        ]
    );
}

#[test]
fn test_seek_start_eight_discards_backlog() {
    let mut file = memory_file(b"0123456789abcdef\n", 64, 64);
    let mut head = [0u8; 2];
    file.read_line().unwrap();
    file.seek(Origin::Start, 8).unwrap();

    assert_eq!(file.read(&mut head).unwrap(), 2);
    assert_eq!(&head, b"89");
}

#[test]
fn test_truncate_then_read_lines() {
    let mut file = memory_file(b"keep\ndrop\n", 4, 4);
    assert_eq!(file.read_line().unwrap(), &b"keep\n"[..]);

    file.truncate(5).unwrap();
    assert!(file.read_line().unwrap().is_empty());

    file.seek(Origin::Start, 0).unwrap();
    assert_eq!(file.read_lines().unwrap(), vec![Bytes::from_static(b"keep\n")]);
}

// ============================================================================
// Properties
// ============================================================================

fn capacities() -> impl Strategy<Value = (usize, usize)> {
    (1usize..32, 0usize..64).prop_map(|(initial, extra)| (initial, initial + extra))
}

proptest! {
    #[test]
    fn prop_lines_round_trip(
        data in proptest::collection::vec(
            prop_oneof![4 => any::<u8>(), 1 => Just(b'\n')],
            0..512,
        ),
        (initial, max) in capacities(),
    ) {
        let mut file = memory_file(&data, initial, max);
        let lines = file.read_lines().unwrap();

        prop_assert_eq!(concat(&lines), data.clone());

        // Splits only ever follow a '\n'; only the last record may lack one.
        for line in lines.iter().take(lines.len().saturating_sub(1)) {
            prop_assert_eq!(line.last(), Some(&b'\n'));
            prop_assert_eq!(line.iter().filter(|&&b| b == b'\n').count(), 1);
        }
        if let Some(last) = lines.last() {
            prop_assert!(!last.is_empty());
            prop_assert!(last.iter().filter(|&&b| b == b'\n').count() <= 1);
        }
    }

    #[test]
    fn prop_read_after_line_is_exact_tail(
        data in proptest::collection::vec(
            prop_oneof![8 => any::<u8>(), 1 => Just(b'\n')],
            0..256,
        ),
        (initial, max) in capacities(),
        n in 1usize..300,
    ) {
        let mut file = memory_file(&data, initial, max);
        let line = file.read_line().unwrap();

        let mut rest = Vec::new();
        let mut buf = vec![0u8; n];
        loop {
            let got = file.read(&mut buf).unwrap();
            rest.extend_from_slice(&buf[..got]);
            if got < n {
                break;
            }
        }

        let mut joined = line.to_vec();
        joined.extend_from_slice(&rest);
        prop_assert_eq!(joined, data);
    }
}
