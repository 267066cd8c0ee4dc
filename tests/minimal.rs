mod common;

use isobmff::Root;

/// `ftyp` + `mdat`, no `moov` at all — the minimal file that still has to
/// parse successfully.
#[test]
fn minimal_ftyp_and_mdat_parses_with_no_moov() {
    let mut bytes = Vec::new();
    bytes.extend(common::ftyp());
    bytes.extend(common::mdat(&[1, 2, 3, 4]));

    let cursor = std::io::Cursor::new(bytes.clone());
    let root = Root::read(cursor, false).expect("minimal file should parse");

    assert!(root.ftyp.is_some());
    assert!(root.moov.is_none());
    assert!(root.mfra.is_none());
    assert!(root.moofs.is_empty());
    assert_eq!(root.size, bytes.len() as u64);
}

#[test]
fn minimal_file_parses_from_a_non_seekable_stream() {
    let mut bytes = Vec::new();
    bytes.extend(common::ftyp());
    bytes.extend(common::mdat(&[9, 9, 9]));

    let root = Root::read_stream(&bytes[..], false).expect("stream read should succeed");
    assert!(root.ftyp.is_some());
    assert!(root.moov.is_none());
}
