mod common;

use isobmff::{BoxType, PrintEntry, Root};

/// A `tkhd` placed directly under `moov` (its legal parent is `trak`) is
/// not an error: it has no handler there, so it's recorded as unknown and
/// skipped, and the rest of the tree still parses.
#[test]
fn tkhd_directly_under_moov_is_recorded_as_unknown_not_an_error() {
    let mut bytes = Vec::new();
    bytes.extend(common::ftyp());

    let moov_body = common::children(&[common::mvhd(0), common::tkhd(7)]);
    bytes.extend(common::bx(b"moov", moov_body));

    let root = Root::read(std::io::Cursor::new(bytes), true).expect("should still parse");

    let moov = root.moov.expect("moov present");
    assert_eq!(moov.traks.len(), 0);

    let found_unknown_tkhd = root.print_handlers().iter().any(|entry| match entry {
        PrintEntry::Unknown { unknown, .. } => {
            unknown.fourcc == isobmff::FourCC::from(BoxType::TkhdBox)
        }
        _ => false,
    });
    assert!(found_unknown_tkhd, "misplaced tkhd should show up as unknown");
}
