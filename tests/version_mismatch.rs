mod common;

use isobmff::{Error, Root};

/// An `mvhd` carrying a version this reader doesn't know (anything but 0
/// or 1) must fail the whole parse rather than silently guess a layout.
#[test]
fn mvhd_with_unknown_version_is_rejected() {
    let mut bytes = Vec::new();
    bytes.extend(common::ftyp());

    let bad_mvhd = common::bx(b"mvhd", common::ext(2, 0));
    let moov = common::bx(b"moov", bad_mvhd);
    bytes.extend(moov);

    let err = Root::read(std::io::Cursor::new(bytes), false)
        .expect_err("unsupported mvhd version should fail the parse");
    assert!(matches!(err, Error::InvalidData(_)));
}
