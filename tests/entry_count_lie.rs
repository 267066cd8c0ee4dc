mod common;

use isobmff::{Error, Root};

/// An `stts` declaring far more entries than could possibly fit inside its
/// own declared size must fail rather than read past the box (or the file).
#[test]
fn stts_entry_count_lie_is_rejected() {
    let mut bytes = Vec::new();
    bytes.extend(common::ftyp());

    let stbl = common::bx(
        b"stbl",
        common::children(&[
            common::stsd_empty(),
            common::stts_entry_count_lie(),
            common::stsc_empty(),
        ]),
    );
    let minf = common::bx(
        b"minf",
        common::children(&[common::vmhd(), common::dinf_empty(), stbl]),
    );
    let mdia = common::bx(
        b"mdia",
        common::children(&[common::mdhd(), common::hdlr(b"vide", "h"), minf]),
    );
    let trak = common::bx(b"trak", common::children(&[common::tkhd(1), mdia]));
    bytes.extend(common::moov(&[trak]));

    let err = Root::read(std::io::Cursor::new(bytes), false)
        .expect_err("entry-count lie should fail the parse");
    assert!(matches!(err, Error::InvalidData(_)));
}
