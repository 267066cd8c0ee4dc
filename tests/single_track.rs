mod common;

use isobmff::Root;

/// `ftyp` + `moov` (one `trak`) + `mdat` — the common-case single-track movie.
#[test]
fn single_track_movie_parses_full_tree() {
    let mut bytes = Vec::new();
    bytes.extend(common::ftyp());
    bytes.extend(common::moov(&[common::trak(1)]));
    bytes.extend(common::mdat(&[0xAA; 16]));

    let root = Root::read(std::io::Cursor::new(bytes), false).expect("should parse");

    let moov = root.moov.expect("moov should be present");
    assert_eq!(moov.mvhd.timescale, 1000);
    assert_eq!(moov.traks.len(), 1);

    let trak = &moov.traks[0];
    assert_eq!(trak.tkhd.track_id, 1);
    assert_eq!(trak.mdia.mdhd.timescale, 1000);
    assert_eq!(trak.mdia.hdlr.handler_type.to_string(), "vide");
    assert!(trak.mdia.minf.vmhd.is_some());
    assert_eq!(trak.mdia.minf.stbl.stts.entries.len(), 0);
}

#[test]
fn dump_mode_records_every_node_in_document_order() {
    let mut bytes = Vec::new();
    bytes.extend(common::ftyp());
    bytes.extend(common::moov(&[common::trak(1)]));
    bytes.extend(common::mdat(&[0; 4]));

    let root = Root::read(std::io::Cursor::new(bytes), true).expect("should parse");
    let handlers = root.print_handlers();
    assert!(!handlers.is_empty());

    // The first node recorded under dump mode should be the top of the
    // typed tree that self-registers: moov.
    let first_node_depth = handlers
        .iter()
        .find_map(|e| match e {
            isobmff::PrintEntry::Node { depth, .. } => Some(*depth),
            _ => None,
        })
        .expect("at least one recorded node");
    assert_eq!(first_node_depth, 0);
}
