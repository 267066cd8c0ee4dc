mod common;

use isobmff::Root;

/// `ftyp` + `moov` (empty movie, `mvex` implied by a fragmented brand) +
/// `moof`/`traf`/`tfhd`/`tfdt`/`trun` — a fragmented stream's top-level
/// siblings.
#[test]
fn fragment_moof_traf_trun_parses_as_siblings_of_moov() {
    let mut bytes = Vec::new();
    bytes.extend(common::ftyp());
    bytes.extend(common::moov(&[]));
    bytes.extend(common::moof(1, &[common::traf(1, 0, &[100, 200, 150])]));
    bytes.extend(common::mdat(&[0u8; 450]));

    let root = Root::read(std::io::Cursor::new(bytes), false).expect("should parse");

    assert!(root.moov.is_some());
    assert_eq!(root.moofs.len(), 1);

    let moof = &root.moofs[0];
    assert_eq!(moof.mfhd.sequence_number, 1);
    assert_eq!(moof.trafs.len(), 1);

    let traf = &moof.trafs[0];
    assert_eq!(traf.tfhd.track_id, 1);
    assert_eq!(
        traf.tfdt.as_ref().map(|t| t.base_media_decode_time),
        Some(0)
    );
    assert_eq!(traf.truns.len(), 1);
    assert_eq!(traf.truns[0].sample_sizes, vec![100, 200, 150]);
}

#[test]
fn multiple_moof_siblings_are_collected_in_order() {
    let mut bytes = Vec::new();
    bytes.extend(common::ftyp());
    bytes.extend(common::moof(1, &[common::traf(1, 0, &[10])]));
    bytes.extend(common::mdat(&[0u8; 10]));
    bytes.extend(common::moof(2, &[common::traf(1, 10, &[20])]));
    bytes.extend(common::mdat(&[0u8; 20]));

    let root = Root::read(std::io::Cursor::new(bytes), false).expect("should parse");
    assert_eq!(root.moofs.len(), 2);
    assert_eq!(root.moofs[0].mfhd.sequence_number, 1);
    assert_eq!(root.moofs[1].mfhd.sequence_number, 2);
}
