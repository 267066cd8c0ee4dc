use isobmff::dispatch::{recognized_pairs, ROOT};
use isobmff::BoxType;

/// The dispatch table is a static mirror of the real `match` arms; sanity
/// check a handful of edges from each region of the tree rather than the
/// whole table (the table's own unit tests cover internal consistency).
#[test]
fn root_level_boxes_are_all_present() {
    let pairs = recognized_pairs();
    for child in [
        BoxType::FtypBox,
        BoxType::MoovBox,
        BoxType::MoofBox,
        BoxType::MfraBox,
        BoxType::EmsgBox,
        BoxType::FreeBox,
        BoxType::MdatBox,
    ] {
        assert!(
            pairs.contains(&(ROOT, child)),
            "expected {child:?} to be legal at the top level"
        );
    }
}

#[test]
fn fragment_tree_edges_are_present() {
    let pairs = recognized_pairs();
    assert!(pairs.contains(&(Some(BoxType::MoofBox), BoxType::MfhdBox)));
    assert!(pairs.contains(&(Some(BoxType::MoofBox), BoxType::TrafBox)));
    assert!(pairs.contains(&(Some(BoxType::TrafBox), BoxType::TfhdBox)));
    assert!(pairs.contains(&(Some(BoxType::TrafBox), BoxType::TfdtBox)));
    assert!(pairs.contains(&(Some(BoxType::TrafBox), BoxType::TrunBox)));
    assert!(pairs.contains(&(Some(BoxType::TrafBox), BoxType::SdtpBox)));
    assert!(pairs.contains(&(Some(BoxType::MfraBox), BoxType::TfraBox)));
    assert!(pairs.contains(&(Some(BoxType::MfraBox), BoxType::MfroBox)));
}

#[test]
fn trak_level_quicktime_containers_are_present() {
    let pairs = recognized_pairs();
    assert!(pairs.contains(&(Some(BoxType::TrakBox), BoxType::TrefBox)));
    assert!(pairs.contains(&(Some(BoxType::TrakBox), BoxType::TaptBox)));
    assert!(pairs.contains(&(Some(BoxType::TrakBox), BoxType::UdtaBox)));
    assert!(pairs.contains(&(Some(BoxType::TrakBox), BoxType::MetaBox)));
}
