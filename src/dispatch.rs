//! A static, enumerable mirror of the parent/child legality that each typed
//! container's own `match` arms already enforce at the call-stack level.
//!
//! This table is not consulted at parse time — dispatch is just which
//! function gets called from which match arm, so a box can only ever be
//! decoded by its one legal parent's reader. It exists purely so the
//! dispatch rules are independently testable (see the unit tests below and
//! `tests/dispatch.rs`): any (parent, child) pair that actually appears in a
//! `match` block under `src/mp4box/` should show up here, and vice versa.

use crate::mp4box::BoxType;

pub const ROOT: Option<BoxType> = None;

/// One legal `(parent, child)` edge. `parent == None` means "legal at the
/// top level of the file".
pub fn recognized_pairs() -> Vec<(Option<BoxType>, BoxType)> {
    use BoxType::*;
    vec![
        (ROOT, FtypBox),
        (ROOT, FreeBox),
        (ROOT, SkipBox),
        (ROOT, MdatBox),
        (ROOT, MoovBox),
        (ROOT, MoofBox),
        (ROOT, MfraBox),
        (ROOT, EmsgBox),
        (Some(MoovBox), MvhdBox),
        (Some(MoovBox), UdtaBox),
        (Some(MoovBox), MetaBox),
        (Some(MoovBox), MvexBox),
        (Some(MoovBox), TrakBox),
        (Some(UdtaBox), MetaBox),
        (Some(MetaBox), HdlrBox),
        (Some(MetaBox), IlstBox),
        (Some(IlstBox), NameBox),
        (Some(IlstBox), DayBox),
        (Some(IlstBox), CovrBox),
        (Some(IlstBox), DescBox),
        (Some(NameBox), DataBox),
        (Some(DayBox), DataBox),
        (Some(CovrBox), DataBox),
        (Some(DescBox), DataBox),
        (Some(MvexBox), MehdBox),
        (Some(MvexBox), TrexBox),
        (Some(TrakBox), TkhdBox),
        (Some(TrakBox), TrefBox),
        (Some(TrakBox), TaptBox),
        (Some(TrakBox), EdtsBox),
        (Some(TrakBox), MetaBox),
        (Some(TrakBox), UdtaBox),
        (Some(TrakBox), MdiaBox),
        (Some(TaptBox), ClefBox),
        (Some(TaptBox), ProfBox),
        (Some(TaptBox), EnofBox),
        (Some(EdtsBox), ElstBox),
        (Some(MdiaBox), MdhdBox),
        (Some(MdiaBox), HdlrBox),
        (Some(MdiaBox), MinfBox),
        (Some(MinfBox), VmhdBox),
        (Some(MinfBox), SmhdBox),
        (Some(MinfBox), GmhdBox),
        (Some(MinfBox), DinfBox),
        (Some(MinfBox), StblBox),
        (Some(GmhdBox), GminBox),
        (Some(GmhdBox), TextBox),
        (Some(DinfBox), DrefBox),
        (Some(DrefBox), UrlBox),
        (Some(DrefBox), UrnBox),
        (Some(StblBox), StsdBox),
        (Some(StblBox), SttsBox),
        (Some(StblBox), CttsBox),
        (Some(StblBox), StssBox),
        (Some(StblBox), StpsBox),
        (Some(StblBox), SdtpBox),
        (Some(StblBox), StscBox),
        (Some(StblBox), StszBox),
        (Some(StblBox), Stz2Box),
        (Some(StblBox), StcoBox),
        (Some(StblBox), Co64Box),
        (Some(StblBox), SgpdBox),
        (Some(StblBox), SbgpBox),
        (Some(StsdBox), Avc1Box),
        (Some(StsdBox), Hev1Box),
        (Some(StsdBox), Hvc1Box),
        (Some(StsdBox), Mp4vBox),
        (Some(StsdBox), Mp4aBox),
        (Some(StsdBox), TwosBox),
        (Some(StsdBox), SowtBox),
        (Some(StsdBox), TextBox),
        (Some(StsdBox), Tx3gBox),
        (Some(Avc1Box), AvcCBox),
        (Some(Avc1Box), ClapBox),
        (Some(Avc1Box), PaspBox),
        (Some(Avc1Box), ColrBox),
        (Some(Avc1Box), BtrtBox),
        (Some(Hev1Box), HvcCBox),
        (Some(Hvc1Box), HvcCBox),
        (Some(Mp4aBox), EsdsBox),
        (Some(Mp4aBox), ChanBox),
        (Some(Mp4aBox), WaveBox),
        (Some(WaveBox), FrmaBox),
        (Some(WaveBox), EndaBox),
        (Some(WaveBox), Mp4aBox),
        (Some(WaveBox), EsdsBox),
        (Some(Tx3gBox), FtabBox),
        (Some(MoofBox), MfhdBox),
        (Some(MoofBox), TrafBox),
        (Some(TrafBox), TfhdBox),
        (Some(TrafBox), TfdtBox),
        (Some(TrafBox), TrunBox),
        (Some(TrafBox), SdtpBox),
        (Some(MfraBox), TfraBox),
        (Some(MfraBox), MfroBox),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_no_duplicate_edges() {
        let pairs = recognized_pairs();
        let mut seen = std::collections::HashSet::new();
        for (parent, child) in &pairs {
            let key = (parent.map(u32::from), u32::from(*child));
            assert!(seen.insert(key), "duplicate dispatch edge: {key:?}");
        }
    }

    #[test]
    fn moov_children_are_registered() {
        let pairs = recognized_pairs();
        assert!(pairs.contains(&(Some(BoxType::MoovBox), BoxType::TrakBox)));
        assert!(pairs.contains(&(Some(BoxType::MoovBox), BoxType::MvhdBox)));
    }
}
