use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::{
    box_start, check_child_fits, skip_padding, skip_unknown, BoxHeader, BoxType, Mp4Box, ReadBox,
    Result, HEADER_SIZE,
};
use crate::mp4box::{
    co64::Co64Box, ctts::CttsBox, sbgp::SbgpBox, sgpd::SgpdBox, stco::StcoBox, stps::StpsBox,
    stsc::StscBox, stsd::StsdBox, stss::StssBox, stsz::StszBox, stts::SttsBox,
};
use crate::mp4box::sdtp::SdtpBox;
use crate::mp4box::stsz::Stz2Box;
use crate::tree::{BoxMeta, ParseContext};
use crate::Error;

/// The sample table: everything needed to map samples to bytes, times,
/// and keyframes for one track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StblBox {
    pub meta: BoxMeta,
    pub stsd: StsdBox,
    pub stts: SttsBox,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ctts: Option<CttsBox>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stss: Option<StssBox>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stps: Option<StpsBox>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdtp: Option<SdtpBox>,
    pub stsc: StscBox,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stsz: Option<StszBox>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stz2: Option<Stz2Box>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stco: Option<StcoBox>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub co64: Option<Co64Box>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sgpd: Vec<SgpdBox>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sbgp: Vec<SbgpBox>,
}

impl StblBox {
    pub fn get_size(&self) -> u64 {
        let mut size = HEADER_SIZE + self.stsd.box_size() + self.stts.box_size() + self.stsc.box_size();
        if let Some(b) = &self.ctts {
            size += b.box_size();
        }
        if let Some(b) = &self.stss {
            size += b.box_size();
        }
        if let Some(b) = &self.stps {
            size += b.box_size();
        }
        if let Some(b) = &self.sdtp {
            size += b.box_size();
        }
        if let Some(b) = &self.stsz {
            size += b.box_size();
        }
        if let Some(b) = &self.stz2 {
            size += b.box_size();
        }
        if let Some(b) = &self.stco {
            size += b.box_size();
        }
        if let Some(b) = &self.co64 {
            size += b.box_size();
        }
        for b in &self.sgpd {
            size += b.box_size();
        }
        for b in &self.sbgp {
            size += b.box_size();
        }
        size
    }
}

impl Mp4Box for StblBox {
    fn box_type(&self) -> BoxType {
        BoxType::StblBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize stbl"))
    }

    fn summary(&self) -> Result<String> {
        Ok(String::new())
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for StblBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::StblBox, start, size);

        let mut stsd = None;
        let mut stts = None;
        let mut ctts = None;
        let mut stss = None;
        let mut stps = None;
        let mut sdtp = None;
        let mut stsc = None;
        let mut stsz = None;
        let mut stz2 = None;
        let mut stco = None;
        let mut co64 = None;
        let mut sgpd = Vec::new();
        let mut sbgp = Vec::new();

        let end = start + size;
        loop {
            let pos = reader.stream_position()?;
            if pos >= end {
                break;
            }
            if end - pos < 8 {
                skip_padding(reader, pos, end, ctx, depth + 1)?;
                break;
            }

            let header = BoxHeader::read(reader)?;
            check_child_fits(size, header.size, "stbl box contains an oversized child box")?;

            match header.name {
                BoxType::StsdBox => {
                    if stsd.is_none() {
                        stsd = Some(StsdBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::SttsBox => {
                    if stts.is_none() {
                        stts = Some(SttsBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::CttsBox => {
                    if ctts.is_none() {
                        ctts = Some(CttsBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::StssBox => {
                    if stss.is_none() {
                        stss = Some(StssBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::StpsBox => {
                    if stps.is_none() {
                        stps = Some(StpsBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::SdtpBox => {
                    if sdtp.is_none() {
                        sdtp = Some(SdtpBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::StscBox => {
                    if stsc.is_none() {
                        stsc = Some(StscBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::StszBox => {
                    if stsz.is_none() {
                        stsz = Some(StszBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::Stz2Box => {
                    if stz2.is_none() {
                        stz2 = Some(Stz2Box::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::StcoBox => {
                    if stco.is_none() {
                        stco = Some(StcoBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::Co64Box => {
                    if co64.is_none() {
                        co64 = Some(Co64Box::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::SgpdBox => {
                    sgpd.push(SgpdBox::read_box(reader, header, ctx, depth + 1)?);
                }
                BoxType::SbgpBox => {
                    sbgp.push(SbgpBox::read_box(reader, header, ctx, depth + 1)?);
                }
                _ => {
                    skip_unknown(reader, header, ctx, depth + 1)?;
                }
            }
        }

        let Some(stsd) = stsd else {
            return Err(Error::BoxNotFound(BoxType::StsdBox));
        };
        let Some(stts) = stts else {
            return Err(Error::BoxNotFound(BoxType::SttsBox));
        };
        let Some(stsc) = stsc else {
            return Err(Error::BoxNotFound(BoxType::StscBox));
        };

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "stbl")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::StblBox),
            stsd,
            stts,
            ctts,
            stss,
            stps,
            sdtp,
            stsc,
            stsz,
            stz2,
            stco,
            co64,
            sgpd,
            sbgp,
        })
    }
}
