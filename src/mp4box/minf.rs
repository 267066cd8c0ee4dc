use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::{
    box_start, check_child_fits, skip_padding, skip_unknown, BoxHeader, BoxType, Mp4Box, ReadBox,
    Result, HEADER_SIZE,
};
use crate::mp4box::{dinf::DinfBox, gmhd::GmhdBox, smhd::SmhdBox, stbl::StblBox, vmhd::VmhdBox};
use crate::tree::{BoxMeta, ParseContext};
use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinfBox {
    pub meta: BoxMeta,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vmhd: Option<VmhdBox>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub smhd: Option<SmhdBox>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gmhd: Option<GmhdBox>,

    pub dinf: DinfBox,
    pub stbl: StblBox,
}

impl MinfBox {
    pub fn get_size(&self) -> u64 {
        let mut size = HEADER_SIZE + self.dinf.box_size() + self.stbl.box_size();
        if let Some(vmhd) = &self.vmhd {
            size += vmhd.box_size();
        }
        if let Some(smhd) = &self.smhd {
            size += smhd.box_size();
        }
        if let Some(gmhd) = &self.gmhd {
            size += gmhd.box_size();
        }
        size
    }
}

impl Mp4Box for MinfBox {
    fn box_type(&self) -> BoxType {
        BoxType::MinfBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize minf"))
    }

    fn summary(&self) -> Result<String> {
        Ok(String::new())
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for MinfBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::MinfBox, start, size);

        let mut vmhd = None;
        let mut smhd = None;
        let mut gmhd = None;
        let mut dinf = None;
        let mut stbl = None;

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
            check_child_fits(size, header.size, "minf box contains an oversized child box")?;

            match header.name {
                BoxType::VmhdBox => {
                    if vmhd.is_none() {
                        vmhd = Some(VmhdBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::SmhdBox => {
                    if smhd.is_none() {
                        smhd = Some(SmhdBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::GmhdBox => {
                    if gmhd.is_none() {
                        gmhd = Some(GmhdBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::DinfBox => {
                    if dinf.is_none() {
                        dinf = Some(DinfBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::StblBox => {
                    if stbl.is_none() {
                        stbl = Some(StblBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                _ => {
                    skip_unknown(reader, header, ctx, depth + 1)?;
                }
            }
        }

        let Some(dinf) = dinf else {
            return Err(Error::BoxNotFound(BoxType::DinfBox));
        };
        let Some(stbl) = stbl else {
            return Err(Error::BoxNotFound(BoxType::StblBox));
        };

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "minf")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::MinfBox),
            vmhd,
            smhd,
            gmhd,
            dinf,
            stbl,
        })
    }
}
