use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::{mfhd::MfhdBox, traf::TrafBox};
use crate::mp4box::{
    box_start, check_child_fits, skip_padding, skip_unknown, BoxHeader, BoxType, Error, Mp4Box,
    ReadBox, Result, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoofBox {
    pub meta: BoxMeta,
    pub mfhd: MfhdBox,

    #[serde(rename = "traf")]
    pub trafs: Vec<TrafBox>,
}

impl MoofBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE
            + self.mfhd.box_size()
            + self.trafs.iter().map(|t| t.box_size()).sum::<u64>()
    }
}

impl Mp4Box for MoofBox {
    fn box_type(&self) -> BoxType {
        BoxType::MoofBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize moof"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!("trafs={}", self.trafs.len()))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for MoofBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::MoofBox, start, size);

        let mut mfhd = None;
        let mut trafs = Vec::new();

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
            check_child_fits(size, header.size, "moof box contains an oversized child box")?;

            match header.name {
                BoxType::MfhdBox => {
                    if mfhd.is_none() {
                        mfhd = Some(MfhdBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::TrafBox => {
                    trafs.push(TrafBox::read_box(reader, header, ctx, depth + 1)?);
                }
                _ => {
                    skip_unknown(reader, header, ctx, depth + 1)?;
                }
            }
        }

        let Some(mfhd) = mfhd else {
            return Err(Error::BoxNotFound(BoxType::MfhdBox));
        };

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "moof")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::MoofBox),
            mfhd,
            trafs,
        })
    }
}
