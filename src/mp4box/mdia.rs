use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::{
    box_start, check_child_fits, skip_padding, skip_unknown, BoxHeader, BoxType, Mp4Box, ReadBox,
    Result, HEADER_SIZE,
};
use crate::mp4box::{hdlr::HdlrBox, mdhd::MdhdBox, minf::MinfBox};
use crate::tree::{BoxMeta, ParseContext};
use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MdiaBox {
    pub meta: BoxMeta,
    pub mdhd: MdhdBox,
    pub hdlr: HdlrBox,
    pub minf: MinfBox,
}

impl MdiaBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE + self.mdhd.box_size() + self.hdlr.box_size() + self.minf.box_size()
    }
}

impl Mp4Box for MdiaBox {
    fn box_type(&self) -> BoxType {
        BoxType::MdiaBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize mdia"))
    }

    fn summary(&self) -> Result<String> {
        Ok(String::new())
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for MdiaBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::MdiaBox, start, size);

        let mut mdhd = None;
        let mut hdlr = None;
        let mut minf = None;

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
            check_child_fits(size, header.size, "mdia box contains an oversized child box")?;

            match header.name {
                BoxType::MdhdBox => {
                    if mdhd.is_none() {
                        mdhd = Some(MdhdBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::HdlrBox => {
                    if hdlr.is_none() {
                        hdlr = Some(HdlrBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::MinfBox => {
                    if minf.is_none() {
                        minf = Some(MinfBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                _ => {
                    skip_unknown(reader, header, ctx, depth + 1)?;
                }
            }
        }

        let Some(mdhd) = mdhd else {
            return Err(Error::BoxNotFound(BoxType::MdhdBox));
        };
        let Some(hdlr) = hdlr else {
            return Err(Error::BoxNotFound(BoxType::HdlrBox));
        };
        let Some(minf) = minf else {
            return Err(Error::BoxNotFound(BoxType::MinfBox));
        };

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "mdia")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::MdiaBox),
            mdhd,
            hdlr,
            minf,
        })
    }
}
