use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::{mehd::MehdBox, trex::TrexBox};
use crate::mp4box::{
    box_start, check_child_fits, skip_padding, skip_unknown, BoxHeader, BoxType, Error, Mp4Box,
    ReadBox, Result, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MvexBox {
    pub meta: BoxMeta,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mehd: Option<MehdBox>,

    pub trexs: Vec<TrexBox>,
}

impl MvexBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE
            + self.mehd.as_ref().map_or(0, |x| x.box_size())
            + self.trexs.iter().map(|x| x.box_size()).sum::<u64>()
    }
}

impl Mp4Box for MvexBox {
    fn box_type(&self) -> BoxType {
        BoxType::MvexBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize mvex"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!("trexs={}", self.trexs.len()))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for MvexBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::MvexBox, start, size);

        let mut mehd = None;
        let mut trexs = Vec::new();

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
            check_child_fits(size, header.size, "mvex box contains an oversized child box")?;

            match header.name {
                BoxType::MehdBox => {
                    if mehd.is_none() {
                        mehd = Some(MehdBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::TrexBox => {
                    trexs.push(TrexBox::read_box(reader, header, ctx, depth + 1)?);
                }
                _ => {
                    skip_unknown(reader, header, ctx, depth + 1)?;
                }
            }
        }

        if trexs.is_empty() {
            return Err(Error::BoxNotFound(BoxType::TrexBox));
        }

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "mvex")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::MvexBox),
            mehd,
            trexs,
        })
    }
}
