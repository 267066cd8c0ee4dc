use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::{
    box_start, check_child_fits, skip_padding, skip_unknown, BoxHeader, BoxType, Error, Mp4Box,
    ReadBox, Result, HEADER_SIZE,
};
use crate::mp4box::{meta::MetaBox, mvex::MvexBox, mvhd::MvhdBox, trak::TrakBox, udta::UdtaBox};
use crate::tree::{BoxMeta, ParseContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoovBox {
    pub node: BoxMeta,
    pub mvhd: MvhdBox,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaBox>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mvex: Option<MvexBox>,

    #[serde(rename = "trak")]
    pub traks: Vec<TrakBox>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub udta: Option<UdtaBox>,
}

impl MoovBox {
    pub fn get_size(&self) -> u64 {
        let mut size = HEADER_SIZE + self.mvhd.box_size();
        if let Some(meta) = &self.meta {
            size += meta.box_size();
        }
        if let Some(mvex) = &self.mvex {
            size += mvex.box_size();
        }
        for trak in &self.traks {
            size += trak.box_size();
        }
        if let Some(udta) = &self.udta {
            size += udta.box_size();
        }
        size
    }
}

impl Mp4Box for MoovBox {
    fn box_type(&self) -> BoxType {
        BoxType::MoovBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize moov"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!("traks={}", self.traks.len()))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for MoovBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::MoovBox, start, size);

        let mut mvhd = None;
        let mut meta = None;
        let mut udta = None;
        let mut mvex = None;
        let mut traks = Vec::new();

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
            check_child_fits(size, header.size, "moov box contains an oversized child box")?;

            match header.name {
                BoxType::MvhdBox => {
                    if mvhd.is_none() {
                        mvhd = Some(MvhdBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::MetaBox => {
                    if meta.is_none() {
                        meta = Some(MetaBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::MvexBox => {
                    if mvex.is_none() {
                        mvex = Some(MvexBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::TrakBox => {
                    traks.push(TrakBox::read_box(reader, header, ctx, depth + 1)?);
                }
                BoxType::UdtaBox => {
                    if udta.is_none() {
                        udta = Some(UdtaBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                _ => {
                    skip_unknown(reader, header, ctx, depth + 1)?;
                }
            }
        }

        let Some(mvhd) = mvhd else {
            return Err(Error::BoxNotFound(BoxType::MvhdBox));
        };

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "moov")?;

        Ok(Self {
            node: BoxMeta::new(start, size, BoxType::MoovBox),
            mvhd,
            meta,
            mvex,
            traks,
            udta,
        })
    }
}
