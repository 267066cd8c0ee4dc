use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::{
    box_start, check_child_fits, skip_padding, skip_unknown, BoxHeader, BoxType, Error, Mp4Box,
    ReadBox, Result, HEADER_SIZE,
};
use crate::mp4box::{
    edts::EdtsBox, mdia::MdiaBox, meta::MetaBox, tapt::TaptBox, tkhd::TkhdBox, tref::TrefBox,
    udta::UdtaBox,
};
use crate::tree::{BoxMeta, ParseContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrakBox {
    pub node: BoxMeta,
    pub tkhd: TkhdBox,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tref: Option<TrefBox>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tapt: Option<TaptBox>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub edts: Option<EdtsBox>,

    pub mdia: MdiaBox,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub udta: Option<UdtaBox>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaBox>,
}

impl TrakBox {
    pub fn get_size(&self) -> u64 {
        let mut size = HEADER_SIZE + self.tkhd.box_size();
        if let Some(tref) = &self.tref {
            size += tref.box_size();
        }
        if let Some(tapt) = &self.tapt {
            size += tapt.box_size();
        }
        if let Some(edts) = &self.edts {
            size += edts.box_size();
        }
        size += self.mdia.box_size();
        if let Some(udta) = &self.udta {
            size += udta.box_size();
        }
        if let Some(meta) = &self.meta {
            size += meta.box_size();
        }
        size
    }
}

impl Mp4Box for TrakBox {
    fn box_type(&self) -> BoxType {
        BoxType::TrakBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize trak"))
    }

    fn summary(&self) -> Result<String> {
        Ok(String::new())
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for TrakBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::TrakBox, start, size);

        let mut tkhd = None;
        let mut tref = None;
        let mut tapt = None;
        let mut edts = None;
        let mut mdia = None;
        let mut udta = None;
        let mut meta = None;

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
            check_child_fits(size, header.size, "trak box contains an oversized child box")?;

            match header.name {
                BoxType::TkhdBox => {
                    if tkhd.is_none() {
                        tkhd = Some(TkhdBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::TrefBox => {
                    if tref.is_none() {
                        tref = Some(TrefBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::TaptBox => {
                    if tapt.is_none() {
                        tapt = Some(TaptBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::EdtsBox => {
                    if edts.is_none() {
                        edts = Some(EdtsBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::MdiaBox => {
                    if mdia.is_none() {
                        mdia = Some(MdiaBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::UdtaBox => {
                    if udta.is_none() {
                        udta = Some(UdtaBox::read_box(reader, header, ctx, depth + 1)?);
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
                _ => {
                    skip_unknown(reader, header, ctx, depth + 1)?;
                }
            }
        }

        let Some(tkhd) = tkhd else {
            return Err(Error::BoxNotFound(BoxType::TkhdBox));
        };
        let Some(mdia) = mdia else {
            return Err(Error::BoxNotFound(BoxType::MdiaBox));
        };

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "trak")?;

        Ok(Self {
            node: BoxMeta::new(start, size, BoxType::TrakBox),
            tkhd,
            tref,
            tapt,
            edts,
            mdia,
            udta,
            meta,
        })
    }
}
