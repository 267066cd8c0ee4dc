use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::{
    box_start, check_child_fits, read_box_header_ext, skip_padding, skip_unknown, BoxHeader,
    BoxType, Mp4Box, ReadBox, Result, HEADER_EXT_SIZE, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};

/// QuickTime's "base media information header", found in place of `vmhd`/
/// `smhd` for text and other non-audio/video tracks. Only `gmin` is decoded;
/// an optional `text` child (QuickTime's text-track display defaults) is
/// otherwise opaque here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GmhdBox {
    pub meta: BoxMeta,
    pub gmin: Option<GminBox>,
}

impl GmhdBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE + self.gmin.as_ref().map(|g| g.box_size()).unwrap_or(0)
    }
}

impl Mp4Box for GmhdBox {
    fn box_type(&self) -> BoxType {
        BoxType::GmhdBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize gmhd"))
    }

    fn summary(&self) -> Result<String> {
        Ok(String::new())
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for GmhdBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::GmhdBox, start, size);

        let mut gmin = None;
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
            check_child_fits(size, header.size, "gmhd box contains an oversized child box")?;

            match header.name {
                BoxType::GminBox => {
                    if gmin.is_none() {
                        gmin = Some(GminBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                _ => {
                    skip_unknown(reader, header, ctx, depth + 1)?;
                }
            }
        }

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "gmhd")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::GmhdBox),
            gmin,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GminBox {
    pub meta: BoxMeta,
    pub version: u8,
    pub flags: u32,
    pub graphics_mode: u16,
    pub op_color: crate::mp4box::RgbColor,
    pub balance: i16,
}

impl GminBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE + HEADER_EXT_SIZE + 12
    }
}

impl Mp4Box for GminBox {
    fn box_type(&self) -> BoxType {
        BoxType::GminBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize gmin"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!("graphics_mode={}", self.graphics_mode))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for GminBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::GminBox, start, size);
        let (version, flags) = read_box_header_ext(reader)?;

        let graphics_mode = reader.read_u16::<BigEndian>()?;
        let op_color = crate::mp4box::RgbColor {
            red: reader.read_u16::<BigEndian>()?,
            green: reader.read_u16::<BigEndian>()?,
            blue: reader.read_u16::<BigEndian>()?,
        };
        let balance = reader.read_i16::<BigEndian>()?;
        reader.read_u16::<BigEndian>()?; // reserved

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "gmin")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::GminBox),
            version,
            flags,
            graphics_mode,
            op_color,
            balance,
        })
    }
}
