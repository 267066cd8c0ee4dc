use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::{
    box_start, check_child_fits, skip_padding, skip_unknown, BoxHeader, BoxType, Mp4Box, ReadBox,
    Result, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};
use crate::types::FixedPointU16;

/// One QuickTime track-aperture dimension pair (`clef`/`prof`/`enof`):
/// a fullbox header followed by a 32-bit-fixed-point width/height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApertureDimensions {
    pub width: FixedPointU16,
    pub height: FixedPointU16,
}

/// QuickTime's track aperture mode dimensions container, describing how
/// a track's clean aperture relates to its encoded and production
/// apertures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaptBox {
    pub meta: BoxMeta,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub clef: Option<ApertureDimensions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prof: Option<ApertureDimensions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enof: Option<ApertureDimensions>,
}

impl TaptBox {
    pub fn get_size(&self) -> u64 {
        let mut size = HEADER_SIZE;
        if self.clef.is_some() {
            size += HEADER_SIZE + 4 + 8;
        }
        if self.prof.is_some() {
            size += HEADER_SIZE + 4 + 8;
        }
        if self.enof.is_some() {
            size += HEADER_SIZE + 4 + 8;
        }
        size
    }
}

impl Mp4Box for TaptBox {
    fn box_type(&self) -> BoxType {
        BoxType::TaptBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize tapt"))
    }

    fn summary(&self) -> Result<String> {
        Ok(String::new())
    }
}

fn read_dimensions<R: Read + Seek>(reader: &mut R) -> Result<ApertureDimensions> {
    crate::mp4box::read_box_header_ext(reader)?; // version + flags, always 0
    Ok(ApertureDimensions {
        width: FixedPointU16::new_raw(reader.read_u32::<BigEndian>()?),
        height: FixedPointU16::new_raw(reader.read_u32::<BigEndian>()?),
    })
}

impl<R: Read + Seek> ReadBox<&mut R> for TaptBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::TaptBox, start, size);

        let mut clef = None;
        let mut prof = None;
        let mut enof = None;

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
            check_child_fits(size, header.size, "tapt box contains an oversized child box")?;

            match header.name {
                BoxType::ClefBox if clef.is_none() => clef = Some(read_dimensions(reader)?),
                BoxType::ProfBox if prof.is_none() => prof = Some(read_dimensions(reader)?),
                BoxType::EnofBox if enof.is_none() => enof = Some(read_dimensions(reader)?),
                _ => {
                    skip_unknown(reader, header, ctx, depth + 1)?;
                }
            }
        }

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "tapt")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::TaptBox),
            clef,
            prof,
            enof,
        })
    }
}
