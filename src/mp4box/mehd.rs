use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::{
    box_start, BoxHeader, read_box_header_ext, BoxType, Mp4Box, ReadBox, Result, HEADER_EXT_SIZE, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};
use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MehdBox {
    pub meta: BoxMeta,
    pub version: u8,
    pub flags: u32,
    pub fragment_duration: u64,
}

impl MehdBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE + HEADER_EXT_SIZE + if self.version == 1 { 8 } else { 4 }
    }
}

impl Mp4Box for MehdBox {
    fn box_type(&self) -> BoxType {
        BoxType::MehdBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize mehd"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!("fragment_duration={}", self.fragment_duration))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for MehdBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::MehdBox, start, size);

        let (version, flags) = read_box_header_ext(reader)?;

        let fragment_duration = match version {
            1 => reader.read_u64::<BigEndian>()?,
            0 => reader.read_u32::<BigEndian>()? as u64,
            _ => return Err(Error::InvalidData("mehd version must be 0 or 1")),
        };

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "mehd")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::MehdBox),
            version,
            flags,
            fragment_duration,
        })
    }
}
