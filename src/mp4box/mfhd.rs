use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::{
    box_start, BoxHeader, read_box_header_ext, BoxType, Mp4Box, ReadBox, Result, HEADER_EXT_SIZE, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MfhdBox {
    pub meta: BoxMeta,
    pub version: u8,
    pub flags: u32,
    pub sequence_number: u32,
}

impl MfhdBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE + HEADER_EXT_SIZE + 4
    }
}

impl Mp4Box for MfhdBox {
    fn box_type(&self) -> BoxType {
        BoxType::MfhdBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize mfhd"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!("sequence_number={}", self.sequence_number))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for MfhdBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::MfhdBox, start, size);

        let (version, flags) = read_box_header_ext(reader)?;
        let sequence_number = reader.read_u32::<BigEndian>()?;

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "mfhd")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::MfhdBox),
            version,
            flags,
            sequence_number,
        })
    }
}
