use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::{
    box_start, BoxHeader, read_box_header_ext, value_i16, BoxType, Mp4Box, ReadBox, Result, HEADER_EXT_SIZE,
    HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};
use crate::types::FixedPointI8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmhdBox {
    pub meta: BoxMeta,
    pub version: u8,
    pub flags: u32,

    #[serde(with = "value_i16")]
    pub balance: FixedPointI8,
}

impl SmhdBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE + HEADER_EXT_SIZE + 4
    }
}

impl Mp4Box for SmhdBox {
    fn box_type(&self) -> BoxType {
        BoxType::SmhdBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize smhd"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!("balance={}", self.balance.value()))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for SmhdBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::SmhdBox, start, size);

        let (version, flags) = read_box_header_ext(reader)?;

        let balance = FixedPointI8::new_raw(reader.read_i16::<BigEndian>()?);
        reader.read_u16::<BigEndian>()?; // reserved

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "smhd")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::SmhdBox),
            version,
            flags,
            balance,
        })
    }
}
