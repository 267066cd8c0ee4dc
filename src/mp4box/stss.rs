use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek};
use std::mem::size_of;

use crate::mp4box::{
    box_start, BoxHeader, read_box_header_ext, BoxType, Mp4Box, ReadBox, Result, HEADER_EXT_SIZE, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};
use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StssBox {
    pub meta: BoxMeta,
    pub version: u8,
    pub flags: u32,

    #[serde(skip_serializing)]
    pub entries: Vec<u32>,
}

impl StssBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE + HEADER_EXT_SIZE + 4 + (4 * self.entries.len() as u64)
    }
}

impl Mp4Box for StssBox {
    fn box_type(&self) -> BoxType {
        BoxType::StssBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize stss"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!("entries={}", self.entries.len()))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for StssBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::StssBox, start, size);

        let (version, flags) = read_box_header_ext(reader)?;

        let header_size = HEADER_SIZE + HEADER_EXT_SIZE;
        let other_size = size_of::<u32>();
        let entry_size = size_of::<u32>();
        let entry_count = reader.read_u32::<BigEndian>()?;
        if u64::from(entry_count)
            > size
                .saturating_sub(header_size)
                .saturating_sub(other_size as u64)
                / entry_size as u64
        {
            return Err(Error::InvalidData(
                "stss entry_count indicates more entries than could fit in the box",
            ));
        }
        let mut entries = Vec::with_capacity(entry_count as usize);
        for _ in 0..entry_count {
            entries.push(reader.read_u32::<BigEndian>()?);
        }

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "stss")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::StssBox),
            version,
            flags,
            entries,
        })
    }
}
