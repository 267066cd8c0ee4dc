use std::io::{Read, Seek};

use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;

use crate::mp4box::{box_start, BoxHeader, BoxType, Mp4Box, ReadBox, Result, HEADER_SIZE};
use crate::tree::{BoxMeta, ParseContext};
use crate::types::DataType;

/// The `data` child of an `ilst` item: a well-known-type tag followed by
/// the raw value bytes (text, a binary blob, cover art, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataBox {
    pub meta: BoxMeta,
    pub data_type: DataType,

    #[serde(skip_serializing)]
    pub data: Vec<u8>,
}

impl DataBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE + 4 + 4 + self.data.len() as u64
    }
}

impl Mp4Box for DataBox {
    fn box_type(&self) -> BoxType {
        BoxType::DataBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize data"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!("type={:?} len={}", self.data_type, self.data.len()))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for DataBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::DataBox, start, size);

        let data_type = DataType::from(reader.read_u32::<BigEndian>()?);
        reader.read_u32::<BigEndian>()?; // reserved = 0 (locale)

        let current = reader.stream_position()?;
        let mut data = vec![0u8; start.saturating_add(size).saturating_sub(current) as usize];
        reader.read_exact(&mut data)?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::DataBox),
            data_type,
            data,
        })
    }
}
