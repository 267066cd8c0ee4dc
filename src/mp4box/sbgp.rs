use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek};
use std::mem::size_of;

use crate::mp4box::{
    box_start, BoxHeader, read_box_header_ext, BoxType, Mp4Box, ReadBox, Result, HEADER_EXT_SIZE, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};
use crate::types::FourCC;
use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SbgpEntry {
    pub sample_count: u32,
    pub group_description_index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SbgpBox {
    pub meta: BoxMeta,
    pub version: u8,
    pub flags: u32,
    pub grouping_type: FourCC,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub grouping_type_parameter: Option<u32>,

    #[serde(skip_serializing)]
    pub entries: Vec<SbgpEntry>,
}

impl SbgpBox {
    pub fn get_size(&self) -> u64 {
        let mut size = HEADER_SIZE + HEADER_EXT_SIZE + 4;
        if self.grouping_type_parameter.is_some() {
            size += 4;
        }
        size + 4 + (8 * self.entries.len() as u64)
    }
}

impl Mp4Box for SbgpBox {
    fn box_type(&self) -> BoxType {
        BoxType::SbgpBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize sbgp"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!(
            "grouping_type={} entries={}",
            self.grouping_type,
            self.entries.len()
        ))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for SbgpBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::SbgpBox, start, size);

        let (version, flags) = read_box_header_ext(reader)?;

        let grouping_type = FourCC::from(reader.read_u32::<BigEndian>()?);
        let grouping_type_parameter = if version == 1 {
            Some(reader.read_u32::<BigEndian>()?)
        } else {
            None
        };

        let header_size =
            HEADER_SIZE + HEADER_EXT_SIZE + 4 + if version == 1 { 4 } else { 0 };
        let other_size = size_of::<u32>();
        let entry_size = size_of::<u32>() * 2;
        let entry_count = reader.read_u32::<BigEndian>()?;
        if u64::from(entry_count)
            > size
                .saturating_sub(header_size)
                .saturating_sub(other_size as u64)
                / entry_size as u64
        {
            return Err(Error::InvalidData(
                "sbgp entry_count indicates more entries than could fit in the box",
            ));
        }
        let mut entries = Vec::with_capacity(entry_count as usize);
        for _ in 0..entry_count {
            entries.push(SbgpEntry {
                sample_count: reader.read_u32::<BigEndian>()?,
                group_description_index: reader.read_u32::<BigEndian>()?,
            });
        }

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "sbgp")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::SbgpBox),
            version,
            flags,
            grouping_type,
            grouping_type_parameter,
            entries,
        })
    }
}
