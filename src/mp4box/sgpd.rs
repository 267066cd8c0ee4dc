use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek, SeekFrom};

use crate::mp4box::{
    box_start, BoxHeader, read_box_header_ext, BoxType, Mp4Box, ReadBox, Result, HEADER_EXT_SIZE, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};
use crate::types::FourCC;
use crate::Error;

/// One sample group's description entry. The payload format is defined by
/// `grouping_type` (e.g. `roll`, `rap `) and is not decoded further here —
/// callers interested in a specific grouping type parse `description` for
/// themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SgpdEntry {
    #[serde(skip_serializing)]
    pub description: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SgpdBox {
    pub meta: BoxMeta,
    pub version: u8,
    pub flags: u32,
    pub grouping_type: FourCC,
    pub default_length: u32,
    pub entries: Vec<SgpdEntry>,
}

impl SgpdBox {
    pub fn get_size(&self) -> u64 {
        let mut size = HEADER_SIZE + HEADER_EXT_SIZE + 4;
        if self.version >= 1 {
            size += 4;
        }
        if self.version >= 2 {
            size += 4;
        }
        size += 4;
        for entry in &self.entries {
            if self.version == 1 && self.default_length == 0 {
                size += 4;
            }
            size += entry.description.len() as u64;
        }
        size
    }
}

impl Mp4Box for SgpdBox {
    fn box_type(&self) -> BoxType {
        BoxType::SgpdBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize sgpd"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!(
            "grouping_type={} entries={}",
            self.grouping_type,
            self.entries.len()
        ))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for SgpdBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::SgpdBox, start, size);

        let (version, flags) = read_box_header_ext(reader)?;

        let grouping_type = FourCC::from(reader.read_u32::<BigEndian>()?);
        if version >= 2 {
            reader.read_u32::<BigEndian>()?; // default_sample_description_index, version 2 only
        }
        let default_length = if version == 1 {
            reader.read_u32::<BigEndian>()?
        } else {
            0
        };

        let entry_count = reader.read_u32::<BigEndian>()?;
        let end = start + size;
        let mut entries = Vec::with_capacity(entry_count.min(4096) as usize);
        for _ in 0..entry_count {
            if reader.stream_position()? >= end {
                break;
            }
            let description_length = if version == 1 && default_length == 0 {
                reader.read_u32::<BigEndian>()?
            } else {
                default_length
            };
            if u64::from(description_length) > end.saturating_sub(reader.stream_position()?) {
                return Err(Error::InvalidData(
                    "sgpd entry description_length overruns the box",
                ));
            }
            let mut description = vec![0u8; description_length as usize];
            reader.read_exact(&mut description)?;
            entries.push(SgpdEntry { description });
        }

        if reader.stream_position()? < end {
            reader.seek(SeekFrom::Start(end))?;
        }

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::SgpdBox),
            version,
            flags,
            grouping_type,
            default_length,
            entries,
        })
    }
}
