use byteorder::ReadBytesExt;
use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::{
    box_start, BoxHeader, read_box_header_ext, BoxType, Mp4Box, ReadBox, Result, HEADER_EXT_SIZE, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};

/// One sample's dependency byte: `is_leading` (2 bits), `sample_depends_on`
/// (2 bits), `sample_is_depended_on` (2 bits), `sample_has_redundancy`
/// (2 bits) — the same four-field layout `trun`/`tfhd` sample flags carry,
/// but stored one byte per sample instead of packed into a 32-bit word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SdtpEntry {
    pub is_leading: u8,
    pub sample_depends_on: u8,
    pub sample_is_depended_on: u8,
    pub sample_has_redundancy: u8,
}

impl SdtpEntry {
    pub fn unpack(byte: u8) -> Self {
        Self {
            is_leading: (byte >> 6) & 0x3,
            sample_depends_on: (byte >> 4) & 0x3,
            sample_is_depended_on: (byte >> 2) & 0x3,
            sample_has_redundancy: byte & 0x3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SdtpBox {
    pub meta: BoxMeta,
    pub version: u8,
    pub flags: u32,

    #[serde(skip_serializing)]
    pub entries: Vec<SdtpEntry>,
}

impl SdtpBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE + HEADER_EXT_SIZE + self.entries.len() as u64
    }
}

impl Mp4Box for SdtpBox {
    fn box_type(&self) -> BoxType {
        BoxType::SdtpBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize sdtp"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!("entries={}", self.entries.len()))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for SdtpBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::SdtpBox, start, size);

        let (version, flags) = read_box_header_ext(reader)?;

        let remaining = size.saturating_sub(HEADER_SIZE + HEADER_EXT_SIZE);
        let mut entries = Vec::with_capacity(remaining as usize);
        for _ in 0..remaining {
            entries.push(SdtpEntry::unpack(reader.read_u8()?));
        }

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "sdtp")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::SdtpBox),
            version,
            flags,
            entries,
        })
    }
}
