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
pub struct StszBox {
    pub meta: BoxMeta,
    pub version: u8,
    pub flags: u32,
    pub sample_size: u32,
    pub sample_count: u32,

    #[serde(skip_serializing)]
    pub sample_sizes: Vec<u32>,
}

impl StszBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE + HEADER_EXT_SIZE + 8 + (4 * self.sample_sizes.len() as u64)
    }
}

impl Mp4Box for StszBox {
    fn box_type(&self) -> BoxType {
        BoxType::StszBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize stsz"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!(
            "sample_size={} sample_count={} sample_sizes={}",
            self.sample_size,
            self.sample_count,
            self.sample_sizes.len()
        ))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for StszBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::StszBox, start, size);

        let (version, flags) = read_box_header_ext(reader)?;

        let header_size = HEADER_SIZE + HEADER_EXT_SIZE;
        let other_size = size_of::<u32>() * 2;
        let sample_size = reader.read_u32::<BigEndian>()?;
        let stsz_item_size = if sample_size == 0 {
            size_of::<u32>()
        } else {
            0
        };
        let sample_count = reader.read_u32::<BigEndian>()?;
        let mut sample_sizes = Vec::new();
        if sample_size == 0 {
            if u64::from(sample_count)
                > size
                    .saturating_sub(header_size)
                    .saturating_sub(other_size as u64)
                    / stsz_item_size as u64
            {
                return Err(Error::InvalidData(
                    "stsz sample_count indicates more values than could fit in the box",
                ));
            }
            sample_sizes.reserve(sample_count as usize);
            for _ in 0..sample_count {
                sample_sizes.push(reader.read_u32::<BigEndian>()?);
            }
        }

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "stsz")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::StszBox),
            version,
            flags,
            sample_size,
            sample_count,
            sample_sizes,
        })
    }
}

/// QuickTime's compact variant of [`StszBox`]: a per-entry field width
/// (4, 8, 16, or 32 bits, packed two-per-byte for the 4-bit case) instead
/// of `stsz`'s fixed 32-bit sample sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stz2Box {
    pub meta: BoxMeta,
    pub version: u8,
    pub flags: u32,
    pub field_size: u8,
    pub sample_count: u32,

    #[serde(skip_serializing)]
    pub sample_sizes: Vec<u32>,
}

impl Stz2Box {
    pub fn get_size(&self) -> u64 {
        let bits = self.field_size as u64 * self.sample_count as u64;
        HEADER_SIZE + HEADER_EXT_SIZE + 8 + bits.div_ceil(8)
    }
}

impl Mp4Box for Stz2Box {
    fn box_type(&self) -> BoxType {
        BoxType::Stz2Box
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize stz2"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!(
            "field_size={} sample_count={}",
            self.field_size, self.sample_count
        ))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for Stz2Box {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::Stz2Box, start, size);

        let (version, flags) = read_box_header_ext(reader)?;

        reader.read_u8()?; // reserved
        reader.read_u16::<BigEndian>()?; // reserved
        let field_size = reader.read_u8()?;
        if ![4u8, 8, 16, 32].contains(&field_size) {
            return Err(Error::InvalidData("stz2 field_size must be 4, 8, 16 or 32"));
        }
        let sample_count = reader.read_u32::<BigEndian>()?;

        let total_bits = field_size as u64 * sample_count as u64;
        let available_bits = (size.saturating_sub(HEADER_SIZE + HEADER_EXT_SIZE + 8)) * 8;
        if total_bits > available_bits {
            return Err(Error::InvalidData(
                "stz2 sample_count indicates more values than could fit in the box",
            ));
        }

        let mut sample_sizes = Vec::with_capacity(sample_count as usize);
        match field_size {
            4 => {
                let mut pending: Option<u8> = None;
                for _ in 0..sample_count {
                    let value = match pending.take() {
                        Some(low) => low,
                        None => {
                            let byte = reader.read_u8()?;
                            pending = Some(byte & 0x0f);
                            (byte >> 4) & 0x0f
                        }
                    };
                    sample_sizes.push(value as u32);
                }
            }
            8 => {
                for _ in 0..sample_count {
                    sample_sizes.push(reader.read_u8()? as u32);
                }
            }
            16 => {
                for _ in 0..sample_count {
                    sample_sizes.push(reader.read_u16::<BigEndian>()? as u32);
                }
            }
            32 => {
                for _ in 0..sample_count {
                    sample_sizes.push(reader.read_u32::<BigEndian>()?);
                }
            }
            _ => unreachable!(),
        }

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "stz2")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::Stz2Box),
            version,
            flags,
            field_size,
            sample_count,
            sample_sizes,
        })
    }
}
