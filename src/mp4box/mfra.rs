use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::{
    box_start, check_child_fits, read_box_header_ext, skip_padding, skip_unknown, BoxHeader,
    BoxType, Mp4Box, ReadBox, Result, HEADER_EXT_SIZE, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};
use crate::Error;

/// One `tfra` random-access point: the presentation time and byte offset
/// of a sync sample, plus where in the referenced `moof`/`traf`/`trun`
/// that sample lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TfraEntry {
    pub time: u64,
    pub moof_offset: u64,
    pub traf_number: u32,
    pub trun_number: u32,
    pub sample_number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TfraBox {
    pub meta: BoxMeta,
    pub version: u8,
    pub flags: u32,
    pub track_id: u32,

    #[serde(skip_serializing)]
    pub entries: Vec<TfraEntry>,
}

impl TfraBox {
    pub fn get_size(&self) -> u64 {
        let entry_size = if self.version == 1 { 8 + 8 } else { 4 + 4 } + 3 * 4;
        HEADER_SIZE + HEADER_EXT_SIZE + 12 + self.entries.len() as u64 * entry_size
    }
}

impl Mp4Box for TfraBox {
    fn box_type(&self) -> BoxType {
        BoxType::TfraBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize tfra"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!(
            "track_id={} entries={}",
            self.track_id,
            self.entries.len()
        ))
    }
}

/// Reads a `length_code`-sized (1-4 byte) big-endian field, per the 2-bit
/// size codes packed into `tfra`'s reserved word.
fn read_sized<R: Read>(reader: &mut R, length_code: u8) -> Result<u64> {
    Ok(match length_code {
        0 => reader.read_u8()? as u64,
        1 => reader.read_u16::<BigEndian>()? as u64,
        2 => {
            let mut buf = [0u8; 3];
            reader.read_exact(&mut buf)?;
            ((buf[0] as u64) << 16) | ((buf[1] as u64) << 8) | buf[2] as u64
        }
        _ => reader.read_u32::<BigEndian>()? as u64,
    })
}

impl<R: Read + Seek> ReadBox<&mut R> for TfraBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::TfraBox, start, size);

        let (version, flags) = read_box_header_ext(reader)?;
        let track_id = reader.read_u32::<BigEndian>()?;

        let sizes = reader.read_u32::<BigEndian>()?;
        let traf_size_code = ((sizes >> 4) & 0x3) as u8;
        let trun_size_code = ((sizes >> 2) & 0x3) as u8;
        let sample_size_code = (sizes & 0x3) as u8;

        let number_of_entry = reader.read_u32::<BigEndian>()?;

        let entry_size = (if version == 1 { 16 } else { 8 })
            + (traf_size_code as u64 + 1)
            + (trun_size_code as u64 + 1)
            + (sample_size_code as u64 + 1);
        if u64::from(number_of_entry)
            > size
                .saturating_sub(HEADER_SIZE + HEADER_EXT_SIZE + 12)
                .checked_div(entry_size)
                .unwrap_or(0)
        {
            return Err(Error::InvalidData(
                "tfra number_of_entry indicates more entries than could fit in the box",
            ));
        }

        let mut entries = Vec::with_capacity(number_of_entry as usize);
        for _ in 0..number_of_entry {
            let (time, moof_offset) = if version == 1 {
                (
                    reader.read_u64::<BigEndian>()?,
                    reader.read_u64::<BigEndian>()?,
                )
            } else {
                (
                    reader.read_u32::<BigEndian>()? as u64,
                    reader.read_u32::<BigEndian>()? as u64,
                )
            };
            let traf_number = read_sized(reader, traf_size_code)? as u32;
            let trun_number = read_sized(reader, trun_size_code)? as u32;
            let sample_number = read_sized(reader, sample_size_code)? as u32;

            entries.push(TfraEntry {
                time,
                moof_offset,
                traf_number,
                trun_number,
                sample_number,
            });
        }

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "tfra")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::TfraBox),
            version,
            flags,
            track_id,
            entries,
        })
    }
}

/// `mfro`: mirrors the enclosing `mfra`'s total size, letting a reader
/// seeking from the end of the file find where `mfra` begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MfroBox {
    pub meta: BoxMeta,
    pub version: u8,
    pub flags: u32,
    pub mfra_size: u32,
}

impl MfroBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE + HEADER_EXT_SIZE + 4
    }
}

impl Mp4Box for MfroBox {
    fn box_type(&self) -> BoxType {
        BoxType::MfroBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize mfro"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!("mfra_size={}", self.mfra_size))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for MfroBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::MfroBox, start, size);

        let (version, flags) = read_box_header_ext(reader)?;
        let mfra_size = reader.read_u32::<BigEndian>()?;

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "mfro")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::MfroBox),
            version,
            flags,
            mfra_size,
        })
    }
}

/// `mfra`: movie fragment random access, a top-level box (typically at
/// the end of the file) listing sync-sample locations per track so a
/// player can seek without scanning every `moof`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MfraBox {
    pub meta: BoxMeta,

    #[serde(rename = "tfra")]
    pub tfras: Vec<TfraBox>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mfro: Option<MfroBox>,
}

impl MfraBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE
            + self.tfras.iter().map(|t| t.box_size()).sum::<u64>()
            + self.mfro.as_ref().map(|m| m.box_size()).unwrap_or(0)
    }
}

impl Mp4Box for MfraBox {
    fn box_type(&self) -> BoxType {
        BoxType::MfraBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize mfra"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!("tfras={}", self.tfras.len()))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for MfraBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::MfraBox, start, size);

        let mut tfras = Vec::new();
        let mut mfro = None;

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
            check_child_fits(size, header.size, "mfra box contains an oversized child box")?;

            match header.name {
                BoxType::TfraBox => {
                    tfras.push(TfraBox::read_box(reader, header, ctx, depth + 1)?);
                }
                BoxType::MfroBox => {
                    if mfro.is_none() {
                        mfro = Some(MfroBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                _ => {
                    skip_unknown(reader, header, ctx, depth + 1)?;
                }
            }
        }

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "mfra")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::MfraBox),
            tfras,
            mfro,
        })
    }
}
