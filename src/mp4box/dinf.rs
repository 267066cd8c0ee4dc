use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek, SeekFrom};

use crate::mp4box::{
    box_start, check_child_fits, read_box_header_ext, skip_padding, skip_unknown, BoxHeader,
    BoxType, Mp4Box, ReadBox, Result, HEADER_EXT_SIZE, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};

/// Data-reference entries only ever record whether the media is stored
/// in this file (`url `/`urn `with the self-contained flag set) or
/// elsewhere; payload URLs are not needed by a demuxer-side reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrefEntry {
    pub meta: BoxMeta,
    pub box_type: BoxType,
    pub version: u8,
    pub flags: u32,
}

impl DrefEntry {
    const SELF_CONTAINED: u32 = 0x000001;

    pub fn is_self_contained(&self) -> bool {
        self.flags & Self::SELF_CONTAINED != 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrefBox {
    pub meta: BoxMeta,
    pub version: u8,
    pub flags: u32,
    pub entries: Vec<DrefEntry>,
}

impl DrefBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE
            + HEADER_EXT_SIZE
            + 4
            + self.entries.len() as u64 * (HEADER_SIZE + HEADER_EXT_SIZE)
    }
}

impl Mp4Box for DrefBox {
    fn box_type(&self) -> BoxType {
        BoxType::DrefBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize dref"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!("entry_count={}", self.entries.len()))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for DrefBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::DrefBox, start, size);
        let (version, flags) = read_box_header_ext(reader)?;

        let entry_count = reader.read_u32::<BigEndian>()?;
        let mut entries = Vec::with_capacity(entry_count.min(4096) as usize);

        let end = start + size;
        for _ in 0..entry_count {
            if reader.stream_position()? >= end {
                break;
            }
            let entry_header = BoxHeader::read(reader)?;
            check_child_fits(size, entry_header.size, "dref box contains an oversized entry")?;
            let entry_start = box_start(reader, &entry_header)?;
            let (entry_version, entry_flags) = read_box_header_ext(reader)?;
            let consumed = reader.stream_position()? - entry_start;
            if entry_header.size > consumed {
                reader.seek(SeekFrom::Current((entry_header.size - consumed) as i64))?;
            }
            entries.push(DrefEntry {
                meta: BoxMeta::new(entry_start, entry_header.size, entry_header.name),
                box_type: entry_header.name,
                version: entry_version,
                flags: entry_flags,
            });
        }

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "dref")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::DrefBox),
            version,
            flags,
            entries,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DinfBox {
    pub meta: BoxMeta,
    pub dref: Option<DrefBox>,
}

impl DinfBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE + self.dref.as_ref().map(|d| d.box_size()).unwrap_or(0)
    }
}

impl Mp4Box for DinfBox {
    fn box_type(&self) -> BoxType {
        BoxType::DinfBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize dinf"))
    }

    fn summary(&self) -> Result<String> {
        Ok(String::new())
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for DinfBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::DinfBox, start, size);

        let mut dref = None;
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
            check_child_fits(size, header.size, "dinf box contains an oversized child box")?;

            match header.name {
                BoxType::DrefBox => {
                    if dref.is_none() {
                        dref = Some(DrefBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                _ => {
                    skip_unknown(reader, header, ctx, depth + 1)?;
                }
            }
        }

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "dinf")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::DinfBox),
            dref,
        })
    }
}
