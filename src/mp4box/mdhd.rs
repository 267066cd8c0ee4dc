use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::char::{decode_utf16, REPLACEMENT_CHARACTER};
use std::io::{Read, Seek};

use crate::mp4box::{
    box_start, BoxHeader, read_box_header_ext, BoxType, Mp4Box, ReadBox, Result, HEADER_EXT_SIZE, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};
use crate::types::creation_time;
use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MdhdBox {
    pub meta: BoxMeta,
    pub version: u8,
    pub flags: u32,
    pub creation_time: u64,
    pub modification_time: u64,
    pub timescale: u32,
    pub duration: u64,
    pub language: String,
}

impl MdhdBox {
    pub fn get_size(&self) -> u64 {
        let mut size = HEADER_SIZE + HEADER_EXT_SIZE;
        size += if self.version == 1 { 28 } else { 16 };
        size += 4;
        size
    }

    pub fn creation_time_unix(&self) -> u64 {
        creation_time(self.creation_time)
    }
}

impl Mp4Box for MdhdBox {
    fn box_type(&self) -> BoxType {
        BoxType::MdhdBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize mdhd"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!(
            "timescale={} duration={} language={}",
            self.timescale, self.duration, self.language
        ))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for MdhdBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::MdhdBox, start, size);

        let (version, flags) = read_box_header_ext(reader)?;

        let (creation_time, modification_time, timescale, duration) = if version == 1 {
            (
                reader.read_u64::<BigEndian>()?,
                reader.read_u64::<BigEndian>()?,
                reader.read_u32::<BigEndian>()?,
                reader.read_u64::<BigEndian>()?,
            )
        } else if version == 0 {
            (
                reader.read_u32::<BigEndian>()? as u64,
                reader.read_u32::<BigEndian>()? as u64,
                reader.read_u32::<BigEndian>()?,
                reader.read_u32::<BigEndian>()? as u64,
            )
        } else {
            return Err(Error::InvalidData("mdhd version must be 0 or 1"));
        };
        let language_code = reader.read_u16::<BigEndian>()?;
        let language = language_string(language_code);
        reader.read_u16::<BigEndian>()?; // pre_defined

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "mdhd")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::MdhdBox),
            version,
            flags,
            creation_time,
            modification_time,
            timescale,
            duration,
            language,
        })
    }
}

fn language_string(language: u16) -> String {
    let mut lang: [u16; 3] = [0; 3];

    lang[0] = ((language >> 10) & 0x1F) + 0x60;
    lang[1] = ((language >> 5) & 0x1F) + 0x60;
    lang[2] = (language & 0x1F) + 0x60;

    decode_utf16(lang.iter().copied())
        .map(|r| r.unwrap_or(REPLACEMENT_CHARACTER))
        .collect::<String>()
}
