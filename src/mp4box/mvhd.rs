use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::{
    box_start, BoxHeader, read_box_header_ext, skip_bytes, tkhd, value_u32, value_u8, BoxType, Mp4Box,
    ReadBox, Result, HEADER_EXT_SIZE, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};
use crate::types::{creation_time, FixedPointU16, FixedPointU8};
use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MvhdBox {
    pub meta: BoxMeta,
    pub version: u8,
    pub flags: u32,
    pub creation_time: u64,
    pub modification_time: u64,
    pub timescale: u32,
    pub duration: u64,

    #[serde(with = "value_u32")]
    pub rate: FixedPointU16,
    #[serde(with = "value_u8")]
    pub volume: FixedPointU8,

    pub matrix: tkhd::Matrix,

    pub next_track_id: u32,
}

impl MvhdBox {
    pub fn get_size(&self) -> u64 {
        let mut size = HEADER_SIZE + HEADER_EXT_SIZE;
        size += if self.version == 1 { 28 } else { 16 };
        size += 80;
        size
    }

    /// `creation_time`/`modification_time` converted from the MP4 epoch
    /// (1904-01-01) to Unix seconds.
    pub fn creation_time_unix(&self) -> u64 {
        creation_time(self.creation_time)
    }
}

impl Mp4Box for MvhdBox {
    fn box_type(&self) -> BoxType {
        BoxType::MvhdBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize mvhd"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!(
            "timescale={} duration={} rate={} volume={} next_track_id={}",
            self.timescale,
            self.duration,
            self.rate.value(),
            self.volume.value(),
            self.next_track_id
        ))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for MvhdBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::MvhdBox, start, size);

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
            return Err(Error::InvalidData("mvhd version must be 0 or 1"));
        };
        let rate = FixedPointU16::new_raw(reader.read_u32::<BigEndian>()?);
        let volume = FixedPointU8::new_raw(reader.read_u16::<BigEndian>()?);

        reader.read_u16::<BigEndian>()?; // reserved
        reader.read_u64::<BigEndian>()?; // reserved

        let matrix = tkhd::Matrix {
            a: reader.read_i32::<BigEndian>()?,
            b: reader.read_i32::<BigEndian>()?,
            u: reader.read_i32::<BigEndian>()?,
            c: reader.read_i32::<BigEndian>()?,
            d: reader.read_i32::<BigEndian>()?,
            v: reader.read_i32::<BigEndian>()?,
            x: reader.read_i32::<BigEndian>()?,
            y: reader.read_i32::<BigEndian>()?,
            w: reader.read_i32::<BigEndian>()?,
        };

        skip_bytes(reader, 24)?; // pre_defined

        let next_track_id = reader.read_u32::<BigEndian>()?;

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "mvhd")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::MvhdBox),
            version,
            flags,
            creation_time,
            modification_time,
            timescale,
            duration,
            rate,
            volume,
            matrix,
            next_track_id,
        })
    }
}
