use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek};
use std::mem::size_of;

use crate::flags::{
    SampleFlags, TRUN_DATA_OFFSET_PRESENT, TRUN_FIRST_SAMPLE_FLAGS_PRESENT,
    TRUN_SAMPLE_COMPOSITION_TIME_OFFSET_PRESENT, TRUN_SAMPLE_DURATION_PRESENT,
    TRUN_SAMPLE_FLAGS_PRESENT, TRUN_SAMPLE_SIZE_PRESENT,
};
use crate::mp4box::{
    box_start, BoxHeader, read_box_header_ext, BoxType, Mp4Box, ReadBox, Result, HEADER_EXT_SIZE, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};
use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrunBox {
    pub meta: BoxMeta,
    pub version: u8,
    pub flags: u32,
    pub sample_count: u32,
    pub data_offset: Option<i32>,
    pub first_sample_flags: Option<SampleFlags>,

    #[serde(skip_serializing)]
    pub sample_durations: Vec<u32>,
    #[serde(skip_serializing)]
    pub sample_sizes: Vec<u32>,
    #[serde(skip_serializing)]
    pub sample_flags: Vec<SampleFlags>,
    #[serde(skip_serializing)]
    pub sample_cts: Vec<i32>,
}

impl TrunBox {
    pub fn get_size(&self) -> u64 {
        let mut sum = HEADER_SIZE + HEADER_EXT_SIZE + 4;
        if self.data_offset.is_some() {
            sum += 4;
        }
        if self.first_sample_flags.is_some() {
            sum += 4;
        }
        sum += 4 * self.sample_durations.len() as u64;
        sum += 4 * self.sample_sizes.len() as u64;
        sum += 4 * self.sample_flags.len() as u64;
        sum += 4 * self.sample_cts.len() as u64;
        sum
    }
}

impl Mp4Box for TrunBox {
    fn box_type(&self) -> BoxType {
        BoxType::TrunBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize trun"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!("sample_count={}", self.sample_count))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for TrunBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::TrunBox, start, size);

        let (version, flags) = read_box_header_ext(reader)?;

        let header_size = HEADER_SIZE + HEADER_EXT_SIZE;
        let other_size = size_of::<u32>() // sample_count
            + if flags & TRUN_DATA_OFFSET_PRESENT != 0 { size_of::<i32>() } else { 0 }
            + if flags & TRUN_FIRST_SAMPLE_FLAGS_PRESENT != 0 { size_of::<u32>() } else { 0 };
        let per_sample_size = if flags & TRUN_SAMPLE_DURATION_PRESENT != 0 { size_of::<u32>() } else { 0 }
            + if flags & TRUN_SAMPLE_SIZE_PRESENT != 0 { size_of::<u32>() } else { 0 }
            + if flags & TRUN_SAMPLE_FLAGS_PRESENT != 0 { size_of::<u32>() } else { 0 }
            + if flags & TRUN_SAMPLE_COMPOSITION_TIME_OFFSET_PRESENT != 0 { size_of::<u32>() } else { 0 };

        let sample_count = reader.read_u32::<BigEndian>()?;

        let data_offset = if flags & TRUN_DATA_OFFSET_PRESENT != 0 {
            Some(reader.read_i32::<BigEndian>()?)
        } else {
            None
        };

        let first_sample_flags = if flags & TRUN_FIRST_SAMPLE_FLAGS_PRESENT != 0 {
            Some(SampleFlags::unpack(reader.read_u32::<BigEndian>()?))
        } else {
            None
        };

        if u64::from(sample_count) * per_sample_size as u64
            > size
                .saturating_sub(header_size)
                .saturating_sub(other_size as u64)
        {
            return Err(Error::TrunSampleCountOverflow);
        }

        let mut sample_durations = Vec::new();
        let mut sample_sizes = Vec::new();
        let mut sample_flags = Vec::new();
        let mut sample_cts = Vec::new();
        if flags & TRUN_SAMPLE_DURATION_PRESENT != 0 {
            sample_durations.reserve(sample_count as usize);
        }
        if flags & TRUN_SAMPLE_SIZE_PRESENT != 0 {
            sample_sizes.reserve(sample_count as usize);
        }
        if flags & TRUN_SAMPLE_FLAGS_PRESENT != 0 {
            sample_flags.reserve(sample_count as usize);
        }
        if flags & TRUN_SAMPLE_COMPOSITION_TIME_OFFSET_PRESENT != 0 {
            sample_cts.reserve(sample_count as usize);
        }

        for _ in 0..sample_count {
            if flags & TRUN_SAMPLE_DURATION_PRESENT != 0 {
                sample_durations.push(reader.read_u32::<BigEndian>()?);
            }
            if flags & TRUN_SAMPLE_SIZE_PRESENT != 0 {
                sample_sizes.push(reader.read_u32::<BigEndian>()?);
            }
            if flags & TRUN_SAMPLE_FLAGS_PRESENT != 0 {
                sample_flags.push(SampleFlags::unpack(reader.read_u32::<BigEndian>()?));
            }
            if flags & TRUN_SAMPLE_COMPOSITION_TIME_OFFSET_PRESENT != 0 {
                sample_cts.push(reader.read_i32::<BigEndian>()?);
            }
        }

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "trun")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::TrunBox),
            version,
            flags,
            sample_count,
            data_offset,
            first_sample_flags,
            sample_durations,
            sample_sizes,
            sample_flags,
            sample_cts,
        })
    }
}
