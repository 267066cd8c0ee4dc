use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek};

use crate::flags::{
    SampleFlags, TFHD_BASE_DATA_OFFSET_PRESENT, TFHD_DEFAULT_SAMPLE_DURATION_PRESENT,
    TFHD_DEFAULT_SAMPLE_FLAGS_PRESENT, TFHD_DEFAULT_SAMPLE_SIZE_PRESENT,
    TFHD_SAMPLE_DESCRIPTION_INDEX_PRESENT,
};
use crate::mp4box::{
    box_start, BoxHeader, read_box_header_ext, BoxType, Mp4Box, ReadBox, Result, HEADER_EXT_SIZE, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TfhdBox {
    pub meta: BoxMeta,
    pub version: u8,
    pub flags: u32,
    pub track_id: u32,
    pub base_data_offset: Option<u64>,
    pub sample_description_index: Option<u32>,
    pub default_sample_duration: Option<u32>,
    pub default_sample_size: Option<u32>,
    pub default_sample_flags: Option<SampleFlags>,
}

impl TfhdBox {
    pub fn get_size(&self) -> u64 {
        let mut sum = HEADER_SIZE + HEADER_EXT_SIZE + 4;
        if self.base_data_offset.is_some() {
            sum += 8;
        }
        if self.sample_description_index.is_some() {
            sum += 4;
        }
        if self.default_sample_duration.is_some() {
            sum += 4;
        }
        if self.default_sample_size.is_some() {
            sum += 4;
        }
        if self.default_sample_flags.is_some() {
            sum += 4;
        }
        sum
    }
}

impl Mp4Box for TfhdBox {
    fn box_type(&self) -> BoxType {
        BoxType::TfhdBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize tfhd"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!("track_id={}", self.track_id))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for TfhdBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::TfhdBox, start, size);

        let (version, flags) = read_box_header_ext(reader)?;
        let track_id = reader.read_u32::<BigEndian>()?;

        let base_data_offset = if flags & TFHD_BASE_DATA_OFFSET_PRESENT != 0 {
            Some(reader.read_u64::<BigEndian>()?)
        } else {
            None
        };
        let sample_description_index = if flags & TFHD_SAMPLE_DESCRIPTION_INDEX_PRESENT != 0 {
            Some(reader.read_u32::<BigEndian>()?)
        } else {
            None
        };
        let default_sample_duration = if flags & TFHD_DEFAULT_SAMPLE_DURATION_PRESENT != 0 {
            Some(reader.read_u32::<BigEndian>()?)
        } else {
            None
        };
        let default_sample_size = if flags & TFHD_DEFAULT_SAMPLE_SIZE_PRESENT != 0 {
            Some(reader.read_u32::<BigEndian>()?)
        } else {
            None
        };
        let default_sample_flags = if flags & TFHD_DEFAULT_SAMPLE_FLAGS_PRESENT != 0 {
            Some(SampleFlags::unpack(reader.read_u32::<BigEndian>()?))
        } else {
            None
        };

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "tfhd")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::TfhdBox),
            version,
            flags,
            track_id,
            base_data_offset,
            sample_description_index,
            default_sample_duration,
            default_sample_size,
            default_sample_flags,
        })
    }
}
