use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::ext::{read_extension, ExtensionBox};
use crate::mp4box::{
    box_start, check_child_fits, skip_padding, value_u32, BoxHeader, BoxType, Mp4Box, Result,
    HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};
use crate::types::FixedPointU16;

/// The `VisualSampleEntry` shape shared by `avc1`, `hev1`/`hvc1`, `vp08`,
/// `vp09`, `mp4v`, and any other video codec's sample entry. Codec
/// configuration (`avcC`, `hvcC`, `vpcC`, ...) is kept as an opaque
/// [`ExtensionBox`] rather than decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualSampleEntry {
    pub meta: BoxMeta,
    pub box_type: BoxType,
    pub data_reference_index: u16,
    pub width: u16,
    pub height: u16,

    #[serde(with = "value_u32")]
    pub horizresolution: FixedPointU16,

    #[serde(with = "value_u32")]
    pub vertresolution: FixedPointU16,
    pub frame_count: u16,
    pub compressorname: String,
    pub depth: u16,
    pub extensions: Vec<ExtensionBox>,
}

impl VisualSampleEntry {
    pub fn get_size(&self) -> u64 {
        let mut size = HEADER_SIZE + 8 + 70;
        for ext in &self.extensions {
            size += ext.box_size();
        }
        size
    }
}

impl Mp4Box for VisualSampleEntry {
    fn box_type(&self) -> BoxType {
        self.box_type
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize visual sample entry"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!(
            "data_reference_index={} width={} height={} frame_count={}",
            self.data_reference_index, self.width, self.height, self.frame_count
        ))
    }
}

impl VisualSampleEntry {
    pub fn read<R: Read + Seek>(
        reader: &mut R,
        header: BoxHeader,
        ctx: &mut ParseContext,
        depth: u32,
    ) -> Result<Self> {
        let start = box_start(reader, &header)?;
        let size = header.size;
        ctx.record_node(depth, header.name, start, size);

        reader.read_u32::<BigEndian>()?; // reserved
        reader.read_u16::<BigEndian>()?; // reserved
        let data_reference_index = reader.read_u16::<BigEndian>()?;

        reader.read_u32::<BigEndian>()?; // pre_defined, reserved
        reader.read_u64::<BigEndian>()?; // pre_defined
        reader.read_u32::<BigEndian>()?; // pre_defined
        let width = reader.read_u16::<BigEndian>()?;
        let height = reader.read_u16::<BigEndian>()?;
        let horizresolution = FixedPointU16::new_raw(reader.read_u32::<BigEndian>()?);
        let vertresolution = FixedPointU16::new_raw(reader.read_u32::<BigEndian>()?);
        reader.read_u32::<BigEndian>()?; // reserved
        let frame_count = reader.read_u16::<BigEndian>()?;

        let mut compressorname_buf = [0u8; 32];
        reader.read_exact(&mut compressorname_buf)?;
        let name_len = compressorname_buf[0].min(31) as usize;
        let compressorname =
            String::from_utf8_lossy(&compressorname_buf[1..1 + name_len]).into_owned();

        let depth = reader.read_u16::<BigEndian>()?;
        reader.read_i16::<BigEndian>()?; // pre_defined

        let mut extensions = Vec::new();
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

            let child = BoxHeader::read(reader)?;
            check_child_fits(
                size,
                child.size,
                "video sample entry contains an oversized extension box",
            )?;
            extensions.push(read_extension(reader, child, ctx, depth + 1)?);
        }

        Ok(Self {
            meta: BoxMeta::new(start, size, header.name),
            box_type: header.name,
            data_reference_index,
            width,
            height,
            horizresolution,
            vertresolution,
            frame_count,
            compressorname,
            depth,
            extensions,
        })
    }
}
