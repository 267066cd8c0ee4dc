use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::{box_start, BoxHeader, BoxType, Mp4Box, ReadBox, Result, HEADER_SIZE};
use crate::tree::{BoxMeta, ParseContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tx3gBox {
    pub meta: BoxMeta,
    pub data_reference_index: u16,
    pub display_flags: u32,
    pub horizontal_justification: i8,
    pub vertical_justification: i8,
    pub bg_color_rgba: RgbaColor,
    pub box_record: [i16; 4],
    pub style_record: [u8; 12],
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RgbaColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Tx3gBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE + 6 + 32
    }
}

impl Mp4Box for Tx3gBox {
    fn box_type(&self) -> BoxType {
        BoxType::Tx3gBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize tx3g"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!(
            "data_reference_index={} horizontal_justification={} vertical_justification={} rgba={}{}{}{}",
            self.data_reference_index, self.horizontal_justification,
            self.vertical_justification, self.bg_color_rgba.red,
            self.bg_color_rgba.green, self.bg_color_rgba.blue, self.bg_color_rgba.alpha
        ))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for Tx3gBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::Tx3gBox, start, size);

        reader.read_u32::<BigEndian>()?; // reserved
        reader.read_u16::<BigEndian>()?; // reserved
        let data_reference_index = reader.read_u16::<BigEndian>()?;

        let display_flags = reader.read_u32::<BigEndian>()?;
        let horizontal_justification = reader.read_i8()?;
        let vertical_justification = reader.read_i8()?;
        let bg_color_rgba = RgbaColor {
            red: reader.read_u8()?,
            green: reader.read_u8()?,
            blue: reader.read_u8()?,
            alpha: reader.read_u8()?,
        };
        let box_record: [i16; 4] = [
            reader.read_i16::<BigEndian>()?,
            reader.read_i16::<BigEndian>()?,
            reader.read_i16::<BigEndian>()?,
            reader.read_i16::<BigEndian>()?,
        ];
        let mut style_record = [0u8; 12];
        reader.read_exact(&mut style_record)?;

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "tx3g")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::Tx3gBox),
            data_reference_index,
            display_flags,
            horizontal_justification,
            vertical_justification,
            bg_color_rgba,
            box_record,
            style_record,
        })
    }
}
