use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::{box_start, BoxHeader, BoxType, Mp4Box, ReadBox, Result, HEADER_SIZE};
use crate::tree::{BoxMeta, ParseContext};

/// QuickTime's plain-text sample entry (`text`), predating `tx3g`. The
/// trailing Pascal-string font name is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QtTextBox {
    pub meta: BoxMeta,
    pub data_reference_index: u16,
    pub display_flags: u32,
    pub text_justification: i32,
    pub bg_color: [u16; 3],
    pub default_text_box: [i16; 4],
    pub font_name: String,
}

impl QtTextBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE + 8 + 4 + 4 + 6 + 8 + 8 + 1 + self.font_name.len() as u64
    }
}

impl Mp4Box for QtTextBox {
    fn box_type(&self) -> BoxType {
        BoxType::TextBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize text"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!("font_name={}", self.font_name))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for QtTextBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::TextBox, start, size);

        reader.read_u32::<BigEndian>()?; // reserved
        reader.read_u16::<BigEndian>()?; // reserved
        let data_reference_index = reader.read_u16::<BigEndian>()?;

        let display_flags = reader.read_u32::<BigEndian>()?;
        let text_justification = reader.read_i32::<BigEndian>()?;
        let bg_color = [
            reader.read_u16::<BigEndian>()?,
            reader.read_u16::<BigEndian>()?,
            reader.read_u16::<BigEndian>()?,
        ];
        let default_text_box = [
            reader.read_i16::<BigEndian>()?,
            reader.read_i16::<BigEndian>()?,
            reader.read_i16::<BigEndian>()?,
            reader.read_i16::<BigEndian>()?,
        ];
        reader.read_u64::<BigEndian>()?; // reserved
        reader.read_u16::<BigEndian>()?; // font_number
        reader.read_u16::<BigEndian>()?; // font_face

        reader.read_u8()?; // reserved
        reader.read_u16::<BigEndian>()?; // reserved
        reader.read_u16::<BigEndian>()?; // foreground_color (partial)
        reader.read_u16::<BigEndian>()?;
        reader.read_u16::<BigEndian>()?;

        let name_len = reader.read_u8()?;
        let mut name_buf = vec![0u8; name_len as usize];
        reader.read_exact(&mut name_buf)?;
        let font_name = String::from_utf8_lossy(&name_buf).into_owned();

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "text")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::TextBox),
            data_reference_index,
            display_flags,
            text_justification,
            bg_color,
            default_text_box,
            font_name,
        })
    }
}
