use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::{
    box_start, BoxHeader, read_box_header_ext, skip_bytes, BoxType, Mp4Box, ReadBox, Result, HEADER_EXT_SIZE,
    HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};
use crate::types::FourCC;
use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HdlrBox {
    pub meta: BoxMeta,
    pub version: u8,
    pub flags: u32,
    pub handler_type: FourCC,
    pub name: String,
}

impl HdlrBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE + HEADER_EXT_SIZE + 20 + self.name.len() as u64 + 1
    }
}

impl Mp4Box for HdlrBox {
    fn box_type(&self) -> BoxType {
        BoxType::HdlrBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize hdlr"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!(
            "handler_type={} name={}",
            self.handler_type, self.name
        ))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for HdlrBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::HdlrBox, start, size);

        let (version, flags) = read_box_header_ext(reader)?;

        reader.read_u32::<BigEndian>()?; // pre-defined
        let handler = reader.read_u32::<BigEndian>()?;

        skip_bytes(reader, 12)?; // reserved

        let buf_size = size
            .checked_sub(HEADER_SIZE + HEADER_EXT_SIZE + 20)
            .ok_or(Error::InvalidData("hdlr size too small"))?;

        let mut buf = vec![0u8; buf_size as usize];
        reader.read_exact(&mut buf)?;
        if let Some(end) = buf.iter().position(|&b| b == b'\0') {
            buf.truncate(end);
        }
        let name = String::from_utf8(buf).unwrap_or_default();

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "hdlr")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::HdlrBox),
            version,
            flags,
            handler_type: FourCC::from(handler),
            name,
        })
    }
}
