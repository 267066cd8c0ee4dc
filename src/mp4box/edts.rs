use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::elst::ElstBox;
use crate::mp4box::{
    box_start, check_child_fits, skip_padding, skip_unknown, BoxHeader, BoxType, Mp4Box, ReadBox,
    Result, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdtsBox {
    pub meta: BoxMeta,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub elst: Option<ElstBox>,
}

impl EdtsBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE + self.elst.as_ref().map(|e| e.box_size()).unwrap_or(0)
    }
}

impl Mp4Box for EdtsBox {
    fn box_type(&self) -> BoxType {
        BoxType::EdtsBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize edts"))
    }

    fn summary(&self) -> Result<String> {
        Ok(String::new())
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for EdtsBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::EdtsBox, start, size);

        let mut elst = None;
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
            check_child_fits(size, header.size, "edts box contains an oversized child box")?;

            match header.name {
                BoxType::ElstBox => {
                    if elst.is_none() {
                        elst = Some(ElstBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                _ => {
                    skip_unknown(reader, header, ctx, depth + 1)?;
                }
            }
        }

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "edts")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::EdtsBox),
            elst,
        })
    }
}
