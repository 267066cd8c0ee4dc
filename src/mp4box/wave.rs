use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::ext::{read_extension, ExtensionBox};
use crate::mp4box::{
    box_start, check_child_fits, skip_padding, BoxHeader, BoxType, Mp4Box, Result, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};

/// QuickTime's sound-description wrapper: typically `frma` (the real
/// format fourcc), a nested sample-entry-shaped box, `esds`, and a
/// zero-size terminator atom. Only `frma` and `esds` are decoded here;
/// everything else (including the terminator) is captured as an opaque
/// extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaveBox {
    pub meta: BoxMeta,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub frma: Option<crate::types::FourCC>,
    pub esds: Option<ExtensionBox>,
    pub extensions: Vec<ExtensionBox>,
}

impl WaveBox {
    pub fn get_size(&self) -> u64 {
        let mut size = HEADER_SIZE;
        if self.frma.is_some() {
            size += HEADER_SIZE + 4;
        }
        if let Some(esds) = &self.esds {
            size += esds.box_size();
        }
        for ext in &self.extensions {
            size += ext.box_size();
        }
        size
    }
}

impl Mp4Box for WaveBox {
    fn box_type(&self) -> BoxType {
        BoxType::WaveBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize wave"))
    }

    fn summary(&self) -> Result<String> {
        Ok(String::new())
    }
}

impl WaveBox {
    pub fn read<R: Read + Seek>(
        reader: &mut R,
        header: BoxHeader,
        ctx: &mut ParseContext,
        depth: u32,
    ) -> Result<Self> {
        let start = box_start(reader, &header)?;
        let size = header.size;
        ctx.record_node(depth, BoxType::WaveBox, start, size);

        let mut frma = None;
        let mut esds = None;
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
            check_child_fits(size, child.size, "wave box contains an oversized child box")?;

            match child.name {
                BoxType::FrmaBox => {
                    frma = Some(crate::types::FourCC::from(reader.read_u32::<BigEndian>()?));
                }
                BoxType::EsdsBox => {
                    if esds.is_none() {
                        esds = Some(read_extension(reader, child, ctx, depth + 1)?);
                    } else {
                        extensions.push(read_extension(reader, child, ctx, depth + 1)?);
                    }
                }
                BoxType::TerminatorBox => {
                    crate::mp4box::skip_bytes(reader, child.size.saturating_sub(HEADER_SIZE))?;
                }
                _ => {
                    extensions.push(read_extension(reader, child, ctx, depth + 1)?);
                }
            }
        }

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::WaveBox),
            frma,
            esds,
            extensions,
        })
    }
}
