use std::io::{Read, Seek, SeekFrom};

use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;

use crate::mp4box::hdlr::HdlrBox;
use crate::mp4box::ilst::IlstBox;
use crate::mp4box::{
    box_start, check_child_fits, skip_padding, skip_unknown, BoxHeader, BoxType, Mp4Box, ReadBox,
    Result, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};
use crate::types::FourCC;
use crate::Error;

const MDIR: FourCC = FourCC { value: *b"mdir" };

/// iTunes-style metadata container. Most real-world files carry an
/// `mdir` handler with an `ilst` child; anything else keeps its `hdlr`
/// and stores its other direct children as opaque, fourcc-keyed blobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "hdlr")]
#[serde(rename_all = "lowercase")]
pub enum MetaBox {
    Mdir {
        #[serde(skip)]
        meta: BoxMeta,

        #[serde(skip_serializing_if = "Option::is_none")]
        ilst: Option<IlstBox>,
    },

    #[serde(skip)]
    Unknown {
        meta: BoxMeta,
        hdlr: HdlrBox,
        data: Vec<(BoxType, Vec<u8>)>,
    },
}

impl MetaBox {
    pub fn get_size(&self) -> u64 {
        let mut size = HEADER_SIZE + crate::mp4box::HEADER_EXT_SIZE;
        match self {
            Self::Mdir { ilst, .. } => {
                if let Some(ilst) = ilst {
                    size += ilst.box_size();
                }
            }
            Self::Unknown { hdlr, data, .. } => {
                size += hdlr.box_size()
                    + data
                        .iter()
                        .map(|(_, data)| data.len() as u64 + HEADER_SIZE)
                        .sum::<u64>();
            }
        }
        size
    }
}

impl Mp4Box for MetaBox {
    fn box_type(&self) -> BoxType {
        BoxType::MetaBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize meta"))
    }

    fn summary(&self) -> Result<String> {
        Ok(match self {
            Self::Mdir { .. } => "hdlr=mdir".to_owned(),
            Self::Unknown { hdlr, data, .. } => {
                format!("hdlr={} data_len={}", hdlr.handler_type, data.len())
            }
        })
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for MetaBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::MetaBox, start, size);

        let extended_header = reader.read_u32::<BigEndian>()?;
        if extended_header != 0 {
            // Some files omit meta's fullbox header and start hdlr directly.
            let possible_hdlr = BoxType::from(reader.read_u32::<BigEndian>()?);
            if possible_hdlr == BoxType::HdlrBox {
                reader.seek(SeekFrom::Current(-8))?;
            } else {
                return Err(Error::InvalidData("meta box has an unsupported version"));
            }
        }

        let end = start + size;
        let content_start = reader.stream_position()?;

        let mut hdlr = None;
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
            check_child_fits(size, child.size, "meta box contains an oversized child box")?;

            match child.name {
                BoxType::HdlrBox => {
                    if hdlr.is_none() {
                        hdlr = Some(HdlrBox::read_box(reader, child, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, child, ctx, depth + 1)?;
                    }
                }
                _ => {
                    skip_unknown(reader, child, ctx, depth + 1)?;
                }
            }
        }

        let Some(hdlr) = hdlr else {
            return Err(Error::BoxNotFound(BoxType::HdlrBox));
        };

        reader.seek(SeekFrom::Start(content_start))?;

        if hdlr.handler_type == MDIR {
            let mut ilst = None;
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
                check_child_fits(size, child.size, "meta box contains an oversized child box")?;

                match child.name {
                    BoxType::IlstBox => {
                        if ilst.is_none() {
                            ilst = Some(IlstBox::read_box(reader, child, ctx, depth + 1)?);
                        } else {
                            skip_unknown(reader, child, ctx, depth + 1)?;
                        }
                    }
                    BoxType::HdlrBox => {
                        crate::mp4box::skip_box(reader, &child)?;
                    }
                    _ => {
                        skip_unknown(reader, child, ctx, depth + 1)?;
                    }
                }
            }

            crate::mp4box::reconcile_extra_bytes(reader, start, size, "meta")?;

            Ok(Self::Mdir {
                meta: BoxMeta::new(start, size, BoxType::MetaBox),
                ilst,
            })
        } else {
            let mut data = Vec::new();
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
                check_child_fits(size, child.size, "meta box contains an oversized child box")?;

                if child.name == BoxType::HdlrBox {
                    crate::mp4box::skip_box(reader, &child)?;
                } else {
                    let mut box_data = vec![0u8; child.size.saturating_sub(HEADER_SIZE) as usize];
                    reader.read_exact(&mut box_data)?;
                    data.push((child.name, box_data));
                }
            }

            crate::mp4box::reconcile_extra_bytes(reader, start, size, "meta")?;

            Ok(Self::Unknown {
                meta: BoxMeta::new(start, size, BoxType::MetaBox),
                hdlr,
                data,
            })
        }
    }
}
