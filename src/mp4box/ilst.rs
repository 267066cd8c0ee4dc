use std::io::{Read, Seek};

use serde::Serialize;

use crate::mp4box::data::DataBox;
use crate::mp4box::{
    box_start, check_child_fits, skip_padding, skip_unknown, BoxHeader, BoxType, Mp4Box, ReadBox,
    Result, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};
use crate::types::FourCC;

/// One iTunes-style metadata item (`\xa9nam`, `\xa9day`, `covr`, `desc`, or
/// any vendor-specific fourcc), keyed by its own box type rather than a
/// fixed enumeration of known keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IlstItemBox {
    pub meta: BoxMeta,
    pub item_type: FourCC,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<DataBox>,
}

impl IlstItemBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE + self.data.as_ref().map(|d| d.box_size()).unwrap_or(0)
    }
}

impl Mp4Box for IlstItemBox {
    fn box_type(&self) -> BoxType {
        self.meta.box_type
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize ilst item"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!("item_type={}", self.item_type))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IlstBox {
    pub meta: BoxMeta,
    pub items: Vec<IlstItemBox>,
}

impl IlstBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE + self.items.iter().map(|item| item.box_size()).sum::<u64>()
    }
}

impl Mp4Box for IlstBox {
    fn box_type(&self) -> BoxType {
        BoxType::IlstBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize ilst"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!("item_count={}", self.items.len()))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for IlstBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::IlstBox, start, size);

        let mut items = Vec::new();
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
            check_child_fits(size, header.size, "ilst box contains an oversized child box")?;

            let item_start = box_start(reader, &header)?;
            let mut data = None;
            let item_end = item_start + header.size;
            loop {
                let item_pos = reader.stream_position()?;
                if item_pos >= item_end {
                    break;
                }
                if item_end - item_pos < 8 {
                    skip_padding(reader, item_pos, item_end, ctx, depth + 2)?;
                    break;
                }

                let child = BoxHeader::read(reader)?;
                check_child_fits(
                    header.size,
                    child.size,
                    "ilst item box contains an oversized child box",
                )?;

                match child.name {
                    BoxType::DataBox => {
                        if data.is_none() {
                            data = Some(DataBox::read_box(reader, child, ctx, depth + 2)?);
                        } else {
                            skip_unknown(reader, child, ctx, depth + 2)?;
                        }
                    }
                    _ => {
                        skip_unknown(reader, child, ctx, depth + 2)?;
                    }
                }
            }

            items.push(IlstItemBox {
                meta: BoxMeta::new(item_start, header.size, header.name),
                item_type: header.name.into(),
                data,
            });
        }

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "ilst")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::IlstBox),
            items,
        })
    }
}
