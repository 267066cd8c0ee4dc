use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::sdtp::SdtpBox;
use crate::mp4box::{tfdt::TfdtBox, tfhd::TfhdBox, trun::TrunBox};
use crate::mp4box::{
    box_start, check_child_fits, skip_padding, skip_unknown, BoxHeader, BoxType, Error, Mp4Box,
    ReadBox, Result, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrafBox {
    pub meta: BoxMeta,
    pub tfhd: TfhdBox,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tfdt: Option<TfdtBox>,

    #[serde(rename = "trun")]
    pub truns: Vec<TrunBox>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdtp: Option<SdtpBox>,
}

impl TrafBox {
    pub fn get_size(&self) -> u64 {
        let mut size = HEADER_SIZE + self.tfhd.box_size();
        if let Some(tfdt) = &self.tfdt {
            size += tfdt.box_size();
        }
        if let Some(sdtp) = &self.sdtp {
            size += sdtp.box_size();
        }
        size + self.truns.iter().map(|t| t.box_size()).sum::<u64>()
    }
}

impl Mp4Box for TrafBox {
    fn box_type(&self) -> BoxType {
        BoxType::TrafBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize traf"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!("truns={}", self.truns.len()))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for TrafBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::TrafBox, start, size);

        let mut tfhd = None;
        let mut tfdt = None;
        let mut truns = Vec::new();
        let mut sdtp = None;

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
            check_child_fits(size, header.size, "traf box contains an oversized child box")?;

            match header.name {
                BoxType::TfhdBox => {
                    if tfhd.is_none() {
                        tfhd = Some(TfhdBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::TfdtBox => {
                    if tfdt.is_none() {
                        tfdt = Some(TfdtBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                BoxType::TrunBox => {
                    truns.push(TrunBox::read_box(reader, header, ctx, depth + 1)?);
                }
                BoxType::SdtpBox => {
                    if sdtp.is_none() {
                        sdtp = Some(SdtpBox::read_box(reader, header, ctx, depth + 1)?);
                    } else {
                        skip_unknown(reader, header, ctx, depth + 1)?;
                    }
                }
                _ => {
                    skip_unknown(reader, header, ctx, depth + 1)?;
                }
            }
        }

        let Some(tfhd) = tfhd else {
            return Err(Error::BoxNotFound(BoxType::TfhdBox));
        };

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "traf")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::TrafBox),
            tfhd,
            tfdt,
            truns,
            sdtp,
        })
    }
}
