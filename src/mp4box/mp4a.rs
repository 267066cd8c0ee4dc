use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::ext::{read_extension, ExtensionBox};
use crate::mp4box::wave::WaveBox;
use crate::mp4box::{
    box_start, check_child_fits, skip_padding, value_u32, BoxHeader, BoxType, Mp4Box, Result,
    HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};
use crate::types::FixedPointU16;

/// The `AudioSampleEntry` shape shared by `mp4a`, `twos`/`sowt` (linear
/// PCM) and similar. QTFF version 1/2 fields are decoded; version 2's
/// extra per-sample/per-frame fields are kept in the raw `v2_extension`
/// tail rather than individually named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioSampleEntry {
    pub meta: BoxMeta,
    pub box_type: BoxType,
    pub data_reference_index: u16,
    pub version: u16,
    pub channelcount: u16,
    pub samplesize: u16,

    #[serde(with = "value_u32")]
    pub samplerate: FixedPointU16,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub v2_extension: Vec<u8>,

    /// `esds` (or a `wave` container wrapping one) when present.
    pub esds: Option<ExtensionBox>,
    pub extensions: Vec<ExtensionBox>,
}

impl AudioSampleEntry {
    pub fn get_size(&self) -> u64 {
        let mut size = HEADER_SIZE + 8 + 20 + self.v2_extension.len() as u64;
        if let Some(esds) = &self.esds {
            size += esds.box_size();
        }
        for ext in &self.extensions {
            size += ext.box_size();
        }
        size
    }
}

impl Mp4Box for AudioSampleEntry {
    fn box_type(&self) -> BoxType {
        self.box_type
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize audio sample entry"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!(
            "channel_count={} sample_size={} sample_rate={}",
            self.channelcount,
            self.samplesize,
            self.samplerate.value()
        ))
    }
}

impl AudioSampleEntry {
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
        let version = reader.read_u16::<BigEndian>()?;
        reader.read_u16::<BigEndian>()?; // reserved
        reader.read_u32::<BigEndian>()?; // reserved
        let channelcount = reader.read_u16::<BigEndian>()?;
        let samplesize = reader.read_u16::<BigEndian>()?;
        reader.read_u32::<BigEndian>()?; // pre_defined, reserved
        let samplerate = FixedPointU16::new_raw(reader.read_u32::<BigEndian>()?);

        let mut v2_extension = Vec::new();
        if version == 1 {
            let mut buf = [0u8; 16];
            reader.read_exact(&mut buf)?;
            v2_extension = buf.to_vec();
        } else if version == 2 {
            let mut buf = [0u8; 36];
            reader.read_exact(&mut buf)?;
            v2_extension = buf.to_vec();
        }

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
            check_child_fits(
                size,
                child.size,
                "audio sample entry contains an oversized extension box",
            )?;
            match child.name {
                BoxType::EsdsBox => {
                    if esds.is_none() {
                        esds = Some(read_extension(reader, child, ctx, depth + 1)?);
                    } else {
                        extensions.push(read_extension(reader, child, ctx, depth + 1)?);
                    }
                }
                BoxType::WaveBox => {
                    // Kept fully decoded so the embedded `frma`/`esds` are
                    // reachable; we don't flatten it into `esds` since
                    // the wrapper itself may carry other children.
                    let wave = WaveBox::read(reader, child, ctx, depth + 1)?;
                    if esds.is_none() {
                        esds = wave.esds;
                    }
                }
                _ => {
                    extensions.push(read_extension(reader, child, ctx, depth + 1)?);
                }
            }
        }

        Ok(Self {
            meta: BoxMeta::new(start, size, header.name),
            box_type: header.name,
            data_reference_index,
            version,
            channelcount,
            samplesize,
            samplerate,
            v2_extension,
            esds,
            extensions,
        })
    }
}
