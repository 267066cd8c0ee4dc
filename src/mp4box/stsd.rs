use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::avc1::VisualSampleEntry;
use crate::mp4box::ext::{read_extension, ExtensionBox};
use crate::mp4box::mp4a::AudioSampleEntry;
use crate::mp4box::qttext::QtTextBox;
use crate::mp4box::tx3g::Tx3gBox;
use crate::mp4box::{
    box_start, check_child_fits, skip_padding, BoxHeader, BoxType, Mp4Box, ReadBox, Result,
    HEADER_EXT_SIZE, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};

/// One sample description table entry. Video and audio codecs share the
/// `VisualSampleEntry`/`AudioSampleEntry` shapes regardless of which
/// specific codec fourcc is in play; anything else recognized falls to
/// `QtText`/`Tx3g`, and anything unrecognized is captured as `Other` so
/// `stsd`'s entry count is always preserved even for codecs this reader
/// doesn't specifically know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StsdEntry {
    Visual(VisualSampleEntry),
    Audio(AudioSampleEntry),
    QtText(QtTextBox),
    Tx3g(Tx3gBox),
    Other(ExtensionBox),
}

impl StsdEntry {
    pub fn box_type(&self) -> BoxType {
        match self {
            StsdEntry::Visual(b) => b.box_type(),
            StsdEntry::Audio(b) => b.box_type(),
            StsdEntry::QtText(b) => b.box_type(),
            StsdEntry::Tx3g(b) => b.box_type(),
            StsdEntry::Other(b) => b.box_type(),
        }
    }

    pub fn box_size(&self) -> u64 {
        match self {
            StsdEntry::Visual(b) => b.box_size(),
            StsdEntry::Audio(b) => b.box_size(),
            StsdEntry::QtText(b) => b.box_size(),
            StsdEntry::Tx3g(b) => b.box_size(),
            StsdEntry::Other(b) => b.box_size(),
        }
    }
}

fn is_visual_codec(t: BoxType) -> bool {
    matches!(
        t,
        BoxType::Avc1Box
            | BoxType::Hev1Box
            | BoxType::Hvc1Box
            | BoxType::Mp4vBox
    )
}

fn is_audio_codec(t: BoxType) -> bool {
    matches!(t, BoxType::Mp4aBox | BoxType::TwosBox | BoxType::SowtBox)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StsdBox {
    pub meta: BoxMeta,
    pub version: u8,
    pub flags: u32,
    pub entries: Vec<StsdEntry>,
}

impl StsdBox {
    pub fn get_size(&self) -> u64 {
        let mut size = HEADER_SIZE + HEADER_EXT_SIZE + 4;
        for entry in &self.entries {
            size += entry.box_size();
        }
        size
    }
}

impl Mp4Box for StsdBox {
    fn box_type(&self) -> BoxType {
        BoxType::StsdBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize stsd"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!("entries={}", self.entries.len()))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for StsdBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::StsdBox, start, size);

        let (version, flags) = crate::mp4box::read_box_header_ext(reader)?;

        let entry_count = reader.read_u32::<BigEndian>()?;
        let end = start + size;

        let mut entries = Vec::with_capacity(entry_count.min(4096) as usize);
        for _ in 0..entry_count {
            let pos = reader.stream_position()?;
            if pos >= end {
                break;
            }
            if end - pos < 8 {
                skip_padding(reader, pos, end, ctx, depth + 1)?;
                break;
            }

            let entry_header = BoxHeader::read(reader)?;
            check_child_fits(size, entry_header.size, "stsd box contains an oversized entry")?;

            let entry = if is_visual_codec(entry_header.name) {
                StsdEntry::Visual(VisualSampleEntry::read(reader, entry_header, ctx, depth + 1)?)
            } else if is_audio_codec(entry_header.name) {
                StsdEntry::Audio(AudioSampleEntry::read(reader, entry_header, ctx, depth + 1)?)
            } else if entry_header.name == BoxType::TextBox {
                StsdEntry::QtText(QtTextBox::read_box(reader, entry_header, ctx, depth + 1)?)
            } else if entry_header.name == BoxType::Tx3gBox {
                StsdEntry::Tx3g(Tx3gBox::read_box(reader, entry_header, ctx, depth + 1)?)
            } else {
                StsdEntry::Other(read_extension(reader, entry_header, ctx, depth + 1)?)
            };
            entries.push(entry);
        }

        if entries.len() as u32 != entry_count {
            log::warn!(
                "stsd declared {} entries but only {} were read before the box ended",
                entry_count,
                entries.len()
            );
        }

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "stsd")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::StsdBox),
            version,
            flags,
            entries,
        })
    }
}
