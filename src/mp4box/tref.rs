use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::{
    box_start, check_child_fits, skip_padding, BoxHeader, BoxType, Mp4Box, Result, HEADER_SIZE,
};
use crate::tree::{BoxMeta, ParseContext};
use crate::types::FourCC;

/// One reference-type child of `tref` (`hint`, `cdsc`, `font`, `hind`,
/// `vdep`, `vplx`, or any vendor-specific fourcc): a list of track IDs
/// this track refers to, keyed by the child box's own fourcc rather than
/// a fixed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackReference {
    pub meta: BoxMeta,
    pub reference_type: FourCC,
    pub track_ids: Vec<u32>,
}

impl TrackReference {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE + 4 * self.track_ids.len() as u64
    }
}

impl Mp4Box for TrackReference {
    fn box_type(&self) -> BoxType {
        self.meta.box_type
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize track reference"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!(
            "reference_type={} track_ids={}",
            self.reference_type,
            self.track_ids.len()
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrefBox {
    pub meta: BoxMeta,
    pub references: Vec<TrackReference>,
}

impl TrefBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE + self.references.iter().map(|r| r.box_size()).sum::<u64>()
    }
}

impl Mp4Box for TrefBox {
    fn box_type(&self) -> BoxType {
        BoxType::TrefBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize tref"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!("references={}", self.references.len()))
    }
}

impl<R: Read + Seek> crate::mp4box::ReadBox<&mut R> for TrefBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::TrefBox, start, size);

        let mut references = Vec::new();
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
            check_child_fits(size, child.size, "tref box contains an oversized child box")?;

            let child_start = box_start(reader, &child)?;
            let track_id_bytes = child.size.saturating_sub(HEADER_SIZE);
            let count = track_id_bytes / 4;
            let mut track_ids = Vec::with_capacity(count as usize);
            for _ in 0..count {
                track_ids.push(reader.read_u32::<BigEndian>()?);
            }

            references.push(TrackReference {
                meta: BoxMeta::new(child_start, child.size, child.name),
                reference_type: child.name.into(),
                track_ids,
            });
        }

        crate::mp4box::reconcile_extra_bytes(reader, start, size, "tref")?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::TrefBox),
            references,
        })
    }
}
