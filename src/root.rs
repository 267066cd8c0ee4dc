use std::fs::File;
use std::io::{BufReader, Read, Seek};

use crate::mp4box::{
    check_child_fits, skip_opaque, skip_unknown, BoxHeader, BoxType, EmsgBox, FtypBox, MfraBox,
    MoofBox, MoovBox, ReadBox,
};
use crate::source::ForwardOnlySeek;
use crate::tree::{ParseContext, PrintEntry};
use crate::{Error, Result};

/// The synthetic top-level container. Owns at most one `ftyp`, `moov` and
/// `mfra`, plus the ordered list of `moof` siblings and standalone `emsg`
/// boxes a fragmented stream may carry at the top level.
#[derive(Debug, Default)]
pub struct Root {
    pub ftyp: Option<FtypBox>,
    pub moov: Option<MoovBox>,
    pub mfra: Option<MfraBox>,
    pub moofs: Vec<MoofBox>,
    pub emsgs: Vec<EmsgBox>,

    /// The actually-consumed byte length of the whole stream (see
    /// `SPEC_FULL.md` §4, "Root.size becomes the true file length").
    pub size: u64,

    ctx: ParseContext,
}

impl Root {
    /// The print-handler list, in document order, if this parse ran in dump
    /// mode. Empty (not absent) when dump mode was off.
    pub fn print_handlers(&self) -> &[PrintEntry] {
        &self.ctx.print_handlers
    }

    /// Reads a seekable stream start to end. `dump_mode` gates whether typed
    /// readers populate [`Root::print_handlers`].
    pub fn read<R: Read + Seek>(mut reader: R, dump_mode: bool) -> Result<Self> {
        let size = reader.seek(std::io::SeekFrom::End(0))?;
        reader.seek(std::io::SeekFrom::Start(0))?;
        Self::read_children(&mut reader, size, dump_mode)
    }

    /// Reads the file at `path` as ISOBMFF/MP4 data.
    pub fn read_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file), false)
    }

    /// Reads a non-seekable stream (e.g. standard input). Seeking is
    /// serviced by consuming and discarding bytes, per `SPEC_FULL.md` §7
    /// ("source may be non-seekable").
    pub fn read_stream<R: Read>(reader: R, dump_mode: bool) -> Result<Self> {
        let mut seekable = ForwardOnlySeek::new(reader);
        Self::read_children(&mut seekable, crate::header::SIZE_TO_EOF, dump_mode)
    }

    fn read_children<R: Read + Seek>(reader: &mut R, size: u64, dump_mode: bool) -> Result<Self> {
        let mut ctx = ParseContext::new(dump_mode);

        let mut ftyp = None;
        let mut moov = None;
        let mut mfra = None;
        let mut moofs = Vec::new();
        let mut emsgs = Vec::new();

        let start = box_start_root(reader)?;
        loop {
            let pos = reader.stream_position()?;
            if size != crate::header::SIZE_TO_EOF && pos >= start + size {
                break;
            }

            let header = match BoxHeader::read(reader) {
                Ok(header) => header,
                Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            };
            if size != crate::header::SIZE_TO_EOF {
                check_child_fits(size, header.size, "file contains an oversized top-level box")?;
            }

            match header.name {
                BoxType::FtypBox => {
                    if ftyp.is_none() {
                        ftyp = Some(FtypBox::read_box(reader, header, &mut ctx, 0)?);
                    } else {
                        skip_unknown(reader, header, &mut ctx, 0)?;
                    }
                }
                BoxType::MoovBox => {
                    if moov.is_none() {
                        moov = Some(MoovBox::read_box(reader, header, &mut ctx, 0)?);
                    } else {
                        skip_unknown(reader, header, &mut ctx, 0)?;
                    }
                }
                BoxType::MoofBox => {
                    moofs.push(MoofBox::read_box(reader, header, &mut ctx, 0)?);
                }
                BoxType::MfraBox => {
                    if mfra.is_none() {
                        mfra = Some(MfraBox::read_box(reader, header, &mut ctx, 0)?);
                    } else {
                        skip_unknown(reader, header, &mut ctx, 0)?;
                    }
                }
                BoxType::EmsgBox => {
                    emsgs.push(EmsgBox::read_box(reader, header, &mut ctx, 0)?);
                }
                BoxType::FreeBox | BoxType::SkipBox | BoxType::MdatBox | BoxType::WideBox => {
                    skip_opaque(reader, header, &mut ctx, 0)?;
                }
                _ => {
                    skip_unknown(reader, header, &mut ctx, 0)?;
                }
            }
        }

        let consumed = reader.stream_position()? - start;

        Ok(Self {
            ftyp,
            moov,
            mfra,
            moofs,
            emsgs,
            size: consumed,
            ctx,
        })
    }
}

fn box_start_root<R: Seek>(reader: &mut R) -> Result<u64> {
    Ok(reader.stream_position()?)
}
