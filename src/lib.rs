//! A demuxer-side parser for the ISO Base Media File Format
//! (ISOBMFF / MPEG-4 Part 12 / QuickTime).
//!
//! Given a seekable file or a non-seekable byte stream, [`Root::read`] (or
//! [`Root::read_file`] / [`Root::read_stream`]) walks the box tree, validates
//! structural invariants and materializes a strongly-typed tree rooted at
//! [`Root`]. Enabling dump mode records every node visited, in document
//! order, for later pretty-printing via [`Root::print_handlers`].
//!
//! This package implements parts of:
//!    * ISO/IEC 14496-12 - ISO Base Media File Format (QuickTime, MPEG-4, etc)
//!    * ISO/IEC 14496-14 - MP4 file format
//!    * ISO/IEC 14496-17 - Streaming text format

mod error;
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;

pub mod dispatch;
mod flags;
mod header;
mod mp4box;
mod root;
mod source;
mod tree;
mod types;

pub use flags::SampleFlags;
pub use header::{BoxHeader, HEADER_EXT_SIZE, HEADER_SIZE, SIZE_TO_EOF};
pub use mp4box::*;
pub use root::Root;
pub use source::ForwardOnlySeek;
pub use tree::{BoxMeta, ParseContext, PrintEntry};
pub use types::*;
