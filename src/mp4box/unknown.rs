use serde::Serialize;

use crate::mp4box::BoxType;
use crate::types::FourCC;

/// A box that was legal at its parent but whose contents this crate doesn't
/// decode — `mdat`, `free`, `skip`, `wide`, `esds`, or a codec extension box
/// recognized only by type. Its payload is never read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpaqueBox {
    pub box_type: BoxType,
    pub pos: u64,
    pub size: u64,
}

/// A box whose 4CC was not recognized at all, or that turned up under a
/// parent it isn't legal under. Recorded for the print-handler list only —
/// it is never attached anywhere in the typed tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownBox {
    pub fourcc: FourCC,
    pub pos: u64,
    pub size: u64,
}
