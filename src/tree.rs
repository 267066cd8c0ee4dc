use crate::mp4box::{BoxType, OpaqueBox, UnknownBox};

/// The header fields every decoded box carries, embedded (not inherited) as
/// the first field of each typed box struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct BoxMeta {
    pub pos: u64,
    pub size: u64,
    pub box_type: BoxType,
}

impl BoxMeta {
    pub fn new(pos: u64, size: u64, box_type: BoxType) -> Self {
        Self {
            pos,
            size,
            box_type,
        }
    }
}

/// One entry in the root's ordered print-handler list (see `spec.md` §3,
/// "print-handler list"). Entries are plain owned descriptors rather than
/// borrows into the tree: the tree's real nodes are reachable through the
/// typed fields of `Root`/`MoovBox`/etc, so a print walk only needs enough
/// information to name and locate each node, plus the full payload for the
/// two node kinds that are *not* reachable any other way.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum PrintEntry {
    /// A typed, tree-owned box. `depth` is its nesting level for indentation.
    Node {
        depth: u32,
        box_type: BoxType,
        pos: u64,
        size: u64,
    },
    Unknown { depth: u32, unknown: UnknownBox },
    Opaque { depth: u32, opaque: OpaqueBox },
}

impl PrintEntry {
    pub fn depth(&self) -> u32 {
        match self {
            PrintEntry::Node { depth, .. }
            | PrintEntry::Unknown { depth, .. }
            | PrintEntry::Opaque { depth, .. } => *depth,
        }
    }
}

/// Threaded explicitly through every reader in place of a parent/root back
/// pointer (see `SPEC_FULL.md` §4). Carries the one piece of genuinely
/// global state a parse needs: whether to record print-handler entries at
/// all, and the list itself.
#[derive(Debug, Default)]
pub struct ParseContext {
    pub dump_mode: bool,
    pub print_handlers: Vec<PrintEntry>,
}

impl ParseContext {
    pub fn new(dump_mode: bool) -> Self {
        Self {
            dump_mode,
            print_handlers: Vec::new(),
        }
    }

    pub fn record_node(&mut self, depth: u32, box_type: BoxType, pos: u64, size: u64) {
        if self.dump_mode {
            self.print_handlers.push(PrintEntry::Node {
                depth,
                box_type,
                pos,
                size,
            });
        }
    }

    pub fn record_unknown(&mut self, depth: u32, unknown: UnknownBox) {
        if self.dump_mode {
            self.print_handlers
                .push(PrintEntry::Unknown { depth, unknown });
        }
    }

    pub fn record_opaque(&mut self, depth: u32, opaque: OpaqueBox) {
        if self.dump_mode {
            self.print_handlers
                .push(PrintEntry::Opaque { depth, opaque });
        }
    }
}
