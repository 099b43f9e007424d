// Copyright 2025 Lars Brubaker
// License: MIT
//
// Error types for clipping operations.

use thiserror::Error;

use crate::geom::CInt;

/// Errors that abort a clipping call. A failed call produces no output;
/// the engine itself stays usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipError {
    /// Flat path output was requested while open paths are loaded.
    #[error("open paths can only be returned through a PolyTree")]
    OpenPathsNeedTree,

    /// Open paths may only be added as subject paths.
    #[error("open paths must be subject paths")]
    OpenClipPath,

    /// A coordinate exceeds the supported magnitude.
    #[error("coordinate ({x}, {y}) is outside the allowed range")]
    CoordinateOutOfRange { x: CInt, y: CInt },

    /// Execute was entered while another execute on the same engine was running.
    #[error("clipper is already executing")]
    Busy,

    /// No ordering of the crossings found in a scanbeam keeps every
    /// crossing pair adjacent when applied.
    #[error("intersections at scanbeam y={y} cannot be ordered")]
    IntersectionOrder { y: CInt },

    /// A closed edge reached a maximum whose partner disagrees about output.
    #[error("unpaired contributing edge at local maximum y={y}")]
    UnpairedMaxima { y: CInt },
}

/// Broad class of a [`ClipError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The call was malformed; rejected before any sweep work.
    Usage,
    /// The engine was busy.
    Concurrency,
    /// The sweep hit a topologically inconsistent state.
    Inconsistency,
}

impl ClipError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClipError::OpenPathsNeedTree
            | ClipError::OpenClipPath
            | ClipError::CoordinateOutOfRange { .. } => ErrorKind::Usage,
            ClipError::Busy => ErrorKind::Concurrency,
            ClipError::IntersectionOrder { .. } | ClipError::UnpairedMaxima { .. } => ErrorKind::Inconsistency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_partition_variants() {
        assert_eq!(ClipError::OpenPathsNeedTree.kind(), ErrorKind::Usage);
        assert_eq!(ClipError::CoordinateOutOfRange { x: 1, y: 2 }.kind(), ErrorKind::Usage);
        assert_eq!(ClipError::Busy.kind(), ErrorKind::Concurrency);
        assert_eq!(ClipError::IntersectionOrder { y: 3 }.kind(), ErrorKind::Inconsistency);
    }

    #[test]
    fn messages_carry_context() {
        let msg = ClipError::IntersectionOrder { y: 42 }.to_string();
        assert!(msg.contains("42"), "{}", msg);
    }
}
