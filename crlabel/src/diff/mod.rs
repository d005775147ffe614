//! Diff rendering surface for crlabel.
//!
//! `DiffPanel` implements the core `DiffSurface` trait: the session's diff
//! feed hands it the two documents, the commented range and the comment body,
//! and it turns them into owned, pre-highlighted rows the diff view can
//! scroll through without recomputing anything per frame.
pub mod highlight;
pub mod panel;
