//! what3chords CLI library.
//!
//! Loads encoder configurations and chord datasets from disk and runs the
//! `what3chords` commands on top of `what3chords-core`.

pub mod commands;
pub mod input;
