//! CLI command implementations

pub mod cell;
pub mod check;
pub mod config;
pub mod decode;
pub mod encode;
pub mod json_output;
pub mod survey;

mod reporting;
