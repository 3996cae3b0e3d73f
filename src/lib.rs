//! Headless host shell for the argument map: replay recorded interaction
//! scripts against a [`argmap_graph::MapController`] and inspect the result.

pub mod replay;
pub mod script;

pub use replay::{apply_step, replay, Rejected, ReplayReport};
pub use script::{parse_lines, parse_script, InlineInput, ParseError, ParseResult, ScriptStep, Step};
