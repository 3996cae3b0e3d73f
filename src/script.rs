//! JSON-lines interaction scripts.
//!
//! One step per line, tagged by `op`. Blank lines are skipped; lines that do
//! not parse are collected as errors with their 1-based line number instead of
//! aborting the whole script.
//!
//! ```text
//! {"op":"add_node","claim_type":"value"}
//! {"op":"canvas","event":{"type":"connect","source":"1","target":"2"}}
//! {"op":"bus","event":"nodeUpdate","detail":{"id":"2","field":"belief","value":0.3}}
//! {"op":"inline","id":"1","input":{"field":"belief_slider","value":40}}
//! {"op":"panel","input":{"field":"weight_percent","value":-50}}
//! {"op":"delete_selected"}
//! ```

use std::fs;
use std::path::Path;

use argmap_core::{CanvasEvent, ClaimId, ClaimType, EdgeId, WireDetail, WireEvent};
use argmap_graph::PanelInput;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// "Add claim" button.
    AddNode { claim_type: ClaimType },
    /// Notification from the rendering collaborator.
    Canvas { event: CanvasEvent },
    /// Raw named event broadcast by a canvas-embedded editor.
    Bus { event: String, detail: WireDetail },
    /// Input on the editor embedded in one rendered node.
    Inline { id: ClaimId, input: InlineInput },
    /// Input in the side panel for the current selection.
    Panel { input: PanelInput },
    DeleteNode { id: ClaimId },
    DeleteEdge { id: EdgeId },
    DeleteSelected,
}

impl Step {
    pub fn wire(&self) -> Option<WireEvent> {
        match self {
            Self::Bus { event, detail } => Some(WireEvent {
                event: event.clone(),
                detail: detail.clone(),
            }),
            _ => None,
        }
    }
}

/// Raw control values as an inline node editor receives them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum InlineInput {
    Text(String),
    /// Select menu value, e.g. `"policy"`. Unknown values are ignored.
    Type(String),
    BeliefSlider(i64),
    Author(String),
}

pub struct ParseResult {
    pub steps: Vec<ScriptStep>,
    pub errors: Vec<ParseError>,
}

/// A parsed step and the line it came from.
pub struct ScriptStep {
    pub line: usize,
    pub step: Step,
}

#[derive(Debug)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

pub fn parse_script(path: &Path) -> Result<ParseResult, std::io::Error> {
    let content = fs::read_to_string(path)?;
    Ok(parse_lines(&content))
}

pub fn parse_lines(content: &str) -> ParseResult {
    let mut steps = Vec::new();
    let mut errors = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match serde_json::from_str::<Step>(line) {
            Ok(step) => steps.push(ScriptStep { line: i + 1, step }),
            Err(e) => errors.push(ParseError {
                line: i + 1,
                message: e.to_string(),
            }),
        }
    }

    ParseResult { steps, errors }
}
