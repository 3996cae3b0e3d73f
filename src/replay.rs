//! Drive a [`MapController`] through a parsed script, the way a host shell
//! would, and report what the user would see afterwards.

use argmap_core::{CanvasEvent, ClaimType, FieldUpdateMessage};
use argmap_graph::{GraphSnapshot, MapController, PanelView, Scene, SelectionState};
use serde::Serialize;
use tracing::{debug, warn};

use crate::script::{InlineInput, ScriptStep, Step};

/// A step that ran but changed nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejected {
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub applied: usize,
    pub rejected: Vec<Rejected>,
    pub selection: SelectionState,
    pub can_delete_selected: bool,
    pub scene: Scene,
    pub panel: Option<PanelView>,
    pub snapshot: GraphSnapshot,
}

impl ReplayReport {
    pub fn capture(map: &MapController, applied: usize, rejected: Vec<Rejected>) -> Self {
        Self {
            applied,
            rejected,
            selection: map.selection(),
            can_delete_selected: map.can_delete_selected(),
            scene: map.render(),
            panel: map.panel_view(),
            snapshot: map.snapshot(),
        }
    }
}

/// Run one step. `Err` carries the reason the step had no effect.
pub fn apply_step(map: &mut MapController, step: &Step) -> Result<(), String> {
    match step {
        Step::AddNode { claim_type } => {
            map.add_node(*claim_type);
            Ok(())
        }
        Step::Canvas {
            event: CanvasEvent::Connect { source, target },
        } => map
            .connect(source, target)
            .map(|_| ())
            .map_err(|e| e.to_string()),
        Step::Canvas { event } => {
            check_canvas_target(map, event)?;
            map.handle(event.clone());
            Ok(())
        }
        Step::Bus { .. } => {
            let Some(wire) = step.wire() else {
                return Err("not a bus event".into());
            };
            let message = FieldUpdateMessage::from_wire(&wire).map_err(|e| e.to_string())?;
            check_message_target(map, &message)?;
            map.bus().publish(message);
            Ok(())
        }
        Step::Inline { id, input } => {
            let Some(editor) = map.inline_editor(id) else {
                return Err(format!("no rendered node {}", id));
            };
            match input {
                InlineInput::Text(text) => editor.on_text_input(text),
                InlineInput::Type(value) => {
                    value.parse::<ClaimType>().map_err(|e| e.to_string())?;
                    editor.on_type_select(value)
                }
                InlineInput::BeliefSlider(percent) => {
                    if editor.view().belief.is_none() {
                        return Err(format!("node {} has no belief slider", id));
                    }
                    editor.on_belief_slider(*percent)
                }
                InlineInput::Author(author) => editor.on_author_input(author),
            }
            Ok(())
        }
        Step::Panel { input } => {
            if map.panel_input(input.clone()) {
                Ok(())
            } else {
                Err("panel input does not apply to the selection".into())
            }
        }
        Step::DeleteNode { id } => map
            .delete_node(id)
            .map(|_| ())
            .ok_or_else(|| format!("node not found: {}", id)),
        Step::DeleteEdge { id } => map
            .delete_edge(id)
            .map(|_| ())
            .ok_or_else(|| format!("edge not found: {}", id)),
        Step::DeleteSelected => {
            if map.delete_selected() {
                Ok(())
            } else {
                Err("nothing selected".into())
            }
        }
    }
}

fn check_canvas_target(map: &MapController, event: &CanvasEvent) -> Result<(), String> {
    let found = match event {
        CanvasEvent::NodeMoved { id, .. } | CanvasEvent::NodeClick { id } => {
            map.read(|s| s.contains_node(id))
        }
        CanvasEvent::EdgeClick { id } => map.read(|s| s.contains_edge(id)),
        CanvasEvent::Connect { .. } | CanvasEvent::PaneClick => true,
    };
    if found {
        Ok(())
    } else {
        Err(format!("canvas target not found: {:?}", event))
    }
}

fn check_message_target(map: &MapController, message: &FieldUpdateMessage) -> Result<(), String> {
    let found = match message {
        FieldUpdateMessage::Node { id, .. } => map.read(|s| s.contains_node(id)),
        FieldUpdateMessage::Edge { id, .. } => map.read(|s| s.contains_edge(id)),
    };
    if found {
        Ok(())
    } else {
        Err(format!(
            "{} not found: {}",
            message.entity_kind(),
            message.id_str()
        ))
    }
}

/// Run every step in order and capture the final state.
pub fn replay(map: &mut MapController, steps: &[ScriptStep]) -> ReplayReport {
    let mut applied = 0;
    let mut rejected = Vec::new();

    for ScriptStep { line, step } in steps {
        match apply_step(map, step) {
            Ok(()) => {
                debug!(line, ?step, "step applied");
                applied += 1;
            }
            Err(reason) => {
                warn!(line, %reason, "step had no effect");
                rejected.push(Rejected {
                    line: *line,
                    reason,
                });
            }
        }
    }

    ReplayReport::capture(map, applied, rejected)
}
