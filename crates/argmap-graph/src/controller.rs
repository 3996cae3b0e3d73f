//! Application root: owns the store, the selection and the panel working
//! copy, and is the only holder of a writable reference to any of them.
//!
//! Mutation entry points:
//! - direct calls from the host shell (node creation, deletion, panel edits)
//! - canvas notifications from the rendering collaborator ([`CanvasEvent`])
//! - field updates arriving on the [`EventBus`] from canvas-embedded editors
//!
//! Every entry point runs to completion before returning, and each one leaves
//! the state consistent: no dangling edge, no selection pointing at a removed
//! id, and a panel working copy present exactly when something is selected.

use crate::admission::ConnectionAdmission;
use crate::bus::{EventBus, Subscription};
use crate::config::MapConfig;
use crate::editor::InlineNodeEditor;
use crate::panel::{PanelEditor, PanelInput};
use crate::selection::{SelectionController, SelectionState};
use crate::store::{EdgeInsert, GraphSnapshot, GraphStore, NodeRemoval};
use crate::view::{NodeView, PanelView, Scene};
use argmap_core::{
    CanvasEvent, ClaimId, ClaimType, EdgeId, EdgeUpdate, Error, FieldUpdateMessage, NodeUpdate,
    Position, RelationEdge, Result,
};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error, info, warn};

/// Everything the controller mutates. Shared with the bus handler.
#[derive(Debug, Default)]
struct MapState {
    store: GraphStore,
    selection: SelectionController,
    panel: PanelEditor,
}

impl MapState {
    /// Apply a field update to the store and mirror it into the working copy.
    fn apply_update(&mut self, message: &FieldUpdateMessage) -> bool {
        match self.store.apply(message) {
            Ok(()) => {
                self.panel.sync(message);
                true
            }
            Err(e) => {
                log_dropped(&e);
                false
            }
        }
    }

    fn reseed_panel(&mut self) {
        self.panel.seed(self.selection.state(), &self.store);
    }

    fn is_consistent(&self) -> bool {
        self.store.is_consistent()
            && self.selection.state().resolves_in(&self.store)
            && self.selection.state().is_empty() == self.panel.working().is_none()
    }
}

fn log_dropped(e: &Error) {
    if e.is_reference_error() {
        debug!("no-op: {}", e);
    } else {
        warn!("rejected: {}", e);
    }
}

pub struct MapController {
    state: Rc<RefCell<MapState>>,
    bus: EventBus,
    admission: ConnectionAdmission,
    config: MapConfig,
    _subscription: Subscription,
}

impl std::fmt::Debug for MapController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapController")
            .field("state", &self.state)
            .field("bus", &self.bus)
            .finish()
    }
}

impl MapController {
    /// Start with an empty map, or the example map if the config asks for it.
    pub fn new(config: MapConfig) -> Result<Self> {
        let store = if config.seed.example_graph {
            crate::seed::example_graph()?
        } else {
            GraphStore::new()
        };
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: MapConfig, store: GraphStore) -> Self {
        Self::with_bus(config, store, EventBus::new())
    }

    /// Attach to an existing bus. The store's handler is registered here,
    /// before any editor gets a handle, and unregistered when the controller drops.
    pub fn with_bus(config: MapConfig, store: GraphStore, bus: EventBus) -> Self {
        let state = Rc::new(RefCell::new(MapState {
            store,
            ..MapState::default()
        }));

        let weak = Rc::downgrade(&state);
        let subscription = bus.subscribe(move |message| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            match state.try_borrow_mut() {
                Ok(mut state) => {
                    state.apply_update(message);
                }
                Err(_) => error!(
                    id = message.id_str(),
                    field = message.field_name(),
                    "bus update published during a store mutation; dropped"
                ),
            };
        });

        info!(
            nodes = state.borrow().store.nodes().len(),
            edges = state.borrow().store.edges().len(),
            "argument map ready"
        );

        Self {
            state,
            bus,
            admission: ConnectionAdmission::new(config.connections.self_loops),
            config,
            _subscription: subscription,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Handle for canvas-embedded editors.
    pub fn bus(&self) -> EventBus {
        self.bus.clone()
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Run `f` against the canonical store.
    pub fn read<R>(&self, f: impl FnOnce(&GraphStore) -> R) -> R {
        f(&self.state.borrow().store)
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        self.read(GraphStore::snapshot)
    }

    pub fn selection(&self) -> SelectionState {
        self.state.borrow().selection.state().clone()
    }

    /// Fresh render data for the collaborator.
    pub fn render(&self) -> Scene {
        Scene::derive(&self.state.borrow().store, &self.config.palette)
    }

    /// Side panel contents, or `None` with nothing selected.
    pub fn panel_view(&self) -> Option<PanelView> {
        let state = self.state.borrow();
        state
            .panel
            .working()
            .map(|working| PanelView::of(working, &self.config.palette))
    }

    /// Editor for one rendered node, wired to the bus.
    pub fn inline_editor(&self, id: &ClaimId) -> Option<InlineNodeEditor> {
        let state = self.state.borrow();
        let node = state.store.node(id)?;
        Some(InlineNodeEditor::new(NodeView::of(node), self.bus.clone()))
    }

    pub fn can_delete_selected(&self) -> bool {
        !self.state.borrow().selection.state().is_empty()
    }

    // ------------------------------------------------------------------
    // Host actions
    // ------------------------------------------------------------------

    /// "Add claim" button.
    pub fn add_node(&mut self, claim_type: ClaimType) -> ClaimId {
        let mut state = self.state.borrow_mut();
        let id = state
            .store
            .add_node(claim_type, &self.config.defaults)
            .id
            .clone();
        id
    }

    pub fn select_node(&mut self, id: &ClaimId) {
        let mut state = self.state.borrow_mut();
        if !state.store.contains_node(id) {
            log_dropped(&Error::NodeNotFound(id.clone()));
            return;
        }
        state.selection.select_node(id.clone());
        state.reseed_panel();
    }

    pub fn select_edge(&mut self, id: &EdgeId) {
        let mut state = self.state.borrow_mut();
        if !state.store.contains_edge(id) {
            log_dropped(&Error::EdgeNotFound(id.clone()));
            return;
        }
        state.selection.select_edge(id.clone());
        state.reseed_panel();
    }

    pub fn clear_selection(&mut self) {
        let mut state = self.state.borrow_mut();
        state.selection.clear();
        state.panel.clear();
    }

    /// Side panel input. Goes straight to the store, then the working copy.
    pub fn panel_input(&mut self, input: PanelInput) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(message) = state.panel.working().and_then(|w| input.to_message(w)) else {
            debug!(
                ?input,
                selected = ?state.selection.state().kind(),
                "panel shows no control for this input"
            );
            return false;
        };
        state.apply_update(&message)
    }

    pub fn update_node_field(&mut self, id: &ClaimId, update: NodeUpdate) -> bool {
        self.state
            .borrow_mut()
            .apply_update(&FieldUpdateMessage::node(id.clone(), update))
    }

    pub fn update_edge_field(&mut self, id: &EdgeId, update: EdgeUpdate) -> bool {
        self.state
            .borrow_mut()
            .apply_update(&FieldUpdateMessage::edge(id.clone(), update))
    }

    /// Delete a node and its incident edges, clearing the selection in the
    /// same step if it pointed at any of them.
    pub fn delete_node(&mut self, id: &ClaimId) -> Option<NodeRemoval> {
        let mut state = self.state.borrow_mut();
        let Some(removal) = state.store.delete_node(id) else {
            log_dropped(&Error::NodeNotFound(id.clone()));
            return None;
        };
        if state.selection.on_node_removed(&removal) {
            state.panel.clear();
        }
        debug_assert!(state.is_consistent());
        Some(removal)
    }

    pub fn delete_edge(&mut self, id: &EdgeId) -> Option<RelationEdge> {
        let mut state = self.state.borrow_mut();
        let Some(edge) = state.store.delete_edge(id) else {
            log_dropped(&Error::EdgeNotFound(id.clone()));
            return None;
        };
        if state.selection.on_edge_removed(id) {
            state.panel.clear();
        }
        debug_assert!(state.is_consistent());
        Some(edge)
    }

    /// "Delete selected" button. Returns whether anything was removed.
    pub fn delete_selected(&mut self) -> bool {
        match self.selection() {
            SelectionState::Empty => false,
            SelectionState::NodeSelected(id) => self.delete_node(&id).is_some(),
            SelectionState::EdgeSelected(id) => self.delete_edge(&id).is_some(),
        }
    }

    /// Admit a drag-connect and add the edge.
    pub fn connect(&mut self, source: &ClaimId, target: &ClaimId) -> Result<EdgeInsert> {
        let mut state = self.state.borrow_mut();
        let insert = self.admission.admit(&mut state.store, source, target)?;
        if let EdgeInsert::Replaced(id) = &insert {
            if let Some(edge) = state.store.edge(id).cloned() {
                state.panel.sync_edge(&edge);
            }
        }
        Ok(insert)
    }

    pub fn move_node(&mut self, id: &ClaimId, position: Position) {
        let mut state = self.state.borrow_mut();
        match state.store.move_node(id, position) {
            Ok(()) => state.panel.sync_position(id, position),
            Err(e) => log_dropped(&e),
        }
    }

    // ------------------------------------------------------------------
    // Rendering collaborator
    // ------------------------------------------------------------------

    /// Dispatch one notification from the canvas. Failures are logged and
    /// leave the graph as it was.
    pub fn handle(&mut self, event: CanvasEvent) {
        match event {
            CanvasEvent::NodeMoved { id, position } => self.move_node(&id, position),
            CanvasEvent::NodeClick { id } => self.select_node(&id),
            CanvasEvent::EdgeClick { id } => self.select_edge(&id),
            CanvasEvent::Connect { source, target } => {
                if let Err(e) = self.connect(&source, &target) {
                    log_dropped(&e);
                }
            }
            CanvasEvent::PaneClick => self.clear_selection(),
        }
    }
}
