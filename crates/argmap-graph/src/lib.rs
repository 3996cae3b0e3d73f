//! argmap-graph: canonical argument graph and its synchronization engine.
//!
//! One mutable graph per process. The [`MapController`] owns the store, the
//! selection and the side panel's working copy; canvas-embedded editors reach
//! the store only through the [`EventBus`].

pub mod admission;
pub mod bus;
pub mod config;
pub mod controller;
pub mod editor;
pub mod panel;
pub mod seed;
pub mod selection;
pub mod store;
pub mod view;

pub use admission::{ConnectionAdmission, SelfLoopPolicy};
pub use bus::{EventBus, Subscription};
pub use config::{ConnectionConfig, MapConfig, NodeDefaults, SeedConfig};
pub use controller::MapController;
pub use editor::{clamp_belief_percent, clamp_weight_percent, InlineNodeEditor};
pub use panel::{PanelEditor, PanelInput, WorkingCopy};
pub use seed::example_graph;
pub use selection::{SelectionController, SelectionState};
pub use store::{EdgeInsert, GraphSnapshot, GraphStore, NodeRemoval};
pub use view::{EdgeView, NodeView, PanelView, Scene, SelectOption, SliderView};
