//! Editors embedded in claim nodes.
//!
//! These run inside the rendering collaborator's element tree with no handle
//! on the store. Each input becomes a [`FieldUpdateMessage`] published on the
//! [`EventBus`].
//!
//! Range clamping happens here, before publishing. The store applies whatever
//! it receives, so an unclamped value published by anything else lands as-is.

use crate::bus::EventBus;
use crate::view::{inline_type_options, NodeView, SelectOption};
use argmap_core::{ClaimType, FieldUpdateMessage, NodeUpdate};
use tracing::debug;

/// Slider percent (0..=100) to belief in [0, 1].
pub fn clamp_belief_percent(percent: i64) -> f64 {
    percent.clamp(0, 100) as f64 / 100.0
}

/// Slider percent (-100..=100) to weight in [-1, 1].
pub fn clamp_weight_percent(percent: i64) -> f64 {
    percent.clamp(-100, 100) as f64 / 100.0
}

/// Input handlers for one rendered claim node.
#[derive(Debug, Clone)]
pub struct InlineNodeEditor {
    view: NodeView,
    bus: EventBus,
}

impl InlineNodeEditor {
    pub fn new(view: NodeView, bus: EventBus) -> Self {
        Self { view, bus }
    }

    /// The props this editor was rendered with.
    pub fn view(&self) -> &NodeView {
        &self.view
    }

    pub fn type_options(&self) -> Vec<SelectOption> {
        inline_type_options()
    }

    pub fn on_text_input(&self, text: &str) {
        self.publish(NodeUpdate::Text(text.to_string()));
    }

    /// Select menu change. Values outside the option list are ignored.
    pub fn on_type_select(&self, value: &str) {
        match value.parse::<ClaimType>() {
            Ok(claim_type) => self.publish(NodeUpdate::Type(claim_type)),
            Err(e) => debug!(id = %self.view.id, "ignoring type select: {}", e),
        }
    }

    /// Belief slider moved. No-op when the claim has no belief, since the
    /// slider is not rendered then.
    pub fn on_belief_slider(&self, percent: i64) {
        if self.view.belief.is_none() {
            debug!(id = %self.view.id, "belief slider hidden; ignoring input");
            return;
        }
        self.publish(NodeUpdate::Belief(Some(clamp_belief_percent(percent))));
    }

    pub fn on_author_input(&self, author: &str) {
        self.publish(NodeUpdate::Author(author.to_string()));
    }

    fn publish(&self, update: NodeUpdate) {
        self.bus
            .publish(FieldUpdateMessage::node(self.view.id.clone(), update));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argmap_core::ClaimNode;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(bus: &EventBus) -> (Rc<RefCell<Vec<FieldUpdateMessage>>>, crate::bus::Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let sub = bus.subscribe(move |m| sink.borrow_mut().push(m.clone()));
        (seen, sub)
    }

    #[test]
    fn clamps() {
        assert_eq!(clamp_belief_percent(-5), 0.0);
        assert_eq!(clamp_belief_percent(30), 0.3);
        assert_eq!(clamp_belief_percent(250), 1.0);
        assert_eq!(clamp_weight_percent(-101), -1.0);
        assert_eq!(clamp_weight_percent(50), 0.5);
    }

    #[test]
    fn slider_publishes_clamped_belief() {
        let bus = EventBus::new();
        let (seen, _sub) = recorder(&bus);
        let node = ClaimNode::new("2", ClaimType::Policy, "B").with_belief(Some(0.8));
        let editor = InlineNodeEditor::new(NodeView::of(&node), bus.clone());
        editor.on_belief_slider(130);
        assert_eq!(
            seen.borrow().as_slice(),
            &[FieldUpdateMessage::node("2", NodeUpdate::Belief(Some(1.0)))]
        );
    }

    #[test]
    fn hidden_slider_publishes_nothing() {
        let bus = EventBus::new();
        let (seen, _sub) = recorder(&bus);
        let node = ClaimNode::new("2", ClaimType::Policy, "B");
        let editor = InlineNodeEditor::new(NodeView::of(&node), bus.clone());
        editor.on_belief_slider(40);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn bad_type_value_is_ignored() {
        let bus = EventBus::new();
        let (seen, _sub) = recorder(&bus);
        let node = ClaimNode::new("2", ClaimType::Policy, "B");
        let editor = InlineNodeEditor::new(NodeView::of(&node), bus.clone());
        editor.on_type_select("opinion");
        editor.on_type_select("value");
        assert_eq!(
            seen.borrow().as_slice(),
            &[FieldUpdateMessage::node("2", NodeUpdate::Type(ClaimType::Value))]
        );
    }
}
