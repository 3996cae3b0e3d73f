//! Tests for argmap-graph: store, selection, bus-driven sync, editors,
//! connection admission, projections and config

use argmap_core::*;
use argmap_graph::*;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

fn example_map() -> MapController {
    let mut config = MapConfig::default();
    config.seed.example_graph = true;
    MapController::new(config).unwrap()
}

fn node_ids(map: &MapController) -> Vec<String> {
    map.read(|s| s.nodes().iter().map(|n| n.id.to_string()).collect())
}

fn edge_ids(map: &MapController) -> Vec<String> {
    map.read(|s| s.edges().iter().map(|e| e.id.to_string()).collect())
}

// ===========================================================================
// Seed
// ===========================================================================

#[test]
fn example_map_renders_one_support_edge() {
    let map = example_map();
    let scene = map.render();
    assert_eq!(scene.nodes.len(), 2);
    let edge = scene.edge(&"e1-2".into()).unwrap();
    assert_eq!(edge.style.color, "#22c55e");
    assert_eq!(edge.style.label, "+0.8");
    assert_eq!(edge.label_at, Position::new(100.0, 50.0));
    let node = scene.node(&"1".into()).unwrap();
    assert_eq!(node.class, "factual");
    assert_eq!(node.belief.as_ref().unwrap().label, "90%");
}

#[test]
fn empty_config_starts_empty() {
    let map = MapController::new(MapConfig::default()).unwrap();
    assert!(map.snapshot().nodes.is_empty());
    assert!(map.snapshot().edges.is_empty());
}

// ===========================================================================
// Cascade delete
// ===========================================================================

#[test]
fn deleting_selected_node_cascades_and_clears_selection() {
    let mut map = example_map();
    map.select_node(&"1".into());
    assert!(map.can_delete_selected());
    assert!(map.delete_selected());
    assert_eq!(node_ids(&map), vec!["2"]);
    assert!(edge_ids(&map).is_empty());
    assert_eq!(map.selection(), SelectionState::Empty);
    assert!(map.panel_view().is_none());
    assert!(!map.can_delete_selected());
}

#[test]
fn cascade_removes_exactly_incident_edges() {
    let mut map = example_map();
    let third = map.add_node(ClaimType::Value);
    map.connect(&"2".into(), &third).unwrap();
    map.connect(&third, &"1".into()).unwrap();
    assert_eq!(edge_ids(&map).len(), 3);

    let removal = map.delete_node(&"2".into()).unwrap();
    assert_eq!(removal.edges.len(), 2);
    assert_eq!(edge_ids(&map), vec![format!("e{}-1", third)]);
    assert!(map.read(GraphStore::is_consistent));
}

#[test]
fn deleting_node_clears_selection_of_cascaded_edge() {
    let mut map = example_map();
    map.select_edge(&"e1-2".into());
    map.delete_node(&"2".into()).unwrap();
    assert!(map.selection().is_empty());
    assert!(map.panel_view().is_none());
}

#[test]
fn deleting_selected_edge_keeps_nodes() {
    let mut map = example_map();
    map.select_edge(&"e1-2".into());
    assert!(map.delete_selected());
    assert_eq!(node_ids(&map), vec!["1", "2"]);
    assert!(edge_ids(&map).is_empty());
    assert!(map.selection().is_empty());
}

#[test]
fn deleting_unselected_entity_keeps_selection() {
    let mut map = example_map();
    let third = map.add_node(ClaimType::Policy);
    map.select_node(&"2".into());
    map.delete_node(&third).unwrap();
    assert_eq!(map.selection(), SelectionState::NodeSelected("2".into()));
    assert!(map.panel_view().is_some());
}

#[test]
fn deleting_missing_node_is_a_no_op() {
    let mut map = example_map();
    let before = map.snapshot();
    assert!(map.delete_node(&"404".into()).is_none());
    assert!(map.delete_edge(&"e4-4".into()).is_none());
    assert_eq!(map.snapshot(), before);
}

// ===========================================================================
// Bus-driven updates
// ===========================================================================

#[test]
fn bus_belief_update_reaches_store_and_panel() {
    let mut map = example_map();
    map.select_node(&"2".into());
    map.bus()
        .publish(FieldUpdateMessage::node("2", NodeUpdate::Belief(Some(0.3))));

    map.read(|s| assert_eq!(s.node(&"2".into()).unwrap().belief, Some(0.3)));
    match map.panel_view() {
        Some(PanelView::Node { belief, .. }) => {
            let slider = belief.unwrap();
            assert_eq!(slider.value, 30);
            assert_eq!(slider.label, "30%");
        }
        other => panic!("unexpected panel: {:?}", other),
    }
}

#[test]
fn bus_weight_update_restyles_edge() {
    let map = example_map();
    let published = map.bus().publish_wire(
        &serde_json::from_value(json!({
            "event": "edgeUpdate",
            "detail": { "id": "e1-2", "field": "weight", "value": -0.5 }
        }))
        .unwrap(),
    );
    assert!(published);
    let scene = map.render();
    let edge = scene.edge(&"e1-2".into()).unwrap();
    assert_eq!(edge.style.color, "#ef4444");
    assert!(!edge.style.is_dashed());
    assert_eq!(edge.style.label, "-0.5");
}

#[test]
fn store_does_not_clamp_bus_values() {
    let map = example_map();
    map.bus()
        .publish(FieldUpdateMessage::edge("e1-2", EdgeUpdate::Weight(3.0)));
    map.bus()
        .publish(FieldUpdateMessage::node("1", NodeUpdate::Belief(Some(-2.0))));
    map.read(|s| {
        assert_eq!(s.edge(&"e1-2".into()).unwrap().weight, 3.0);
        assert_eq!(s.node(&"1".into()).unwrap().belief, Some(-2.0));
    });
}

#[test]
fn update_is_idempotent() {
    let map = example_map();
    let msg = FieldUpdateMessage::node("1", NodeUpdate::Text("Same".into()));
    map.bus().publish(msg.clone());
    let once = map.snapshot();
    map.bus().publish(msg);
    assert_eq!(map.snapshot(), once);
}

#[test]
fn update_for_deleted_node_is_dropped() {
    let mut map = example_map();
    map.delete_node(&"1".into());
    let before = map.snapshot();
    map.bus()
        .publish(FieldUpdateMessage::node("1", NodeUpdate::Text("ghost".into())));
    assert_eq!(map.snapshot(), before);
}

#[test]
fn unknown_wire_field_is_dropped() {
    let map = example_map();
    let before = map.snapshot();
    let published = map.bus().publish_wire(
        &serde_json::from_value(json!({
            "event": "nodeUpdate",
            "detail": { "id": "1", "field": "colour", "value": "red" }
        }))
        .unwrap(),
    );
    assert!(!published);
    assert_eq!(map.snapshot(), before);
}

#[test]
fn wire_update_without_value_keeps_belief() {
    let map = example_map();
    let published = map.bus().publish_wire(
        &serde_json::from_value(json!({
            "event": "nodeUpdate",
            "detail": { "id": "1", "field": "belief" }
        }))
        .unwrap(),
    );
    assert!(!published);
    map.read(|s| assert_eq!(s.node(&"1".into()).unwrap().belief, Some(0.9)));
}

#[test]
fn other_subscribers_see_updates_in_order() {
    let map = example_map();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let _sub = map
        .bus()
        .subscribe(move |m| sink.borrow_mut().push(m.field_name().to_string()));
    map.bus()
        .publish(FieldUpdateMessage::node("1", NodeUpdate::Text("a".into())));
    map.bus()
        .publish(FieldUpdateMessage::edge("e1-2", EdgeUpdate::Weight(0.1)));
    assert_eq!(*seen.borrow(), vec!["text", "weight"]);
}

// ===========================================================================
// Inline editors
// ===========================================================================

#[test]
fn inline_belief_slider_clamps_before_publishing() {
    let map = example_map();
    let editor = map.inline_editor(&"1".into()).unwrap();
    editor.on_belief_slider(150);
    map.read(|s| assert_eq!(s.node(&"1".into()).unwrap().belief, Some(1.0)));
    editor.on_belief_slider(-5);
    map.read(|s| assert_eq!(s.node(&"1".into()).unwrap().belief, Some(0.0)));
}

#[test]
fn inline_editor_type_options_use_claim_label() {
    let map = example_map();
    let editor = map.inline_editor(&"2".into()).unwrap();
    let labels: Vec<_> = editor.type_options().iter().map(|o| o.label).collect();
    assert_eq!(labels, vec!["Factual", "Policy", "Claim"]);
    editor.on_type_select("value");
    map.read(|s| assert_eq!(s.node(&"2".into()).unwrap().claim_type, ClaimType::Value));
    editor.on_type_select("rumour");
    map.read(|s| assert_eq!(s.node(&"2".into()).unwrap().claim_type, ClaimType::Value));
}

#[test]
fn inline_text_updates_panel_of_selected_node() {
    let mut map = example_map();
    map.select_node(&"1".into());
    map.inline_editor(&"1".into())
        .unwrap()
        .on_text_input("Edited inline");
    match map.panel_view() {
        Some(PanelView::Node { text, .. }) => assert_eq!(text, "Edited inline"),
        other => panic!("unexpected panel: {:?}", other),
    }
}

#[test]
fn null_belief_hides_slider() {
    let store = GraphStore::seeded(
        [ClaimNode::new("x", ClaimType::Value, "Undecided")],
        [],
    )
    .unwrap();
    let map = MapController::with_store(MapConfig::default(), store);
    let editor = map.inline_editor(&"x".into()).unwrap();
    assert!(editor.view().belief.is_none());
    editor.on_belief_slider(70);
    map.read(|s| assert_eq!(s.node(&"x".into()).unwrap().belief, None));
}

// ===========================================================================
// Side panel
// ===========================================================================

#[test]
fn panel_weight_input_clamps_and_restyles() {
    let mut map = example_map();
    map.select_edge(&"e1-2".into());
    assert!(map.panel_input(PanelInput::WeightPercent(-400)));
    map.read(|s| assert_eq!(s.edge(&"e1-2".into()).unwrap().weight, -1.0));
    match map.panel_view() {
        Some(PanelView::Edge { weight, style, .. }) => {
            assert_eq!(weight.label, "-100%");
            assert_eq!(style.color, "#ef4444");
        }
        other => panic!("unexpected panel: {:?}", other),
    }
}

#[test]
fn panel_belief_input_ignored_when_slider_hidden() {
    let store = GraphStore::seeded(
        [ClaimNode::new("x", ClaimType::Value, "Undecided")],
        [],
    )
    .unwrap();
    let mut map = MapController::with_store(MapConfig::default(), store);
    map.select_node(&"x".into());
    match map.panel_view() {
        Some(PanelView::Node { belief, .. }) => assert!(belief.is_none()),
        other => panic!("unexpected panel: {:?}", other),
    }
    assert!(!map.panel_input(PanelInput::BeliefPercent(70)));
    map.read(|s| assert_eq!(s.node(&"x".into()).unwrap().belief, None));
    assert!(map.panel_input(PanelInput::Author("Bo".into())));
}

#[test]
fn panel_input_for_wrong_kind_is_ignored() {
    let mut map = example_map();
    map.select_edge(&"e1-2".into());
    let before = map.snapshot();
    assert!(!map.panel_input(PanelInput::Text("nope".into())));
    assert_eq!(map.snapshot(), before);
}

#[test]
fn panel_shows_created_date() {
    let mut map = example_map();
    map.select_node(&"1".into());
    match map.panel_view() {
        Some(PanelView::Node { created_on, type_options, .. }) => {
            assert_eq!(created_on.len(), 10);
            assert_eq!(type_options[2].label, "Value");
        }
        other => panic!("unexpected panel: {:?}", other),
    }
}

// ===========================================================================
// Selection
// ===========================================================================

#[test]
fn selection_is_exclusive() {
    let mut map = example_map();
    map.select_node(&"1".into());
    map.select_edge(&"e1-2".into());
    assert_eq!(map.selection(), SelectionState::EdgeSelected("e1-2".into()));
    assert!(matches!(map.panel_view(), Some(PanelView::Edge { .. })));
    map.handle(CanvasEvent::NodeClick { id: "2".into() });
    assert_eq!(map.selection(), SelectionState::NodeSelected("2".into()));
    map.handle(CanvasEvent::PaneClick);
    assert!(map.selection().is_empty());
    assert!(map.panel_view().is_none());
}

// ===========================================================================
// Connections
// ===========================================================================

#[test]
fn duplicate_connect_keeps_one_edge() {
    let mut map = example_map();
    let insert = map.connect(&"1".into(), &"2".into()).unwrap();
    assert_eq!(insert, EdgeInsert::Replaced("e1-2".into()));
    assert_eq!(edge_ids(&map), vec!["e1-2"]);
    map.read(|s| assert_eq!(s.edge(&"e1-2".into()).unwrap().weight, 0.0));
}

#[test]
fn reverse_connect_adds_second_edge() {
    let mut map = example_map();
    map.handle(CanvasEvent::Connect {
        source: "2".into(),
        target: "1".into(),
    });
    assert_eq!(edge_ids(&map), vec!["e1-2", "e2-1"]);
    let scene = map.render();
    assert!(scene.edge(&"e2-1".into()).unwrap().style.is_dashed());
}

#[test]
fn connect_to_missing_node_is_rejected() {
    let mut map = example_map();
    let err = map.connect(&"1".into(), &"9".into()).unwrap_err();
    assert!(matches!(err, Error::DanglingEndpoint { .. }));
    assert_eq!(edge_ids(&map), vec!["e1-2"]);
}

#[test]
fn self_loop_policy_from_config() {
    let mut map = example_map();
    assert!(matches!(
        map.connect(&"1".into(), &"1".into()),
        Err(Error::SelfLoop(_))
    ));

    let mut config = MapConfig::from_toml_str("[connections]\nself_loops = \"allow\"\n").unwrap();
    config.seed.example_graph = true;
    let mut map = MapController::new(config).unwrap();
    assert_eq!(
        map.connect(&"1".into(), &"1".into()).unwrap(),
        EdgeInsert::Added("e1-1".into())
    );
}

// ===========================================================================
// Moves
// ===========================================================================

#[test]
fn node_move_updates_position_and_label_midpoint() {
    let mut map = example_map();
    map.handle(CanvasEvent::NodeMoved {
        id: "2".into(),
        position: Position::new(400.0, 0.0),
    });
    let scene = map.render();
    assert_eq!(scene.node(&"2".into()).unwrap().position, Position::new(400.0, 0.0));
    assert_eq!(scene.edge(&"e1-2".into()).unwrap().label_at, Position::new(200.0, 0.0));
}

// ===========================================================================
// Node creation
// ===========================================================================

#[test]
fn add_node_uses_configured_defaults() {
    let config = MapConfig::from_toml_str(
        "[defaults]\ntext = \"Draft\"\nauthor = \"Me\"\nbelief = 0.25\n",
    )
    .unwrap();
    let mut map = MapController::new(config).unwrap();
    let id = map.add_node(ClaimType::Factual);
    map.read(|s| {
        let node = s.node(&id).unwrap();
        assert_eq!(node.text, "Draft");
        assert_eq!(node.author, "Me");
        assert_eq!(node.belief, Some(0.25));
    });
    assert!(map.selection().is_empty());
}

#[test]
fn added_nodes_get_distinct_ids() {
    let mut map = example_map();
    let a = map.add_node(ClaimType::Factual);
    let b = map.add_node(ClaimType::Factual);
    assert_ne!(a, b);
    assert_eq!(node_ids(&map).len(), 4);
}

// ===========================================================================
// Config
// ===========================================================================

#[test]
fn config_rejects_out_of_range_belief() {
    let err = MapConfig::from_toml_str("[defaults]\nbelief = 1.5\n").unwrap_err();
    assert!(matches!(err, Error::ConfigError(_)));
}

#[test]
fn config_load_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = MapConfig::load(&dir.path().join("missing.toml"));
    assert_eq!(config.defaults.text, "New Claim");
    assert!(!config.seed.example_graph);
}

#[test]
fn config_palette_overrides_colors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.toml");
    std::fs::write(&path, "[seed]\nexample_graph = true\n[palette]\nsupport = \"#0000ff\"\n").unwrap();
    let map = MapController::new(MapConfig::try_load(&path).unwrap()).unwrap();
    assert_eq!(map.render().edge(&"e1-2".into()).unwrap().style.color, "#0000ff");
}

// ===========================================================================
// Snapshots
// ===========================================================================

#[test]
fn snapshot_seeding_rejects_dangling_edges() {
    let snapshot: GraphSnapshot = serde_json::from_value(json!({
        "nodes": [
            { "id": "a", "text": "A", "type": "factual", "author": "", "createdAt": "2024-05-01T00:00:00Z" }
        ],
        "edges": [
            { "id": "ea-b", "source": "a", "target": "b", "weight": 0.5 }
        ]
    }))
    .unwrap();
    assert!(matches!(
        GraphStore::from_snapshot(snapshot),
        Err(Error::DanglingEndpoint { .. })
    ));
}

#[test]
fn snapshot_roundtrip_preserves_store() {
    let map = example_map();
    let json = serde_json::to_string(&map.snapshot()).unwrap();
    let back: GraphSnapshot = serde_json::from_str(&json).unwrap();
    let store = GraphStore::from_snapshot(back.clone()).unwrap();
    assert_eq!(store.snapshot(), back);
    assert_eq!(back, map.snapshot());
}
