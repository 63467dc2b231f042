use egui::Pos2;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tagsync::constants::tag_sync::{
    ADD_BUTTON, NODE_TYPE, RECORD_CONTROL, REMOVE_BUTTON, REMOVE_LAST_BUTTON, SELECTOR_CONTROL,
};
use tagsync::editor::file_manager::SaveData;
use tagsync::nodes::controls::ControlValue;
use tagsync::nodes::hooks::{HookContext, NodeLifecycleHooks};
use tagsync::nodes::text::tag_sync::{bootstrap, record};
use tagsync::nodes::{Connection, Node, NodeId, NodeRegistry};
use tagsync::{Editor, EditorConfig};

fn polling() -> EditorConfig {
    EditorConfig {
        use_ready_signal: false,
        ..EditorConfig::default()
    }
}

fn output_names(editor: &Editor, id: NodeId) -> Vec<String> {
    editor.node(id).unwrap().outputs.iter().map(|p| p.name.clone()).collect()
}

fn record_of(editor: &Editor, id: NodeId) -> String {
    record::read(editor.node(id).unwrap())
}

fn add_tags(editor: &mut Editor, id: NodeId, tags: &[&str]) {
    for tag in tags {
        editor
            .set_control_value(id, SELECTOR_CONTROL, ControlValue::from(*tag))
            .unwrap();
        editor.press_button(id, ADD_BUTTON).unwrap();
    }
}

fn settled_parser(editor: &mut Editor) -> NodeId {
    let id = editor.add_node(NODE_TYPE, Pos2::new(50.0, 50.0)).unwrap();
    editor.run_until_idle();
    id
}

#[test]
fn fresh_node_ends_with_baseline_only() {
    for config in [EditorConfig::default(), polling()] {
        let mut editor = Editor::new(config);
        let id = settled_parser(&mut editor);

        assert_eq!(output_names(&editor, id), vec!["prompt (STRING)"]);
        assert_eq!(record_of(&editor, id), "prompt");

        let node = editor.node(id).unwrap();
        let record_control = node.control(RECORD_CONTROL).unwrap();
        assert!(record_control.hidden);
        assert!(record_control.serialize);
    }
}

#[test]
fn restored_node_with_matching_record_is_untouched() {
    let mut editor = Editor::default();
    let id = settled_parser(&mut editor);
    add_tags(&mut editor, id, &["seed"]);
    let consumer = settled_parser(&mut editor);
    editor
        .graph_mut()
        .add_connection(Connection::new(id, 1, consumer, 0))
        .unwrap();

    let save = SaveData::new(editor.graph());
    let mut restored = Editor::default();
    restored.load_workflow(&save).unwrap();
    assert_eq!(output_names(&restored, id), vec!["prompt (STRING)", "seed (INT)"]);

    restored.run_until_idle();
    assert_eq!(output_names(&restored, id), vec!["prompt (STRING)", "seed (INT)"]);
    assert_eq!(record_of(&restored, id), "prompt,seed");
    assert_eq!(restored.graph().connections, vec![Connection::new(id, 1, consumer, 0)]);
}

#[test]
fn restore_corrects_membership_and_keeps_links() {
    let mut editor = Editor::default();
    let id = settled_parser(&mut editor);
    add_tags(&mut editor, id, &["seed", "steps"]);
    let consumer = settled_parser(&mut editor);
    editor
        .graph_mut()
        .add_connection(Connection::new(id, 2, consumer, 0))
        .unwrap();

    // Saved outputs disagree with the saved record
    let mut save = SaveData::new(editor.graph());
    let saved = save.root_graph.nodes.get_mut(&id).unwrap();
    saved.control_mut(RECORD_CONTROL).unwrap().value = ControlValue::from("prompt,steps,width");

    let mut restored = Editor::default();
    restored.load_workflow(&save).unwrap();
    restored.run_until_idle();

    assert_eq!(
        output_names(&restored, id),
        vec!["prompt (STRING)", "steps (INT)", "width (INT)"]
    );
    assert_eq!(record_of(&restored, id), "prompt,steps,width");
    assert_eq!(restored.graph().connections, vec![Connection::new(id, 1, consumer, 0)]);
}

#[test]
fn removing_an_output_shifts_later_links() {
    let mut editor = Editor::default();
    let id = settled_parser(&mut editor);
    add_tags(&mut editor, id, &["seed", "steps"]);
    let consumer = settled_parser(&mut editor);
    editor
        .graph_mut()
        .add_connection(Connection::new(id, 1, consumer, 0))
        .unwrap();
    editor
        .graph_mut()
        .add_connection(Connection::new(id, 2, consumer, 0))
        .unwrap();

    editor
        .set_control_value(id, SELECTOR_CONTROL, ControlValue::from("seed"))
        .unwrap();
    editor.press_button(id, REMOVE_BUTTON).unwrap();

    assert_eq!(output_names(&editor, id), vec!["prompt (STRING)", "steps (INT)"]);
    assert_eq!(editor.graph().connections, vec![Connection::new(id, 1, consumer, 0)]);

    editor.press_button(id, REMOVE_LAST_BUTTON).unwrap();
    assert!(editor.graph().connections.is_empty());
}

#[test]
fn rapid_edits_between_deferred_syncs_converge() {
    let mut editor = Editor::default();
    let id = settled_parser(&mut editor);

    bootstrap::schedule_refresh(editor.events_mut(), id);
    add_tags(&mut editor, id, &["seed", "steps", "tiling"]);
    bootstrap::schedule_refresh(editor.events_mut(), id);
    editor
        .set_control_value(id, SELECTOR_CONTROL, ControlValue::from("prompt"))
        .unwrap();
    editor.press_button(id, REMOVE_BUTTON).unwrap();
    editor.press_button(id, REMOVE_LAST_BUTTON).unwrap();
    editor.run_until_idle();

    assert_eq!(output_names(&editor, id), vec!["seed (INT)", "steps (INT)"]);
    assert_eq!(record_of(&editor, id), "seed,steps");
}

#[test]
fn edits_before_initialization_settle_consistently() {
    let mut editor = Editor::default();
    let id = editor.add_node(NODE_TYPE, Pos2::ZERO).unwrap();
    add_tags(&mut editor, id, &["seed"]);
    assert_eq!(editor.node(id).unwrap().outputs.len(), 24);
    editor.run_until_idle();

    // Placeholders go, the early edit stays
    assert_eq!(output_names(&editor, id), vec!["seed (INT)"]);
    assert_eq!(record_of(&editor, id), "seed");
}

#[test]
fn restored_node_without_record_keeps_saved_outputs() {
    let mut editor = Editor::default();
    let id = settled_parser(&mut editor);
    add_tags(&mut editor, id, &["seed", "steps"]);
    editor
        .set_control_value(id, SELECTOR_CONTROL, ControlValue::from("prompt"))
        .unwrap();
    editor.press_button(id, REMOVE_BUTTON).unwrap();
    let consumer = settled_parser(&mut editor);
    editor
        .graph_mut()
        .add_connection(Connection::new(id, 1, consumer, 0))
        .unwrap();

    let mut save = SaveData::new(editor.graph());
    let saved = save.root_graph.nodes.get_mut(&id).unwrap();
    saved.control_mut(RECORD_CONTROL).unwrap().value = ControlValue::from("");

    let mut restored = Editor::default();
    restored.load_workflow(&save).unwrap();
    restored.run_until_idle();

    assert_eq!(output_names(&restored, id), vec!["seed (INT)", "steps (INT)"]);
    assert_eq!(record_of(&restored, id), "seed,steps");
    assert_eq!(restored.graph().connections, vec![Connection::new(id, 1, consumer, 0)]);
}

/// Second subscriber on the parser type, logging what it sees
struct Audit {
    log: Rc<RefCell<Vec<String>>>,
}

impl NodeLifecycleHooks for Audit {
    fn name(&self) -> &'static str {
        "audit"
    }

    fn on_created(&mut self, ctx: &mut HookContext<'_>, node_id: NodeId) -> tagsync::Result<()> {
        let node = &ctx.graph.nodes[&node_id];
        let entry = format!("created selector={}", node.control(SELECTOR_CONTROL).is_some());
        self.log.borrow_mut().push(entry);
        Ok(())
    }

    fn on_configure(&mut self, _ctx: &mut HookContext<'_>, _node_id: NodeId) -> tagsync::Result<()> {
        self.log.borrow_mut().push("configure".to_string());
        Ok(())
    }

    fn on_control_action(&mut self, ctx: &mut HookContext<'_>, node_id: NodeId, control: &str) -> tagsync::Result<()> {
        let entry = format!("{} outputs={}", control, ctx.graph.nodes[&node_id].outputs.len());
        self.log.borrow_mut().push(entry);
        Ok(())
    }
}

#[test]
fn extra_subscribers_run_after_the_synchronizer() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut registry = NodeRegistry::with_builtin_nodes();
    registry.add_hooks(NODE_TYPE, Box::new(Audit { log: log.clone() }));
    let mut editor = Editor::with_registry(EditorConfig::default(), registry);

    let id = settled_parser(&mut editor);
    add_tags(&mut editor, id, &["seed"]);
    assert_eq!(
        *log.borrow(),
        vec!["created selector=true".to_string(), format!("{} outputs=2", ADD_BUTTON)]
    );

    let save = SaveData::new(editor.graph());
    editor.load_workflow(&save).unwrap();
    editor.run_until_idle();

    assert_eq!(&log.borrow()[2..], ["created selector=true", "configure"]);
    assert_eq!(output_names(&editor, id), vec!["prompt (STRING)", "seed (INT)"]);
    assert_eq!(record_of(&editor, id), "prompt,seed");
}

#[test]
fn node_removed_during_pending_retry_is_ignored() {
    let mut editor = Editor::new(polling());
    let id = editor.graph_mut().add_node(Node::new(0, NODE_TYPE, Pos2::ZERO));
    bootstrap::schedule_initialize(editor.events_mut(), id);

    editor.run_frame();
    assert_eq!(editor.events().pending(), 1);

    editor.remove_node(id).unwrap();
    editor.advance(Duration::from_millis(100));

    assert!(editor.node(id).is_none());
    assert!(editor.events().is_idle());
}

#[test]
fn polling_waits_for_controls() {
    let mut editor = Editor::new(polling());
    let id = editor.add_node(NODE_TYPE, Pos2::ZERO).unwrap();

    editor.run_frame();
    assert_eq!(editor.node(id).unwrap().outputs.len(), 23);

    editor.run_until_idle();
    assert_eq!(output_names(&editor, id), vec!["prompt (STRING)"]);
}

#[test]
fn save_and_open_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tags.json");

    let mut editor = Editor::default();
    let id = settled_parser(&mut editor);
    add_tags(&mut editor, id, &["negative_prompt", "cfg_scale", "restore_faces"]);
    editor.save(&path).unwrap();
    assert!(!editor.files().has_unsaved_changes());

    let mut reopened = Editor::default();
    reopened.open(&path).unwrap();
    reopened.run_until_idle();

    assert_eq!(
        output_names(&reopened, id),
        vec![
            "prompt (STRING)",
            "negative_prompt (STRING)",
            "cfg_scale (FLOAT)",
            "restore_faces (BOOLEAN)",
        ]
    );
    assert_eq!(record_of(&reopened, id), "prompt,negative_prompt,cfg_scale,restore_faces");
    assert_eq!(
        reopened.node(id).unwrap().control(SELECTOR_CONTROL).unwrap().value,
        ControlValue::from("restore_faces")
    );
    assert_eq!(reopened.files().get_file_display_name(), "tags.json");
}
