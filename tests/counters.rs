use egui::Pos2;

use tagsync::constants::textbox::{
    COUNT_CONTROL, INDEX_CONTROL, MODE_CONTINUED, MODE_CONTROL, PROMPTS_NODE_TYPE, START_CONTROL,
    STRINGS_NODE_TYPE,
};
use tagsync::nodes::controls::ControlValue;
use tagsync::nodes::NodeId;
use tagsync::{Editor, Job};

fn values(jobs: &[Job], id: NodeId, control: &str) -> Vec<i64> {
    jobs.iter()
        .map(|job| job.nodes[&id].inputs[control].as_int().unwrap())
        .collect()
}

#[test]
fn simple_counter_restarts_after_submission() {
    let mut editor = Editor::default();
    let id = editor.add_node(STRINGS_NODE_TYPE, Pos2::ZERO).unwrap();
    editor.run_until_idle();

    let first = editor.queue_prompt(3);
    assert_eq!(values(&first, id, COUNT_CONTROL), vec![1, 2, 3]);
    assert_eq!(editor.submissions().emitted(), 1);

    let second = editor.queue_prompt(1);
    assert_eq!(values(&second, id, COUNT_CONTROL), vec![1]);
}

#[test]
fn continued_start_accumulates_while_index_restarts() {
    let mut editor = Editor::default();
    let id = editor.add_node(PROMPTS_NODE_TYPE, Pos2::ZERO).unwrap();
    editor.run_until_idle();
    editor.set_control_value(id, START_CONTROL, ControlValue::Int(5)).unwrap();
    editor
        .set_control_value(id, MODE_CONTROL, ControlValue::from(MODE_CONTINUED))
        .unwrap();

    let jobs: Vec<Job> = (0..3).flat_map(|_| editor.queue_prompt(1)).collect();

    assert_eq!(values(&jobs, id, START_CONTROL), vec![5, 6, 7]);
    assert_eq!(values(&jobs, id, INDEX_CONTROL), vec![1, 1, 1]);
    assert_eq!(
        editor.node(id).unwrap().control(START_CONTROL).unwrap().value,
        ControlValue::Int(7)
    );
}

#[test]
fn counters_are_independent_per_node() {
    let mut editor = Editor::default();
    let a = editor.add_node(STRINGS_NODE_TYPE, Pos2::ZERO).unwrap();
    let b = editor.add_node(STRINGS_NODE_TYPE, Pos2::new(0.0, 200.0)).unwrap();
    editor.run_until_idle();
    editor.set_control_value(b, START_CONTROL, ControlValue::Int(100)).unwrap();

    let jobs = editor.queue_prompt(2);
    assert_eq!(values(&jobs, a, COUNT_CONTROL), vec![1, 2]);
    assert_eq!(values(&jobs, b, COUNT_CONTROL), vec![101, 102]);
}

#[test]
fn removing_nodes_releases_their_listeners() {
    let mut editor = Editor::default();
    let strings = editor.add_node(STRINGS_NODE_TYPE, Pos2::ZERO).unwrap();
    let prompts = editor.add_node(PROMPTS_NODE_TYPE, Pos2::ZERO).unwrap();
    assert_eq!(editor.submissions().listener_count(), 2);

    editor.remove_node(strings).unwrap();
    assert_eq!(editor.submissions().listeners_for(strings), 0);
    assert_eq!(editor.submissions().listeners_for(prompts), 1);

    // Creating and destroying many nodes leaves nothing behind
    for _ in 0..50 {
        let id = editor.add_node(STRINGS_NODE_TYPE, Pos2::ZERO).unwrap();
        editor.remove_node(id).unwrap();
    }
    assert_eq!(editor.submissions().listener_count(), 1);

    let jobs = editor.queue_prompt(1);
    assert!(!jobs[0].nodes.contains_key(&strings));
    assert_eq!(values(&jobs, prompts, INDEX_CONTROL), vec![1]);
}
