//! tagsync - command-line front end for the tag synchronization node types
//!
//! Loads saved workflows into a headless editor, lets the synchronizer nodes
//! reconcile their outputs, and prints or re-saves the result.

use clap::{Parser, Subcommand};
use egui::Pos2;
use log::info;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tagsync::constants::tag_sync::{ADD_BUTTON, NODE_TYPE, SELECTOR_CONTROL};
use tagsync::constants::textbox::{START_CONTROL, STRINGS_NODE_TYPE};
use tagsync::nodes::controls::ControlValue;
use tagsync::nodes::text::tag_sync::record;
use tagsync::{Editor, EditorConfig, Result};

#[derive(Parser, Debug)]
#[command(name = "tagsync")]
#[command(about = "Inspect and normalize workflows with dynamic-output nodes")]
struct Cli {
    /// Editor configuration file (defaults to ~/.nodle/tagsync.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every node's outputs and persisted record
    Inspect { workflow: PathBuf },
    /// Load, reconcile and save a workflow
    Normalize { input: PathBuf, output: PathBuf },
    /// Build a small graph, queue jobs and print them as JSON
    Demo {
        #[arg(long, default_value_t = 1)]
        batch: usize,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = EditorConfig::load_or_default(cli.config.as_deref()).and_then(|config| {
        let mut editor = Editor::new(config);
        match cli.command {
            Commands::Inspect { workflow } => inspect(&mut editor, &workflow),
            Commands::Normalize { input, output } => normalize(&mut editor, &input, &output),
            Commands::Demo { batch } => demo(&mut editor, batch),
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(1)
        }
    }
}

fn load(editor: &mut Editor, path: &Path) -> Result<()> {
    editor.open(path)?;
    let frames = editor.run_until_idle();
    info!("Workflow settled after {} frames", frames);
    Ok(())
}

fn inspect(editor: &mut Editor, workflow: &Path) -> Result<()> {
    load(editor, workflow)?;
    for node_id in editor.graph().sorted_ids() {
        let Some(node) = editor.node(node_id) else {
            continue;
        };
        println!("#{} {} \"{}\"", node.id, node.node_type, node.title);
        for (slot, port) in node.outputs.iter().enumerate() {
            println!("  [{}] {}", slot, port.name);
        }
        if record::locate(node).is_some() {
            println!("  record: {}", record::read(node));
        }
    }
    Ok(())
}

fn normalize(editor: &mut Editor, input: &Path, output: &Path) -> Result<()> {
    load(editor, input)?;
    editor.save(output)
}

fn demo(editor: &mut Editor, batch: usize) -> Result<()> {
    let parser = editor.add_node(NODE_TYPE, Pos2::new(100.0, 100.0))?;
    let strings = editor.add_node(STRINGS_NODE_TYPE, Pos2::new(100.0, 300.0))?;
    editor.run_until_idle();

    for tag in ["seed", "cfg_scale"] {
        editor.set_control_value(parser, SELECTOR_CONTROL, ControlValue::from(tag))?;
        editor.press_button(parser, ADD_BUTTON)?;
    }
    editor.set_control_value(strings, START_CONTROL, ControlValue::Int(10))?;

    for notice in editor.take_notices() {
        eprintln!("{notice}");
    }

    let jobs = editor.queue_prompt(batch);
    println!("{}", serde_json::to_string_pretty(&jobs)?);
    Ok(())
}
