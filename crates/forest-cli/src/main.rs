//! Forest command-line tool.
//!
//! Provides the `forest` binary for inspecting and editing a forest database
//! directly. Every edit goes through the same `forest_engine` operations the
//! HTTP server uses, so the hierarchy rules are identical from both entry
//! points.

use std::fmt::Write as _;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use forest_core::{Node, NodeId, TreeId};
use forest_engine::{ancestors, EngineError, ErrorKind, HierarchyEngine, TreeRegistry};
use forest_storage::{ForestStore, SqliteStore};

/// Inspect and edit a forest of labeled trees.
#[derive(Parser)]
#[command(name = "forest", about = "Inspect and edit a forest of labeled trees")]
struct Cli {
    /// Path to the forest database file.
    #[arg(long, env = "FOREST_DB_PATH", default_value = "forest.db")]
    db: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage trees.
    Tree {
        #[command(subcommand)]
        command: TreeCommand,
    },
    /// Manage nodes.
    Node {
        #[command(subcommand)]
        command: NodeCommand,
    },
    /// Print the path from a node's root down to the node.
    Path { node: i64 },
    /// Print a tree as an indented hierarchy.
    Show { tree: i64 },
}

#[derive(Subcommand)]
enum TreeCommand {
    List,
    Create { name: String },
    Rename { id: i64, name: String },
    /// Fails while the tree still has nodes.
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum NodeCommand {
    /// Add a node; without --parent it becomes a root.
    Add {
        tree: i64,
        name: String,
        #[arg(long)]
        parent: Option<i64>,
    },
    Rename { id: i64, name: String },
    /// Re-attach a node; without --parent it becomes a root.
    Move {
        id: i64,
        #[arg(long)]
        parent: Option<i64>,
    },
    /// Fails while the node has children.
    Delete { id: i64 },
    Children { id: i64 },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    tracing::debug!(db = %cli.db, "opening database");

    let mut store = match SqliteStore::new(&cli.db) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: failed to open database '{}': {}", cli.db, e);
            process::exit(3);
        }
    };

    match execute(&mut store, cli.command) {
        Ok(output) => {
            print!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(exit_code(&e));
        }
    }
}

/// Exit code: 1 = rejected request, 3 = storage failure.
fn exit_code(err: &EngineError) -> i32 {
    match err.kind() {
        ErrorKind::Reference | ErrorKind::Constraint => 1,
        ErrorKind::Store => 3,
    }
}

/// Runs one command and returns what it prints on success.
fn execute<S: ForestStore>(store: &mut S, command: Commands) -> Result<String, EngineError> {
    let mut out = String::new();
    match command {
        Commands::Tree { command } => {
            let mut registry = TreeRegistry::new(store);
            match command {
                TreeCommand::List => {
                    for tree in registry.list_trees()? {
                        let _ = writeln!(out, "{}\t{}", tree.id, tree.name);
                    }
                }
                TreeCommand::Create { name } => {
                    let tree = registry.create_tree(&name)?;
                    let _ = writeln!(out, "created tree {}", tree.id);
                }
                TreeCommand::Rename { id, name } => {
                    let tree = registry.rename_tree(TreeId(id), &name)?;
                    let _ = writeln!(out, "renamed tree {} to {}", tree.id, tree.name);
                }
                TreeCommand::Delete { id } => {
                    registry.delete_tree(TreeId(id))?;
                    let _ = writeln!(out, "deleted tree {}", id);
                }
            }
        }
        Commands::Node { command } => {
            let mut engine = HierarchyEngine::new(store);
            match command {
                NodeCommand::Add { tree, name, parent } => {
                    let node = engine.create_node(&name, TreeId(tree), parent.map(NodeId))?;
                    let _ = writeln!(out, "created node {}", node.id);
                }
                NodeCommand::Rename { id, name } => {
                    let node = engine.rename_node(NodeId(id), &name)?;
                    let _ = writeln!(out, "renamed node {} to {}", node.id, node.name);
                }
                NodeCommand::Move { id, parent } => {
                    let node = engine.move_node(NodeId(id), parent.map(NodeId))?;
                    match node.parent_id {
                        Some(parent) => {
                            let _ = writeln!(out, "moved node {} under {}", node.id, parent);
                        }
                        None => {
                            let _ = writeln!(out, "node {} is now a root", node.id);
                        }
                    }
                }
                NodeCommand::Delete { id } => {
                    engine.delete_node(NodeId(id))?;
                    let _ = writeln!(out, "deleted node {}", id);
                }
                NodeCommand::Children { id } => {
                    for child in engine.get_children(NodeId(id))? {
                        let _ = writeln!(out, "{}\t{}", child.id, child.name);
                    }
                }
            }
        }
        Commands::Path { node } => {
            let id = NodeId(node);
            let target = store.get_node(id)?.ok_or(EngineError::NodeNotFound(id))?;
            let mut names = Vec::new();
            for ancestor in ancestors(&*store, id)?.into_iter().rev() {
                if let Some(n) = store.get_node(ancestor)? {
                    names.push(n.name);
                }
            }
            names.push(target.name);
            let _ = writeln!(out, "{}", names.join(" / "));
        }
        Commands::Show { tree } => {
            let id = TreeId(tree);
            let tree = TreeRegistry::new(store)
                .get_tree(id)?
                .ok_or(EngineError::TreeNotFound(id))?;
            let _ = writeln!(out, "{} [tree {}]", tree.name, tree.id);
            let engine = HierarchyEngine::new(store);
            render(&engine, engine.get_root_nodes(id)?, &mut out)?;
        }
    }
    Ok(out)
}

/// Depth-first, children in id order, two spaces per level.
fn render<S: ForestStore>(
    engine: &HierarchyEngine<'_, S>,
    roots: Vec<Node>,
    out: &mut String,
) -> Result<(), EngineError> {
    let mut stack: Vec<(Node, usize)> = roots.into_iter().rev().map(|n| (n, 1)).collect();
    while let Some((node, depth)) = stack.pop() {
        let _ = writeln!(out, "{}{} [{}]", "  ".repeat(depth), node.name, node.id);
        let children = engine.get_children(node.id)?;
        stack.extend(children.into_iter().rev().map(|c| (c, depth + 1)));
    }
    Ok(())
}
