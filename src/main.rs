//! Sequence Layout CLI
//!
//! Usage:
//!   sequence-layout [OPTIONS] [FILE]
//!
//! Options:
//!   -t, --theme <FILE>       Theme file overriding layout metrics (TOML format)
//!   -c, --char-width <N>     Estimated width of one character in pixels
//!   -d, --debug              Print the statement tree with coordinates to stderr
//!       --compact            Print the layout as single-line JSON
//!   -h, --help               Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sequence_layout::{
    layout_json, CharWidthMeasurer, DiagramLayout, EngineError, LayoutMetrics, Theme,
};

#[derive(Parser)]
#[command(name = "sequence-layout")]
#[command(about = "Compute sequence diagram geometry from a JSON statement tree")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Theme file overriding layout metrics (TOML format)
    #[arg(short, long)]
    theme: Option<PathBuf>,

    /// Estimated width of one character in pixels
    #[arg(short, long)]
    char_width: Option<f64>,

    /// Print the statement tree with coordinates to stderr
    #[arg(short, long)]
    debug: bool,

    /// Print the layout as single-line JSON
    #[arg(long)]
    compact: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    // If no input file and stdin is a terminal (interactive), show intro help
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let metrics = match &cli.theme {
        Some(path) => match Theme::from_file(path) {
            Ok(theme) => {
                tracing::info!(theme = theme.name.as_deref().unwrap_or("unnamed"), "theme loaded");
                theme.metrics
            }
            Err(e) => {
                eprintln!("Error loading theme '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => LayoutMetrics::default(),
    };

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let measure = match cli.char_width {
        Some(width) => CharWidthMeasurer::new(width),
        None => CharWidthMeasurer::default(),
    };

    let result = match layout_json(&source, &measure, &metrics) {
        Ok(result) => result,
        Err(EngineError::Input(e)) => {
            eprintln!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.debug {
        print_tree(&result);
    }

    let json = if cli.compact {
        serde_json::to_string(&result)
    } else {
        result.to_json_pretty()
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// `RUST_LOG` wins; otherwise warnings only, or debug output with `--debug`
fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug {
            "sequence_layout=debug"
        } else {
            "warn"
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_tree(result: &DiagramLayout) {
    eprintln!("=== Layout Debug ===");
    for (name, participant) in &result.participants {
        eprintln!(
            "participant {} center={:.1} half={:.1}",
            name, participant.center, participant.half_width
        );
    }
    for (id, coord) in &result.statements {
        let indent = "  ".repeat(id.depth().saturating_sub(1));
        eprintln!(
            "{}[{}] {:?} top={:.1} h={:.1}",
            indent, id, coord.kind, coord.top, coord.height
        );
        if let Some(fragment) = result.fragments.get(id) {
            eprintln!(
                "{}    {}..{} x={:.1} w={:.1} border={:.0}/{:.0}",
                indent,
                fragment.left_participant,
                fragment.right_participant,
                fragment.x,
                fragment.width,
                fragment.border.left,
                fragment.border.right
            );
        }
    }
    eprintln!("width={:.1} height={:.1}", result.width, result.height);
    eprintln!("====================");
}

fn print_intro() {
    println!(
        r#"Sequence Layout - geometry engine for sequence diagrams

USAGE:
    sequence-layout [OPTIONS] [FILE]
    cat tree.json | sequence-layout

OPTIONS:
    -t, --theme        Metric overrides (TOML file)
    -c, --char-width   Estimated character width in pixels
    -d, --debug        Print statement coordinates to stderr
    --compact          Single-line JSON output
    -h, --help         Print help

INPUT:
    {{"participants": [{{"name": "A"}}],
     "root": [{{"type": "message", "kind": "sync", "to": "A", "signature": "hello()"}}]}}"#
    );
}
