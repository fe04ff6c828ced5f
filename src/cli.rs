use clap::{Parser, Subcommand};
use nu_plugin_catmerge::algo::synonyms::{resolve_dictionary, SynonymDictionary};
use nu_plugin_catmerge::{logging, ops};
use serde_json::Value;
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "catmerge",
    version,
    about = "Consolidate near-duplicate category labels into stable folder names"
)]
struct Cli {
    /// Synonym dictionary JSON. Defaults to $CATMERGE_SYNONYMS, then
    /// $XDG_DATA_HOME/catmerge/synonyms.json, then the built-in dictionary.
    #[arg(long, global = true)]
    synonyms: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the normalized form and significant words of a label
    Normalize {
        /// Raw category label
        label: String,
    },
    /// Consolidate a {label: [paths]} JSON object read from stdin
    Consolidate {
        /// Print clusters with the rule that admitted each member
        #[arg(short, long)]
        explain: bool,
    },
    /// Label every file under a directory with the extension fallback classifier
    Classify {
        /// Directory holding the extracted files
        dir: String,
    },
    /// Classify, consolidate and copy files into category folders
    Organize {
        /// Directory holding the extracted files
        source: String,
        /// Destination directory for category folders
        #[arg(short, long, default_value = "./organized")]
        output: String,
    },
    /// Copy an already-consolidated {bucket: [paths]} JSON object (stdin) into folders
    Materialize {
        /// Directory the paths are relative to
        source: String,
        /// Destination directory for category folders
        #[arg(short, long, default_value = "./organized")]
        output: String,
    },
    /// Print the synonym dictionary in effect
    Dictionary {
        /// Print the embedded default verbatim, ready to copy and edit
        #[arg(long)]
        default: bool,
    },
}

fn main() {
    logging::init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Normalize { label } => Ok(ops::op_normalize(&label)),
        Commands::Consolidate { explain } => {
            let dictionary = load_dictionary(cli.synonyms);
            let mapping = read_stdin_json();
            if explain {
                ops::op_explain(&mapping, &dictionary)
            } else {
                ops::op_consolidate(&mapping, &dictionary)
            }
        }
        Commands::Classify { dir } => ops::op_classify(&dir),
        Commands::Organize { source, output } => {
            let dictionary = load_dictionary(cli.synonyms);
            ops::op_organize(&source, &output, &dictionary)
        }
        Commands::Materialize { source, output } => {
            let mapping = read_stdin_json();
            ops::op_materialize(&mapping, &source, &output)
        }
        Commands::Dictionary { default: true } => ops::op_default_dictionary(),
        Commands::Dictionary { default: false } => {
            Ok(ops::op_dictionary(&load_dictionary(cli.synonyms)))
        }
    };

    match result {
        Ok(value) => print_json(&value),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn load_dictionary(path: Option<PathBuf>) -> SynonymDictionary {
    resolve_dictionary(path.as_deref()).unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    })
}

fn read_stdin_json() -> Value {
    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("Failed to read stdin: {e}");
        std::process::exit(1);
    }
    serde_json::from_str(&buf).unwrap_or_else(|e| {
        eprintln!("Invalid JSON on stdin: {e}");
        std::process::exit(1);
    })
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => {
            eprintln!("Failed to serialize output: {e}");
            std::process::exit(1);
        }
    }
}
