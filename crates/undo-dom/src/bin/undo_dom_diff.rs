//! `undo-dom-diff` — print the redo and undo patch sets between two entities.
//!
//! Usage:
//!   undo-dom-diff <alias-path> '<after-json>'
//!
//! The entity before the edit is read from stdin.

use std::io::{self, Read, Write};
use undo_dom::json_cli::diff_documents;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (alias_path, after) = match (args.get(1), args.get(2)) {
        (Some(alias), Some(after)) => (alias.clone(), after.clone()),
        _ => {
            eprintln!("Usage: undo-dom-diff <alias-path> '<after-json>'");
            std::process::exit(1);
        }
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match diff_documents(buf.trim(), &after, &alias_path) {
        Ok(result) => {
            let mut stdout = io::stdout();
            if let Err(e) = writeln!(stdout, "{result}") {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
