//! `undo-dom-apply` — replay a patch set against a document.
//!
//! Usage:
//!   undo-dom-apply [--strict] '<patch-array-json>'
//!
//! The document is read from stdin. With `--strict`, a set below a missing
//! parent fails instead of creating the intermediate containers.

use std::io::{self, Read, Write};
use undo_dom::json_cli::apply_patch_document;

fn main() {
    let mut strict = false;
    let mut patch = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--strict" => strict = true,
            _ => patch = Some(arg),
        }
    }
    let patch = match patch {
        Some(p) => p,
        None => {
            eprintln!("First argument must be a JSON patch array.");
            std::process::exit(1);
        }
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match apply_patch_document(buf.trim(), &patch, strict) {
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
