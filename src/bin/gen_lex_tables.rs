// src/bin/gen_lex_tables.rs
// Build the MVP grammar tables and write them as table text plus JSON.
// Usage:
//   cargo run --bin gen_lex_tables                  # writes tables/lexer_tables.txt (+ .json)
//   cargo run --bin gen_lex_tables -- /path/out.txt
// Env:
//   LEX_TABLE_NAME   binding name in the text output (default "lexer")
//   LEX_TABLE_TYPE   type reference in the text output (default "automata.DFA")

use std::{env, fs, path::Path, time::Instant};

use anyhow::{Context, Result};
use lexdfa::lexer::tables::{
    INVALID_TOKEN, build_tables, save_tables_json, save_tables_text, tokens::mvp_rules,
};

fn main() -> Result<()> {
    let out = env::args()
        .nth(1)
        .unwrap_or_else(|| "tables/lexer_tables.txt".to_string());
    let out_path = Path::new(&out);
    let name = env::var("LEX_TABLE_NAME").unwrap_or_else(|_| "lexer".to_string());
    let type_ref = env::var("LEX_TABLE_TYPE").unwrap_or_else(|_| "automata.DFA".to_string());

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    println!("[gen_lex_tables] building MVP grammar tables…");
    let t0 = Instant::now();
    let t = build_tables(&mvp_rules()).context("MVP grammar failed to compile")?;

    let edges: usize = t.automaton.states.iter().map(|row| row.len()).sum();
    let accepting = t.token_of.iter().filter(|&&k| k != INVALID_TOKEN).count();
    println!(
        "[gen_lex_tables] {} states, {} edges, {} accepting ({} ms)",
        t.automaton.len(),
        edges,
        accepting,
        t0.elapsed().as_millis()
    );

    save_tables_text(out_path, &name, &type_ref, &t)
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    let json_path = out_path.with_extension("json");
    save_tables_json(&json_path, &t)
        .with_context(|| format!("failed to write {}", json_path.display()))?;

    println!("[gen_lex_tables] wrote {}", out_path.display());
    println!("[gen_lex_tables] wrote {}", json_path.display());
    Ok(())
}
