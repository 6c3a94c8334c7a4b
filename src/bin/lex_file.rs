//! Lex a file with tables loaded from JSON (or built fresh) and print tokens.
//! Usage: cargo run --bin lex_file -- <input-file> [tables.json]

use std::{env, fs};

use anyhow::{Context, Result, anyhow};
use lexdfa::lexer::{
    cpu::lex_on_cpu,
    tables::{build_tables, load_tables_json_bytes, tokens::mvp_rules},
};

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let path = args.next().ok_or_else(|| anyhow!("pass an input file path"))?;
    let src = fs::read_to_string(&path).with_context(|| format!("read {path}"))?;

    let tables = match args.next() {
        Some(tp) => {
            let data = fs::read(&tp).with_context(|| format!("read {tp}"))?;
            load_tables_json_bytes(&data).map_err(|e| anyhow!("{tp}: {e}"))?
        }
        None => build_tables(&mvp_rules())?,
    };

    let tokens = lex_on_cpu(&tables, &src).with_context(|| format!("lexing {path}"))?;
    let chars: Vec<char> = src.chars().collect();
    for t in &tokens {
        let text: String = chars[t.start..t.start + t.len].iter().collect();
        println!("{:>8} {:<14} {:?}", t.start, t.kind.name(), text);
    }
    println!("[lex_file] {} tokens", tokens.len());
    Ok(())
}
