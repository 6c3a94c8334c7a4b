// src/main.rs
use lexdfa::lexer::{
    cpu::lex_on_cpu,
    tables::{build_tables, tokens::mvp_rules},
};

fn main() -> anyhow::Result<()> {
    // A tiny sample covering identifiers, ints, comments, and symbols.
    let src = r#"
        foo = 12 + bar/* cmt */(7) // hello
        baz=3/*multi
        line*/+qux
    "#;

    let tables = build_tables(&mvp_rules())?;
    println!(
        "[lexdfa] MVP grammar: {} rules -> {} states",
        tables.names.len(),
        tables.automaton.len()
    );

    match lex_on_cpu(&tables, src) {
        Ok(tokens) => {
            let chars: Vec<char> = src.chars().collect();
            println!("TOKENS:");
            for t in tokens {
                let lexeme: String = chars[t.start..t.start + t.len].iter().collect();
                println!("{:?}  {:?}", t.kind, lexeme);
            }
        }
        Err(e) => eprintln!("lex error: {e}"),
    }
    Ok(())
}
