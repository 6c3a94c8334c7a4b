//! Table text and JSON persistence.

use std::collections::BTreeMap;

use lexdfa::lexer::tables::{
    Automaton, LoadError, Pattern, RuleSet, TableError, build_tables, emit, load,
    load_tables_json_bytes, save_tables_json, save_tables_text, tokens::mvp_rules,
};

const TYPE_REF: &str = "tokenizer.automata.DFA";

#[test]
fn mvp_tables_round_trip_through_text() {
    let t = build_tables(&mvp_rules()).unwrap();
    let text = emit("lexer", TYPE_REF, &t.automaton).unwrap();
    let back = load(&text).unwrap();
    assert_eq!(back.name, "lexer");
    assert_eq!(back.type_ref, TYPE_REF);
    assert_eq!(back.automaton, t.automaton);
    // and emitting the loaded copy reproduces the same bytes
    assert_eq!(emit("lexer", TYPE_REF, &back.automaton).unwrap(), text);
}

#[test]
fn every_ascii_symbol_round_trips() {
    let row: BTreeMap<char, usize> = ('\0'..='\x7f').map(|c| (c, 0)).collect();
    let a = Automaton {
        states: vec![row],
        accepts: vec![true],
    };
    let text = emit("all", "DFA", &a).unwrap();
    assert!(text.contains("'\\x00': 0"));
    assert!(text.contains("\"'\": 0"));
    assert!(text.contains("'\\\\': 0"));
    assert!(text.contains("'\\t': 0"));
    assert_eq!(load(&text).unwrap().automaton, a);
}

#[test]
fn non_ascii_symbols_round_trip() {
    let row: BTreeMap<char, usize> = ['é', '\u{85}', '\u{2028}', '\u{10ffff}', '😀']
        .into_iter()
        .map(|c| (c, 0))
        .collect();
    let a = Automaton {
        states: vec![row],
        accepts: vec![false],
    };
    let text = emit("u", "DFA", &a).unwrap();
    assert!(text.contains("'\\x85': 0"));
    assert!(text.contains("'\\u2028': 0"));
    assert_eq!(load(&text).unwrap().automaton, a);
}

#[test]
fn output_is_byte_identical_across_runs() {
    let build = || {
        let rules = RuleSet::new()
            .rule("Ident", Pattern::plus(Pattern::range('a', 'z')))
            .rule("If", Pattern::literal_str("if"))
            .rule("Op", Pattern::any_of("+-*/="));
        let t = build_tables(&rules).unwrap();
        emit("toy", "automata.DFA", &t.automaton).unwrap()
    };
    let first = build();
    for _ in 0..4 {
        assert_eq!(build(), first);
    }
}

#[test]
fn empty_rule_set_text() {
    let t = build_tables(&RuleSet::new()).unwrap();
    let text = emit("nothing", "DFA", &t.automaton).unwrap();
    assert_eq!(
        text,
        "accepts = [False]\nstates = [\n    # 0\n    {},\n    ]\nnothing = DFA(states, accepts)\n"
    );
    assert_eq!(load(&text).unwrap().automaton, Automaton::empty());
}

#[test]
fn malformed_models_are_not_emitted() {
    let none = Automaton {
        states: vec![],
        accepts: vec![],
    };
    assert_eq!(emit("x", "DFA", &none), Err(TableError::NoStates));
}

#[test]
fn load_rejects_out_of_range_targets() {
    let text = "accepts = [False]\nstates = [\n    # 0\n    {'a': 7},\n    ]\nx = DFA(states, accepts)\n";
    assert!(matches!(
        load(text),
        Err(LoadError::Malformed(TableError::TargetOutOfRange { target: 7, .. }))
    ));
}

#[test]
fn load_rejects_misnumbered_states() {
    let text = "accepts = [False, False]\nstates = [\n    # 0\n    {},\n    # 2\n    {},\n    ]\nx = DFA(states, accepts)\n";
    assert!(matches!(load(text), Err(LoadError::Syntax { line: 5, .. })));
}

fn tmp_path(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("lexdfa_{tag}_{}", std::process::id()))
}

#[test]
fn json_round_trip_keeps_rule_tags() {
    let t = build_tables(&mvp_rules()).unwrap();
    let path = tmp_path("tables.json");
    save_tables_json(&path, &t).unwrap();
    let data = std::fs::read(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(load_tables_json_bytes(&data).unwrap(), t);
}

#[test]
fn json_loader_validates() {
    let bad = br#"{"states":[{"a":3}],"accepts":[false],"token_of":[4294967295],"names":[]}"#;
    assert!(load_tables_json_bytes(bad).is_err());
    assert!(load_tables_json_bytes(b"not json").is_err());
}

#[test]
fn text_file_matches_emit() {
    let t = build_tables(&mvp_rules()).unwrap();
    let path = tmp_path("tables.txt");
    save_tables_text(&path, "lexer", TYPE_REF, &t).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(text, emit("lexer", TYPE_REF, &t.automaton).unwrap());
}
