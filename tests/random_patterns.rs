//! Randomized checks of the compiled tables against a direct matcher.
//!
//!   LEX_FUZZ_SEED   base seed (default 0x1a2b3c)
//!   LEX_FUZZ_CASES  number of random patterns (default 200)

use lexdfa::{
    dev::{
        generator::{gen_member, gen_pattern, gen_string},
        reference,
    },
    lexer::tables::{
        RuleSet, build_tables,
        dfa::determinize,
        emit, load,
        minimize::minimize,
        nfa::Nfa,
    },
};
use rand::{SeedableRng, rngs::StdRng};

const ALPHABET: &[char] = &['a', 'b', 'c'];

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(default)
}

fn cases() -> u64 {
    env_u64("LEX_FUZZ_CASES", 200)
}

fn seed() -> u64 {
    env_u64("LEX_FUZZ_SEED", 0x1a2b3c)
}

#[test]
fn compiled_language_matches_reference() {
    let mut rng = StdRng::seed_from_u64(seed());
    for case in 0..cases() {
        let p = gen_pattern(&mut rng, ALPHABET, 4);
        let t = build_tables(&RuleSet::new().rule("P", p.clone())).unwrap();

        for _ in 0..20 {
            let s = gen_member(&p, &mut rng, 3);
            assert!(
                reference::matches(&p, &s),
                "case {case}: generator produced a non-member {s:?} of {p:?}"
            );
            assert!(
                t.automaton.accepts_all(&s),
                "case {case}: member {s:?} of {p:?} rejected"
            );
        }
        for _ in 0..40 {
            let s = gen_string(&mut rng, ALPHABET, 8);
            assert_eq!(
                t.automaton.accepts_all(&s),
                reference::matches(&p, &s),
                "case {case}: {s:?} against {p:?}"
            );
        }
    }
}

#[test]
fn minimization_is_idempotent_and_never_grows() {
    let mut rng = StdRng::seed_from_u64(seed() ^ 0x55);
    for case in 0..cases() {
        let rules = RuleSet::new()
            .rule("A", gen_pattern(&mut rng, ALPHABET, 3))
            .rule("B", gen_pattern(&mut rng, ALPHABET, 3));
        let dfa = determinize(&Nfa::build(&rules).unwrap());
        let once = minimize(&dfa);
        assert!(once.len() <= dfa.len(), "case {case}");
        assert_eq!(minimize(&once), once, "case {case}: {rules:?}");
    }
}

#[test]
fn text_round_trip_and_stable_numbering() {
    let mut rng = StdRng::seed_from_u64(seed() ^ 0xaa);
    for case in 0..cases() {
        let rules = RuleSet::new()
            .rule("A", gen_pattern(&mut rng, ALPHABET, 3))
            .rule("B", gen_pattern(&mut rng, ALPHABET, 3))
            .rule("C", gen_pattern(&mut rng, ALPHABET, 2));
        let t1 = build_tables(&rules).unwrap();
        let t2 = build_tables(&rules).unwrap();
        let text = emit("t", "DFA", &t1.automaton).unwrap();
        assert_eq!(text, emit("t", "DFA", &t2.automaton).unwrap(), "case {case}");
        assert_eq!(load(&text).unwrap().automaton, t1.automaton, "case {case}");
    }
}
