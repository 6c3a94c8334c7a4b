// src/lexer/tables/build.rs
use rayon::prelude::*;
use std::time::Instant;
use thiserror::Error;

use super::{
    Symbol, Tables,
    dfa::determinize,
    minimize::minimize,
    nfa::Nfa,
    tokens::RuleSet,
};

/// A rule set that cannot be compiled. No tables are produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("invalid range {lo:?}..={hi:?}{}", in_rule_suffix(.rule))]
    InvalidRange {
        lo: Symbol,
        hi: Symbol,
        rule: Option<(usize, String)>,
    },
    #[error("invalid repeat bounds {{{min},{max}}}{}", in_rule_suffix(.rule))]
    InvalidRepeat {
        min: usize,
        max: usize,
        rule: Option<(usize, String)>,
    },
}

fn in_rule_suffix(rule: &Option<(usize, String)>) -> String {
    match rule {
        Some((idx, name)) => format!(" in rule #{idx} ({name})"),
        None => String::new(),
    }
}

impl BuildError {
    /// Attach the offending rule, keeping the innermost one if already set.
    pub(crate) fn in_rule(self, idx: usize, name: &str) -> Self {
        let tag = Some((idx, name.to_string()));
        match self {
            BuildError::InvalidRange { lo, hi, rule: None } => {
                BuildError::InvalidRange { lo, hi, rule: tag }
            }
            BuildError::InvalidRepeat { min, max, rule: None } => {
                BuildError::InvalidRepeat { min, max, rule: tag }
            }
            other => other,
        }
    }
}

/// Rules -> NFA -> DFA -> minimal DFA -> tables.
pub fn build_tables(rules: &RuleSet) -> Result<Tables, BuildError> {
    let t0 = Instant::now();
    let nfa = Nfa::build(rules)?;
    log::debug!(
        "[tables] nfa: {} rules -> {} states ({:?})",
        rules.len(),
        nfa.states.len(),
        t0.elapsed()
    );

    let t1 = Instant::now();
    let dfa = determinize(&nfa);
    log::debug!("[tables] dfa: {} states ({:?})", dfa.len(), t1.elapsed());
    drop(nfa);

    let t2 = Instant::now();
    let min = minimize(&dfa);
    log::debug!("[tables] minimized: {} states ({:?})", min.len(), t2.elapsed());

    let tables = min.into_tables(rules.names());
    log::debug!("[tables] total {:?}", t0.elapsed());
    Ok(tables)
}

/// Compile independent rule sets in parallel. Results keep input order.
pub fn build_tables_many(sets: &[RuleSet]) -> Vec<Result<Tables, BuildError>> {
    sets.par_iter().map(build_tables).collect()
}
