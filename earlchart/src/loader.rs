//! Textual grammar rules: `LHS -> RHS1 | RHS2 | ...`
//!
//! Symbols are separated by whitespace, alternatives by `|`. An empty
//! alternative is an epsilon rule. Reading stops at a line holding only `END`
//! (any case) or at end of input. Blank lines and lines starting with `#` are
//! skipped.

use crate::grammar::GrammarBuilder;
use std::io::BufRead;
use thiserror::Error;
use tracing::debug;

pub const SENTINEL: &str = "END";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("line {line}: expected `LHS -> RHS`")]
    MissingArrow { line: usize },
    #[error("line {line}: rule has no left-hand side")]
    EmptyHead { line: usize },
    #[error("line {line}: left-hand side `{head}` must be a single symbol")]
    CompoundHead { line: usize, head: String },
    #[error("reading rules: {0}")]
    Io(#[from] std::io::Error),
}

/// True for the line that terminates a rule listing.
pub fn is_sentinel(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(SENTINEL)
}

/// Add the productions found in one rule line. `line` is only used to
/// report errors.
pub fn add_rule(builder: &mut GrammarBuilder, text: &str, line: usize) -> Result<(), LoadError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(());
    }
    let (head, body) = text.split_once("->").ok_or(LoadError::MissingArrow { line })?;
    let head: Vec<&str> = head.split_whitespace().collect();
    let head = match head.as_slice() {
        [] => return Err(LoadError::EmptyHead { line }),
        [head] => *head,
        _ => return Err(LoadError::CompoundHead { line, head: head.join(" ") }),
    };
    for alternative in body.split('|') {
        let spec: Vec<&str> = alternative.split_whitespace().collect();
        debug!(line, head, ?spec, "rule");
        builder.add(head, &spec);
    }
    Ok(())
}

/// Read rule lines until the sentinel or end of input.
pub fn read_rules<R: BufRead>(reader: R) -> Result<GrammarBuilder, LoadError> {
    let mut builder = GrammarBuilder::default();
    for (idx, text) in reader.lines().enumerate() {
        let text = text?;
        if is_sentinel(&text) {
            break;
        }
        add_rule(&mut builder, &text, idx + 1)?;
    }
    Ok(builder)
}

pub fn parse_rules(text: &str) -> Result<GrammarBuilder, LoadError> {
    read_rules(text.as_bytes())
}

///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternatives() {
        let g = parse_rules("S -> NP VP\nDet -> the | a\nEND\n").unwrap().build("S");
        let rules: Vec<_> = g.rules().iter()
            .filter(|r| r.is_production())
            .map(|r| r.to_string())
            .collect();
        assert_eq!(rules, vec!["S -> NP VP", "Det -> the", "Det -> a"]);
    }

    #[test]
    fn stops_at_sentinel() {
        let g = parse_rules("S -> a\n  end  \nS -> b\n").unwrap().build("S");
        assert_eq!(g.productions("S").count(), 1);
        assert!(is_sentinel("END"));
        assert!(is_sentinel(" End "));
        assert!(!is_sentinel("ENDS"));
    }

    #[test]
    fn epsilon_alternatives() {
        let g = parse_rules("S -> a S |\nX ->").unwrap().build("S");
        let rules: Vec<_> = g.rules().iter()
            .filter(|r| r.is_production())
            .map(|r| r.to_string())
            .collect();
        assert_eq!(rules, vec!["S -> a S", "S -> ", "X -> "]);
    }

    #[test]
    fn strict_build_of_loaded_rules() {
        let g = parse_rules("S -> a\nEND\n").unwrap().into_grammar("S").unwrap();
        assert!(g.is_terminal("a"));
        assert!(parse_rules("S -> a\nS -> a\n").unwrap().into_grammar("S").is_err());
    }

    #[test]
    fn skips_blank_and_comments() {
        let g = parse_rules("\n# determiners\nDet -> the\n\n").unwrap().build("Det");
        assert_eq!(g.productions("Det").count(), 1);
    }

    #[test]
    fn bad_lines() {
        assert!(matches!(parse_rules("S -> a\nS a"), Err(LoadError::MissingArrow { line: 2 })));
        assert!(matches!(parse_rules(" -> a"), Err(LoadError::EmptyHead { line: 1 })));
        match parse_rules("S T -> a") {
            Err(LoadError::CompoundHead { line: 1, head }) => assert_eq!(head, "S T"),
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn add_rule_lines() {
        let mut builder = GrammarBuilder::default();
        add_rule(&mut builder, "N -> dog | cat", 1).unwrap();
        add_rule(&mut builder, "", 2).unwrap();
        assert!(add_rule(&mut builder, "nonsense", 3).is_err());
        assert_eq!(builder.build("N").productions("N").count(), 2);
    }
}
