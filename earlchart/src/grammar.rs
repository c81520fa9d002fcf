use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Head of the synthetic rule that seeds the chart: `<START> -> S`.
pub const START: &str = "<START>";

/// Index of a rule inside its `Grammar`.
pub type RuleId = usize;

/// Symbols are resolved once, when the grammar is built. A name with at least
/// one production is a `NonTerm`, anything else is a `Term`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    NonTerm(String),
    Term(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// A production added by the user.
    Production,
    /// `<START> -> S`, seeds the chart.
    Start,
    /// `t -> t` for a terminal `t` scanned straight out of a rule body.
    Lexical,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rule {
    pub id: RuleId,
    pub kind: RuleKind,
    pub head: String,
    pub spec: Vec<Symbol>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GrammarError {
    #[error("Missing Start: `{0}` has no productions")]
    MissingStart(String),
    #[error("Undefined Symbol: `{symbol}` in `{rule}`")]
    UndefinedSymbol { symbol: String, rule: String },
    #[error("Terminal Head: `{0}` is declared terminal but has productions")]
    TerminalHead(String),
    #[error("Duplicate Rule: {0}")]
    DuplicateRule(String),
}

#[derive(Clone, Debug)]
pub struct Grammar {
    start: String,
    rules: Vec<Rc<Rule>>,
    // head -> productions in insertion order (user productions only)
    productions: HashMap<String, Vec<RuleId>>,
    heads: Vec<String>,
    tags: HashSet<String>,
    lexical: HashMap<String, RuleId>,
    start_rule: RuleId,
    diagnostics: Vec<GrammarError>,
}

/// Collects productions and builds a `Grammar` from them.
#[derive(Clone, Debug, Default)]
pub struct GrammarBuilder {
    rules: Vec<(String, Vec<String>)>,
    terminals: HashSet<String>,
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::NonTerm(name) => name,
            Symbol::Term(name) => name,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Term(_))
    }
}

impl Rule {
    pub fn is_production(&self) -> bool {
        self.kind == RuleKind::Production
    }

    /// True if the body is exactly one terminal spelled `token`.
    pub fn yields(&self, token: &str) -> bool {
        matches!(self.spec.as_slice(), [Symbol::Term(t)] if t == token)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let body = self.spec.iter().map(|s| s.name()).collect::<Vec<_>>().join(" ");
        write!(f, "{} -> {}", self.head, body)
    }
}

impl Grammar {
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Every rule including the synthetic start and lexical rules.
    pub fn rules(&self) -> &[Rc<Rule>] {
        &self.rules
    }

    pub fn rule(&self, id: RuleId) -> Option<&Rc<Rule>> {
        self.rules.get(id)
    }

    pub fn start_rule(&self) -> &Rc<Rule> {
        &self.rules[self.start_rule]
    }

    /// The `t -> t` rule used to scan terminal `t` from inside a rule body.
    pub fn lexical_rule(&self, terminal: &str) -> Option<&Rc<Rule>> {
        self.lexical.get(terminal).map(|&id| &self.rules[id])
    }

    /// Productions of `symbol` in the order they were added.
    pub fn productions<'a>(&'a self, symbol: &str) -> impl Iterator<Item = &'a Rc<Rule>> + use<'a> {
        self.productions
            .get(symbol)
            .into_iter()
            .flatten()
            .map(move |&id| &self.rules[id])
    }

    pub fn is_terminal(&self, symbol: &str) -> bool {
        !self.productions.contains_key(symbol)
    }

    /// A tag (pre-terminal) only ever expands to terminals. Terminals are
    /// tags too, vacuously.
    pub fn is_tag(&self, symbol: &str) -> bool {
        self.is_terminal(symbol) || self.tags.contains(symbol)
    }

    /// Problems found while building. Empty for grammars built strictly.
    pub fn diagnostics(&self) -> &[GrammarError] {
        &self.diagnostics
    }

    pub fn is_well_formed(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for head in &self.heads {
            let bodies = self.productions(head)
                .map(|r| r.spec.iter().map(|s| s.name()).collect::<Vec<_>>().join(" "))
                .collect::<Vec<_>>();
            writeln!(f, "{} -> {}", head, bodies.join(" | "))?;
        }
        Ok(())
    }
}

impl GrammarBuilder {
    /// Append a production. Nothing is validated until the grammar is built.
    pub fn add<S, S2>(&mut self, head: S, spec: &[S2])
        where S: AsRef<str>, S2: AsRef<str>
    {
        self.rules.push((
            head.as_ref().to_string(),
            spec.iter().map(|s| s.as_ref().to_string()).collect(),
        ));
    }

    pub fn rule<S, S2>(mut self, head: S, spec: &[S2]) -> Self
        where S: AsRef<str>, S2: AsRef<str>
    {
        self.add(head, spec);
        self
    }

    /// Declare `name` terminal. Once any terminal is declared, strict builds
    /// reject rule bodies that mention symbols which are neither declared
    /// terminals nor defined by a rule.
    pub fn declare_terminal(&mut self, name: impl Into<String>) {
        self.terminals.insert(name.into());
    }

    pub fn terminal(mut self, name: impl Into<String>) -> Self {
        self.declare_terminal(name);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Lenient build: undefined symbols silently become terminals and any
    /// problem is only recorded in `Grammar::diagnostics`.
    pub fn build(self, start: impl Into<String>) -> Grammar {
        self.assemble(start.into(), false)
    }

    /// Strict build: fails with the first problem found. Without terminal
    /// declarations undefined symbols are terminals, as in `build`.
    pub fn into_grammar(self, start: impl Into<String>) -> Result<Grammar, GrammarError> {
        let grammar = self.assemble(start.into(), true);
        match grammar.diagnostics.first() {
            Some(err) => Err(err.clone()),
            None => Ok(grammar),
        }
    }

    fn assemble(self, start: String, strict: bool) -> Grammar {
        let mut diagnostics = Vec::new();
        let defined: HashSet<&str> = self.rules.iter().map(|(h, _)| h.as_str()).collect();
        let resolve = |name: &String| if defined.contains(name.as_str()) {
            Symbol::NonTerm(name.clone())
        } else {
            Symbol::Term(name.clone())
        };

        let mut rules = Vec::new();
        let mut productions: HashMap<String, Vec<RuleId>> = HashMap::new();
        let mut heads = Vec::new();
        let mut seen = HashSet::new();
        for (head, spec) in &self.rules {
            let rule = Rule {
                id: rules.len(),
                kind: RuleKind::Production,
                head: head.clone(),
                spec: spec.iter().map(resolve).collect(),
            };
            if !seen.insert((head, spec)) {
                diagnostics.push(GrammarError::DuplicateRule(rule.to_string()));
                continue;
            }
            if self.terminals.contains(head) && !heads.contains(head) {
                diagnostics.push(GrammarError::TerminalHead(head.clone()));
            }
            if strict && !self.terminals.is_empty() {
                for sym in &rule.spec {
                    if sym.is_terminal() && !self.terminals.contains(sym.name()) {
                        diagnostics.push(GrammarError::UndefinedSymbol {
                            symbol: sym.name().to_string(),
                            rule: rule.to_string(),
                        });
                    }
                }
            }
            if !productions.contains_key(head) {
                heads.push(head.clone());
            }
            productions.entry(head.clone()).or_default().push(rule.id);
            rules.push(Rc::new(rule));
        }

        if !productions.contains_key(&start) {
            diagnostics.push(GrammarError::MissingStart(start.clone()));
        }

        let tags = heads.iter()
            .filter(|head| productions[*head].iter()
                .all(|&id| rules[id].spec.iter().all(Symbol::is_terminal)))
            .cloned()
            .collect();

        let start_rule = rules.len();
        rules.push(Rc::new(Rule {
            id: start_rule,
            kind: RuleKind::Start,
            head: START.to_string(),
            spec: vec![resolve(&start)],
        }));

        // Terminals referenced by rule bodies (or a start symbol without
        // productions) can be scanned directly through `t -> t`.
        let mut lexical = HashMap::new();
        let terminals: Vec<String> = rules.iter()
            .flat_map(|r| r.spec.iter())
            .filter(|s| s.is_terminal())
            .map(|s| s.name().to_string())
            .collect();
        for term in terminals {
            if lexical.contains_key(&term) {
                continue;
            }
            let id = rules.len();
            lexical.insert(term.clone(), id);
            rules.push(Rc::new(Rule {
                id,
                kind: RuleKind::Lexical,
                head: term.clone(),
                spec: vec![Symbol::Term(term)],
            }));
        }

        Grammar { start, rules, productions, heads, tags, lexical, start_rule, diagnostics }
    }
}

///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{GrammarBuilder, GrammarError, RuleKind, Symbol};

    fn english() -> GrammarBuilder {
        GrammarBuilder::default()
            .rule("S", &["NP", "VP"])
            .rule("NP", &["Det", "N"])
            .rule("VP", &["V", "NP"])
            .rule("Det", &["the"])
            .rule("Det", &["a"])
            .rule("N", &["dog"])
            .rule("N", &["cat"])
            .rule("V", &["chased"])
            .rule("V", &["saw"])
    }

    #[test]
    fn symbol_resolution() {
        let g = english().build("S");
        let s = g.productions("S").next().unwrap();
        assert_eq!(s.spec, vec![
            Symbol::NonTerm("NP".to_string()),
            Symbol::NonTerm("VP".to_string()),
        ]);
        let det = g.productions("Det").next().unwrap();
        assert_eq!(det.spec, vec![Symbol::Term("the".to_string())]);
        assert!(det.yields("the"));
        assert!(!det.yields("a"));
    }

    #[test]
    fn tag_classification() {
        let g = english().build("S");
        // terminals, including undefined ones, are tags
        for sym in ["the", "dog", "chased", "undefined"] {
            assert!(g.is_terminal(sym));
            assert!(g.is_tag(sym));
        }
        for sym in ["Det", "N", "V"] {
            assert!(!g.is_terminal(sym));
            assert!(g.is_tag(sym));
        }
        for sym in ["S", "NP", "VP"] {
            assert!(!g.is_tag(sym));
        }
    }

    #[test]
    fn mixed_bodies_are_not_tags() {
        let g = GrammarBuilder::default()
            .rule("X", &["a"])
            .rule("X", &["Y", "b"])
            .rule("Y", &["b"])
            .build("X");
        assert!(!g.is_tag("X"));
        assert!(g.is_tag("Y"));
    }

    #[test]
    fn productions_keep_order() {
        let g = english().build("S");
        let dets: Vec<_> = g.productions("Det").map(|r| r.to_string()).collect();
        assert_eq!(dets, vec!["Det -> the", "Det -> a"]);
        assert_eq!(g.productions("nothing").count(), 0);
    }

    #[test]
    fn synthetic_rules() {
        let g = english().build("S");
        assert_eq!(g.start_rule().to_string(), "<START> -> S");
        assert_eq!(g.start_rule().kind, RuleKind::Start);
        let lex = g.lexical_rule("dog").unwrap();
        assert_eq!(lex.kind, RuleKind::Lexical);
        assert!(lex.yields("dog"));
        assert!(g.lexical_rule("Det").is_none());
        for (idx, rule) in g.rules().iter().enumerate() {
            assert_eq!(rule.id, idx);
        }
    }

    #[test]
    fn epsilon_rule() {
        let g = GrammarBuilder::default()
            .rule::<_, &str>("S", &[])
            .build("S");
        assert_eq!(g.productions("S").next().unwrap().to_string(), "S -> ");
        // vacuously all-terminal
        assert!(g.is_tag("S"));
        assert!(g.is_well_formed());
    }

    #[test]
    fn lenient_build_records_problems() {
        let g = GrammarBuilder::default()
            .rule("S", &["a"])
            .rule("S", &["a"])
            .build("Q");
        assert_eq!(g.diagnostics(), &[
            GrammarError::DuplicateRule("S -> a".to_string()),
            GrammarError::MissingStart("Q".to_string()),
        ]);
        assert_eq!(g.productions("S").count(), 1);
    }

    #[test]
    fn strict_build() {
        let g = english()
            .terminal("the").terminal("a").terminal("dog")
            .terminal("cat").terminal("chased").terminal("saw")
            .into_grammar("S");
        assert!(g.is_ok());

        // nothing declared, every undefined symbol is a terminal
        let g = english().into_grammar("S").unwrap();
        assert!(g.is_terminal("the"));
        assert!(g.is_well_formed());

        let g = english().terminal("the").into_grammar("S");
        assert_eq!(g.unwrap_err(), GrammarError::UndefinedSymbol {
            symbol: "a".to_string(),
            rule: "Det -> a".to_string(),
        });

        let g = GrammarBuilder::default()
            .terminal("x")
            .rule("x", &["y"])
            .terminal("y")
            .into_grammar("x");
        assert_eq!(g.unwrap_err(), GrammarError::TerminalHead("x".to_string()));

        let g = GrammarBuilder::default().rule("S", &["a"]).into_grammar("Q");
        assert_eq!(g.unwrap_err(), GrammarError::MissingStart("Q".to_string()));
        let g = GrammarBuilder::default().rule("S", &["a"]).rule("S", &["a"]).into_grammar("S");
        assert_eq!(g.unwrap_err(), GrammarError::DuplicateRule("S -> a".to_string()));
    }

    #[test]
    fn display_grammar() {
        let g = english().build("S");
        let text = g.to_string();
        assert!(text.starts_with("S -> NP VP\n"));
        assert!(text.contains("Det -> the | a\n"));
    }
}
