use crate::chart::Chart;
use crate::grammar::{Grammar, Symbol};
use crate::items::Item;
use crate::trees::Tree;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, trace};

/// How non-accepting results are reported by `EarleyParser::outcome`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Compat {
    /// Everything that doesn't accept is a plain rejection.
    #[default]
    Legacy,
    /// Grammar diagnostics surface as `MalformedGrammar`, limits as errors.
    Strict,
}

#[derive(Clone, Debug, Default)]
pub struct ParserConfig {
    /// Abort once the chart holds more items than this.
    pub max_items: Option<usize>,
    pub compat: Compat,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Item Limit: chart exceeded {limit} items at offset {offset}")]
    ItemLimit { limit: usize, offset: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub enum ParseOutcome {
    AcceptedWithTree(Tree),
    RejectedNoDerivation,
    MalformedGrammar { reason: String },
}

pub struct EarleyParser<'g> {
    grammar: &'g Grammar,
    config: ParserConfig,
}

/// A filled chart and, if the input was accepted, the witness item.
pub struct Parse<'g> {
    grammar: &'g Grammar,
    tokens: Vec<String>,
    chart: Chart,
    witness: Option<Rc<Item>>,
}

///////////////////////////////////////////////////////////////////////////////

impl ParseOutcome {
    pub fn accepted(&self) -> bool {
        matches!(self, ParseOutcome::AcceptedWithTree(_))
    }

    pub fn tree(&self) -> Option<&Tree> {
        match self {
            ParseOutcome::AcceptedWithTree(tree) => Some(tree),
            _ => None,
        }
    }
}

impl<'g> Parse<'g> {
    pub fn accepted(&self) -> bool {
        self.witness.is_some()
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Rebuild one parse tree from the witness item's back-pointers.
    pub fn tree(&self) -> Option<Tree> {
        self.witness.as_ref().map(|root| Tree::build(root, self.grammar))
    }

    /// Per offset trace lines, see `ChartEntry::describe`.
    pub fn trace(&self) -> Vec<Vec<String>> {
        self.chart.entries().map(|entry| entry.describe(self.grammar)).collect()
    }
}

impl<'g> EarleyParser<'g> {
    pub fn new(grammar: &'g Grammar) -> EarleyParser<'g> {
        EarleyParser::with_config(grammar, ParserConfig::default())
    }

    pub fn with_config(grammar: &'g Grammar, config: ParserConfig) -> EarleyParser<'g> {
        EarleyParser { grammar, config }
    }

    /// Build new `Prediction` items for every production of `symbol`, plus
    /// completions of `item` over `symbol` if it already completed empty at
    /// `pos` (a nullable symbol finished before `item` showed up).
    fn predictions(&self, item: &Item, symbol: &str, epsilon_only: bool,
                   chart: &Chart, pos: usize) -> Vec<Item>
    {
        let mut items: Vec<Item> = self.grammar.productions(symbol)
            .filter(|rule| !epsilon_only || rule.spec.is_empty())
            .map(|rule| Item::predict_new(rule, pos))
            .collect();
        items.extend(chart.at(pos).iter()
            .filter(|done| done.complete() && done.origin == pos && done.rule.head == symbol)
            .map(|done| Item::complete_new(item, done, pos)));
        items
    }

    /// Build a `Scan` item if the token at `pos` matches the tag `symbol`,
    /// either through one of its `symbol -> tok` productions or because the
    /// symbol is the terminal `tok` itself.
    fn scan(&self, symbol: &Symbol, lexeme: &str, pos: usize) -> Option<Item> {
        let rule = match symbol {
            Symbol::NonTerm(name) => self.grammar.productions(name).find(|r| r.yields(lexeme)),
            Symbol::Term(name) if name == lexeme => self.grammar.lexical_rule(name),
            Symbol::Term(_) => None,
        };
        rule.map(|rule| Item::scan_new(rule, pos))
    }

    /// Build new `Completion` items based on `trigger` item having completed.
    /// When an item is completed it advances all items in its origin entry
    /// whose next symbol matches its rule head.
    fn completions(chart: &Chart, trigger: &Rc<Item>, pos: usize) -> Vec<Item> {
        chart.at(trigger.origin).iter()
            .filter(|item| item.next_symbol().is_some_and(|s| s.name() == trigger.rule.head))
            .map(|item| Item::complete_new(item, trigger, pos))
            .collect()
    }

    /// Run the predictor/scanner/completer sweep over `tokens`.
    pub fn parse<I>(&self, tokens: I) -> Result<Parse<'g>, ParseError>
        where I: IntoIterator, I::Item: AsRef<str>
    {
        let tokens: Vec<String> = tokens.into_iter().map(|t| t.as_ref().to_string()).collect();
        let n = tokens.len();
        debug!(tokens = n, start = self.grammar.start(), "earley sweep");

        let mut chart = Chart::new(n + 1, self.grammar);
        let mut total = chart.total_items();

        for pos in 0..=n {
            // Walk the entry by index, items appended meanwhile get their turn.
            // Reaching the end of the entry is the fixpoint for this offset.
            let mut idx = 0;
            while let Some(item) = chart.at(pos).get(idx).cloned() {
                idx += 1;
                let (target, new_items) = match item.next_symbol() {
                    None => (pos, Self::completions(&chart, &item, pos)),
                    Some(symbol) if self.grammar.is_tag(symbol.name()) => {
                        // Nullable tags never see a token, predict their
                        // epsilon rules instead.
                        let eps = self.predictions(&item, symbol.name(), true, &chart, pos);
                        let mut added = 0;
                        for new_item in eps {
                            added += chart.add(pos, new_item) as usize;
                        }
                        total += added;
                        match tokens.get(pos) {
                            Some(lexeme) => (pos + 1, self.scan(symbol, lexeme, pos).into_iter().collect()),
                            None => (pos, Vec::new()),
                        }
                    }
                    Some(symbol) => (pos, self.predictions(&item, symbol.name(), false, &chart, pos)),
                };
                for new_item in new_items {
                    if chart.add(target, new_item) {
                        total += 1;
                    }
                }
                if let Some(limit) = self.config.max_items {
                    if total > limit {
                        debug!(limit, offset = pos, "item limit exceeded");
                        return Err(ParseError::ItemLimit { limit, offset: pos });
                    }
                }
            }
            if tracing::enabled!(tracing::Level::TRACE) {
                for line in chart.at(pos).describe(self.grammar) {
                    trace!(offset = pos, "{}", line);
                }
            }
        }

        let witness = chart.accepting(self.grammar).next().cloned();
        debug!(accepted = witness.is_some(), items = total, "earley sweep done");
        Ok(Parse { grammar: self.grammar, tokens, chart, witness })
    }

    /// Plain recognizer: does the grammar derive `tokens`?
    pub fn recognize<I>(&self, tokens: I) -> bool
        where I: IntoIterator, I::Item: AsRef<str>
    {
        self.parse(tokens).is_ok_and(|p| p.accepted())
    }

    /// Parse and extract one tree, reporting the result per `Compat` mode.
    pub fn outcome<I>(&self, tokens: I) -> Result<ParseOutcome, ParseError>
        where I: IntoIterator, I::Item: AsRef<str>
    {
        if self.config.compat == Compat::Strict {
            if let Some(err) = self.grammar.diagnostics().first() {
                return Ok(ParseOutcome::MalformedGrammar { reason: err.to_string() });
            }
        }
        match self.parse(tokens) {
            Ok(parse) => Ok(match parse.tree() {
                Some(tree) => ParseOutcome::AcceptedWithTree(tree),
                None => ParseOutcome::RejectedNoDerivation,
            }),
            Err(_) if self.config.compat == Compat::Legacy => Ok(ParseOutcome::RejectedNoDerivation),
            Err(err) => Err(err),
        }
    }
}
