mod grammar;
pub use crate::grammar::{Grammar, GrammarBuilder, GrammarError, Rule, RuleId, RuleKind, Symbol, START};

mod items;
pub use crate::items::{Item, ItemKey};

mod chart;
pub use crate::chart::{Chart, ChartEntry};

mod parser;
pub use crate::parser::{Compat, EarleyParser, Parse, ParseError, ParseOutcome, ParserConfig};

mod trees;
pub use crate::trees::Tree;

pub mod loader;
pub use crate::loader::LoadError;
