//! earlchart-repl: load a grammar, then parse sentences and print their trees.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use miette::{IntoDiagnostic, Result, miette};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use earlchart::{loader, Compat, EarleyParser, Grammar, GrammarBuilder, ParseOutcome, ParserConfig};
use lexers::SentenceTokenizer;

#[derive(Parser)]
#[command(name = "earlchart-repl", version, about = "Earley chart parser for context-free grammars")]
struct Cli {
    /// File with `LHS -> RHS | ...` rule lines. Without it rules are read
    /// from the prompt until END.
    #[arg(long)]
    grammar: Option<PathBuf>,

    /// Start symbol.
    #[arg(long, default_value = "S")]
    start: String,

    /// Refuse malformed grammars and report item limits as errors.
    #[arg(long)]
    strict: bool,

    /// Give up on a sentence once the chart holds this many items.
    #[arg(long)]
    max_items: Option<usize>,

    /// Log every chart entry as it reaches its fixpoint.
    #[arg(long)]
    trace: bool,

    /// Parse this sentence and exit.
    sentence: Vec<String>,
}

fn prompt_rules(rl: &mut DefaultEditor) -> Result<GrammarBuilder> {
    println!("Enter rules as `LHS -> RHS | ...`, finish with {}", loader::SENTINEL);
    let mut builder = GrammarBuilder::default();
    let mut line = 0;
    loop {
        match rl.readline("rule> ") {
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(builder),
            Err(e) => return Err(miette!("Readline err: {:?}", e)),
            Ok(text) if loader::is_sentinel(&text) => return Ok(builder),
            Ok(text) => {
                line += 1;
                match loader::add_rule(&mut builder, &text, line) {
                    Err(e) => println!("Rule err: {}", e),
                    Ok(()) => { let _ = rl.add_history_entry(text.as_str()); }
                }
            }
        }
    }
}

fn build_grammar(builder: GrammarBuilder, cli: &Cli) -> Result<Grammar> {
    if builder.is_empty() {
        return Err(miette!("no rules given"));
    }
    if cli.strict {
        return builder.into_grammar(cli.start.as_str()).into_diagnostic();
    }
    let grammar = builder.build(cli.start.as_str());
    if !grammar.is_well_formed() {
        for problem in grammar.diagnostics() {
            warn!(%problem, "grammar");
        }
    }
    Ok(grammar)
}

fn parse_sentence(parser: &EarleyParser<'_>, sentence: &str) -> Result<()> {
    let tokens: Vec<String> = SentenceTokenizer::scanner(sentence).collect();
    debug!(?tokens, "sentence");
    match parser.outcome(&tokens).into_diagnostic()? {
        ParseOutcome::AcceptedWithTree(tree) => tree.print(),
        ParseOutcome::RejectedNoDerivation => println!("no parse"),
        ParseOutcome::MalformedGrammar { reason } => println!("Grammar err: {}", reason),
    }
    Ok(())
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(miette::MietteHandlerOpts::new().unicode(true).build())
    }))
    .ok();

    let cli = Cli::parse();

    let filter = if cli.trace {
        tracing_subscriber::EnvFilter::new("earlchart=trace")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut rl = DefaultEditor::new().map_err(|e| miette!("Readline err: {:?}", e))?;

    let builder = match &cli.grammar {
        Some(path) => {
            let file = File::open(path).into_diagnostic()?;
            loader::read_rules(BufReader::new(file)).into_diagnostic()?
        }
        None => prompt_rules(&mut rl)?,
    };
    let grammar = build_grammar(builder, &cli)?;
    debug!(rules = grammar.rules().len(), start = grammar.start(), "grammar ready");

    let config = ParserConfig {
        max_items: cli.max_items,
        compat: if cli.strict { Compat::Strict } else { Compat::Legacy },
    };
    let parser = EarleyParser::with_config(&grammar, config);

    if !cli.sentence.is_empty() {
        return parse_sentence(&parser, &cli.sentence.join(" "));
    }

    println!("{}", grammar);
    loop {
        match rl.readline("~> ") {
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(()),
            Err(e) => return Err(miette!("Readline err: {:?}", e)),
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                if let Err(e) = parse_sentence(&parser, &line) {
                    println!("Parse err: {}", e);
                }
            }
        }
    }
}
