fn main() {
    // Grammar:  S -> S + N | N;  N -> 1 | 2 | 3
    let grammar = earlchart::GrammarBuilder::default()
      .terminal("+")
      .terminal("1")
      .terminal("2")
      .terminal("3")
      .rule("S", &["S", "+", "N"])
      .rule("S", &["N"])
      .rule("N", &["1"])
      .rule("N", &["2"])
      .rule("N", &["3"])
      .into_grammar("S")
      .unwrap();

    // Parse some sum
    let input = "1 + 2 + 3".split_whitespace();
    let parse = earlchart::EarleyParser::new(&grammar)
        .parse(input)
        .unwrap();

    // Show the chart and the tree behind the accepting item
    for (offset, lines) in parse.trace().iter().enumerate() {
        println!("== {} ==", offset);
        for line in lines {
            println!("  {}", line);
        }
    }
    match parse.tree() {
        Some(tree) => tree.print(),
        None => println!("no parse"),
    }
}
