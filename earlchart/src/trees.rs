use crate::grammar::Grammar;
use crate::items::Item;
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tree {
    // ("Det", "the")
    Leaf { symbol: String, token: String },
    // ("NP", [Leaf("Det", "the"), Leaf("N", "dog")])
    Node { symbol: String, children: Vec<Tree> },
}

// A completed item whose children are still being built
struct Frame {
    item: Rc<Item>,
    children: Vec<Tree>,
}

impl Tree {
    /*
    ## S -> NP VP ; NP -> Det N ; VP -> V NP ; Det -> the ; N -> dog ...
    ## "the dog saw a cat"

                S -> NP VP .
                 /        \
       NP -> Det N .     VP -> V NP .
          /     \          /      \
      Det->the. N->dog.  V->saw.  NP -> Det N .
                                   /     \
                               Det->a.  N->cat.

    Back-pointers of a completed item are its children in rhs order. Tag
    items (scanned) have no back-pointers and become leaves.
    */
    /// Rebuild the tree rooted at a completed item. Uses an explicit stack
    /// so long derivations don't exhaust the call stack.
    pub fn build(root: &Rc<Item>, grammar: &Grammar) -> Tree {
        if let Some(leaf) = Tree::leaf(root, grammar) {
            return leaf;
        }
        let mut stack = vec![Frame { item: root.clone(), children: Vec::new() }];
        loop {
            let frame = stack.last_mut().expect("BUG: tree stack underflow");
            if let Some(child) = frame.item.sources().get(frame.children.len()).cloned() {
                match Tree::leaf(&child, grammar) {
                    Some(leaf) => frame.children.push(leaf),
                    None => stack.push(Frame { item: child, children: Vec::new() }),
                }
                continue;
            }
            let frame = stack.pop().expect("BUG: tree stack underflow");
            let node = Tree::Node { symbol: frame.item.rule.head.clone(), children: frame.children };
            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => return node,
            }
        }
    }

    // Tag items matched exactly one token.
    fn leaf(item: &Item, grammar: &Grammar) -> Option<Tree> {
        match item.rule.spec.as_slice() {
            [token] if grammar.is_tag(&item.rule.head) && item.sources().is_empty() =>
                Some(Tree::Leaf {
                    symbol: item.rule.head.clone(),
                    token: token.name().to_string(),
                }),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Tree::Leaf { symbol, .. } => symbol,
            Tree::Node { symbol, .. } => symbol,
        }
    }

    /// Tokens covered by the tree, left to right.
    pub fn leaves(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(tree) = stack.pop() {
            match tree {
                Tree::Leaf { token, .. } => out.push(token.as_str()),
                Tree::Node { children, .. } => stack.extend(children.iter().rev()),
            }
        }
        out
    }

    pub fn depth(&self) -> usize {
        match self {
            Tree::Leaf { .. } => 1,
            Tree::Node { children, .. } =>
                1 + children.iter().map(Tree::depth).max().unwrap_or(0),
        }
    }

    /// Indented rendering, one symbol per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_helper("", &mut out);
        out
    }

    pub fn print(&self) {
        print!("{}", self.render());
    }

    fn render_helper(&self, level: &str, out: &mut String) {
        match self {
            Tree::Leaf { symbol, token } => {
                out.push_str(&format!("{}`-- {} ==> {:?}\n", level, symbol, token));
            }
            Tree::Node { symbol, children } => {
                out.push_str(&format!("{}`-- {}\n", level, symbol));
                if let Some((last, rest)) = children.split_last() {
                    let l = format!("{}  |", level);
                    for n in rest { n.render_helper(&l, out); }
                    let l = format!("{}   ", level);
                    last.render_helper(&l, out);
                }
            }
        }
    }
}

/// Bracketed form: `(S (NP (Det the) (N dog)) ...)`
impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Tree::Leaf { symbol, token } => write!(f, "({} {})", symbol, token),
            Tree::Node { symbol, children } => {
                write!(f, "({}", symbol)?;
                for child in children {
                    write!(f, " {}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

///////////////////////////////////////////////////////////////////////////////
