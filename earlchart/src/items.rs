use crate::grammar::{Grammar, Rule, RuleId, Symbol};
use std::rc::Rc;
use std::{fmt, hash};

/// Identity of an `Item` inside the chart. Back-pointers are not part of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub rule: RuleId,
    pub dot: usize,
    pub origin: usize,
    pub end: usize,
}

/// An Item is a partially matched `Rule`. `dot` shows the match progress.
pub struct Item {
    pub rule: Rc<Rule>,  // dotted rule
    pub dot: usize,      // dot position within the rule
    pub origin: usize,   // input offset where the item starts
    pub end: usize,      // input offset where the item ends

    /// Completed children, one per rhs symbol already matched. Each item owns
    /// its own vector.
    backpointers: Vec<Rc<Item>>,
}

// Items are deduped only by rule, dot, origin, end (ie: not bp)
impl hash::Hash for Item {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Item) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Item {}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (pre, post) = self.split();
        write!(f, "({} - {}) {} -> {} \u{00b7} {} #bp: {}",
               self.origin, self.end, self.rule.head, pre, post,
               self.backpointers.len())
    }
}

/// Trace form: `[origin] LHS -> consumed . remaining`
impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (pre, post) = self.split();
        let mut line = format!("[{}] {} ->", self.origin, self.rule.head);
        for part in [pre.as_str(), ".", post.as_str()] {
            if !part.is_empty() {
                line.push(' ');
                line.push_str(part);
            }
        }
        f.write_str(&line)
    }
}

impl Item {
    pub fn key(&self) -> ItemKey {
        ItemKey { rule: self.rule.id, dot: self.dot, origin: self.origin, end: self.end }
    }

    /// Item is complete if Rule has been fully matched
    pub fn complete(&self) -> bool {
        self.dot >= self.rule.spec.len()
    }

    /// Exposes the next symbol in the progress of the Rule
    pub fn next_symbol(&self) -> Option<&Symbol> {
        self.rule.spec.get(self.dot)
    }

    /// Completed sub-items this item was advanced over, in rhs order.
    pub fn sources(&self) -> &[Rc<Item>] {
        &self.backpointers
    }

    /// Complete production of the start symbol that began at offset 0.
    pub fn is_start_completion(&self, grammar: &Grammar) -> bool {
        self.complete() && self.origin == 0 && self.rule.is_production()
            && self.rule.head == grammar.start()
    }

    /// Build a new `Prediction` based Item.
    pub fn predict_new(rule: &Rc<Rule>, start: usize) -> Item {
        Item {
            rule: rule.clone(),
            dot: 0,
            origin: start,
            end: start,
            backpointers: Vec::new(),
        }
    }

    /// Build a `Scan` based Item: a one-token rule `X -> tok` matched at
    /// `start`.
    pub fn scan_new(rule: &Rc<Rule>, start: usize) -> Item {
        Item {
            rule: rule.clone(),
            dot: 1,
            origin: start,
            end: start + 1,
            backpointers: Vec::new(),
        }
    }

    /// Build `Completion` based Items.
    /// `source` is advanced because its next symbol matches the completed `trigger`.
    pub fn complete_new(source: &Item, trigger: &Rc<Item>, end: usize) -> Item {
        let mut backpointers = Vec::with_capacity(source.backpointers.len() + 1);
        backpointers.extend(source.backpointers.iter().cloned());
        backpointers.push(trigger.clone());
        Item {
            rule: source.rule.clone(),
            dot: source.dot + 1,
            origin: source.origin,
            end,
            backpointers,
        }
    }

    fn split(&self) -> (String, String) {
        let pre = self.rule.spec.iter().take(self.dot)
            .map(|s| s.name()).collect::<Vec<_>>().join(" ");
        let post = self.rule.spec.iter().skip(self.dot)
            .map(|s| s.name()).collect::<Vec<_>>().join(" ");
        (pre, post)
    }
}

///////////////////////////////////////////////////////////////////////////////
