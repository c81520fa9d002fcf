use crate::grammar::Grammar;
use crate::items::{Item, ItemKey};
use std::collections::HashMap;
use std::rc::Rc;

/// Items ending at one input offset, in insertion order, without duplicates.
#[derive(Default)]
pub struct ChartEntry {
    items: Vec<Rc<Item>>,
    index: HashMap<ItemKey, usize>,
}

/// One `ChartEntry` per input offset `0..=n`.
pub struct Chart {
    entries: Vec<ChartEntry>,
}

impl ChartEntry {
    /// Insert `item` unless an item with the same identity is already here.
    /// The first item inserted keeps its back-pointers.
    pub fn add(&mut self, item: Item) -> bool {
        let key = item.key();
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.items.len());
        self.items.push(Rc::new(item));
        true
    }

    /// Items are appended only, so indexing observes items added after a
    /// walk over the entry began.
    pub fn get(&self, idx: usize) -> Option<&Rc<Item>> {
        self.items.get(idx)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<Item>> {
        self.items.iter()
    }

    /// One line per item `[origin] LHS -> consumed . remaining`, followed by
    /// `ACCEPTS` if the entry completes the start symbol from offset 0.
    pub fn describe(&self, grammar: &Grammar) -> Vec<String> {
        let mut lines: Vec<String> = self.iter().map(|item| item.to_string()).collect();
        if self.iter().any(|item| item.is_start_completion(grammar)) {
            lines.push("ACCEPTS".to_string());
        }
        lines
    }
}

impl Chart {
    /// Allocate `length` entries (at least one) and seed entry 0 with
    /// `<START> -> . S`.
    pub fn new(length: usize, grammar: &Grammar) -> Chart {
        let mut entries: Vec<_> = (0..length.max(1)).map(|_| ChartEntry::default()).collect();
        entries[0].add(Item::predict_new(grammar.start_rule(), 0));
        Chart { entries }
    }

    /// Number of entries, ie: tokens + 1.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, offset: usize) -> Option<&ChartEntry> {
        self.entries.get(offset)
    }

    // Offsets come from the sweep, which never goes past the last entry.
    pub(crate) fn at(&self, offset: usize) -> &ChartEntry {
        &self.entries[offset]
    }

    pub(crate) fn add(&mut self, offset: usize, item: Item) -> bool {
        self.entries[offset].add(item)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ChartEntry> {
        self.entries.iter()
    }

    pub fn total_items(&self) -> usize {
        self.entries.iter().map(ChartEntry::len).sum()
    }

    /// Items in the last entry that derive the start symbol over the whole
    /// input.
    pub fn accepting<'a>(&'a self, grammar: &'a Grammar) -> impl Iterator<Item = &'a Rc<Item>> + 'a {
        let last = self.entries.len() - 1;
        self.entries[last].iter().filter(move |item| item.is_start_completion(grammar))
    }

    /// Trace lines of the entry at `offset`, see `ChartEntry::describe`.
    pub fn describe(&self, offset: usize, grammar: &Grammar) -> Option<Vec<String>> {
        self.entry(offset).map(|entry| entry.describe(grammar))
    }
}

///////////////////////////////////////////////////////////////////////////////
