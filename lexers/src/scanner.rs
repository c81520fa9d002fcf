use std::str::Chars;

/// Buffered cursor over any iterator. Items are pulled from the source on
/// demand and kept until `ignore`/`extract` drops everything up to the
/// cursor, so callers can look ahead with `peek` or step back with `prev`.
pub struct Scanner<I: Iterator> where I::Item: Clone {
    src: I,
    buf: Vec<I::Item>,
    pos: isize,
}

impl<I> Iterator for Scanner<I> where I: Iterator, I::Item: Clone {
    type Item = I::Item;
    fn next(&mut self) -> Option<Self::Item> {
        self.pos += 1;
        self.prep_buffer();
        let blen = self.buf.len() as isize;
        if self.pos >= blen {
            self.pos = blen;
        }
        self.curr()
    }
}

impl<I> Scanner<I> where I: Iterator, I::Item: Clone {
    pub fn new(source: I) -> Scanner<I> {
        Scanner { src: source, buf: Vec::new(), pos: -1 }
    }

    pub fn curr(&self) -> Option<I::Item> {
        if self.pos < 0 {
            return None;
        }
        self.buf.get(self.pos as usize).cloned()
    }

    // try to get enough elements in the buffer for self.pos
    fn prep_buffer(&mut self) {
        while self.pos >= (self.buf.len() as isize) {
            match self.src.next() {
                Some(item) => self.buf.push(item),
                None => break,
            }
        }
    }

    pub fn prev(&mut self) -> Option<I::Item> {
        if self.pos >= 0 { self.pos -= 1; }
        self.curr()
    }

    pub fn peek(&mut self) -> Option<I::Item> {
        let backtrack = self.pos;
        let peeked = self.next();
        self.pos = backtrack;
        peeked
    }

    /// Items consumed since the last `ignore`/`extract`.
    pub fn view(&self) -> &[I::Item] {
        let n = ((self.pos + 1) as usize).min(self.buf.len());
        &self.buf[..n]
    }

    pub fn ignore(&mut self) {
        if self.pos >= 0 {
            let n = ((self.pos + 1) as usize).min(self.buf.len());
            self.buf = self.buf.split_off(n);
        }
        self.pos = -1;
    }

    pub fn extract(&mut self) -> Vec<I::Item> {
        let items = self.view().to_vec();
        self.ignore();
        items
    }

    // Advance while 'pred' holds, result is if the scanner was advanced
    pub fn skip_matching<F>(&mut self, pred: F) -> bool where F: Fn(&I::Item) -> bool {
        let mut advanced = false;
        while let Some(next) = self.peek() {
            if !pred(&next) { break; }
            self.next();
            advanced = true;
        }
        advanced
    }

    // Advance up to the first element matching 'pred' or EOF,
    // after until a call to self.curr() returns the last non-matching item
    pub fn until<F>(&mut self, pred: F) -> bool where F: Fn(&I::Item) -> bool {
        self.skip_matching(|item| !pred(item))
    }
}

impl<'a> Scanner<Chars<'a>> {
    pub fn from_str(source: &'a str) -> Scanner<Chars<'a>> {
        Scanner::new(source.chars())
    }
}
