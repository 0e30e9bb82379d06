#![deny(warnings)]

/// A backtracking cursor over any iterator.
///
/// Items are pulled lazily from the source into a buffer. The cursor starts
/// before the first item (`pos() == -1`); `next()` advances it and `curr()`
/// returns the item under it. `ignore()` and `extract()` drop everything up
/// to and including the cursor, so the scanner can be consumed from the front
/// one chunk at a time.
pub struct Scanner<I: Iterator> where I::Item: Clone {
    src: I,
    buf: Vec<I::Item>,
    pos: isize,
}

impl<I> Iterator for Scanner<I> where I: Iterator, I::Item: Clone {
    type Item = I::Item;
    fn next(&mut self) -> Option<Self::Item> {
        self.pos += 1;
        self.fill();
        let blen = self.buf.len() as isize;
        if self.pos > blen {
            self.pos = blen;
        }
        self.curr()
    }
}

impl<I> Scanner<I> where I: Iterator, I::Item: Clone {
    pub fn new(source: I) -> Scanner<I> {
        Scanner{src: source, buf: Vec::new(), pos: -1}
    }

    pub fn pos(&self) -> isize { self.pos }

    /// Move the cursor back (or forward) to a previously saved position.
    pub fn set_pos(&mut self, pos: isize) -> bool {
        if pos < -1 || pos > (self.buf.len() as isize) {
            return false;
        }
        self.pos = pos;
        true
    }

    pub fn curr(&self) -> Option<I::Item> {
        if self.pos < 0 {
            return None;
        }
        self.buf.get(self.pos as usize).cloned()
    }

    // pull from the source until pos is covered or the source runs dry
    fn fill(&mut self) {
        while self.pos >= (self.buf.len() as isize) {
            match self.src.next() {
                Some(item) => self.buf.push(item),
                None => break,
            }
        }
    }

    pub fn peek(&mut self) -> Option<I::Item> {
        let backtrack = self.pos;
        let peeked = self.next();
        self.pos = backtrack;
        peeked
    }

    /// True when nothing is left after the cursor.
    pub fn is_exhausted(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Items consumed since the last `ignore`/`extract`.
    pub fn view(&self) -> &[I::Item] {
        let n = ((self.pos + 1) as usize).min(self.buf.len());
        &self.buf[..n]
    }

    pub fn ignore(&mut self) {
        let n = self.view().len();
        self.buf = self.buf.split_off(n);
        self.pos = -1;
    }

    pub fn extract(&mut self) -> Vec<I::Item> {
        let items = self.view().to_vec();
        self.ignore();
        items
    }

    /// Advance only if the next item satisfies `pred`.
    pub fn accept_if<F>(&mut self, pred: F) -> Option<I::Item>
            where F: Fn(&I::Item) -> bool {
        let backtrack = self.pos;
        match self.next() {
            Some(next) if pred(&next) => Some(next),
            _ => {
                self.set_pos(backtrack);
                None
            }
        }
    }

    // Skip over items matching pred, returns whether the scanner advanced.
    // Afterwards curr() is the last matching item.
    pub fn skip_all_if<F>(&mut self, pred: F) -> bool
            where F: Fn(&I::Item) -> bool {
        let mut advanced = false;
        while self.accept_if(&pred).is_some() { advanced = true; }
        advanced
    }

    // Advance until the next item matches pred or EOF.
    // Afterwards curr() is the last non-matching item.
    pub fn until<F>(&mut self, pred: F) -> bool
            where F: Fn(&I::Item) -> bool {
        self.skip_all_if(|item| !pred(item))
    }
}

impl<I> Scanner<I> where I: Iterator, I::Item: Clone + PartialEq {
    pub fn accept(&mut self, what: &I::Item) -> Option<I::Item> {
        self.accept_if(|next| next == what)
    }
}
