#![deny(warnings)]

use crate::scanner::Scanner;

impl Scanner<std::vec::IntoIter<char>> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(source: &str) -> Self {
        Scanner::new(source.chars().collect::<Vec<_>>().into_iter())
    }
}

impl<I: Iterator<Item=char>> Scanner<I> {
    pub fn extract_string(&mut self) -> String {
        self.extract().into_iter().collect()
    }

    /// Skip and drop any leading whitespace.
    pub fn skip_whitespace(&mut self) -> bool {
        let skipped = self.skip_all_if(|c| c.is_whitespace());
        self.ignore();
        skipped
    }
}

///////////////////////////////////////////////////////////////////////////////
