mod scanner;
mod char_scanner;
mod scheme_tokenizer;

pub use scanner::Scanner;
pub use scheme_tokenizer::{tokenize, SchemeTokenizer, Token};

#[cfg(test)]
mod scanner_test;
