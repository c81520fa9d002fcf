mod scanner;
mod sentence;

pub use scanner::Scanner;
pub use sentence::SentenceTokenizer;

#[cfg(test)]
mod scanner_test;
