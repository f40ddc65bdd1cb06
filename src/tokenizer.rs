//! Tokenizer capability used to count prompt tokens.

use anyhow::{Context, Result, bail};
use tiktoken_rs::CoreBPE;

/// Encodes text into token ids.
///
/// Only the number of ids is used; any error selects the estimated path.
pub trait Tokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>>;
    fn name(&self) -> &str;
}

/// Byte-pair encoding with the `cl100k_base` vocabulary.
pub struct BpeTokenizer {
    bpe: CoreBPE,
}

impl BpeTokenizer {
    pub fn new() -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base().context("failed to load cl100k_base encoding")?;
        Ok(Self { bpe })
    }
}

impl Tokenizer for BpeTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let ids = self.bpe.encode_with_special_tokens(text);
        Ok(ids.into_iter().map(|id| id as u32).collect())
    }

    fn name(&self) -> &str {
        "cl100k_base"
    }
}

/// Tokenizer that is never available.
pub struct UnavailableTokenizer;

impl Tokenizer for UnavailableTokenizer {
    fn encode(&self, _text: &str) -> Result<Vec<u32>> {
        bail!("exact tokenizer is unavailable")
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

/// Build the exact tokenizer, or the unavailable one if it cannot be loaded.
pub fn create_tokenizer(exact: bool) -> Box<dyn Tokenizer> {
    if !exact {
        return Box::new(UnavailableTokenizer);
    }
    match BpeTokenizer::new() {
        Ok(tokenizer) => Box::new(tokenizer),
        Err(error) => {
            log::warn!("{error:#}");
            Box::new(UnavailableTokenizer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bpe_counts_simple_text() {
        let tokenizer = BpeTokenizer::new().unwrap();
        assert_eq!(tokenizer.encode("hello world").unwrap().len(), 2);
        assert!(tokenizer.encode("").unwrap().is_empty());
    }

    #[test]
    fn unavailable_always_fails() {
        assert!(UnavailableTokenizer.encode("hello").is_err());
    }

    #[test]
    fn create_without_exact_is_unavailable() {
        assert_eq!(create_tokenizer(false).name(), "unavailable");
    }
}
