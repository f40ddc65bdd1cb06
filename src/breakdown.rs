//! Word-level view of which simulated agent would handle each piece of a prompt.

use rand::Rng;
use serde::Serialize;

const LEGAL_TERMS: [&str; 3] = ["contract", "agreement", "clause"];
const MARKETING_TERMS: [&str; 4] = ["launch", "strategy", "market", "nebula"];
const TECHNICAL_TERMS: [&str; 4] = ["api", "microservices", "database", "migration"];
const LONG_WORD_CHARS: usize = 7;
const PUNCTUATION: [char; 5] = ['.', ',', '!', '?', ';'];

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum TokenKind {
    Whitespace,
    Entity,
    Keyword,
    TechnicalTerm,
    Text,
}

impl TokenKind {
    pub fn label(&self) -> &'static str {
        match self {
            TokenKind::Whitespace => "Whitespace",
            TokenKind::Entity => "Entity",
            TokenKind::Keyword => "Keyword",
            TokenKind::TechnicalTerm => "Technical Term",
            TokenKind::Text => "Text",
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct PromptToken {
    pub id: String,
    pub text: String,
    pub agent: &'static str,
    pub kind: TokenKind,
    /// Mock embedding, first two components.
    pub vector: [f64; 2],
}

/// Split `text` into whitespace runs, punctuation marks and words.
pub fn split_pieces(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = None;
    let mut in_space = false;

    for (i, ch) in text.char_indices() {
        if PUNCTUATION.contains(&ch) {
            if let Some(s) = start.take() {
                pieces.push(&text[s..i]);
            }
            pieces.push(&text[i..i + ch.len_utf8()]);
            continue;
        }
        let is_space = ch.is_whitespace();
        match start {
            Some(s) if is_space != in_space => {
                pieces.push(&text[s..i]);
                start = Some(i);
            }
            None => start = Some(i),
            _ => {}
        }
        in_space = is_space;
    }
    if let Some(s) = start {
        pieces.push(&text[s..]);
    }
    pieces
}

fn classify(piece: &str) -> (&'static str, TokenKind) {
    if piece.chars().all(char::is_whitespace) {
        return ("General", TokenKind::Whitespace);
    }
    let lower = piece.to_lowercase();
    if piece.chars().count() > LONG_WORD_CHARS || LEGAL_TERMS.contains(&lower.as_str()) {
        ("Legal Agent", TokenKind::Entity)
    } else if MARKETING_TERMS.contains(&lower.as_str()) {
        ("Marketing Agent", TokenKind::Keyword)
    } else if TECHNICAL_TERMS.contains(&lower.as_str()) {
        ("Technical Agent", TokenKind::TechnicalTerm)
    } else {
        ("General", TokenKind::Text)
    }
}

/// Label every piece of `text`, drawing mock embeddings from `rng`.
pub fn breakdown<R: Rng>(text: &str, rng: &mut R) -> Vec<PromptToken> {
    split_pieces(text)
        .into_iter()
        .enumerate()
        .map(|(index, piece)| {
            let (agent, kind) = classify(piece);
            PromptToken {
                id: format!("t_{}", index + 100),
                text: piece.to_string(),
                agent,
                kind,
                vector: [rng.random(), rng.random()],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn splits_words_spaces_and_punctuation() {
        let pieces = split_pieces("Hello,  world! Launch the API.");
        assert_eq!(
            pieces,
            vec!["Hello", ",", "  ", "world", "!", " ", "Launch", " ", "the", " ", "API", "."]
        );
        assert!(split_pieces("").is_empty());
    }

    #[test]
    fn classifies_pieces() {
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let tokens = breakdown("contract launch api database agreements hi ", &mut rng);
        let agents: Vec<_> = tokens.iter().map(|t| t.agent).collect();
        assert_eq!(
            agents,
            vec![
                "Legal Agent",
                "General",
                "Marketing Agent",
                "General",
                "Technical Agent",
                "General",
                "Legal Agent",
                "General",
                "Legal Agent",
                "General",
                "General",
                "General",
            ]
        );
        assert_eq!(tokens[0].id, "t_100");
        assert_eq!(tokens[1].kind, TokenKind::Whitespace);
        assert_eq!(tokens[10].kind, TokenKind::Text);
    }

    #[test]
    fn same_seed_same_output() {
        let text = "Please analyze the proposed migration strategy.";
        let a = breakdown(text, &mut ChaCha12Rng::seed_from_u64(42));
        let b = breakdown(text, &mut ChaCha12Rng::seed_from_u64(42));
        assert_eq!(a, b);
        assert!(
            a.iter()
                .all(|t| t.vector.iter().all(|v| (0.0..1.0).contains(v)))
        );
    }
}
