//! The language-processing resource behind the extractor: tokenizer, lemma
//! table, stopword list, entity gazetteer, and the weighted polarity lexicon.
//! Loaded once per session from an embedded JSON asset and shared read-only.

use std::collections::{HashMap, HashSet};

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{Entity, EntityLabel};

const EMBEDDED_LEXICON: &str = include_str!("../assets/lexicon_pt.json");

/// Errors raised while constructing the language model. Surfaced to the
/// caller at construction time; never retried.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to parse language lexicon: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to compile token pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("language lexicon is incomplete: empty {0} section")]
    Incomplete(&'static str),
}

#[derive(Debug, Deserialize)]
struct LexiconFile {
    stopwords: Vec<String>,
    lemmas: HashMap<String, String>,
    entities: Vec<GazetteerEntry>,
    sentiment: Vec<SentimentEntry>,
}

#[derive(Debug, Deserialize)]
struct GazetteerEntry {
    text: String,
    label: EntityLabel,
}

#[derive(Debug, Deserialize)]
struct SentimentEntry {
    word: String,
    polarity: f64,
    subjectivity: f64,
}

/// A word token. The pattern only matches word-like runs, so punctuation
/// never shows up as a token in the first place.
#[derive(Debug, Clone)]
pub struct Token {
    pub surface: String,
    pub lemma: String,
    pub is_stop: bool,
}

#[derive(Debug)]
pub struct LanguageModel {
    stopwords: HashSet<String>,
    lemmas: HashMap<String, String>,
    gazetteer: Vec<(String, EntityLabel)>,
    weights: HashMap<String, (f64, f64)>,
    word_pattern: Regex,
}

impl LanguageModel {
    /// Load the embedded Portuguese lexicon.
    pub fn load() -> Result<Self, LexiconError> {
        Self::from_json(EMBEDDED_LEXICON)
    }

    pub fn from_json(raw: &str) -> Result<Self, LexiconError> {
        let file: LexiconFile = serde_json::from_str(raw)?;
        if file.stopwords.is_empty() {
            return Err(LexiconError::Incomplete("stopwords"));
        }
        if file.sentiment.is_empty() {
            return Err(LexiconError::Incomplete("sentiment"));
        }

        Ok(LanguageModel {
            stopwords: file.stopwords.into_iter().collect(),
            lemmas: file.lemmas,
            gazetteer: file
                .entities
                .into_iter()
                .map(|entry| (entry.text, entry.label))
                .collect(),
            weights: file
                .sentiment
                .into_iter()
                .map(|entry| (entry.word, (entry.polarity, entry.subjectivity)))
                .collect(),
            word_pattern: Regex::new(r"[\p{L}\p{N}]+(?:-[\p{L}\p{N}]+)*")?,
        })
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        self.word_pattern
            .find_iter(text)
            .map(|hit| {
                let surface = hit.as_str().to_string();
                let lower = surface.to_lowercase();
                let is_stop = self.stopwords.contains(&lower);
                let lemma = self.lemmas.get(&lower).cloned().unwrap_or(lower);
                Token {
                    surface,
                    lemma,
                    is_stop,
                }
            })
            .collect()
    }

    /// Split on sentence-final punctuation, keeping the delimiter with its
    /// sentence. A trailing fragment without punctuation still counts.
    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut current = String::new();

        for ch in text.chars() {
            current.push(ch);
            if matches!(ch, '.' | '!' | '?') {
                let trimmed = current.trim();
                if !trimmed.is_empty() {
                    sentences.push(trimmed.to_string());
                }
                current.clear();
            }
        }
        let trailing = current.trim();
        if !trailing.is_empty() {
            sentences.push(trailing.to_string());
        }
        sentences
    }

    /// Gazetteer matches in document order.
    pub fn entities(&self, text: &str) -> Vec<Entity> {
        let mut hits: Vec<(usize, Entity)> = Vec::new();
        for (surface, label) in &self.gazetteer {
            for (offset, matched) in text.match_indices(surface.as_str()) {
                hits.push((
                    offset,
                    Entity {
                        text: matched.to_string(),
                        label: *label,
                    },
                ));
            }
        }
        hits.sort_by_key(|(offset, _)| *offset);
        hits.into_iter().map(|(_, entity)| entity).collect()
    }

    /// Mean polarity and subjectivity over lexicon hits; (0, 0) when the
    /// text touches nothing in the lexicon.
    pub fn polarity_subjectivity(&self, text: &str) -> (f64, f64) {
        let mut polarity_sum = 0.0;
        let mut subjectivity_sum = 0.0;
        let mut hits = 0usize;

        for token in self.word_pattern.find_iter(text) {
            if let Some((polarity, subjectivity)) = self.weights.get(&token.as_str().to_lowercase())
            {
                polarity_sum += polarity;
                subjectivity_sum += subjectivity;
                hits += 1;
            }
        }

        if hits == 0 {
            return (0.0, 0.0);
        }
        let count = hits as f64;
        (
            (polarity_sum / count).clamp(-1.0, 1.0),
            (subjectivity_sum / count).clamp(0.0, 1.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_lexicon_loads() {
        let model = LanguageModel::load().unwrap();
        assert!(!model.stopwords.is_empty());
        assert!(!model.gazetteer.is_empty());
    }

    #[test]
    fn malformed_asset_is_a_construction_error() {
        let err = LanguageModel::from_json("{ not json").unwrap_err();
        assert!(matches!(err, LexiconError::Parse(_)));
    }

    #[test]
    fn empty_sections_are_rejected() {
        let raw = r#"{"stopwords": [], "lemmas": {}, "entities": [], "sentiment": []}"#;
        let err = LanguageModel::from_json(raw).unwrap_err();
        assert!(matches!(err, LexiconError::Incomplete("stopwords")));
    }

    #[test]
    fn lemma_lookup_falls_back_to_the_lowercased_surface() {
        let model = LanguageModel::load().unwrap();
        let tokens = model.tokenize("Professores explicam Algoritmos");
        assert_eq!(tokens[0].lemma, "professor");
        assert_eq!(tokens[1].lemma, "explicam");
        assert_eq!(tokens[2].lemma, "algoritmos");
    }

    #[test]
    fn stopwords_are_flagged_case_insensitively() {
        let model = LanguageModel::load().unwrap();
        let tokens = model.tokenize("O curso");
        assert!(tokens[0].is_stop);
        assert!(!tokens[1].is_stop);
    }

    #[test]
    fn sentences_keep_their_final_punctuation() {
        let model = LanguageModel::load().unwrap();
        let sentences = model.split_sentences("Gostei do curso. Vou continuar! E depois");
        assert_eq!(
            sentences,
            vec!["Gostei do curso.", "Vou continuar!", "E depois"]
        );
    }

    #[test]
    fn entities_come_back_in_document_order() {
        let model = LanguageModel::load().unwrap();
        let entities = model.entities("Estudei na UNESPAR em Apucarana, perto de Maringá.");
        let pairs: Vec<(&str, EntityLabel)> = entities
            .iter()
            .map(|entity| (entity.text.as_str(), entity.label))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("UNESPAR", EntityLabel::Organization),
                ("Apucarana", EntityLabel::Location),
                ("Maringá", EntityLabel::Location),
            ]
        );
    }

    #[test]
    fn polarity_defaults_to_zero_without_lexicon_hits() {
        let model = LanguageModel::load().unwrap();
        assert_eq!(model.polarity_subjectivity("xyz abc"), (0.0, 0.0));

        let (polarity, subjectivity) = model.polarity_subjectivity("O curso era ótimo");
        assert!(polarity > 0.0);
        assert!(subjectivity > 0.0);
    }
}
