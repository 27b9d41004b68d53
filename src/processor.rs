//! Per-record feature extraction: themes, two sentiment signals, entities,
//! key sentences, and the cleaned-token string consumed by topic modeling.

use anyhow::ensure;

use crate::lexicon::{LanguageModel, LexiconError};
use crate::models::{EnrichedRecord, InterviewRecord, Sentiment};

/// Domain vocabulary for theme tagging. A token only counts as a theme when
/// its lemma lands in this list.
const THEME_VOCABULARY: [&str; 9] = [
    "curso",
    "professor",
    "disciplina",
    "faculdade",
    "ensino",
    "aprendizado",
    "dificuldade",
    "evasão",
    "permanência",
];

const POSITIVE_PHRASES: [&str; 12] = [
    "bom",
    "ótimo",
    "excelente",
    "gostei",
    "facilidade",
    "aprendi",
    "ajudou",
    "apoiou",
    "consegui",
    "evolui",
    "melhor",
    "recomendo",
];

const NEGATIVE_PHRASES: [&str; 14] = [
    "ruim",
    "difícil",
    "problema",
    "falta",
    "abandonei",
    "tranquei",
    "desisti",
    "pior",
    "decepcionado",
    "insatisfeito",
    "dificuldade",
    "precário",
    "deficiente",
    "carência",
];

/// Refuse to run the pipeline over absurdly large inputs; such a record is
/// substituted with the default enrichment like any other failure.
const MAX_TEXT_BYTES: usize = 64 * 1024;

/// The text feature extractor. Owns the language model for the session; a
/// degraded instance (no model) short-circuits every call to the default
/// record and never retries the load.
pub struct InterviewProcessor {
    model: Option<LanguageModel>,
}

impl InterviewProcessor {
    /// Build a processor with the embedded language model. Load failures
    /// surface here so the caller can decide whether to abort or degrade.
    pub fn new() -> Result<Self, LexiconError> {
        Ok(InterviewProcessor {
            model: Some(LanguageModel::load()?),
        })
    }

    /// A processor without a language model: every `process` call yields the
    /// default-filled record.
    pub fn degraded() -> Self {
        InterviewProcessor { model: None }
    }

    pub fn is_degraded(&self) -> bool {
        self.model.is_none()
    }

    /// Enrich one record. Never fails: a degraded processor, blank text, or
    /// any internal error all map to the fixed default record.
    pub fn process(&self, record: &InterviewRecord) -> EnrichedRecord {
        let Some(model) = &self.model else {
            return EnrichedRecord::defaulted(record.clone());
        };
        if record.text.trim().is_empty() {
            return EnrichedRecord::defaulted(record.clone());
        }

        match enrich(model, record) {
            Ok(enriched) => enriched,
            Err(error) => {
                tracing::error!(id = record.id, %error, "failed to enrich interview");
                EnrichedRecord::defaulted(record.clone())
            }
        }
    }

    /// Sequential enrichment of a whole table, one row at a time. A failing
    /// row degrades to its default record without touching the others.
    pub fn process_all(&self, records: &[InterviewRecord]) -> Vec<EnrichedRecord> {
        records.iter().map(|record| self.process(record)).collect()
    }
}

fn enrich(model: &LanguageModel, record: &InterviewRecord) -> anyhow::Result<EnrichedRecord> {
    let text = record.text.as_str();
    ensure!(
        text.len() <= MAX_TEXT_BYTES,
        "text of {} bytes exceeds the {MAX_TEXT_BYTES} byte cap",
        text.len()
    );

    let tokens = model.tokenize(text);

    let themes: Vec<String> = tokens
        .iter()
        .filter(|token| {
            !token.is_stop
                && token.lemma.chars().count() > 2
                && THEME_VOCABULARY.contains(&token.lemma.as_str())
        })
        .map(|token| token.lemma.clone())
        .collect();

    let cleaned_tokens = tokens
        .iter()
        .filter(|token| !token.is_stop)
        .map(|token| token.lemma.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let (polarity, subjectivity) = model.polarity_subjectivity(text);
    let key_sentences: Vec<String> = model.split_sentences(text).into_iter().take(3).collect();

    Ok(EnrichedRecord {
        record: record.clone(),
        themes,
        sentiment: lexicon_sentiment(text),
        entities: model.entities(text),
        polarity,
        subjectivity,
        key_sentences,
        cleaned_tokens,
    })
}

/// Discrete lexicon sentiment over the raw text. Matching is plain substring
/// containment, on purpose: the source lexicons were tuned that way, so a
/// phrase inside a longer word still counts.
pub fn lexicon_sentiment(text: &str) -> Sentiment {
    let lowered = text.to_lowercase();
    let positive = POSITIVE_PHRASES
        .iter()
        .filter(|phrase| lowered.contains(**phrase))
        .count() as f64;
    let negative = NEGATIVE_PHRASES
        .iter()
        .filter(|phrase| lowered.contains(**phrase))
        .count() as f64;

    if positive > negative * 1.5 {
        Sentiment::Positive
    } else if negative > positive * 1.5 {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}
