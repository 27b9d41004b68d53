//! Corpus-level topic extraction over cleaned-token strings: a document
//! frequency filtered vocabulary feeding a small collapsed-Gibbs LDA with a
//! fixed seed. Batch operation, invoked once per session; degenerate corpora
//! produce an empty topic list instead of an error.

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Screen applied on top of the already stop-filtered cleaned tokens, for
/// function words that survive lemmatization.
const TOPIC_STOPWORDS: [&str; 18] = [
    "fazer", "ficar", "ficou", "fez", "faz", "vai", "vou", "ir", "dar", "deu", "ainda", "assim",
    "então", "coisa", "coisas", "outro", "mesmo", "cada",
];

pub struct TopicModelConfig {
    pub n_topics: usize,
    pub min_df: usize,
    pub max_df: f64,
    pub top_terms: usize,
    pub iterations: usize,
    pub seed: u64,
}

impl Default for TopicModelConfig {
    fn default() -> Self {
        TopicModelConfig {
            n_topics: 5,
            min_df: 2,
            max_df: 0.95,
            top_terms: 10,
            iterations: 100,
            seed: 42,
        }
    }
}

/// Label the main topics of a cleaned-token corpus. Returns one label per
/// topic, `"Tópico {k}: {terms}"`, or an empty list when the corpus cannot
/// support a model.
pub fn identify_topics(documents: &[String], n_topics: usize) -> Vec<String> {
    identify_topics_with(
        documents,
        &TopicModelConfig {
            n_topics,
            ..TopicModelConfig::default()
        },
    )
}

pub fn identify_topics_with(documents: &[String], config: &TopicModelConfig) -> Vec<String> {
    if documents.is_empty() || config.n_topics == 0 || config.top_terms == 0 {
        return Vec::new();
    }

    let token_docs: Vec<Vec<&str>> = documents
        .iter()
        .map(|document| {
            document
                .split_whitespace()
                .filter(|token| !TOPIC_STOPWORDS.contains(token))
                .collect()
        })
        .collect();

    let vocabulary = build_vocabulary(&token_docs, config);
    if vocabulary.is_empty() {
        return Vec::new();
    }

    let index: HashMap<&str, usize> = vocabulary
        .iter()
        .enumerate()
        .map(|(position, term)| (term.as_str(), position))
        .collect();
    let word_docs: Vec<Vec<usize>> = token_docs
        .iter()
        .map(|tokens| {
            tokens
                .iter()
                .filter_map(|token| index.get(token).copied())
                .collect()
        })
        .collect();
    if word_docs.iter().all(|doc| doc.is_empty()) {
        return Vec::new();
    }

    let word_topic = fit_lda(&word_docs, vocabulary.len(), config);

    (0..config.n_topics)
        .map(|topic| {
            let mut ranked: Vec<usize> = (0..vocabulary.len()).collect();
            ranked.sort_by(|&a, &b| {
                word_topic[b][topic]
                    .cmp(&word_topic[a][topic])
                    .then_with(|| vocabulary[a].cmp(&vocabulary[b]))
            });
            let terms: Vec<&str> = ranked
                .iter()
                .take(config.top_terms)
                .map(|&term| vocabulary[term].as_str())
                .collect();
            format!("Tópico {}: {}", topic, terms.join(" "))
        })
        .collect()
}

/// Vocabulary restricted by document frequency: a term must appear in at
/// least `min_df` documents and in at most `max_df` of the corpus. Sorted
/// for deterministic term indices.
fn build_vocabulary(token_docs: &[Vec<&str>], config: &TopicModelConfig) -> Vec<String> {
    let mut document_frequency: HashMap<&str, usize> = HashMap::new();
    for tokens in token_docs {
        let unique: HashSet<&str> = tokens.iter().copied().collect();
        for token in unique {
            *document_frequency.entry(token).or_insert(0) += 1;
        }
    }

    let ceiling = (config.max_df * token_docs.len() as f64).floor() as usize;
    let mut vocabulary: Vec<String> = document_frequency
        .into_iter()
        .filter(|(_, frequency)| *frequency >= config.min_df && *frequency <= ceiling)
        .map(|(term, _)| term.to_string())
        .collect();
    vocabulary.sort();
    vocabulary
}

/// Collapsed Gibbs sampling with symmetric priors. Returns the word-topic
/// count matrix; counts are enough to rank terms per topic.
fn fit_lda(
    word_docs: &[Vec<usize>],
    vocab_size: usize,
    config: &TopicModelConfig,
) -> Vec<Vec<usize>> {
    const ALPHA: f64 = 0.1;
    const BETA: f64 = 0.01;

    let topics = config.n_topics;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut word_topic = vec![vec![0usize; topics]; vocab_size];
    let mut doc_topic = vec![vec![0usize; topics]; word_docs.len()];
    let mut topic_totals = vec![0usize; topics];
    let mut assignments: Vec<Vec<usize>> = Vec::with_capacity(word_docs.len());

    for (doc, words) in word_docs.iter().enumerate() {
        let mut doc_assignments = Vec::with_capacity(words.len());
        for &word in words {
            let topic = rng.gen_range(0..topics);
            word_topic[word][topic] += 1;
            doc_topic[doc][topic] += 1;
            topic_totals[topic] += 1;
            doc_assignments.push(topic);
        }
        assignments.push(doc_assignments);
    }

    let mut weights = vec![0.0f64; topics];
    for _ in 0..config.iterations {
        for (doc, words) in word_docs.iter().enumerate() {
            for (position, &word) in words.iter().enumerate() {
                let old = assignments[doc][position];
                word_topic[word][old] -= 1;
                doc_topic[doc][old] -= 1;
                topic_totals[old] -= 1;

                let mut total = 0.0;
                for topic in 0..topics {
                    let word_part = (word_topic[word][topic] as f64 + BETA)
                        / (topic_totals[topic] as f64 + vocab_size as f64 * BETA);
                    let doc_part = doc_topic[doc][topic] as f64 + ALPHA;
                    weights[topic] = word_part * doc_part;
                    total += weights[topic];
                }

                let mut draw = rng.gen::<f64>() * total;
                let mut new = topics - 1;
                for (topic, weight) in weights.iter().enumerate() {
                    if draw < *weight {
                        new = topic;
                        break;
                    }
                    draw -= weight;
                }

                word_topic[word][new] += 1;
                doc_topic[doc][new] += 1;
                topic_totals[new] += 1;
                assignments[doc][position] = new;
            }
        }
    }

    word_topic
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|text| text.to_string()).collect()
    }

    #[test]
    fn empty_corpus_yields_no_topics() {
        assert!(identify_topics(&[], 5).is_empty());
    }

    #[test]
    fn corpus_below_min_df_yields_no_topics() {
        // Every term appears in exactly one document, under the min_df of 2.
        let documents = corpus(&["bolsa mentoria", "infraestrutura laboratório"]);
        assert!(identify_topics(&documents, 5).is_empty());
    }

    #[test]
    fn zero_requested_topics_yield_no_topics() {
        let documents = corpus(&["curso professor", "curso professor"]);
        assert!(identify_topics(&documents, 0).is_empty());
    }

    #[test]
    fn ubiquitous_terms_are_dropped_by_max_df() {
        let documents: Vec<String> = (0..40)
            .map(|index| {
                if index % 2 == 0 {
                    "curso bolsa apoio família".to_string()
                } else {
                    "curso infraestrutura laboratório precário".to_string()
                }
            })
            .collect();

        // "curso" appears in 100% of documents and must not survive the
        // 0.95 ceiling; the split terms all stay.
        let labels = identify_topics(&documents, 2);
        assert_eq!(labels.len(), 2);
        for label in &labels {
            assert!(!label.contains("curso"), "{label}");
        }
    }

    #[test]
    fn labels_carry_topic_prefix_and_terms() {
        let documents: Vec<String> = (0..20)
            .map(|index| {
                if index % 2 == 0 {
                    "bolsa apoio família mentoria".to_string()
                } else {
                    "dificuldade matéria matemática reprovação".to_string()
                }
            })
            .collect();

        let labels = identify_topics(&documents, 2);
        assert_eq!(labels.len(), 2);
        assert!(labels[0].starts_with("Tópico 0: "));
        assert!(labels[1].starts_with("Tópico 1: "));
        let joined = labels.join(" ");
        assert!(joined.contains("bolsa"));
        assert!(joined.contains("dificuldade"));
    }

    #[test]
    fn fixed_seed_makes_topics_deterministic() {
        let documents: Vec<String> = (0..30)
            .map(|index| {
                if index % 3 == 0 {
                    "bolsa apoio família".to_string()
                } else if index % 3 == 1 {
                    "dificuldade matéria matemática".to_string()
                } else {
                    "amizade ambiente grupo".to_string()
                }
            })
            .collect();

        assert_eq!(identify_topics(&documents, 3), identify_topics(&documents, 3));
    }
}
