use std::collections::HashMap;
use std::fmt::Write;

use crate::models::{EnrichedRecord, Region, Sentiment, Status};

#[derive(Debug, Clone)]
pub struct RegionSummary {
    pub region: Region,
    pub total: usize,
    pub dropped: usize,
    pub dropped_share: f64,
}

/// Status mix per region, sorted by attrition share, worst first.
pub fn summarize_regions(records: &[EnrichedRecord]) -> Vec<RegionSummary> {
    let mut map: HashMap<Region, (usize, usize)> = HashMap::new();

    for row in records {
        let entry = map.entry(row.record.region).or_insert((0, 0));
        entry.0 += 1;
        if row.record.status == Status::Dropped {
            entry.1 += 1;
        }
    }

    let mut summaries: Vec<RegionSummary> = map
        .into_iter()
        .map(|(region, (total, dropped))| RegionSummary {
            region,
            total,
            dropped,
            dropped_share: if total == 0 {
                0.0
            } else {
                dropped as f64 / total as f64
            },
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.dropped_share
            .partial_cmp(&a.dropped_share)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    summaries
}

/// Theme frequency across the corpus, most frequent first.
pub fn summarize_themes(records: &[EnrichedRecord]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in records {
        for theme in &row.themes {
            *counts.entry(theme.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(theme, count)| (theme.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// Count both sentiment signals side by side. The generator label and the
/// extractor label are independent and allowed to disagree, so the report
/// shows them as two distributions rather than one.
pub fn sentiment_mix(records: &[EnrichedRecord]) -> Vec<(Sentiment, usize, usize)> {
    [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral]
        .into_iter()
        .map(|sentiment| {
            let declared = records
                .iter()
                .filter(|row| row.record.sentiment == sentiment)
                .count();
            let extracted = records.iter().filter(|row| row.sentiment == sentiment).count();
            (sentiment, declared, extracted)
        })
        .collect()
}

pub fn build_report(records: &[EnrichedRecord], topics: &[String]) -> String {
    let regions = summarize_regions(records);
    let themes = summarize_themes(records);
    let sentiments = sentiment_mix(records);

    let mut output = String::new();

    let _ = writeln!(output, "# Análise de Evasão em Cursos TIC");
    let _ = writeln!(output, "{} entrevistas analisadas", records.len());
    let _ = writeln!(output);
    let _ = writeln!(output, "## Situação por região");

    if regions.is_empty() {
        let _ = writeln!(output, "Nenhuma entrevista disponível.");
    } else {
        for summary in &regions {
            let _ = writeln!(
                output,
                "- {}: {} entrevistas, {} evadidos ({:.0}%)",
                summary.region,
                summary.total,
                summary.dropped,
                summary.dropped_share * 100.0
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Sentimento (declarado vs. extraído)");
    for (sentiment, declared, extracted) in &sentiments {
        let _ = writeln!(
            output,
            "- {}: {} declarado, {} extraído",
            sentiment, declared, extracted
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Temas mais citados");
    if themes.is_empty() {
        let _ = writeln!(output, "Nenhum tema identificado.");
    } else {
        for (theme, count) in themes.iter().take(10) {
            let _ = writeln!(output, "- {theme}: {count} ocorrências");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Relatos de evasão");
    let mut quoted = 0;
    for row in records {
        if row.record.status == Status::Dropped {
            if let Some(sentence) = row.key_sentences.first() {
                let _ = writeln!(output, "- \"{}\" ({})", sentence, row.record.region);
                quoted += 1;
            }
        }
        if quoted == 5 {
            break;
        }
    }
    if quoted == 0 {
        let _ = writeln!(output, "Nenhum relato de evasão no recorte.");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Tópicos do corpus");
    if topics.is_empty() {
        let _ = writeln!(output, "Nenhum tópico disponível.");
    } else {
        for topic in topics {
            let _ = writeln!(output, "- {topic}");
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{Course, EnrichedRecord, Gender, InterviewRecord, Period};

    fn enriched(id: u64, region: Region, status: Status, themes: &[&str]) -> EnrichedRecord {
        let mut row = EnrichedRecord::defaulted(InterviewRecord {
            id,
            text: "Tive que trancar o curso porque dificuldade financeira.".to_string(),
            region,
            course: Course::ComputerScience,
            gender: Gender::Feminine,
            age: 23,
            period: Period::Evening,
            semester: 3,
            status,
            sentiment: Sentiment::Neutral,
            interview_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        });
        row.themes = themes.iter().map(|theme| theme.to_string()).collect();
        row.key_sentences = vec!["Tive que trancar o curso.".to_string()];
        row
    }

    #[test]
    fn regions_sort_by_attrition_share() {
        let records = vec![
            enriched(1, Region::Curitiba, Status::Enrolled, &[]),
            enriched(2, Region::Curitiba, Status::Enrolled, &[]),
            enriched(3, Region::Cascavel, Status::Dropped, &[]),
            enriched(4, Region::Cascavel, Status::Enrolled, &[]),
        ];

        let summaries = summarize_regions(&records);
        assert_eq!(summaries[0].region, Region::Cascavel);
        assert_eq!(summaries[0].dropped, 1);
        assert!((summaries[0].dropped_share - 0.5).abs() < 1e-9);
        assert_eq!(summaries[1].region, Region::Curitiba);
        assert_eq!(summaries[1].dropped, 0);
    }

    #[test]
    fn themes_rank_by_count_then_name() {
        let records = vec![
            enriched(1, Region::Londrina, Status::Enrolled, &["curso", "professor"]),
            enriched(2, Region::Londrina, Status::Enrolled, &["curso"]),
            enriched(3, Region::Londrina, Status::Enrolled, &["dificuldade"]),
        ];

        let ranked = summarize_themes(&records);
        assert_eq!(ranked[0], ("curso".to_string(), 2));
        assert_eq!(ranked[1], ("dificuldade".to_string(), 1));
        assert_eq!(ranked[2], ("professor".to_string(), 1));
    }

    #[test]
    fn sentiment_mix_keeps_both_signals_distinct() {
        let mut row = enriched(1, Region::Maringa, Status::Enrolled, &[]);
        row.record.sentiment = Sentiment::Positive;
        row.sentiment = Sentiment::Negative;

        let mix = sentiment_mix(&[row]);
        assert_eq!(mix[0], (Sentiment::Positive, 1, 0));
        assert_eq!(mix[1], (Sentiment::Negative, 0, 1));
        assert_eq!(mix[2], (Sentiment::Neutral, 0, 0));
    }

    #[test]
    fn report_renders_every_section() {
        let records = vec![
            enriched(1, Region::Apucarana, Status::Dropped, &["curso"]),
            enriched(2, Region::Apucarana, Status::Enrolled, &["curso"]),
        ];
        let topics = vec!["Tópico 0: bolsa apoio".to_string()];

        let report = build_report(&records, &topics);
        assert!(report.contains("# Análise de Evasão em Cursos TIC"));
        assert!(report.contains("## Situação por região"));
        assert!(report.contains("Apucarana: 2 entrevistas, 1 evadidos (50%)"));
        assert!(report.contains("## Sentimento (declarado vs. extraído)"));
        assert!(report.contains("- curso: 2 ocorrências"));
        assert!(report.contains("\"Tive que trancar o curso.\" (Apucarana)"));
        assert!(report.contains("- Tópico 0: bolsa apoio"));
    }

    #[test]
    fn empty_input_still_renders_a_report() {
        let report = build_report(&[], &[]);
        assert!(report.contains("Nenhuma entrevista disponível."));
        assert!(report.contains("Nenhum tema identificado."));
        assert!(report.contains("Nenhum tópico disponível."));
    }
}
