use std::path::Path;

use anyhow::Context;
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{Gender, InterviewRecord, Period, Region, Sentiment, Status};

/// Why a student left the course. Drives both the narrative phrase pool and
/// the follow-up sentence attached to it.
#[derive(Debug, Clone, Copy)]
enum DropMotive {
    Financial,
    Academic,
    Personal,
    Institutional,
}

impl DropMotive {
    const ALL: [DropMotive; 4] = [
        DropMotive::Financial,
        DropMotive::Academic,
        DropMotive::Personal,
        DropMotive::Institutional,
    ];

    fn phrases(self) -> &'static [&'static str] {
        match self {
            DropMotive::Financial => &[
                "dificuldade financeira",
                "precisava trabalhar",
                "não consegui pagar as mensalidades",
            ],
            DropMotive::Academic => &[
                "dificuldade nas matérias",
                "não era o que esperava",
                "falta de base matemática",
            ],
            DropMotive::Personal => &[
                "problemas de saúde",
                "mudança de cidade",
                "falta de tempo",
            ],
            DropMotive::Institutional => &[
                "infraestrutura ruim",
                "professores despreparados",
                "falta de apoio",
            ],
        }
    }

    fn elaborations(self) -> &'static [&'static str] {
        match self {
            DropMotive::Financial => &[
                "Mesmo tentando conciliar trabalho e estudos, não foi possível.",
                "As despesas com transporte e materiais pesaram no orçamento.",
            ],
            DropMotive::Academic => &[
                "As disciplinas de programação foram especialmente desafiadoras.",
                "Não recebi o suporte necessário para acompanhar o ritmo.",
            ],
            DropMotive::Personal => &[
                "Precisei priorizar outras responsabilidades pessoais.",
                "A rotina ficou incompatível com meu horário de trabalho.",
            ],
            DropMotive::Institutional => &[
                "A infraestrutura do laboratório era precária.",
                "Faltavam professores especializados em áreas importantes.",
            ],
        }
    }
}

/// Why a student stayed enrolled.
#[derive(Debug, Clone, Copy)]
enum RetentionFactor {
    Support,
    Vocation,
    Social,
}

impl RetentionFactor {
    const ALL: [RetentionFactor; 3] = [
        RetentionFactor::Support,
        RetentionFactor::Vocation,
        RetentionFactor::Social,
    ];

    fn phrases(self) -> &'static [&'static str] {
        match self {
            RetentionFactor::Support => &[
                "bolsa de estudos",
                "apoio da família",
                "mentoria dos professores",
            ],
            RetentionFactor::Vocation => &[
                "gosto pela área",
                "perspectivas de carreira",
                "identificação com o curso",
            ],
            RetentionFactor::Social => &[
                "amizades no curso",
                "ambiente acolhedor",
                "grupo de estudos",
            ],
        }
    }

    fn elaborations(self) -> &'static [&'static str] {
        match self {
            RetentionFactor::Support => &[
                "O programa de bolsas foi essencial para minha continuidade.",
                "Os professores sempre estiveram disponíveis para tirar dúvidas.",
            ],
            RetentionFactor::Vocation => &[
                "Cada semestre me identifico mais com a área de TI.",
                "As oportunidades de estágio na área são muito atraentes.",
            ],
            RetentionFactor::Social => &[
                "Formamos um grupo de estudos que faz toda a diferença.",
                "O ambiente colaborativo entre os alunos é inspirador.",
            ],
        }
    }
}

/// Synthetic interview generator.
///
/// Holds two random sources on purpose: the seeded one drives every column
/// that analyses depend on (region, course, status, demographics, dates), so
/// a fixed seed reproduces the table shape run after run; the free-running
/// one only picks narrative wording, which is allowed to vary.
pub struct InterviewGenerator {
    numeric: StdRng,
    narrative: StdRng,
}

impl InterviewGenerator {
    pub fn new(seed: u64) -> Self {
        InterviewGenerator {
            numeric: StdRng::seed_from_u64(seed),
            narrative: StdRng::from_entropy(),
        }
    }

    pub fn generate(&mut self, n: usize) -> Vec<InterviewRecord> {
        let today = Utc::now().date_naive();
        let mut records = Vec::with_capacity(n);

        for index in 0..n {
            let id = index as u64 + 1;
            let region = Region::ALL[self.numeric.gen_range(0..Region::ALL.len())];
            let courses = region.courses();
            let course = courses[self.numeric.gen_range(0..courses.len())];

            let (status, text, sentiment) = if self.numeric.gen_bool(region.attrition_rate()) {
                let motive = DropMotive::ALL[self.numeric.gen_range(0..DropMotive::ALL.len())];
                let sentiment = if self.numeric.gen_bool(0.8) {
                    Sentiment::Negative
                } else {
                    Sentiment::Neutral
                };
                (Status::Dropped, self.attrition_text(motive), sentiment)
            } else {
                let status = if self.numeric.gen_bool(0.3) {
                    Status::Graduated
                } else {
                    Status::Enrolled
                };
                let factor =
                    RetentionFactor::ALL[self.numeric.gen_range(0..RetentionFactor::ALL.len())];
                let sentiment = if self.numeric.gen_bool(0.3) {
                    Sentiment::Positive
                } else {
                    Sentiment::Neutral
                };
                (status, self.retention_text(factor), sentiment)
            };

            let age = self.numeric.gen_range(17..=40);
            let gender = match self.numeric.gen_range(0..100) {
                0..=59 => Gender::Masculine,
                60..=94 => Gender::Feminine,
                _ => Gender::NonBinary,
            };
            let period = Period::ALL[self.numeric.gen_range(0..Period::ALL.len())];
            let semester = match status {
                Status::Enrolled => self.numeric.gen_range(1..=8),
                Status::Graduated => 8,
                Status::Dropped => self.numeric.gen_range(1..=6),
            };
            let interview_date = today - Duration::days(self.numeric.gen_range(0..=730));

            records.push(InterviewRecord {
                id,
                text,
                region,
                course,
                gender,
                age,
                period,
                semester,
                status,
                sentiment,
                interview_date,
            });
        }

        records
    }

    fn attrition_text(&mut self, motive: DropMotive) -> String {
        let phrases = motive.phrases();
        let phrase = phrases[self.narrative.gen_range(0..phrases.len())];
        let elaborations = motive.elaborations();
        let elaboration = elaborations[self.narrative.gen_range(0..elaborations.len())];

        match self.narrative.gen_range(0..4) {
            0 => format!("Tive que trancar o curso porque {phrase}. {elaboration}"),
            1 => format!("Decidi sair pois {phrase}. {elaboration}"),
            2 => format!("O principal motivo foi {phrase}. {elaboration}"),
            _ => format!("Não consegui continuar devido a {phrase}. {elaboration}"),
        }
    }

    fn retention_text(&mut self, factor: RetentionFactor) -> String {
        let phrases = factor.phrases();
        let phrase = phrases[self.narrative.gen_range(0..phrases.len())];
        let elaborations = factor.elaborations();
        let elaboration = elaborations[self.narrative.gen_range(0..elaborations.len())];

        match self.narrative.gen_range(0..4) {
            0 => format!("Continuei no curso porque {phrase}. {elaboration}"),
            1 => format!("O que me fez permanecer foi {phrase}. {elaboration}"),
            2 => format!("O fator decisivo foi {phrase}. {elaboration}"),
            _ => format!("Graças a {phrase} consegui seguir no curso. {elaboration}"),
        }
    }
}

/// Write the generated table as CSV in the documented column order. This is
/// a standalone convenience, not something the extractor depends on.
pub fn export_csv(records: &[InterviewRecord], path: &Path) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
