use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Campus region covered by the interview study. Each region carries its own
/// historical attrition rate and the ICT courses it actually offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Curitiba,
    Londrina,
    #[serde(rename = "Maringá")]
    Maringa,
    Apucarana,
    #[serde(rename = "Ponta Grossa")]
    PontaGrossa,
    Cascavel,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Curitiba,
        Region::Londrina,
        Region::Maringa,
        Region::Apucarana,
        Region::PontaGrossa,
        Region::Cascavel,
    ];

    pub fn attrition_rate(self) -> f64 {
        match self {
            Region::Curitiba => 0.22,
            Region::Londrina => 0.28,
            Region::Maringa => 0.25,
            Region::Apucarana => 0.35,
            Region::PontaGrossa => 0.30,
            Region::Cascavel => 0.40,
        }
    }

    pub fn courses(self) -> &'static [Course] {
        match self {
            Region::Curitiba => &[Course::ComputerScience, Course::SoftwareEngineering],
            Region::Londrina => &[Course::InformationSystems, Course::ComputerScience],
            Region::Maringa => &[Course::SoftwareEngineering, Course::ItTechnology],
            Region::Apucarana => &[Course::ComputerScience, Course::InformationSystems],
            Region::PontaGrossa => &[Course::SoftwareEngineering, Course::ItTechnology],
            Region::Cascavel => &[Course::InformationSystems, Course::ComputerScience],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Region::Curitiba => "Curitiba",
            Region::Londrina => "Londrina",
            Region::Maringa => "Maringá",
            Region::Apucarana => "Apucarana",
            Region::PontaGrossa => "Ponta Grossa",
            Region::Cascavel => "Cascavel",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Course {
    #[serde(rename = "Ciência da Computação")]
    ComputerScience,
    #[serde(rename = "Engenharia de Software")]
    SoftwareEngineering,
    #[serde(rename = "Sistemas de Informação")]
    InformationSystems,
    #[serde(rename = "Tecnologia em TI")]
    ItTechnology,
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Course::ComputerScience => "Ciência da Computação",
            Course::SoftwareEngineering => "Engenharia de Software",
            Course::InformationSystems => "Sistemas de Informação",
            Course::ItTechnology => "Tecnologia em TI",
        };
        f.write_str(name)
    }
}

/// Enrollment outcome at interview time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "Evadido")]
    Dropped,
    #[serde(rename = "Formado")]
    Graduated,
    #[serde(rename = "Cursando")]
    Enrolled,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Dropped => "Evadido",
            Status::Graduated => "Formado",
            Status::Enrolled => "Cursando",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(rename = "Positivo")]
    Positive,
    #[serde(rename = "Negativo")]
    Negative,
    #[serde(rename = "Neutro")]
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sentiment::Positive => "Positivo",
            Sentiment::Negative => "Negativo",
            Sentiment::Neutral => "Neutro",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "Masculino")]
    Masculine,
    #[serde(rename = "Feminino")]
    Feminine,
    #[serde(rename = "Não-binário")]
    NonBinary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "Matutino")]
    Morning,
    #[serde(rename = "Vespertino")]
    Afternoon,
    #[serde(rename = "Noturno")]
    Evening,
    #[serde(rename = "Integral")]
    FullTime,
}

impl Period {
    pub const ALL: [Period; 4] = [
        Period::Morning,
        Period::Afternoon,
        Period::Evening,
        Period::FullTime,
    ];
}

/// One synthetic interview. Field order doubles as the CSV column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewRecord {
    pub id: u64,
    pub text: String,
    pub region: Region,
    pub course: Course,
    pub gender: Gender,
    pub age: u8,
    pub period: Period,
    pub semester: u8,
    pub status: Status,
    pub sentiment: Sentiment,
    #[serde(rename = "date")]
    pub interview_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityLabel {
    #[serde(rename = "ORG")]
    Organization,
    #[serde(rename = "LOC")]
    Location,
    #[serde(rename = "PRODUCT")]
    Product,
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityLabel::Organization => "ORG",
            EntityLabel::Location => "LOC",
            EntityLabel::Product => "PRODUCT",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

/// An interview joined with every extractor output. Built in one shot per
/// record; the fallback constructor fills every derived field so no partial
/// rows ever reach the aggregation layer.
#[derive(Debug, Clone)]
pub struct EnrichedRecord {
    pub record: InterviewRecord,
    pub themes: Vec<String>,
    pub sentiment: Sentiment,
    pub entities: Vec<Entity>,
    pub polarity: f64,
    pub subjectivity: f64,
    pub key_sentences: Vec<String>,
    pub cleaned_tokens: String,
}

impl EnrichedRecord {
    /// The fixed default enrichment, used whenever a record cannot be
    /// processed. Identical shape regardless of which stage gave up.
    pub fn defaulted(record: InterviewRecord) -> Self {
        EnrichedRecord {
            record,
            themes: Vec::new(),
            sentiment: Sentiment::Neutral,
            entities: Vec::new(),
            polarity: 0.0,
            subjectivity: 0.0,
            key_sentences: Vec::new(),
            cleaned_tokens: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_record(id: u64, text: &str) -> InterviewRecord {
        InterviewRecord {
            id,
            text: text.to_string(),
            region: Region::Apucarana,
            course: Course::ComputerScience,
            gender: Gender::Feminine,
            age: 21,
            period: Period::Evening,
            semester: 4,
            status: Status::Enrolled,
            sentiment: Sentiment::Positive,
            interview_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        }
    }

    #[test]
    fn every_region_offers_two_courses() {
        for region in Region::ALL {
            assert_eq!(region.courses().len(), 2, "{region}");
            let rate = region.attrition_rate();
            assert!(rate > 0.0 && rate < 1.0);
        }
    }

    #[test]
    fn csv_columns_follow_the_export_contract() {
        let record = sample_record(1, "Continuei no curso porque gosto pela área.");

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&record).unwrap();
        let bytes = writer.into_inner().unwrap();
        let output = String::from_utf8(bytes).unwrap();
        let header = output.lines().next().unwrap();
        assert_eq!(
            header,
            "id,text,region,course,gender,age,period,semester,status,sentiment,date"
        );
        let row = output.lines().nth(1).unwrap();
        assert!(row.contains("Apucarana"));
        assert!(row.contains("Ciência da Computação"));
        assert!(row.contains("Cursando"));
        assert!(row.contains("2025-03-14"));
    }

    #[test]
    fn defaulted_enrichment_is_fully_filled() {
        let enriched = EnrichedRecord::defaulted(sample_record(9, ""));
        assert!(enriched.themes.is_empty());
        assert_eq!(enriched.sentiment, Sentiment::Neutral);
        assert!(enriched.entities.is_empty());
        assert_eq!(enriched.polarity, 0.0);
        assert_eq!(enriched.subjectivity, 0.0);
        assert!(enriched.key_sentences.is_empty());
        assert!(enriched.cleaned_tokens.is_empty());
    }
}
