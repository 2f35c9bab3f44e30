use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A document as uploaded by a client: display name plus raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// A contiguous span of a document's text under one inferred heading.
///
/// `refined_text` is never empty for an emitted section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub document: String,
    pub page: u32, // 1-based
    pub section_title: String,
    pub refined_text: String,
}

/// A section paired with its fused, persona-weighted relevance score.
///
/// The score is not a raw cosine similarity and may exceed 1.0 after boosting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSection {
    #[serde(flatten)]
    pub section: Section,
    pub similarity_score: f64,
}

impl ScoredSection {
    pub fn document(&self) -> &str {
        &self.section.document
    }
}

/// One entry of the final digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub document: String,
    pub section_title: String,
    pub importance_rank: u32,
    pub page_number: u32,
}

/// The refined excerpt that accompanies a [`RankedResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcerptResult {
    pub document: String,
    pub page_number: u32,
    pub refined_text: String,
}

/// Request metadata echoed back in every report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub input_documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    pub processing_timestamp: String, // ISO-8601, local time
}

/// The digest returned to callers.
///
/// Field order is part of the output contract: serde serializes struct fields
/// in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
    pub metadata: ReportMetadata,
    pub extracted_sections: Vec<RankedResult>,
    pub subsection_analysis: Vec<ExcerptResult>,
}

impl InsightReport {
    /// Render the report as JSON with 4-space indentation.
    pub fn to_pretty_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        String::from_utf8(buf)
            .map_err(|e| crate::error::DossierError::Serialization(e.to_string()))
    }
}

/// Current local time in ISO-8601 with microsecond precision and no offset.
pub fn processing_timestamp() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> InsightReport {
        InsightReport {
            metadata: ReportMetadata {
                input_documents: vec!["a.pdf".into(), "b.pdf".into()],
                persona: "Travel Planner".into(),
                job_to_be_done: "plan a trip".into(),
                processing_timestamp: "2026-10-18T09:00:00.000000".into(),
            },
            extracted_sections: vec![RankedResult {
                document: "a.pdf".into(),
                section_title: "Coastal Adventures".into(),
                importance_rank: 1,
                page_number: 2,
            }],
            subsection_analysis: vec![ExcerptResult {
                document: "a.pdf".into(),
                page_number: 2,
                refined_text: "Kayaking along the coast is a great group activity.".into(),
            }],
        }
    }

    #[test]
    fn test_pretty_json_member_order() {
        let json = sample_report().to_pretty_json().unwrap();
        let meta = json.find("\"metadata\"").unwrap();
        let sections = json.find("\"extracted_sections\"").unwrap();
        let analysis = json.find("\"subsection_analysis\"").unwrap();
        assert!(meta < sections && sections < analysis);

        let input = json.find("\"input_documents\"").unwrap();
        let ts = json.find("\"processing_timestamp\"").unwrap();
        assert!(input < ts);
    }

    #[test]
    fn test_pretty_json_uses_four_space_indent() {
        let json = sample_report().to_pretty_json().unwrap();
        assert!(json.starts_with("{\n    \"metadata\": {\n        \"input_documents\""));
    }

    #[test]
    fn test_scored_section_flattens() {
        let scored = ScoredSection {
            section: Section {
                document: "a.pdf".into(),
                page: 3,
                section_title: "Nightlife Guide".into(),
                refined_text: "text".into(),
            },
            similarity_score: 1.25,
        };
        let value = serde_json::to_value(&scored).unwrap();
        assert_eq!(value["document"], "a.pdf");
        assert_eq!(value["page"], 3);
        assert_eq!(scored.document(), "a.pdf");
    }

    #[test]
    fn test_processing_timestamp_shape() {
        let ts = processing_timestamp();
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, "%Y-%m-%dT%H:%M:%S%.6f").is_ok());
    }
}
