//! Human-readable summary of a deduplication run.

use quiz_types::{DeduplicationResult, DeduplicationStatistics};
use serde::Serialize;

const HIGH_REDUCTION: f64 = 0.5;
const LOW_REDUCTION: f64 = 0.1;
const HIGH_DUPLICATE_RATIO: f64 = 0.3;
const MODERATE_DUPLICATE_RATIO: f64 = 0.1;

/// Headline counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub original_question_count: usize,
    pub unique_question_count: usize,
    pub duplicates_removed: usize,
    pub deduplication_rate: f64,
    pub unique_question_percentage: f64,
}

/// Effect of deduplication on the question pool.
///
/// Runs with no input questions carry only a message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ImpactAnalysis {
    Measured(Impact),
    NoData { message: String },
}

impl ImpactAnalysis {
    /// The measured impact, if there was anything to measure.
    pub fn measured(&self) -> Option<&Impact> {
        match self {
            ImpactAnalysis::Measured(impact) => Some(impact),
            ImpactAnalysis::NoData { .. } => None,
        }
    }
}

/// Reduction and coverage figures, both as percentages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Impact {
    pub reduction_percentage: f64,
    pub topic_coverage_preserved: f64,
    pub quality_impact: String,
    pub efficiency_gain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Full deduplication report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeduplicationReport {
    pub summary: ReportSummary,
    pub statistics: DeduplicationStatistics,
    pub duplicate_group_count: usize,
    pub impact_analysis: ImpactAnalysis,
    pub recommendations: Vec<String>,
}

impl DeduplicationReport {
    pub fn from_result(result: &DeduplicationResult) -> Self {
        let stats = &result.statistics;

        let unique_question_percentage = if stats.total_original > 0 {
            stats.total_unique as f64 / stats.total_original as f64 * 100.0
        } else {
            0.0
        };

        Self {
            summary: ReportSummary {
                original_question_count: stats.total_original,
                unique_question_count: stats.total_unique,
                duplicates_removed: stats.total_duplicates_removed,
                deduplication_rate: stats.deduplication_rate,
                unique_question_percentage,
            },
            statistics: stats.clone(),
            duplicate_group_count: result.duplicate_groups.len(),
            impact_analysis: impact_analysis(stats),
            recommendations: recommendations(stats),
        }
    }
}

fn impact_analysis(stats: &DeduplicationStatistics) -> ImpactAnalysis {
    if stats.total_original == 0 {
        return ImpactAnalysis::NoData {
            message: "No questions to analyze".to_string(),
        };
    }

    let reduction = stats.deduplication_rate;

    let quality_impact = if reduction > LOW_REDUCTION {
        "Positive - removed redundant questions"
    } else {
        "Minimal - few duplicates found"
    };

    let warning = (reduction > HIGH_REDUCTION)
        .then(|| "High reduction rate - may have removed too many questions".to_string());
    let note = (reduction < LOW_REDUCTION)
        .then(|| "Low reduction rate - good question diversity".to_string());

    ImpactAnalysis::Measured(Impact {
        reduction_percentage: reduction * 100.0,
        topic_coverage_preserved: stats.topic_preservation_rate * 100.0,
        quality_impact: quality_impact.to_string(),
        efficiency_gain: format!("{:.1}% reduction in question count", reduction * 100.0),
        warning,
        note,
    })
}

fn recommendations(stats: &DeduplicationStatistics) -> Vec<String> {
    let mut recommendations = Vec::new();

    let ratio = if stats.total_original > 0 {
        stats.total_duplicates_removed as f64 / stats.total_original as f64
    } else {
        0.0
    };

    if ratio > HIGH_DUPLICATE_RATIO {
        recommendations.push("Review question generation process to reduce duplicates".to_string());
        recommendations.push("Consider increasing diversity in question generation".to_string());
    } else if ratio > MODERATE_DUPLICATE_RATIO {
        recommendations.push("Moderate duplicate rate - current process is acceptable".to_string());
    } else {
        recommendations.push("Low duplicate rate - good question diversity".to_string());
    }

    if stats.total_duplicates_removed > 0 {
        recommendations.push(format!(
            "Removed {} duplicate questions to improve quality",
            stats.total_duplicates_removed
        ));
    }

    recommendations
}
