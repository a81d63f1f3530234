//! Posterior summary of the retained draws.

use serde::Serialize;

use crate::abc::SimulationResult;
use crate::attrition::AttritionLaw;

/// Share of the accepted draws that used one attrition law.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LawShare {
    pub law: AttritionLaw,
    pub index: u8,
    pub accepted: usize,
    pub frequency: f64,
}

/// Aggregate view of the ranked table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PosteriorSummary {
    pub num_runs: usize,
    pub tolerance: f64,
    pub accepted: usize,
    pub laws: Vec<LawShare>,
    pub mean_mu_pow_ratio: f64,
    pub mean_sd_pow_ratio: f64,
    pub best_distance: Option<f64>,
    pub worst_distance: Option<f64>,
}

impl PosteriorSummary {
    /// Summarise a ranked table (best first).
    pub fn from_ranked(results: &[SimulationResult], num_runs: usize, tolerance: f64) -> Self {
        let accepted = results.len();
        let denominator = accepted.max(1) as f64;

        let laws = AttritionLaw::ALL
            .iter()
            .map(|&law| {
                let count = results.iter().filter(|r| r.parameters.law == law).count();
                LawShare {
                    law,
                    index: law.index(),
                    accepted: count,
                    frequency: count as f64 / denominator,
                }
            })
            .collect();

        let mean_mu_pow_ratio =
            results.iter().map(|r| r.parameters.mu_pow_ratio).sum::<f64>() / denominator;
        let mean_sd_pow_ratio =
            results.iter().map(|r| r.parameters.sd_pow_ratio).sum::<f64>() / denominator;

        Self {
            num_runs,
            tolerance,
            accepted,
            laws,
            mean_mu_pow_ratio,
            mean_sd_pow_ratio,
            best_distance: results.first().map(|r| r.distance),
            worst_distance: results.last().map(|r| r.distance),
        }
    }

    /// Law with the most accepted draws, first law wins ties.
    pub fn map_law(&self) -> Option<AttritionLaw> {
        self.laws
            .iter()
            .filter(|share| share.accepted > 0)
            .fold(None::<&LawShare>, |best, share| match best {
                Some(b) if b.accepted >= share.accepted => Some(b),
                _ => Some(share),
            })
            .map(|share| share.law)
    }

    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    POSTERIOR SUMMARY\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Accepted: {} of {} runs (tolerance {})\n\n",
            self.accepted, self.num_runs, self.tolerance
        ));

        report.push_str("Attrition law       Accepted   Share\n");
        report.push_str("─────────────────────────────────────\n");
        for share in &self.laws {
            report.push_str(&format!(
                "{} {:<16} {:>8}   {:>5.1}%\n",
                share.index,
                share.law.name(),
                share.accepted,
                share.frequency * 100.0
            ));
        }
        report.push('\n');

        report.push_str(&format!(
            "Mean power ratio mu: {:.2}  sd: {:.2}\n",
            self.mean_mu_pow_ratio, self.mean_sd_pow_ratio
        ));
        if let (Some(best), Some(worst)) = (self.best_distance, self.worst_distance) {
            report.push_str(&format!("Distance range: {:.2} .. {:.2}\n", best, worst));
        }
        if let Some(law) = self.map_law() {
            report.push_str(&format!("Most supported law: {}\n", law));
        }

        report
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
