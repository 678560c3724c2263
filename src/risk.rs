use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskClass {
    High,
    Moderate,
    Low,
}

impl fmt::Display for RiskClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            RiskClass::High => "high",
            RiskClass::Moderate => "moderate",
            RiskClass::Low => "low",
        })
    }
}

/// Normalized duplex energy: 0 at -25 kcal/mol or below, 1 at -10 or above.
pub fn dg_norm(delta_g: f64) -> f64 {
    ((delta_g + 25.0) / 15.0).max(0.0).min(1.0)
}

/// Composite risk in [0, 1]. More negative energy, AU-rich context, an
/// accessible site, and conservation all push the score up.
pub fn risk_score(delta_g: f64, au_percent: f64, accessibility: f64, conservation: f64) -> f64 {
    let au_score = if au_percent > 60.0 { 1.0 } else { 0.0 };

    (1.0 - dg_norm(delta_g)) * 0.5 + au_score * 0.2 + accessibility * 0.2 + conservation * 0.1
}

pub fn classify(risk: f64) -> RiskClass {
    if risk > 0.7 {
        RiskClass::High
    } else if risk >= 0.5 {
        RiskClass::Moderate
    } else {
        RiskClass::Low
    }
}

/// Deterministic ranking: risk descending, then delta G ascending (more
/// negative first), then transcript id ascending.
pub fn compare_ranked(a: (f64, f64, &str), b: (f64, f64, &str)) -> Ordering {
    b.0.partial_cmp(&a.0)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
        .then_with(|| a.2.cmp(b.2))
}
