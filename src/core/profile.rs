//! Movement profile derived from session statistics.
//!
//! Classification is a fixed threshold lookup and always yields exactly one
//! label per category.

use crate::core::aggregate::SessionStats;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Labels
// ============================================================================

/// Overall movement style, from mean speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Style {
    #[serde(rename = "fast/direct")]
    FastDirect,
    #[serde(rename = "balanced")]
    Balanced,
    #[serde(rename = "deliberate")]
    Deliberate,
}

/// Movement steadiness, from speed standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precision {
    #[serde(rename = "high/steady")]
    HighSteady,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "variable")]
    Variable,
}

/// Click frequency relative to all events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decisiveness {
    Quick,
    Thoughtful,
    Observer,
}

/// Frequency of acceleration bursts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Energy {
    High,
    Moderate,
    Calm,
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Style::FastDirect => "fast/direct",
            Style::Balanced => "balanced",
            Style::Deliberate => "deliberate",
        })
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Precision::HighSteady => "high/steady",
            Precision::Medium => "medium",
            Precision::Variable => "variable",
        })
    }
}

impl fmt::Display for Decisiveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Decisiveness::Quick => "quick",
            Decisiveness::Thoughtful => "thoughtful",
            Decisiveness::Observer => "observer",
        })
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Energy::High => "high",
            Energy::Moderate => "moderate",
            Energy::Calm => "calm",
        })
    }
}

// ============================================================================
// Classification
// ============================================================================

/// One label per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    pub style: Style,
    pub precision: Precision,
    pub decisiveness: Decisiveness,
    pub energy: Energy,
}

impl fmt::Display for PersonalityProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Style:        {}", self.style)?;
        writeln!(f, "Precision:    {}", self.precision)?;
        writeln!(f, "Decisiveness: {}", self.decisiveness)?;
        write!(f, "Energy:       {}", self.energy)
    }
}

/// Classify a session's statistics.
pub fn classify(stats: &SessionStats) -> PersonalityProfile {
    let style = if stats.avg_speed > 800.0 {
        Style::FastDirect
    } else if stats.avg_speed > 400.0 {
        Style::Balanced
    } else {
        Style::Deliberate
    };

    let precision = if stats.speed_std < 200.0 {
        Precision::HighSteady
    } else if stats.speed_std < 500.0 {
        Precision::Medium
    } else {
        Precision::Variable
    };

    let click_ratio = if stats.total_events == 0 {
        0.0
    } else {
        stats.total_clicks as f64 / stats.total_events as f64
    };
    let decisiveness = if click_ratio > 0.1 {
        Decisiveness::Quick
    } else if click_ratio > 0.05 {
        Decisiveness::Thoughtful
    } else {
        Decisiveness::Observer
    };

    let energy = if stats.acceleration_bursts > 10 {
        Energy::High
    } else if stats.acceleration_bursts > 5 {
        Energy::Moderate
    } else {
        Energy::Calm
    };

    PersonalityProfile {
        style,
        precision,
        decisiveness,
        energy,
    }
}
