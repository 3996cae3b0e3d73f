//! Visual mapping from entity state to what the renderer draws.
//!
//! Pure functions; the renderer owns geometry, these only decide color,
//! stroke and the text shown next to an edge or slider.

use crate::types::Polarity;
use serde::{Deserialize, Serialize};

/// Colors and stroke settings for relation edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub support: String,
    pub attack: String,
    pub neutral: String,
    pub stroke_width: f64,
    /// Dash pattern used for neutral edges.
    pub neutral_dash: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            support: "#22c55e".into(),
            attack: "#ef4444".into(),
            neutral: "#6b7280".into(),
            stroke_width: 2.0,
            neutral_dash: "5,5".into(),
        }
    }
}

impl Palette {
    pub fn color(&self, polarity: Polarity) -> &str {
        match polarity {
            Polarity::Support => &self.support,
            Polarity::Attack => &self.attack,
            Polarity::Neutral => &self.neutral,
        }
    }

    /// Stroke, dash and label for an edge of the given weight.
    pub fn edge_style(&self, weight: f64) -> EdgeStyle {
        let polarity = Polarity::of(weight);
        EdgeStyle {
            polarity,
            color: self.color(polarity).to_string(),
            stroke_width: self.stroke_width,
            dash: match polarity {
                Polarity::Neutral => Some(self.neutral_dash.clone()),
                _ => None,
            },
            label: weight_label(weight),
        }
    }
}

/// Derived edge appearance. The label is drawn in the same color as the stroke.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeStyle {
    pub polarity: Polarity,
    pub color: String,
    pub stroke_width: f64,
    /// `None` draws a solid stroke.
    pub dash: Option<String>,
    pub label: String,
}

impl EdgeStyle {
    pub fn is_dashed(&self) -> bool {
        self.dash.is_some()
    }
}

/// Signed weight with an explicit `+` for support: `+0.8`, `-0.5`, `0`.
pub fn weight_label(weight: f64) -> String {
    if weight > 0.0 {
        format!("+{}", weight)
    } else if weight == 0.0 {
        // -0.0 prints as "0" too
        "0".to_string()
    } else {
        format!("{}", weight)
    }
}

/// Belief as a whole percent for the slider readout, e.g. `0.9` -> `90`.
pub fn belief_percent(belief: f64) -> i64 {
    (belief * 100.0).round() as i64
}

/// `90%`
pub fn percent_label(percent: i64) -> String {
    format!("{}%", percent)
}

/// `+80%`, `-50%`, `0%`
pub fn signed_percent_label(percent: i64) -> String {
    if percent > 0 {
        format!("+{}%", percent)
    } else {
        format!("{}%", percent)
    }
}
