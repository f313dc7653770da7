use serde::{Deserialize, Serialize};

/// Textual band for a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Excellent,
    Good,
    Average,
    Poor,
}

impl Classification {
    pub fn from_score(score: f64) -> Self {
        if score >= 4.0 {
            Self::Excellent
        } else if score >= 3.0 {
            Self::Good
        } else if score >= 2.0 {
            Self::Average
        } else {
            Self::Poor
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Average => "average",
            Self::Poor => "poor",
        }
    }
}

const FILLED_STAR: char = '★';
const EMPTY_STAR: char = '☆';

/// Five-glyph star string; the filled count is the score rounded half up, at least one.
pub fn star_string(score: f64) -> String {
    let filled = if score.is_finite() {
        (score + 0.5).floor().clamp(1.0, 5.0) as usize
    } else {
        1
    };

    std::iter::repeat(FILLED_STAR)
        .take(filled)
        .chain(std::iter::repeat(EMPTY_STAR).take(5 - filled))
        .collect()
}
