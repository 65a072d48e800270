//! Grade tokens and their grade-point values on the 4.0 scale

use std::fmt;

/// Letter grades recognized on the transcript, best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LetterGrade {
    /// A+
    APlus,
    /// A
    A,
    /// A-
    AMinus,
    /// B+
    BPlus,
    /// B
    B,
    /// B-
    BMinus,
    /// C+
    CPlus,
    /// C
    C,
    /// C-
    CMinus,
    /// D+
    DPlus,
    /// D
    D,
    /// D-
    DMinus,
    /// F
    F,
}

impl LetterGrade {
    /// Grade-point value of the letter
    #[must_use]
    pub const fn point(self) -> f64 {
        match self {
            Self::APlus | Self::A => 4.0,
            Self::AMinus => 3.7,
            Self::BPlus => 3.3,
            Self::B => 3.0,
            Self::BMinus => 2.7,
            Self::CPlus => 2.3,
            Self::C => 2.0,
            Self::CMinus => 1.7,
            Self::DPlus => 1.3,
            Self::D => 1.0,
            Self::DMinus => 0.7,
            Self::F => 0.0,
        }
    }

    /// Token as printed on the transcript
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::AMinus => "A-",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::CMinus => "C-",
            Self::DPlus => "D+",
            Self::D => "D",
            Self::DMinus => "D-",
            Self::F => "F",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        let letter = match token {
            "A+" => Self::APlus,
            "A" => Self::A,
            "A-" => Self::AMinus,
            "B+" => Self::BPlus,
            "B" => Self::B,
            "B-" => Self::BMinus,
            "C+" => Self::CPlus,
            "C" => Self::C,
            "C-" => Self::CMinus,
            "D+" => Self::DPlus,
            "D" => Self::D,
            "D-" => Self::DMinus,
            "F" => Self::F,
            _ => return None,
        };
        Some(letter)
    }
}

/// A classified grade token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grade {
    /// Letter grade (A+ through F)
    Letter(LetterGrade),
    /// Integer percentage grade
    Percentage(u32),
    /// Withdrawn (WD)
    Withdrawn,
    /// Withdrawn failing (WF)
    WithdrawnFailing,
    /// Credit granted without a grade (CR)
    Credit,
    /// In progress (IP)
    InProgress,
    /// Anything not recognized
    Unknown,
}

impl Grade {
    /// Classify a raw grade token. Input is trimmed and upper-cased first.
    ///
    /// All-digit tokens are percentages; digit runs too large for `u32`
    /// saturate, which keeps them above every breakpoint.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let cleaned = raw.trim().to_uppercase();

        if !cleaned.is_empty() && cleaned.bytes().all(|b| b.is_ascii_digit()) {
            return Self::Percentage(cleaned.parse().unwrap_or(u32::MAX));
        }

        match cleaned.as_str() {
            "WD" => Self::Withdrawn,
            "WF" => Self::WithdrawnFailing,
            "CR" => Self::Credit,
            "IP" => Self::InProgress,
            other => LetterGrade::from_token(other).map_or(Self::Unknown, Self::Letter),
        }
    }

    /// Grade-point value in `[0.0, 4.0]`
    #[must_use]
    pub const fn point(self) -> f64 {
        match self {
            Self::Letter(letter) => letter.point(),
            Self::Percentage(pct) => percentage_point(pct),
            Self::Withdrawn
            | Self::WithdrawnFailing
            | Self::Credit
            | Self::InProgress
            | Self::Unknown => 0.0,
        }
    }

    /// Whether the grade carries GPA information (`CR` and `IP` do not)
    #[must_use]
    pub const fn is_graded(self) -> bool {
        !matches!(self, Self::Credit | Self::InProgress)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Letter(letter) => f.write_str(letter.as_str()),
            Self::Percentage(pct) => write!(f, "{pct}"),
            Self::Withdrawn => f.write_str("WD"),
            Self::WithdrawnFailing => f.write_str("WF"),
            Self::Credit => f.write_str("CR"),
            Self::InProgress => f.write_str("IP"),
            Self::Unknown => f.write_str("?"),
        }
    }
}

/// Percentage breakpoints, first match wins
const fn percentage_point(pct: u32) -> f64 {
    match pct {
        90.. => 4.0,
        85..=89 => 3.9,
        80..=84 => 3.7,
        77..=79 => 3.3,
        73..=76 => 3.0,
        70..=72 => 2.7,
        67..=69 => 2.3,
        63..=66 => 2.0,
        60..=62 => 1.7,
        50..=59 => 1.0,
        _ => 0.0,
    }
}

/// Convert a letter grade or percentage string to a grade point.
///
/// Never fails: unknown tokens map to `0.0`.
#[must_use]
pub fn grade_to_point(grade: &str) -> f64 {
    Grade::parse(grade).point()
}
