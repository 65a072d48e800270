//! Academic terms and their chronological ordering

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Offering season. Declaration order is the order within an academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    /// September through December; opens the academic year
    Fall,
    /// January through April
    Winter,
    /// May through August
    Spring,
}

impl Season {
    /// Season name as printed on transcripts
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fall => "Fall",
            Self::Winter => "Winter",
            Self::Spring => "Spring",
        }
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fall" => Ok(Self::Fall),
            "Winter" => Ok(Self::Winter),
            "Spring" => Ok(Self::Spring),
            _ => Err(format!("Unknown season: '{s}'")),
        }
    }
}

/// A term such as "Fall 2022"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Term {
    /// Season of the term
    pub season: Season,
    /// Calendar year the term runs in
    pub year: u16,
}

impl Term {
    /// Create a new term
    #[must_use]
    pub const fn new(season: Season, year: u16) -> Self {
        Self { season, year }
    }

    /// Calendar year in which this term's academic year started.
    ///
    /// Fall 2022, Winter 2023 and Spring 2023 all belong to academic year 2022.
    #[must_use]
    pub const fn academic_year(self) -> u16 {
        match self.season {
            Season::Fall => self.year,
            Season::Winter | Season::Spring => self.year.saturating_sub(1),
        }
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        self.academic_year()
            .cmp(&other.academic_year())
            .then(self.season.cmp(&other.season))
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.season.as_str(), self.year)
    }
}

impl FromStr for Term {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(season), Some(year), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format!("Expected '<Season> <Year>', got '{s}'"));
        };
        let season = season.parse()?;
        let year = year
            .parse()
            .map_err(|_| format!("Invalid year in term '{s}'"))?;
        Ok(Self { season, year })
    }
}

/// Compare two term labels chronologically.
///
/// Labels that do not parse as a term sort before all real terms, and
/// among themselves by plain string order.
#[must_use]
pub fn compare_term_labels(a: &str, b: &str) -> Ordering {
    match (a.parse::<Term>(), b.parse::<Term>()) {
        (Ok(ta), Ok(tb)) => ta.cmp(&tb),
        (Ok(_), Err(_)) => Ordering::Greater,
        (Err(_), Ok(_)) => Ordering::Less,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let term: Term = "Winter 2023".parse().unwrap();
        assert_eq!(term, Term::new(Season::Winter, 2023));
        assert_eq!(term.to_string(), "Winter 2023");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("Summer 2023".parse::<Term>().is_err());
        assert!("Fall".parse::<Term>().is_err());
        assert!("Fall 2023 extra".parse::<Term>().is_err());
        assert!("Fall twenty".parse::<Term>().is_err());
    }

    #[test]
    fn test_academic_year_ordering() {
        let mut terms: Vec<Term> = ["Fall 2023", "Spring 2023", "Fall 2022", "Winter 2023"]
            .iter()
            .map(|t| t.parse().unwrap())
            .collect();
        terms.sort();
        let labels: Vec<String> = terms.iter().map(ToString::to_string).collect();
        assert_eq!(
            labels,
            vec!["Fall 2022", "Winter 2023", "Spring 2023", "Fall 2023"]
        );
    }

    #[test]
    fn test_unparseable_labels_sort_first() {
        assert_eq!(compare_term_labels("", "Fall 2022"), Ordering::Less);
        assert_eq!(compare_term_labels("Fall 2022", "???"), Ordering::Greater);
        assert_eq!(compare_term_labels("a", "b"), Ordering::Less);
    }
}
