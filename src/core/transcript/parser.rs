//! Line-oriented transcript scanner
//!
//! The scanner walks non-blank lines top to bottom. Header lines update a
//! [`ScanState`]; course lines are only matched while the state says a course
//! table is open outside a co-op work term.

use super::TranscriptError;
use crate::core::models::{course::normalize_code, is_countable, Course};
use crate::{debug, info};
use regex::Regex;
use std::sync::LazyLock;

/// Phrase printed after the last term of the transcript
pub const END_MARKER: &str = "End of Undergraduate Unofficial Transcript";

/// Opens a co-op work term block
pub const WORK_TERM_MARKER: &str = "Form Of Study: Co-op Work Term";

/// Opens an academic enrolment block
pub const ENROLMENT_MARKER: &str = "Form Of Study: Enrolment";

static TERM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(Fall|Winter|Spring)\s+((?:19|20)[0-9]{2})").expect("term pattern is valid")
});

static PROGRAM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Program:\s*(.+)").expect("program pattern is valid"));

static LEVEL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Level:\s*([0-9][AB])").expect("level pattern is valid"));

// dept, number, description, attempted, earned, grade
static COURSE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([A-Z]{2,6})\s+([0-9]{1,3}[A-Z]?W?)\s+(.+?)\s+(0\.[0-9]{2})\s+(0\.[0-9]{2})\s+(A\+|A-|A|B\+|B-|B|C\+|C-|C|D\+|D-|D|F|CR|IP|WD|WF|[0-9]{2,3})\s*$",
    )
    .expect("course pattern is valid")
});

/// What a single transcript line means to the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Terminal phrase; nothing after it is read
    EndMarker,
    /// "Fall 2022" and similar
    TermHeader(String),
    /// "Program: ..." with the trimmed program text, if any
    ProgramHeader(Option<String>),
    /// "Level: 2A" with the standing code, if one could be read
    LevelHeader(Option<String>),
    /// Start of a co-op work term block
    WorkTermStart,
    /// Start of an academic enrolment block
    EnrolmentStart,
    /// Column header of a course table
    CourseTableHeader,
    /// Anything else; may still be a course row
    Other,
}

type Classifier = fn(&str) -> Option<LineKind>;

/// Header classifiers in priority order; the first hit wins
const CLASSIFIERS: [Classifier; 7] = [
    classify_end_marker,
    classify_term,
    classify_program,
    classify_level,
    classify_work_term,
    classify_enrolment,
    classify_course_table,
];

fn classify_end_marker(line: &str) -> Option<LineKind> {
    line.contains(END_MARKER).then_some(LineKind::EndMarker)
}

fn classify_term(line: &str) -> Option<LineKind> {
    TERM_PATTERN
        .captures(line)
        .map(|caps| LineKind::TermHeader(format!("{} {}", &caps[1], &caps[2])))
}

fn classify_program(line: &str) -> Option<LineKind> {
    if !line.contains("Program:") {
        return None;
    }
    let program = PROGRAM_PATTERN
        .captures(line)
        .map(|caps| caps[1].trim().to_string())
        .filter(|p| !p.is_empty());
    Some(LineKind::ProgramHeader(program))
}

fn classify_level(line: &str) -> Option<LineKind> {
    if !line.contains("Level:") {
        return None;
    }
    let level = LEVEL_PATTERN.captures(line).map(|caps| caps[1].to_string());
    Some(LineKind::LevelHeader(level))
}

fn classify_work_term(line: &str) -> Option<LineKind> {
    line.contains(WORK_TERM_MARKER).then_some(LineKind::WorkTermStart)
}

fn classify_enrolment(line: &str) -> Option<LineKind> {
    line.contains(ENROLMENT_MARKER).then_some(LineKind::EnrolmentStart)
}

fn classify_course_table(line: &str) -> Option<LineKind> {
    (line.contains("Course") && line.contains("Description") && line.contains("Grade"))
        .then_some(LineKind::CourseTableHeader)
}

/// Classify a trimmed, non-blank line
#[must_use]
pub fn classify(line: &str) -> LineKind {
    CLASSIFIERS
        .iter()
        .find_map(|classifier| classifier(line))
        .unwrap_or(LineKind::Other)
}

/// Fields of a course row, borrowed from the line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseLine<'a> {
    /// Department code (e.g., "CS")
    pub department: &'a str,
    /// Course number (e.g., "246", "192W")
    pub number: &'a str,
    /// Free-text course title
    pub description: &'a str,
    /// Attempted credits column
    pub attempted: &'a str,
    /// Earned credits column
    pub earned: &'a str,
    /// Grade token
    pub grade: &'a str,
}

impl CourseLine<'_> {
    /// "DEPT NUMBER"
    #[must_use]
    pub fn code(&self) -> String {
        normalize_code(&format!("{} {}", self.department, self.number))
    }
}

/// Match a course table row
#[must_use]
pub fn match_course_line(line: &str) -> Option<CourseLine<'_>> {
    let caps = COURSE_PATTERN.captures(line)?;
    let field = |i: usize| caps.get(i).map_or("", |m| m.as_str());
    Some(CourseLine {
        department: field(1),
        number: field(2),
        description: field(3),
        attempted: field(4),
        earned: field(5),
        grade: field(6),
    })
}

/// Context carried from line to line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanState {
    /// Most recent term header
    pub term: String,
    /// Most recent class standing
    pub level: Option<String>,
    /// Most recent program declaration
    pub program: Option<String>,
    /// Inside a co-op work term block
    pub in_work_term: bool,
    /// Inside a course table
    pub in_course_section: bool,
}

/// Result of feeding one line to the scanner
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Keep scanning
    Continue,
    /// A countable course was read
    Emit(Course),
    /// End marker reached
    Stop,
}

impl ScanState {
    /// Whether course rows are read in the current context
    #[must_use]
    pub const fn accepts_courses(&self) -> bool {
        self.in_course_section && !self.in_work_term
    }

    /// Feed one trimmed, non-blank line
    pub fn advance(&mut self, line: &str) -> Step {
        match classify(line) {
            LineKind::EndMarker => return Step::Stop,
            LineKind::TermHeader(term) => {
                debug!("Term header: {term}");
                self.term = term;
                self.in_course_section = false;
            }
            LineKind::ProgramHeader(program) => {
                if program.is_some() {
                    self.program = program;
                }
            }
            LineKind::LevelHeader(level) => {
                if level.is_some() {
                    self.level = level;
                }
            }
            LineKind::WorkTermStart => {
                debug!("Entering co-op work term ({})", self.term);
                self.in_work_term = true;
                self.in_course_section = false;
            }
            LineKind::EnrolmentStart => self.in_work_term = false,
            LineKind::CourseTableHeader => self.in_course_section = true,
            LineKind::Other if self.accepts_courses() => {
                if let Some(course) = match_course_line(line).and_then(|row| self.build(&row)) {
                    return Step::Emit(course);
                }
            }
            LineKind::Other => {}
        }
        Step::Continue
    }

    fn build(&self, row: &CourseLine<'_>) -> Option<Course> {
        let code = row.code();
        if !is_countable(&code, row.grade) {
            debug!("Skipping non-graded entry {code} ({})", row.grade);
            return None;
        }
        let credits = row.earned.parse::<f64>().unwrap_or(0.0);
        Some(
            Course::new(&code, row.description, row.grade, credits)
                .with_term(self.term.clone())
                .with_level(self.level.clone())
                .with_program(self.program.clone()),
        )
    }
}

/// Parse transcript text into course records in document order.
///
/// # Errors
/// Returns [`TranscriptError::NoCourses`] when no countable course is found.
pub fn parse_transcript_text(text: &str) -> Result<Vec<Course>, TranscriptError> {
    let mut state = ScanState::default();
    let mut courses = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match state.advance(line) {
            Step::Continue => {}
            Step::Emit(course) => courses.push(course),
            Step::Stop => {
                debug!("End marker reached");
                break;
            }
        }
    }

    if courses.is_empty() {
        return Err(TranscriptError::NoCourses);
    }

    info!("Parsed {} courses from transcript", courses.len());
    Ok(courses)
}
