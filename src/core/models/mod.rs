//! Data models for `GradeLens`

pub mod course;
pub mod grade;
pub mod term;

pub use course::{is_countable, normalize_code, Course};
pub use grade::{grade_to_point, Grade, LetterGrade};
pub use term::{compare_term_labels, Season, Term};
