//! Puzzle records and the puzzle source seam.
//!
//! The round engine never owns puzzle data; it asks a [`PuzzleSource`] for pools by
//! category or for the daily puzzle. [`catalog::PuzzleCatalog`] is the in-process
//! implementation backed by the built-in set or a JSON catalog file.

pub mod catalog;

pub use catalog::{CategoryInfo, PuzzleCatalog};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of images shown for every puzzle.
pub const IMAGES_PER_PUZZLE: usize = 4;
pub const MIN_WORD_LEN: usize = 3;
pub const MAX_WORD_LEN: usize = 12;

/// A single "four pictures, one word" puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: String,
    /// Canonical uppercase answer.
    pub word: String,
    pub images: [String; IMAGES_PER_PUZZLE],
    pub difficulty: u32,
}

impl Puzzle {
    /// Image reference for slot `index`, or a numbered placeholder when the slot is blank.
    pub fn image_or_placeholder(&self, index: usize) -> String {
        match self.images.get(index) {
            Some(image) if !image.trim().is_empty() => image.clone(),
            _ => placeholder_image(index),
        }
    }

    pub fn word_len(&self) -> usize {
        self.word.chars().count()
    }

    /// Check the word/image/difficulty rules, returning a reason on failure.
    pub fn check(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("empty id".to_string());
        }
        let len = self.word_len();
        if !(MIN_WORD_LEN..=MAX_WORD_LEN).contains(&len) {
            return Err(format!(
                "word length {} outside {}..={}",
                len, MIN_WORD_LEN, MAX_WORD_LEN
            ));
        }
        if !self.word.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(format!("word '{}' must be uppercase A-Z", self.word));
        }
        if self.difficulty == 0 {
            return Err("difficulty must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Placeholder reference used when a puzzle image is missing.
pub fn placeholder_image(index: usize) -> String {
    format!("placeholder://image-{}", index + 1)
}

/// Supplier of puzzle pools. Implementations must keep `categories()` in a stable order.
pub trait PuzzleSource {
    /// Category ids in their fixed order.
    fn categories(&self) -> Vec<String>;

    /// The pool for one category; empty for unknown or empty categories.
    fn puzzles_by_category(&self, name: &str) -> &[Puzzle];

    fn has_category(&self, name: &str) -> bool {
        self.categories().iter().any(|c| c == name)
    }

    /// Number of puzzles across all categories.
    fn total_puzzles(&self) -> usize {
        self.categories()
            .iter()
            .map(|c| self.puzzles_by_category(c).len())
            .sum()
    }

    /// The puzzle of the day with the category that holds it.
    ///
    /// Pure over `date`: every client with the same catalog picks the same puzzle.
    fn daily_puzzle(&self, date: NaiveDate) -> Option<(String, Puzzle)> {
        let total = self.total_puzzles();
        if total == 0 {
            return None;
        }
        let mut index = (daily_seed(date) % total as u64) as usize;
        for category in self.categories() {
            let pool = self.puzzles_by_category(&category);
            if index < pool.len() {
                return Some((category, pool[index].clone()));
            }
            index -= pool.len();
        }
        None
    }
}

/// Date seed for daily selection: `year * 10000 + month * 100 + day`.
pub fn daily_seed(date: NaiveDate) -> u64 {
    let year = date.year().max(0) as u64;
    year * 10_000 + date.month() as u64 * 100 + date.day() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puzzle(word: &str) -> Puzzle {
        Puzzle {
            id: "t_001".to_string(),
            word: word.to_string(),
            images: [
                "a.jpg".to_string(),
                "".to_string(),
                "c.jpg".to_string(),
                "d.jpg".to_string(),
            ],
            difficulty: 1,
        }
    }

    #[test]
    fn daily_seed_concatenates_date_parts() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(daily_seed(date), 20261016);
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(daily_seed(date), 20250102);
    }

    #[test]
    fn check_rejects_bad_words() {
        assert!(puzzle("GOAL").check().is_ok());
        assert!(puzzle("GO").check().is_err());
        assert!(puzzle("goal").check().is_err());
        assert!(puzzle("GO4L").check().is_err());
        assert!(puzzle("ABCDEFGHIJKLM").check().is_err());
    }

    #[test]
    fn blank_image_falls_back_to_placeholder() {
        let p = puzzle("GOAL");
        assert_eq!(p.image_or_placeholder(0), "a.jpg");
        assert_eq!(p.image_or_placeholder(1), "placeholder://image-2");
        assert_eq!(p.image_or_placeholder(7), "placeholder://image-8");
    }
}
