//! In-process puzzle catalog.
//!
//! The built-in set ships five playable categories with three puzzles each, plus three
//! categories whose pools are still empty. A JSON file with the same shape can replace
//! it (see [`PuzzleCatalog::load_json`]):
//!
//! ```json
//! [
//!   { "id": "sports", "name": "Sports", "description": "Sports and athleticism",
//!     "puzzles": [ { "id": "spt_001", "word": "goal", "images": ["1.jpg","2.jpg","3.jpg","4.jpg"], "difficulty": 1 } ] }
//! ]
//! ```

use super::{Puzzle, PuzzleSource, IMAGES_PER_PUZZLE};
use crate::errors::PuzzleError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;

/// Display metadata for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone)]
struct CategoryPool {
    info: CategoryInfo,
    puzzles: Vec<Puzzle>,
}

/// Ordered set of categories and their puzzle pools.
#[derive(Debug, Clone, Default)]
pub struct PuzzleCatalog {
    pools: Vec<CategoryPool>,
}

/// On-disk category schema.
#[derive(Debug, Deserialize)]
struct CategorySeed {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    puzzles: Vec<PuzzleSeed>,
}

#[derive(Debug, Deserialize)]
struct PuzzleSeed {
    id: String,
    word: String,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default = "default_difficulty")]
    difficulty: u32,
}

fn default_difficulty() -> u32 {
    1
}

impl PuzzleSeed {
    fn into_puzzle(self) -> Result<Puzzle, PuzzleError> {
        if self.images.len() != IMAGES_PER_PUZZLE {
            return Err(PuzzleError::InvalidPuzzle {
                id: self.id,
                reason: format!(
                    "expected {} images, found {}",
                    IMAGES_PER_PUZZLE,
                    self.images.len()
                ),
            });
        }
        let mut images = self.images.into_iter();
        let images = std::array::from_fn(|_| images.next().unwrap_or_default());
        let puzzle = Puzzle {
            id: self.id,
            word: self.word.trim().to_ascii_uppercase(),
            images,
            difficulty: self.difficulty,
        };
        puzzle
            .check()
            .map_err(|reason| PuzzleError::InvalidPuzzle {
                id: puzzle.id.clone(),
                reason,
            })?;
        Ok(puzzle)
    }
}

impl PuzzleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a category; ids must be unique across the catalog.
    pub fn add_category(
        &mut self,
        info: CategoryInfo,
        puzzles: Vec<Puzzle>,
    ) -> Result<(), PuzzleError> {
        if self.pools.iter().any(|p| p.info.id == info.id) {
            return Err(PuzzleError::DuplicateCategory(info.id));
        }
        let mut seen: HashSet<&str> = self
            .pools
            .iter()
            .flat_map(|p| p.puzzles.iter().map(|z| z.id.as_str()))
            .collect();
        for puzzle in &puzzles {
            puzzle.check().map_err(|reason| PuzzleError::InvalidPuzzle {
                id: puzzle.id.clone(),
                reason,
            })?;
            if !seen.insert(puzzle.id.as_str()) {
                return Err(PuzzleError::DuplicateId(puzzle.id.clone()));
            }
        }
        self.pools.push(CategoryPool { info, puzzles });
        Ok(())
    }

    /// Builder-style variant of [`add_category`](Self::add_category) for tests and fixtures.
    pub fn with_category(
        mut self,
        id: &str,
        name: &str,
        puzzles: Vec<Puzzle>,
    ) -> Result<Self, PuzzleError> {
        self.add_category(
            CategoryInfo {
                id: id.to_string(),
                name: name.to_string(),
                description: String::new(),
            },
            puzzles,
        )?;
        Ok(self)
    }

    pub fn category_infos(&self) -> impl Iterator<Item = &CategoryInfo> {
        self.pools.iter().map(|p| &p.info)
    }

    /// Categories that can actually be played (non-empty pools), in catalog order.
    pub fn playable_categories(&self) -> Vec<String> {
        self.pools
            .iter()
            .filter(|p| !p.puzzles.is_empty())
            .map(|p| p.info.id.clone())
            .collect()
    }

    /// Load a catalog from a JSON file, validating every puzzle.
    pub async fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, PuzzleError> {
        let contents = fs::read_to_string(path.as_ref()).await?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, PuzzleError> {
        let seeds: Vec<CategorySeed> = serde_json::from_str(contents)?;
        let mut catalog = Self::new();
        for seed in seeds {
            let puzzles = seed
                .puzzles
                .into_iter()
                .map(PuzzleSeed::into_puzzle)
                .collect::<Result<Vec<_>, _>>()?;
            catalog.add_category(
                CategoryInfo {
                    id: seed.id,
                    name: seed.name,
                    description: seed.description,
                },
                puzzles,
            )?;
        }
        log::debug!(
            "puzzle catalog loaded: {} categories, {} puzzles",
            catalog.pools.len(),
            catalog.total_puzzles()
        );
        Ok(catalog)
    }

    /// The built-in catalog.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for (id, name, description, words) in BUILTIN {
            let puzzles = words
                .iter()
                .map(|(pid, word, difficulty)| builtin_puzzle(id, pid, word, *difficulty))
                .collect();
            let info = CategoryInfo {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
            };
            // Built-in ids are unique and words valid, so this cannot fail.
            if let Err(e) = catalog.add_category(info, puzzles) {
                log::error!("built-in puzzle catalog rejected: {}", e);
            }
        }
        catalog
    }
}

impl PuzzleSource for PuzzleCatalog {
    fn categories(&self) -> Vec<String> {
        self.pools.iter().map(|p| p.info.id.clone()).collect()
    }

    fn puzzles_by_category(&self, name: &str) -> &[Puzzle] {
        self.pools
            .iter()
            .find(|p| p.info.id == name)
            .map(|p| p.puzzles.as_slice())
            .unwrap_or(&[])
    }
}

fn builtin_puzzle(category: &str, id: &str, word: &str, difficulty: u32) -> Puzzle {
    let stem = word.to_ascii_lowercase();
    let images = std::array::from_fn(|i| {
        format!(
            "assets/images/puzzles/{}/{}_{}.jpg",
            category,
            stem,
            i + 1
        )
    });
    Puzzle {
        id: id.to_string(),
        word: word.to_string(),
        images,
        difficulty,
    }
}

type BuiltinCategory = (
    &'static str,
    &'static str,
    &'static str,
    &'static [(&'static str, &'static str, u32)],
);

const BUILTIN: &[BuiltinCategory] = &[
    (
        "movies",
        "Movies & TV",
        "Film and television related words",
        &[("mov_001", "ACTOR", 1), ("mov_002", "SCENE", 1), ("mov_003", "OSCAR", 2)],
    ),
    (
        "games",
        "Video Games",
        "Gaming related words and characters",
        &[("gam_001", "LEVEL", 1), ("gam_002", "SCORE", 1), ("gam_003", "MARIO", 2)],
    ),
    (
        "sports",
        "Sports",
        "Sports and athleticism",
        &[("spt_001", "GOAL", 1), ("spt_002", "TEAM", 1), ("spt_003", "MEDAL", 2)],
    ),
    (
        "animals",
        "Animals",
        "Animals and wildlife",
        &[("ani_001", "TIGER", 1), ("ani_002", "SHARK", 1), ("ani_003", "EAGLE", 2)],
    ),
    (
        "food",
        "Food & Drinks",
        "Culinary delights",
        &[("food_001", "PASTA", 1), ("food_002", "JUICE", 1), ("food_003", "CREAM", 2)],
    ),
    ("geography", "Geography", "Places and landmarks", &[]),
    ("people", "Famous People", "Celebrities and historical figures", &[]),
    ("music", "Music", "Musical terms and artists", &[]),
];

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn builtin_has_fifteen_puzzles_in_fixed_order() {
        let catalog = PuzzleCatalog::builtin();
        assert_eq!(catalog.total_puzzles(), 15);
        assert_eq!(catalog.categories()[0], "movies");
        assert_eq!(catalog.categories().len(), 8);
        assert_eq!(catalog.playable_categories().len(), 5);
        assert!(catalog.puzzles_by_category("music").is_empty());
        assert!(catalog.puzzles_by_category("nope").is_empty());
    }

    #[test]
    fn builtin_daily_puzzle_is_stable() {
        let catalog = PuzzleCatalog::builtin();
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        // 20261016 % 15 == 6 -> first puzzle of "sports"
        let (category, puzzle) = catalog.daily_puzzle(date).unwrap();
        assert_eq!(category, "sports");
        assert_eq!(puzzle.id, "spt_001");
        assert_eq!(catalog.daily_puzzle(date).unwrap().1.id, puzzle.id);
    }

    #[test]
    fn json_catalog_normalizes_words() {
        let json = r#"[
            {"id": "sports", "name": "Sports", "puzzles": [
                {"id": "s1", "word": "goal", "images": ["a","b","c","d"], "difficulty": 2}
            ]}
        ]"#;
        let catalog = PuzzleCatalog::from_json_str(json).unwrap();
        let pool = catalog.puzzles_by_category("sports");
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].word, "GOAL");
        assert_eq!(pool[0].difficulty, 2);
    }

    #[test]
    fn json_catalog_rejects_wrong_image_count() {
        let json = r#"[{"id": "x", "name": "X", "puzzles": [
            {"id": "x1", "word": "GOAL", "images": ["a","b","c"]}
        ]}]"#;
        let err = PuzzleCatalog::from_json_str(json).unwrap_err();
        assert!(matches!(err, PuzzleError::InvalidPuzzle { .. }));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"[
            {"id": "a", "name": "A", "puzzles": [{"id": "p1", "word": "GOAL", "images": ["a","b","c","d"]}]},
            {"id": "b", "name": "B", "puzzles": [{"id": "p1", "word": "TEAM", "images": ["a","b","c","d"]}]}
        ]"#;
        assert!(matches!(
            PuzzleCatalog::from_json_str(json),
            Err(PuzzleError::DuplicateId(id)) if id == "p1"
        ));

        let json = r#"[{"id": "a", "name": "A"}, {"id": "a", "name": "Again"}]"#;
        assert!(matches!(
            PuzzleCatalog::from_json_str(json),
            Err(PuzzleError::DuplicateCategory(_))
        ));
    }

    #[tokio::test]
    async fn load_json_reads_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("puzzles.json");
        std::fs::write(
            &path,
            r#"[{"id": "food", "name": "Food", "puzzles": [
                {"id": "f1", "word": "pasta", "images": ["a","b","c","d"]}
            ]}]"#,
        )
        .unwrap();

        let catalog = PuzzleCatalog::load_json(&path).await.unwrap();
        assert_eq!(catalog.playable_categories(), vec!["food".to_string()]);
        assert_eq!(catalog.puzzles_by_category("food")[0].word, "PASTA");

        let missing = PuzzleCatalog::load_json(dir.path().join("nope.json")).await;
        assert!(matches!(missing, Err(PuzzleError::Io(_))));
    }
}
