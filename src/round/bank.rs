//! Letter bank and guess accumulation.
//!
//! The bank holds the answer's letters plus random fillers, shuffled once per round.
//! Fillers are drawn independently from A-Z and may repeat answer letters.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterBankEntry {
    pub letter: char,
    pub consumed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterBank {
    entries: Vec<LetterBankEntry>,
}

impl LetterBank {
    /// Build a shuffled bank for `word` with `extra` filler letters.
    pub fn generate<R: Rng + ?Sized>(word: &str, extra: usize, rng: &mut R) -> Self {
        let mut letters: Vec<char> = word.chars().collect();
        for _ in 0..extra {
            letters.push(ALPHABET[rng.gen_range(0..ALPHABET.len())] as char);
        }
        letters.shuffle(rng);
        Self::from_letters(letters)
    }

    /// Bank with a fixed layout, nothing consumed.
    pub fn from_letters<I: IntoIterator<Item = char>>(letters: I) -> Self {
        Self {
            entries: letters
                .into_iter()
                .map(|letter| LetterBankEntry {
                    letter,
                    consumed: false,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LetterBankEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&LetterBankEntry> {
        self.entries.get(index)
    }

    pub fn letters(&self) -> Vec<char> {
        self.entries.iter().map(|e| e.letter).collect()
    }

    /// Mark slot `index` consumed and return its letter. `None` if out of range or taken.
    pub fn consume(&mut self, index: usize) -> Option<char> {
        let entry = self.entries.get_mut(index)?;
        if entry.consumed {
            return None;
        }
        entry.consumed = true;
        Some(entry.letter)
    }

    pub fn release(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.consumed = false;
        }
    }

    /// First unconsumed slot holding `letter`.
    pub fn find_available(&self, letter: char) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| !e.consumed && e.letter == letter)
    }

    pub fn available_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.consumed).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessedLetter {
    pub letter: char,
    pub bank_index: usize,
}

/// Letters picked so far, in selection order. Holds at most `capacity` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuessState {
    letters: Vec<GuessedLetter>,
    capacity: usize,
}

impl GuessState {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            letters: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.letters.len() >= self.capacity
    }

    /// Append a letter; refused once full.
    pub fn push(&mut self, letter: char, bank_index: usize) -> bool {
        if self.is_full() {
            return false;
        }
        self.letters.push(GuessedLetter { letter, bank_index });
        true
    }

    pub fn letters(&self) -> &[GuessedLetter] {
        &self.letters
    }

    pub fn chars(&self) -> Vec<char> {
        self.letters.iter().map(|g| g.letter).collect()
    }

    pub fn as_word(&self) -> String {
        self.letters.iter().map(|g| g.letter).collect()
    }

    /// Empty the guess, handing back what was in it so slots can be released.
    pub fn clear(&mut self) -> Vec<GuessedLetter> {
        std::mem::take(&mut self.letters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sorted(mut v: Vec<char>) -> Vec<char> {
        v.sort_unstable();
        v
    }

    #[test]
    fn generated_bank_contains_every_answer_letter() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let bank = LetterBank::generate("LEVEL", 6, &mut rng);
            assert_eq!(bank.len(), 11);
            let mut remaining = bank.letters();
            for c in "LEVEL".chars() {
                let pos = remaining.iter().position(|&x| x == c).expect("answer letter missing");
                remaining.swap_remove(pos);
            }
            assert!(remaining.iter().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn zero_extra_letters_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(1);
        let bank = LetterBank::generate("TIGER", 0, &mut rng);
        assert_eq!(sorted(bank.letters()), sorted("TIGER".chars().collect()));
    }

    #[test]
    fn consume_each_slot_once() {
        let mut bank = LetterBank::from_letters("GOAL".chars());
        assert_eq!(bank.consume(1), Some('O'));
        assert_eq!(bank.consume(1), None);
        assert_eq!(bank.consume(9), None);
        assert_eq!(bank.available_count(), 3);
        bank.release(1);
        assert_eq!(bank.find_available('O'), Some(1));
    }

    #[test]
    fn guess_refuses_overflow() {
        let mut guess = GuessState::with_capacity(2);
        assert!(guess.push('A', 0));
        assert!(guess.push('B', 3));
        assert!(guess.is_full());
        assert!(!guess.push('C', 4));
        assert_eq!(guess.as_word(), "AB");
        let cleared = guess.clear();
        assert_eq!(cleared.len(), 2);
        assert!(guess.is_empty());
        assert_eq!(guess.capacity(), 2);
    }
}
