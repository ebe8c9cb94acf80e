//! Plain-text rendering for the terminal front end.

use crate::events::{GameEvent, PuzzleView};
use crate::leaderboard::LeaderboardEntry;
use crate::puzzle::PuzzleCatalog;
use crate::puzzle::PuzzleSource;
use crate::round::{LetterBankEntry, RoundResult};
use crate::session::{ProfileSnapshot, ACHIEVEMENTS};
use std::fmt::Write;

/// `m:ss`, e.g. `1:05`.
pub fn format_timer(elapsed_seconds: u64) -> String {
    format!("{}:{:02}", elapsed_seconds / 60, elapsed_seconds % 60)
}

/// Word slots, filled letters first: `G O _ _`.
pub fn render_slots(guess: &[char], slots: usize) -> String {
    (0..slots)
        .map(|i| guess.get(i).copied().unwrap_or('_').to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Bank with selection indices; consumed slots show as `.`.
pub fn render_bank(bank: &[LetterBankEntry]) -> String {
    bank.iter()
        .enumerate()
        .map(|(i, e)| {
            let letter = if e.consumed { '.' } else { e.letter };
            format!("{}:{}", i, letter)
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn render_puzzle(view: &PuzzleView) -> String {
    let mut out = String::new();
    let heading = match &view.category {
        Some(c) => format!("{} ({})", view.mode, c),
        None => view.mode.to_string(),
    };
    let _ = writeln!(out, "== {} | puzzle {} | difficulty {} ==", heading, view.puzzle_id, view.difficulty);
    for (i, image) in view.images.iter().enumerate() {
        let _ = writeln!(out, "  [{}] {}", i + 1, image);
    }
    let entries: Vec<LetterBankEntry> = view
        .bank
        .iter()
        .map(|&letter| LetterBankEntry {
            letter,
            consumed: false,
        })
        .collect();
    let _ = writeln!(out, "  word: {}", render_slots(&[], view.slots));
    let _ = write!(out, "  bank: {}", render_bank(&entries));
    out
}

pub fn render_result(result: &RoundResult, session_score: u32) -> String {
    if result.success {
        format!(
            "Congratulations! You solved it in {} with {} hint{}. Score: {} (session total {})",
            format_timer(result.time_taken_seconds),
            result.hints_used,
            if result.hints_used == 1 { "" } else { "s" },
            result.score,
            session_score
        )
    } else {
        format!(
            "Puzzle Skipped. Time spent: {}. Session total {}",
            format_timer(result.time_taken_seconds),
            session_score
        )
    }
}

/// One-line feedback for an event, `None` for events with nothing to say.
pub fn describe_event(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::PuzzleLoaded(view) => Some(render_puzzle(view)),
        GameEvent::GuessUpdated { guess, slots, bank } => Some(format!(
            "  word: {}\n  bank: {}",
            render_slots(guess, *slots),
            render_bank(bank)
        )),
        GameEvent::Mismatch { .. } => Some("That's not correct. Try again!".to_string()),
        GameEvent::HintApplied { remaining, .. } => {
            Some(format!("Hint used! ({} remaining)", remaining))
        }
        GameEvent::HintExhausted => Some("No more hints available!".to_string()),
        GameEvent::TimerTick { .. } | GameEvent::ClockStopped => None,
        GameEvent::RoundComplete {
            result,
            session_score,
        } => {
            let mut s = String::new();
            if result.success {
                s.push_str("Correct! Well done!\n");
            }
            s.push_str(&render_result(result, *session_score));
            Some(s)
        }
        GameEvent::RoundAbandoned { .. } => None,
        GameEvent::AchievementsUnlocked(ids) => Some(
            ids.iter()
                .map(|id| {
                    let a = id.info();
                    format!("Achievement Unlocked: {}! {}", a.name, a.description)
                })
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        GameEvent::Error(msg) => Some(format!("Error: {}", msg)),
    }
}

pub fn render_stats(profile: &ProfileSnapshot) -> String {
    let s = &profile.stats;
    let mut out = String::new();
    let _ = writeln!(out, "{}", profile.username);
    let _ = writeln!(out, "  games played:   {}", s.games_played);
    let _ = writeln!(out, "  games won:      {} ({}%)", s.games_won, s.win_rate());
    let _ = writeln!(out, "  current streak: {}", s.current_streak);
    let _ = writeln!(out, "  best streak:    {}", s.best_streak);
    let _ = writeln!(out, "  achievements:");
    for a in ACHIEVEMENTS.iter() {
        let mark = if profile.has_achievement(a.id) { "x" } else { " " };
        let _ = writeln!(out, "    [{}] {} - {}", mark, a.name, a.description);
    }
    out
}

pub fn render_categories(catalog: &PuzzleCatalog) -> String {
    let mut out = String::new();
    for info in catalog.category_infos() {
        let count = catalog.puzzles_by_category(&info.id).len();
        let note = if count == 0 { " (coming soon)" } else { "" };
        let _ = writeln!(
            out,
            "  {:<10} {:<10} {:>2} puzzles{}  {}",
            info.id, info.name, count, note, info.description
        );
    }
    out
}

pub fn render_leaderboard(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "  no scores yet\n".to_string();
    }
    let mut out = String::new();
    for e in entries {
        let _ = writeln!(out, "  {:>3}. {:<20} {:>6}", e.rank, e.username, e.score);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::Mode;

    #[test]
    fn timer_pads_seconds() {
        assert_eq!(format_timer(0), "0:00");
        assert_eq!(format_timer(65), "1:05");
        assert_eq!(format_timer(600), "10:00");
    }

    #[test]
    fn slots_and_bank() {
        assert_eq!(render_slots(&['G', 'O'], 4), "G O _ _");
        let bank = [
            LetterBankEntry { letter: 'A', consumed: false },
            LetterBankEntry { letter: 'G', consumed: true },
        ];
        assert_eq!(render_bank(&bank), "0:A  1:.");
    }

    #[test]
    fn feedback_messages() {
        assert_eq!(
            describe_event(&GameEvent::HintApplied {
                position: 1,
                bank_index: 3,
                remaining: 2
            })
            .unwrap(),
            "Hint used! (2 remaining)"
        );
        assert_eq!(
            describe_event(&GameEvent::HintExhausted).unwrap(),
            "No more hints available!"
        );
        assert!(describe_event(&GameEvent::TimerTick { elapsed_seconds: 3 }).is_none());

        let skipped = RoundResult {
            success: false,
            score: 0,
            hints_used: 0,
            time_taken_seconds: 12,
            puzzle_id: "ani_001".into(),
            mode: Mode::Unlimited,
            category: None,
        };
        let text = describe_event(&GameEvent::RoundComplete {
            result: skipped,
            session_score: 80,
        })
        .unwrap();
        assert!(text.starts_with("Puzzle Skipped"));
    }

    #[test]
    fn builtin_categories_listed_in_order() {
        let text = render_categories(&PuzzleCatalog::builtin());
        let movies = text.find("movies").unwrap();
        let music = text.find("music").unwrap();
        assert!(movies < music);
        assert!(text.contains("coming soon"));
    }
}
