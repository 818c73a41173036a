//! Integration tests for the crossword filler: loading puzzles from disk, solving them, and
//! rendering the result.

use std::collections::HashSet;

use crossword::render::{letter_grid, render_grid, save};
use crossword::{Assignment, Crossword, CrosswordCreator, Direction, Variable};

fn load_fixture(structure: &str) -> Crossword {
    Crossword::from_files(
        format!("tests/fixtures/{structure}"),
        "tests/fixtures/words0.txt",
    )
    .expect("Failed to load fixture")
}

fn solve(crossword: &Crossword) -> Option<Assignment> {
    CrosswordCreator::new(crossword).solve()
}

#[test]
fn test_fixture_fill() {
    let crossword = load_fixture("structure0.txt");
    let assignment = solve(&crossword).expect("Failed to find a fill");

    assert_eq!(
        render_grid(&crossword, &assignment),
        "█SIX█\n█E██F\n█V██I\n█E██V\n█NINE"
    );

    let words = assignment.to_words(&crossword);
    assert_eq!(words[&Variable::new(1, 4, Direction::Down, 4)], "FIVE");
}

#[test]
fn test_fill_is_complete_consistent_and_unique() {
    let crossword = load_fixture("structure0.txt");
    let mut creator = CrosswordCreator::new(&crossword);
    let assignment = creator.solve().expect("Failed to find a fill");

    assert!(creator.assignment_complete(&assignment));
    assert!(creator.consistent(&assignment));

    let words: Vec<&str> = assignment.to_words(&crossword).into_values().collect();
    let distinct: HashSet<&str> = words.iter().copied().collect();
    assert_eq!(words.len(), crossword.slot_count());
    assert_eq!(distinct.len(), words.len());

    // Every open cell is covered by some slot here, so the whole grid is lettered.
    let letters = letter_grid(&crossword, &assignment);
    for row in 0..crossword.height() {
        for col in 0..crossword.width() {
            assert_eq!(crossword.is_open(row, col), letters[row][col].is_some());
        }
    }
}

#[test]
fn test_repeated_runs_agree() {
    let crossword = load_fixture("structure0.txt");
    let first = solve(&crossword).expect("Failed to find a fill");

    for _ in 0..5 {
        assert_eq!(solve(&crossword), Some(first.clone()));
    }
}

#[test]
fn test_unfillable_fixture() {
    // No six-letter word in the list.
    let crossword = load_fixture("structure_long.txt");
    let mut creator = CrosswordCreator::new(&crossword);

    assert_eq!(creator.solve(), None);
    assert_eq!(creator.statistics().states, 0);
}

#[test]
fn test_save_round_trips_rendering() {
    let crossword = load_fixture("structure0.txt");
    let assignment = solve(&crossword).expect("Failed to find a fill");

    let path = std::env::temp_dir().join(format!("crossword-fill-{}.txt", std::process::id()));
    save(&crossword, &assignment, &path).expect("Failed to save fill");

    let saved = std::fs::read_to_string(&path).expect("Failed to read saved fill");
    std::fs::remove_file(&path).ok();

    assert_eq!(saved, render_grid(&crossword, &assignment) + "\n");
}
