//! Grid geometry: which cells are open, which slots they form, and where those slots cross.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use smallvec::SmallVec;

use crate::errors::CrosswordError;
use crate::{
    Crossing, Direction, GridCoord, Overlap, SlotId, Variable, Word, WordId, MAX_SLOT_LENGTH,
};

/// The character marking an open cell in a structure file. Everything else is a block.
pub const OPEN_CELL: char = '_';

/// A struct representing the aspects of a puzzle that are static during filling: the grid, the
/// slots derived from it, and the word list every slot draws from.
#[derive(Debug, Clone)]
pub struct Crossword {
    height: usize,
    width: usize,
    structure: Vec<Vec<bool>>,
    variables: Vec<Variable>,
    crossings: Vec<SmallVec<[Option<Crossing>; MAX_SLOT_LENGTH]>>,
    neighbors: Vec<SmallVec<[SlotId; MAX_SLOT_LENGTH]>>,
    words: Vec<Word>,
}

/// Find every run of at least two open cells in a line of the grid, as `(start, length)` pairs.
fn find_runs<I>(cells: I) -> Vec<(usize, usize)>
where
    I: IntoIterator<Item = bool>,
{
    let mut result = vec![];
    let mut run_start = 0;
    let mut run_length = 0;

    for (idx, open) in cells.into_iter().enumerate() {
        if open {
            if run_length == 0 {
                run_start = idx;
            }
            run_length += 1;
        } else {
            if run_length > 1 {
                result.push((run_start, run_length));
            }
            run_length = 0;
        }
    }

    if run_length > 1 {
        result.push((run_start, run_length));
    }

    result
}

impl Crossword {
    /// Build a crossword from a grid of open (`true`) and blocked (`false`) cells and a word list.
    /// Rows shorter than the longest one are padded with blocks. Words are upper-cased,
    /// deduplicated and sorted, so `WordId` order is lexicographic order.
    pub fn new<I, S>(structure: Vec<Vec<bool>>, words: I) -> Crossword
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let height = structure.len();
        let width = structure.iter().map(|row| row.len()).max().unwrap_or(0);
        let structure: Vec<Vec<bool>> = structure
            .into_iter()
            .map(|mut row| {
                row.resize(width, false);
                row
            })
            .collect();

        let mut variables: Vec<Variable> = vec![];
        for (row, cells) in structure.iter().enumerate() {
            for (col, length) in find_runs(cells.iter().copied()) {
                variables.push(Variable::new(row, col, Direction::Across, length));
            }
        }
        for col in 0..width {
            for (row, length) in find_runs((0..height).map(|row| structure[row][col])) {
                variables.push(Variable::new(row, col, Direction::Down, length));
            }
        }
        variables.sort();
        variables.dedup();

        // Map each cell to the (slot, cell index within slot) pairs passing through it, which we
        // can then use to calculate crossings.
        let mut cell_by_loc: HashMap<GridCoord, SmallVec<[(SlotId, usize); 2]>> = HashMap::new();
        for (slot_id, variable) in variables.iter().enumerate() {
            for (cell_idx, loc) in variable.cell_coords().enumerate() {
                cell_by_loc.entry(loc).or_default().push((slot_id, cell_idx));
            }
        }

        let crossings: Vec<SmallVec<[Option<Crossing>; MAX_SLOT_LENGTH]>> = variables
            .iter()
            .enumerate()
            .map(|(slot_id, variable)| {
                variable
                    .cell_coords()
                    .map(|loc| {
                        cell_by_loc[&loc]
                            .iter()
                            .find(|&&(other_slot_id, _)| other_slot_id != slot_id)
                            .map(|&(other_slot_id, other_slot_cell)| Crossing {
                                other_slot_id,
                                other_slot_cell,
                            })
                    })
                    .collect()
            })
            .collect();

        let neighbors = crossings
            .iter()
            .map(|slot_crossings| {
                let mut slot_neighbors: SmallVec<[SlotId; MAX_SLOT_LENGTH]> = slot_crossings
                    .iter()
                    .flatten()
                    .map(|crossing| crossing.other_slot_id)
                    .collect();
                slot_neighbors.sort_unstable();
                slot_neighbors.dedup();
                slot_neighbors
            })
            .collect();

        let words = words
            .into_iter()
            .map(|word| word.as_ref().trim().to_uppercase())
            .filter(|word| !word.is_empty())
            .collect::<BTreeSet<String>>()
            .into_iter()
            .map(Word::new)
            .collect();

        Crossword {
            height,
            width,
            structure,
            variables,
            crossings,
            neighbors,
            words,
        }
    }

    /// Build a crossword from the text of a structure file (`_` for open cells, anything else for
    /// a block) and a word file (one word per line).
    pub fn from_strings(structure: &str, words: &str) -> Crossword {
        let structure = structure
            .lines()
            .map(|line| line.chars().map(|c| c == OPEN_CELL).collect())
            .collect();

        Crossword::new(structure, words.lines())
    }

    /// Read the structure and word files from disk and build a crossword from them.
    pub fn from_files<P, Q>(structure_path: P, words_path: Q) -> Result<Crossword, CrosswordError>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let read = |path: &Path| {
            fs::read_to_string(path).map_err(|source| CrosswordError::ReadFile {
                path: path.to_path_buf(),
                source,
            })
        };

        let structure = read(structure_path.as_ref())?;
        let words = read(words_path.as_ref())?;

        let crossword = Crossword::from_strings(&structure, &words);
        log::debug!(
            "Loaded {}x{} grid with {} slots and {} words",
            crossword.height,
            crossword.width,
            crossword.variables.len(),
            crossword.words.len()
        );

        Ok(crossword)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Is the cell at `(row, col)` open? Cells outside the grid are not.
    pub fn is_open(&self, row: usize, col: usize) -> bool {
        self.structure
            .get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// All slots in the grid, sorted. A slot's `SlotId` is its index here.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn slot_count(&self) -> usize {
        self.variables.len()
    }

    pub fn variable(&self, slot_id: SlotId) -> &Variable {
        &self.variables[slot_id]
    }

    pub fn slot_id(&self, variable: &Variable) -> Option<SlotId> {
        self.variables.binary_search(variable).ok()
    }

    /// The crossing (if any) at each cell of the given slot.
    pub fn crossings(&self, slot_id: SlotId) -> &[Option<Crossing>] {
        &self.crossings[slot_id]
    }

    /// Where slots `x` and `y` must agree, or `None` if they share no cell.
    pub fn overlap(&self, x: SlotId, y: SlotId) -> Option<Overlap> {
        if x == y {
            return None;
        }

        self.crossings[x]
            .iter()
            .enumerate()
            .find_map(|(cell_idx, crossing)| match crossing {
                Some(crossing) if crossing.other_slot_id == y => Some(Overlap {
                    x_index: cell_idx,
                    y_index: crossing.other_slot_cell,
                }),
                _ => None,
            })
    }

    /// The slots crossing `slot_id`, in ascending order.
    pub fn neighbors(&self, slot_id: SlotId) -> &[SlotId] {
        &self.neighbors[slot_id]
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn word(&self, word_id: WordId) -> &Word {
        &self.words[word_id]
    }

    pub fn word_id(&self, word: &str) -> Option<WordId> {
        self.words
            .binary_search_by(|candidate| candidate.string.as_str().cmp(word))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::Direction::{Across, Down};

    const STRUCTURE: &str = "\
#___#
#_##_
#_##_
#_##_
#____
";

    #[test]
    fn test_find_runs_skips_single_cells() {
        let runs = find_runs([true, false, true, true, false, true, true, true]);
        assert_eq!(runs, vec![(2, 2), (5, 3)]);
    }

    #[test]
    fn test_slots_are_derived_and_sorted() {
        let crossword = Crossword::from_strings(STRUCTURE, "");

        assert_eq!(crossword.height(), 5);
        assert_eq!(crossword.width(), 5);
        assert_eq!(
            crossword.variables(),
            &[
                Variable::new(0, 1, Across, 3),
                Variable::new(0, 1, Down, 5),
                Variable::new(1, 4, Down, 4),
                Variable::new(4, 1, Across, 4),
            ]
        );
    }

    #[test]
    fn test_overlaps_and_neighbors() {
        let crossword = Crossword::from_strings(STRUCTURE, "");

        assert_eq!(crossword.overlap(0, 1), Some(Overlap { x_index: 0, y_index: 0 }));
        assert_eq!(crossword.overlap(1, 0), Some(Overlap { x_index: 0, y_index: 0 }));
        assert_eq!(crossword.overlap(1, 3), Some(Overlap { x_index: 4, y_index: 0 }));
        assert_eq!(crossword.overlap(2, 3), Some(Overlap { x_index: 3, y_index: 3 }));
        assert_eq!(crossword.overlap(0, 2), None);
        assert_eq!(crossword.overlap(0, 0), None);

        assert_eq!(crossword.neighbors(0), &[1]);
        assert_eq!(crossword.neighbors(1), &[0, 3]);
        assert_eq!(crossword.neighbors(3), &[1, 2]);
    }

    #[test]
    fn test_ragged_rows_are_padded_with_blocks() {
        let crossword = Crossword::from_strings("___\n_\n_", "");

        assert_eq!(crossword.width(), 3);
        assert!(crossword.is_open(0, 2));
        assert!(!crossword.is_open(1, 2));
        assert!(!crossword.is_open(7, 7));
        assert_eq!(
            crossword.variables(),
            &[Variable::new(0, 0, Across, 3), Variable::new(0, 0, Down, 3)]
        );
    }

    #[test]
    fn test_words_are_normalized() {
        let crossword = Crossword::from_strings("", "dog\n  Cat \n\nDOG\ncow\n");

        let words: Vec<&str> = crossword.words().iter().map(|w| w.string.as_str()).collect();
        assert_eq!(words, vec!["CAT", "COW", "DOG"]);
        assert_eq!(crossword.word_id("COW"), Some(1));
        assert_eq!(crossword.word_id("cow"), None);
    }

    #[test]
    fn test_slot_id_lookup() {
        let crossword = Crossword::from_strings(STRUCTURE, "");

        assert_eq!(crossword.slot_id(&Variable::new(4, 1, Across, 4)), Some(3));
        assert_eq!(crossword.slot_id(&Variable::new(4, 1, Across, 3)), None);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = Crossword::from_files("/nonexistent/structure.txt", "/nonexistent/words.txt")
            .expect_err("reading a missing file should fail");

        assert!(matches!(err, CrosswordError::ReadFile { .. }));
        assert!(err.to_string().contains("/nonexistent/structure.txt"));
    }
}
