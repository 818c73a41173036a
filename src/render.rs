use std::fs;
use std::path::Path;

use crate::assignment::Assignment;
use crate::crossword::Crossword;
use crate::errors::CrosswordError;
use crate::Choice;

/// Drawn in place of a blocked cell.
pub const BLOCK: char = '█';

/// Lay the assigned words out on the grid. Cells no assigned slot covers are `None`.
pub fn letter_grid(crossword: &Crossword, assignment: &Assignment) -> Vec<Vec<Option<char>>> {
    let mut letters = vec![vec![None; crossword.width()]; crossword.height()];

    for Choice { slot_id, word_id } in assignment.choices() {
        let variable = crossword.variable(slot_id);
        let word = crossword.word(word_id);

        for ((row, col), &glyph) in variable.cell_coords().zip(&word.glyphs) {
            if let Some(cell) = letters.get_mut(row).and_then(|cells| cells.get_mut(col)) {
                *cell = Some(glyph);
            }
        }
    }

    letters
}

/// Turn the given crossword and assignment into a rendered string, one line per row.
pub fn render_grid(crossword: &Crossword, assignment: &Assignment) -> String {
    letter_grid(crossword, assignment)
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(|(col, letter)| {
                    if crossword.is_open(row, col) {
                        letter.unwrap_or(' ')
                    } else {
                        BLOCK
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write the rendered grid to `path`.
pub fn save<P: AsRef<Path>>(
    crossword: &Crossword,
    assignment: &Assignment,
    path: P,
) -> Result<(), CrosswordError> {
    let path = path.as_ref();
    let mut contents = render_grid(crossword, assignment);
    contents.push('\n');

    fs::write(path, contents).map_err(|source| CrosswordError::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_fill_leaves_blanks() {
        let crossword = Crossword::from_strings("#___#\n#_##_\n", "cat\nox\n");
        let mut assignment = Assignment::new(crossword.slot_count());
        assignment.insert(0, crossword.word_id("CAT").unwrap());

        let letters = letter_grid(&crossword, &assignment);
        assert_eq!(letters[0], vec![None, Some('C'), Some('A'), Some('T'), None]);
        assert_eq!(render_grid(&crossword, &assignment), "█CAT█\n█ ██ ");
    }

    #[test]
    fn test_down_words_run_top_to_bottom() {
        let crossword = Crossword::from_strings("_#\n_#\n", "ox\n");
        let mut assignment = Assignment::new(crossword.slot_count());
        assignment.insert(0, 0);

        assert_eq!(render_grid(&crossword, &assignment), "O█\nX█");
    }

    #[test]
    fn test_save_reports_unwritable_path() {
        let crossword = Crossword::from_strings("__\n", "ox\n");
        let assignment = Assignment::new(crossword.slot_count());

        let err = save(&crossword, &assignment, "/nonexistent/dir/fill.txt")
            .expect_err("writing into a missing directory should fail");
        assert!(matches!(err, CrosswordError::WriteFile { .. }));
    }
}
