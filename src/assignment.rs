use std::collections::BTreeMap;

use crate::crossword::Crossword;
use crate::{Choice, SlotId, Variable, WordId};

/// A (possibly partial) mapping from slots to words. Indexed by `SlotId`, so iteration is always
/// in slot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    choices: Vec<Option<WordId>>,
    assigned_count: usize,
}

impl Assignment {
    /// An empty assignment for a grid with `slot_count` slots.
    pub fn new(slot_count: usize) -> Assignment {
        Assignment {
            choices: vec![None; slot_count],
            assigned_count: 0,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.choices.len()
    }

    /// Number of slots that currently hold a word.
    pub fn len(&self) -> usize {
        self.assigned_count
    }

    pub fn is_empty(&self) -> bool {
        self.assigned_count == 0
    }

    pub fn get(&self, slot_id: SlotId) -> Option<WordId> {
        self.choices.get(slot_id).copied().flatten()
    }

    pub fn is_assigned(&self, slot_id: SlotId) -> bool {
        self.get(slot_id).is_some()
    }

    /// Put `word_id` in `slot_id`, returning the word it replaces.
    pub fn insert(&mut self, slot_id: SlotId, word_id: WordId) -> Option<WordId> {
        let previous = self.choices[slot_id].replace(word_id);
        if previous.is_none() {
            self.assigned_count += 1;
        }
        previous
    }

    pub fn remove(&mut self, slot_id: SlotId) -> Option<WordId> {
        let previous = self.choices.get_mut(slot_id).and_then(Option::take);
        if previous.is_some() {
            self.assigned_count -= 1;
        }
        previous
    }

    /// The assigned slots and their words, in slot order.
    pub fn choices(&self) -> impl Iterator<Item = Choice> + '_ {
        self.choices
            .iter()
            .enumerate()
            .filter_map(|(slot_id, word_id)| word_id.map(|word_id| Choice { slot_id, word_id }))
    }

    /// Resolve ids into the slots and words they stand for.
    pub fn to_words<'a>(&self, crossword: &'a Crossword) -> BTreeMap<Variable, &'a str> {
        self.choices()
            .map(|Choice { slot_id, word_id }| {
                (*crossword.variable(slot_id), crossword.word(word_id).string.as_str())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove_track_count() {
        let mut assignment = Assignment::new(3);
        assert!(assignment.is_empty());

        assert_eq!(assignment.insert(1, 7), None);
        assert_eq!(assignment.insert(2, 4), None);
        assert_eq!(assignment.insert(1, 5), Some(7));
        assert_eq!(assignment.len(), 2);

        assert_eq!(assignment.remove(1), Some(5));
        assert_eq!(assignment.remove(1), None);
        assert_eq!(assignment.remove(9), None);
        assert_eq!(assignment.len(), 1);
        assert!(!assignment.is_assigned(0));
        assert!(assignment.is_assigned(2));
    }

    #[test]
    fn test_choices_are_in_slot_order() {
        let mut assignment = Assignment::new(4);
        assignment.insert(3, 0);
        assignment.insert(0, 2);

        let choices: Vec<Choice> = assignment.choices().collect();
        assert_eq!(
            choices,
            vec![
                Choice { slot_id: 0, word_id: 2 },
                Choice { slot_id: 3, word_id: 0 },
            ]
        );
    }
}
