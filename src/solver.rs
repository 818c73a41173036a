//! The constraint-satisfaction engine: domains, node and arc consistency, the assignment checker,
//! the ordering heuristics, and backtracking search.
//!
//! Propagation runs once, before search. During search the domains are read-only; a tentative
//! word is only ever checked against the words already placed.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet, VecDeque};

use bit_set::BitSet;
use instant::{Duration, Instant};
use smallvec::SmallVec;

use crate::assignment::Assignment;
use crate::crossword::Crossword;
use crate::{Choice, Overlap, SlotId, WordId, MAX_SLOT_COUNT};

/// A struct tracking statistics about the filling process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    /// Search nodes visited.
    pub states: u64,
    /// Consistent choices that were undone after the search below them failed.
    pub backtracks: u64,
    pub duration: Duration,
}

/// Fills a `Crossword`, owning the candidate words ("domain") of every slot while doing so.
pub struct CrosswordCreator<'a> {
    crossword: &'a Crossword,

    /// Indexed by `SlotId`; each set holds the `WordId`s still possible for that slot. Bit sets
    /// iterate in ascending id order, which keeps every heuristic reproducible.
    domains: Vec<BitSet>,

    statistics: Statistics,
}

impl<'a> CrosswordCreator<'a> {
    /// Start with every word in the list as a candidate for every slot.
    pub fn new(crossword: &'a Crossword) -> CrosswordCreator<'a> {
        let all_words: BitSet = (0..crossword.words().len()).collect();

        CrosswordCreator {
            crossword,
            domains: vec![all_words; crossword.slot_count()],
            statistics: Statistics::default(),
        }
    }

    pub fn crossword(&self) -> &'a Crossword {
        self.crossword
    }

    pub fn domain(&self, slot_id: SlotId) -> &BitSet {
        &self.domains[slot_id]
    }

    /// The words still possible for a slot, in lexicographic order.
    pub fn domain_words(&self, slot_id: SlotId) -> impl Iterator<Item = &'a str> + '_ {
        let crossword = self.crossword;
        self.domains[slot_id]
            .iter()
            .map(move |word_id| crossword.word(word_id).string.as_str())
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Enforce node and arc consistency, then search for a complete fill. Returns `None` if the
    /// grid can't be filled from the word list.
    pub fn solve(&mut self) -> Option<Assignment> {
        let start = Instant::now();
        self.statistics = Statistics::default();

        self.enforce_node_consistency();

        let result = if !self.ac3(None) {
            None
        } else if let Some(slot_id) = (0..self.domains.len()).find(|&s| self.domains[s].is_empty())
        {
            // A slot with no candidates at all can't be filled, so don't bother searching.
            log::info!(
                "No candidate words for {:?}; skipping search",
                self.crossword.variable(slot_id)
            );
            None
        } else {
            let mut assignment = Assignment::new(self.crossword.slot_count());
            if self.backtrack(&mut assignment) {
                Some(assignment)
            } else {
                None
            }
        };

        self.statistics.duration = start.elapsed();
        log::info!(
            "{} after {} states and {} backtracks in {:?}",
            if result.is_some() { "Filled grid" } else { "No fill found" },
            self.statistics.states,
            self.statistics.backtracks,
            self.statistics.duration
        );

        result
    }

    /// Remove every word whose length doesn't match its slot's length.
    pub fn enforce_node_consistency(&mut self) {
        let words = self.crossword.words();

        for (slot_id, domain) in self.domains.iter_mut().enumerate() {
            let length = self.crossword.variable(slot_id).length;
            let wrong_length: Vec<WordId> = domain
                .iter()
                .filter(|&word_id| words[word_id].len() != length)
                .collect();

            for word_id in wrong_length {
                domain.remove(word_id);
            }
        }

        log::debug!("Domain sizes after node consistency: {:?}", self.domain_sizes());
    }

    /// Make `x` arc consistent with `y`: drop every word of `x` that no word of `y` agrees with at
    /// their overlap. Returns whether anything was dropped.
    pub fn revise(&mut self, x: SlotId, y: SlotId) -> bool {
        let overlap = match self.crossword.overlap(x, y) {
            Some(overlap) => overlap,
            None => return false,
        };
        let words = self.crossword.words();

        // The letters `y` can still put in the shared cell.
        let supported: HashSet<char> = self.domains[y]
            .iter()
            .filter_map(|word_id| words[word_id].glyphs.get(overlap.y_index).copied())
            .collect();

        let unsupported: Vec<WordId> = self.domains[x]
            .iter()
            .filter(|&word_id| {
                !words[word_id]
                    .glyphs
                    .get(overlap.x_index)
                    .is_some_and(|glyph| supported.contains(glyph))
            })
            .collect();

        for &word_id in &unsupported {
            self.domains[x].remove(word_id);
        }

        !unsupported.is_empty()
    }

    /// AC-3. Starts from `arcs` if given, otherwise from every ordered pair of crossing slots.
    /// Returns false as soon as any domain becomes empty.
    pub fn ac3(&mut self, arcs: Option<&[(SlotId, SlotId)]>) -> bool {
        let crossword = self.crossword;

        let mut queue: VecDeque<(SlotId, SlotId)> = match arcs {
            Some(arcs) => arcs.iter().copied().collect(),
            None => (0..crossword.slot_count())
                .flat_map(|x| crossword.neighbors(x).iter().map(move |&y| (x, y)))
                .collect(),
        };

        while let Some((x, y)) = queue.pop_front() {
            if !self.revise(x, y) {
                continue;
            }

            if self.domains[x].is_empty() {
                log::info!(
                    "Arc consistency emptied the domain of {:?}",
                    crossword.variable(x)
                );
                return false;
            }

            // `x` lost words, so anything crossing it may have lost support.
            for &z in crossword.neighbors(x) {
                if z != y {
                    queue.push_back((z, x));
                }
            }
        }

        log::debug!("Domain sizes after arc consistency: {:?}", self.domain_sizes());
        true
    }

    /// Does every slot have a word?
    pub fn assignment_complete(&self, assignment: &Assignment) -> bool {
        (0..self.crossword.slot_count()).all(|slot_id| assignment.is_assigned(slot_id))
    }

    /// Check a partial or complete assignment: no word used twice, every word the length of its
    /// slot, and crossing slots agreeing on their shared letters. Unassigned slots are ignored.
    pub fn consistent(&self, assignment: &Assignment) -> bool {
        let words = self.crossword.words();

        let mut used: SmallVec<[WordId; MAX_SLOT_COUNT]> =
            assignment.choices().map(|choice| choice.word_id).collect();
        used.sort_unstable();
        if used.windows(2).any(|pair| pair[0] == pair[1]) {
            return false;
        }

        if assignment.choices().any(|Choice { slot_id, word_id }| {
            words[word_id].len() != self.crossword.variable(slot_id).length
        }) {
            return false;
        }

        for Choice { slot_id, word_id } in assignment.choices() {
            let word = &words[word_id];

            for (cell_idx, crossing) in self.crossword.crossings(slot_id).iter().enumerate() {
                let crossing = match crossing {
                    Some(crossing) => crossing,
                    None => continue,
                };

                if let Some(other_word_id) = assignment.get(crossing.other_slot_id) {
                    if word.glyphs[cell_idx] != words[other_word_id].glyphs[crossing.other_slot_cell]
                    {
                        return false;
                    }
                }
            }
        }

        true
    }

    /// Least-constraining value: order a slot's candidates by how many words they would rule out
    /// of the unassigned crossing slots, fewest first. Equal counts keep lexicographic order.
    pub fn order_domain_values(&self, slot_id: SlotId, assignment: &Assignment) -> Vec<WordId> {
        let words = self.crossword.words();

        // For each unassigned crossing slot, how many of its words put each letter in the shared
        // cell. A candidate rules out every word of that slot with a different letter there.
        let letter_counts: Vec<(Overlap, usize, HashMap<Option<char>, usize>)> = self
            .crossword
            .neighbors(slot_id)
            .iter()
            .filter(|&&neighbor| !assignment.is_assigned(neighbor))
            .filter_map(|&neighbor| {
                let overlap = self.crossword.overlap(slot_id, neighbor)?;

                let mut total = 0;
                let mut counts: HashMap<Option<char>, usize> = HashMap::new();
                for other in self.domains[neighbor].iter() {
                    let glyph = words[other].glyphs.get(overlap.y_index).copied();
                    *counts.entry(glyph).or_insert(0) += 1;
                    total += 1;
                }

                Some((overlap, total, counts))
            })
            .collect();

        let mut candidates: Vec<(usize, WordId)> = self.domains[slot_id]
            .iter()
            .map(|word_id| {
                let word = &words[word_id];

                let eliminated: usize = letter_counts
                    .iter()
                    .map(|(overlap, total, counts)| {
                        let glyph = word.glyphs.get(overlap.x_index).copied();
                        total - counts.get(&glyph).copied().unwrap_or(0)
                    })
                    .sum();

                (eliminated, word_id)
            })
            .collect();

        candidates.sort_unstable();
        candidates.into_iter().map(|(_, word_id)| word_id).collect()
    }

    /// Minimum remaining values, with ties going to the slot with the most crossings. The degree
    /// comparison only considers the slots tied on remaining values; a tie on both goes to the
    /// lowest slot id. Returns `None` when every slot is assigned.
    pub fn select_unassigned_variable(&self, assignment: &Assignment) -> Option<SlotId> {
        let remaining: Vec<(SlotId, usize)> = (0..self.crossword.slot_count())
            .filter(|&slot_id| !assignment.is_assigned(slot_id))
            .map(|slot_id| (slot_id, self.domains[slot_id].len()))
            .collect();

        let fewest = remaining.iter().map(|&(_, count)| count).min()?;
        let tied: Vec<SlotId> = remaining
            .into_iter()
            .filter(|&(_, count)| count == fewest)
            .map(|(slot_id, _)| slot_id)
            .collect();

        if tied.len() == 1 {
            return Some(tied[0]);
        }

        tied.into_iter()
            .max_by_key(|&slot_id| (self.crossword.neighbors(slot_id).len(), Reverse(slot_id)))
    }

    /// Depth-first search over the static domains. Tries each value in place and undoes it on
    /// failure; on success `assignment` is left complete.
    fn backtrack(&mut self, assignment: &mut Assignment) -> bool {
        self.statistics.states += 1;

        if self.assignment_complete(assignment) {
            return true;
        }

        let slot_id = match self.select_unassigned_variable(assignment) {
            Some(slot_id) => slot_id,
            None => return false,
        };

        for word_id in self.order_domain_values(slot_id, assignment) {
            assignment.insert(slot_id, word_id);

            if self.consistent(assignment) {
                if self.backtrack(assignment) {
                    return true;
                }
                self.statistics.backtracks += 1;
            }

            assignment.remove(slot_id);
        }

        false
    }

    fn domain_sizes(&self) -> Vec<usize> {
        self.domains.iter().map(BitSet::len).collect()
    }
}
