//! Typewriter prompt cycling on the card front.

use super::timer::Tick;
use std::sync::Arc;

/// Step intervals for the prompt loop, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterTiming {
    pub type_ms: Tick,
    pub delete_ms: Tick,
    pub pause_ms: Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterPhase {
    Typing,
    /// Full prompt shown, waiting before deletion starts.
    Paused,
    Deleting,
}

/// Prompt loop state: type, pause, delete, advance, repeat.
#[derive(Debug, Clone)]
pub struct Typewriter {
    prompts: Arc<[String]>,
    index: usize,
    char_count: usize,
    phase: TypewriterPhase,
}

impl Typewriter {
    /// Returns `None` when there is nothing to type.
    ///
    /// `start_index` wraps around the prompt list.
    pub fn new(prompts: Arc<[String]>, start_index: usize) -> Option<Self> {
        if prompts.is_empty() {
            return None;
        }
        let index = start_index % prompts.len();
        Some(Self {
            prompts,
            index,
            char_count: 0,
            phase: TypewriterPhase::Typing,
        })
    }

    /// Advances one step and returns the delay until the next step.
    pub fn step(&mut self, timing: TypewriterTiming) -> Tick {
        let len = self.current_len();
        match self.phase {
            TypewriterPhase::Typing => {
                self.char_count = (self.char_count + 1).min(len);
                if self.char_count == len {
                    self.phase = TypewriterPhase::Paused;
                    timing.pause_ms
                } else {
                    timing.type_ms
                }
            }
            TypewriterPhase::Paused | TypewriterPhase::Deleting => {
                self.phase = TypewriterPhase::Deleting;
                self.char_count = self.char_count.saturating_sub(1);
                if self.char_count == 0 {
                    self.index = (self.index + 1) % self.prompts.len();
                    self.phase = TypewriterPhase::Typing;
                    timing.type_ms
                } else {
                    timing.delete_ms
                }
            }
        }
    }

    /// Time for one full rotation through every prompt.
    ///
    /// After this long the loop is back in the same state with its next step
    /// the same distance away. Saturates instead of overflowing.
    pub fn cycle_length(&self, timing: TypewriterTiming) -> Tick {
        self.prompts.iter().fold(0, |total: Tick, prompt| {
            let len = prompt.chars().count() as Tick;
            let per_prompt = len
                .saturating_mul(timing.type_ms)
                .saturating_add(timing.pause_ms)
                .saturating_add(len.saturating_sub(1).saturating_mul(timing.delete_ms));
            total.saturating_add(per_prompt)
        })
    }

    pub fn prompt_index(&self) -> usize {
        self.index
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }

    pub fn phase(&self) -> TypewriterPhase {
        self.phase
    }

    pub fn is_deleting(&self) -> bool {
        self.phase == TypewriterPhase::Deleting
    }

    /// Currently typed prefix of the active prompt.
    pub fn visible_text(&self) -> String {
        self.prompts[self.index]
            .chars()
            .take(self.char_count)
            .collect()
    }

    fn current_len(&self) -> usize {
        self.prompts[self.index].chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::{Typewriter, TypewriterPhase, TypewriterTiming};
    use std::sync::Arc;

    const TIMING: TypewriterTiming = TypewriterTiming {
        type_ms: 100,
        delete_ms: 50,
        pause_ms: 2_000,
    };

    fn prompts(values: &[&str]) -> Arc<[String]> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn empty_prompt_list_has_no_typewriter() {
        assert!(Typewriter::new(prompts(&[]), 0).is_none());
    }

    #[test]
    fn start_index_wraps() {
        let typewriter = Typewriter::new(prompts(&["a", "b"]), 5).unwrap();
        assert_eq!(typewriter.prompt_index(), 1);
    }

    #[test]
    fn types_pauses_deletes_then_advances() {
        let mut typewriter = Typewriter::new(prompts(&["hey", "yo"]), 0).unwrap();

        assert_eq!(typewriter.step(TIMING), 100);
        assert_eq!(typewriter.visible_text(), "h");
        assert_eq!(typewriter.step(TIMING), 100);
        assert_eq!(typewriter.step(TIMING), 2_000);
        assert_eq!(typewriter.visible_text(), "hey");
        assert_eq!(typewriter.phase(), TypewriterPhase::Paused);
        assert!(!typewriter.is_deleting());

        assert_eq!(typewriter.step(TIMING), 50);
        assert!(typewriter.is_deleting());
        assert_eq!(typewriter.visible_text(), "he");
        assert_eq!(typewriter.step(TIMING), 50);
        assert_eq!(typewriter.step(TIMING), 100);

        assert_eq!(typewriter.prompt_index(), 1);
        assert_eq!(typewriter.char_count(), 0);
        assert_eq!(typewriter.phase(), TypewriterPhase::Typing);
    }

    #[test]
    fn last_prompt_wraps_to_first() {
        let mut typewriter = Typewriter::new(prompts(&["a", "b"]), 1).unwrap();
        typewriter.step(TIMING);
        typewriter.step(TIMING);
        assert_eq!(typewriter.prompt_index(), 0);
    }

    #[test]
    fn cycle_length_matches_stepped_time() {
        let mut typewriter = Typewriter::new(prompts(&["hey", "a", "né"]), 1).unwrap();
        let cycle = typewriter.cycle_length(TIMING);
        // "hey": 300 + 2000 + 100, "a": 100 + 2000, "né": 200 + 2000 + 50
        assert_eq!(cycle, 2_400 + 2_100 + 2_250);

        let start = (typewriter.prompt_index(), typewriter.char_count(), typewriter.phase());
        let mut elapsed = TIMING.type_ms;
        let mut steps = 0;
        loop {
            let delay = typewriter.step(TIMING);
            steps += 1;
            if (typewriter.prompt_index(), typewriter.char_count(), typewriter.phase()) == start {
                assert_eq!(elapsed, cycle);
                assert_eq!(delay, TIMING.type_ms);
                break;
            }
            elapsed += delay;
        }
        assert_eq!(steps, 2 * (3 + 1 + 2));
    }

    #[test]
    fn counts_characters_not_bytes() {
        let mut typewriter = Typewriter::new(prompts(&["né"]), 0).unwrap();
        typewriter.step(TIMING);
        typewriter.step(TIMING);
        assert_eq!(typewriter.visible_text(), "né");
        assert_eq!(typewriter.phase(), TypewriterPhase::Paused);
    }
}
