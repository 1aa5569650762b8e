use rand::Rng;

/// Source of index selections for the prompt, flavor title, and image.
/// Injected so tests can pin the choices.
pub trait Picker {
    /// Return an index in `0..upper`. `upper` must be non-zero.
    fn pick(&mut self, upper: usize) -> usize;
}

#[derive(Debug, Default)]
pub struct ThreadRngPicker;

impl Picker for ThreadRngPicker {
    fn pick(&mut self, upper: usize) -> usize {
        rand::thread_rng().gen_range(0..upper)
    }
}

/// Replays a fixed sequence of indices, clamped to the requested range.
#[cfg(test)]
pub struct SequencePicker {
    values: Vec<usize>,
    cursor: usize,
}

#[cfg(test)]
impl SequencePicker {
    pub fn new(values: Vec<usize>) -> Self {
        Self { values, cursor: 0 }
    }
}

#[cfg(test)]
impl Picker for SequencePicker {
    fn pick(&mut self, upper: usize) -> usize {
        let value = self.values.get(self.cursor).copied().unwrap_or(0);
        self.cursor += 1;
        value % upper
    }
}

#[cfg(test)]
mod tests {
    use super::{Picker, SequencePicker, ThreadRngPicker};

    #[test]
    fn thread_rng_picker_stays_in_range() {
        let mut picker = ThreadRngPicker;
        for _ in 0..100 {
            assert!(picker.pick(9) < 9);
        }
    }

    #[test]
    fn sequence_picker_replays_and_wraps() {
        let mut picker = SequencePicker::new(vec![2, 7]);
        assert_eq!(picker.pick(5), 2);
        assert_eq!(picker.pick(5), 2); // 7 % 5
        assert_eq!(picker.pick(5), 0); // exhausted
    }
}
