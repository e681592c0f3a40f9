use crate::config::VisualizerConfig;
use rand::Rng;

/// The bar values being sorted, plus the snapshot taken when they were drawn.
///
/// `values` is mutated only by a live stepper and by [`restore`](Self::restore);
/// `original` never changes until the next [`generate`](Self::generate).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementArray {
    values: Vec<u32>,
    original: Vec<u32>,
}

impl ElementArray {
    /// Draw `len` values uniformly from `[config.min_value(), config.max_value]`.
    pub fn generate<R: Rng + ?Sized>(len: usize, config: &VisualizerConfig, rng: &mut R) -> Self {
        let range = config.min_value()..=config.max_value;
        let values: Vec<u32> = (0..len).map(|_| rng.gen_range(range.clone())).collect();
        Self::from_values(values)
    }

    /// Use `values` as-is and snapshot them.
    pub fn from_values(values: Vec<u32>) -> Self {
        Self {
            original: values.clone(),
            values,
        }
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [u32] {
        &mut self.values
    }

    pub fn original(&self) -> &[u32] {
        &self.original
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Put the snapshot back without drawing new values.
    pub fn restore(&mut self) {
        self.values.copy_from_slice(&self.original);
    }

    pub fn is_restored(&self) -> bool {
        self.values == self.original
    }
}
