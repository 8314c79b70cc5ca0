use rand::rngs::SmallRng;

use crate::*;
pub use random::*;

mod random;

pub trait BoardGenerator {
    fn generate(self, config: &LevelConfig) -> Grid;
}

pub(crate) fn random_category(rng: &mut SmallRng, category_count: u8) -> Category {
    use rand::RngExt;

    Category(rng.random_range(0..category_count))
}
