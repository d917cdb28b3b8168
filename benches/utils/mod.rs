//! Countdown fixtures: sources which only complete in index order, and only
//! after another source handed them the turn.

mod countdown;

pub use countdown::*;

fn shuffle<T>(slice: &mut [T]) {
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    slice.shuffle(&mut rng);
}
