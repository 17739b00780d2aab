use rand::Rng;

/// In-place Fisher–Yates shuffle over any slice.
///
/// Walks from the back, swapping each position with a uniformly chosen
/// position at or before it, so every permutation is equally likely.
pub fn shuffle<T, R>(items: &mut [T], rng: &mut R)
where
    R: Rng + ?Sized,
{
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}
