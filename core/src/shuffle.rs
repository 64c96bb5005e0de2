use rand::Rng;

/// In-place Fisher–Yates shuffle: scan from the last index down to 1 and swap
/// each element with one chosen uniformly from `[0, i]`. Slices of length 0
/// or 1 are left untouched.
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}
