//! Contains various structs intended for testing purposes

use rand::{Rng as _, SeedableRng as _, seq::SliceRandom as _};

use crate::algorithms::{Sort, merging};
use crate::error::SortError;

/// The seed shared by all tests
pub const TEST_SEED: u64 = 0xa8bf17eb656f828d;
/// The rng used by each test
pub type Rng = rand::rngs::SmallRng;

/// Generate the `Rng` for a test
pub fn test_rng() -> Rng {
    Rng::seed_from_u64(TEST_SEED)
}

/// A unit struct that returns a random ordering when compared
#[derive(Debug, Clone)]
pub struct RandomOrdered(std::rc::Rc<std::cell::RefCell<rand::rngs::SmallRng>>);

impl RandomOrdered {
    /// Create a new [`Iterator`] of RandomOrdered, created with a shared [`rand::rngs::SmallRng`]
    pub fn new_iter(seed: u64) -> impl Iterator<Item = Self> {
        let rng = std::rc::Rc::new(std::cell::RefCell::new(
            rand::rngs::SmallRng::seed_from_u64(seed),
        ));

        std::iter::repeat_with(move || RandomOrdered(rng.clone()))
    }
}

impl PartialEq for RandomOrdered {
    fn eq(&self, _other: &Self) -> bool {
        self.0.borrow_mut().random()
    }
}

impl Eq for RandomOrdered {}

impl PartialOrd for RandomOrdered {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RandomOrdered {
    fn cmp(&self, _other: &Self) -> std::cmp::Ordering {
        match self.0.borrow_mut().random_range(0..3) {
            0 => std::cmp::Ordering::Less,
            1 => std::cmp::Ordering::Equal,
            2 => std::cmp::Ordering::Greater,
            _ => unreachable!(),
        }
    }
}

/// A struct that panicks with the likelihood of `1 / LIKELIHOOD` when compared.
#[derive(Debug, Clone)]
pub struct MaybePanickingOrdered<const LIKELIHOOD: usize, T: Ord>(
    std::rc::Rc<std::cell::RefCell<rand::rngs::SmallRng>>,
    T,
);

impl<const LIKELIHOOD: usize, T: Ord> MaybePanickingOrdered<LIKELIHOOD, T> {
    /// Map an [`Iterator`] of `T` to `Self` with a shared [`rand::rngs::SmallRng`]
    pub fn map_iter(iter: impl Iterator<Item = T>, seed: u64) -> impl Iterator<Item = Self> {
        let rng = std::rc::Rc::new(std::cell::RefCell::new(
            rand::rngs::SmallRng::seed_from_u64(seed),
        ));

        iter.map(move |element| Self(rng.clone(), element))
    }

    /// The wrapped value
    pub fn value(&self) -> &T {
        &self.1
    }
}

impl<const LIKELIHOOD: usize, T: Ord> PartialEq for MaybePanickingOrdered<LIKELIHOOD, T> {
    fn eq(&self, other: &Self) -> bool {
        match self.0.borrow_mut().random_range(0..LIKELIHOOD) {
            0 => panic!("MaybePanickingOrdered panicked during comparison"),
            _ => self.1.eq(&other.1),
        }
    }
}

impl<const LIKELIHOOD: usize, T: Ord> Eq for MaybePanickingOrdered<LIKELIHOOD, T> {}

impl<const LIKELIHOOD: usize, T: Ord> PartialOrd for MaybePanickingOrdered<LIKELIHOOD, T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<const LIKELIHOOD: usize, T: Ord> Ord for MaybePanickingOrdered<LIKELIHOOD, T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.0.borrow_mut().random_range(0..LIKELIHOOD) {
            0 => panic!("MaybePanickingOrdered panicked during comparison"),
            _ => self.1.cmp(&other.1),
        }
    }
}

/// A Wrapper struct that tracks an original index with an ordered element,
/// used to test sort results for stability
#[derive(Debug, Clone)]
pub struct IndexedOrdered<T: Ord>(usize, T);

impl<T: Ord> IndexedOrdered<T> {
    /// Create a new iterator of `IndexedOrdered`, tracking the position of each element in `iter`
    pub fn map_iter(iter: impl Iterator<Item = T>) -> impl Iterator<Item = Self> {
        iter.enumerate()
            .map(|(index, element)| Self(index, element))
    }

    /// Check `slice` is sorted and check for stability, e.g. equal elements keeping initial ordering.
    pub fn is_stable_sorted(slice: &[Self]) -> bool {
        slice.windows(2).all(|pair| match pair[1].cmp(&pair[0]) {
            // Slice is not sorted
            std::cmp::Ordering::Less => false,
            // Elements are not stable
            std::cmp::Ordering::Equal => pair[0].0 < pair[1].0,
            std::cmp::Ordering::Greater => true,
        })
    }
}

impl<T: Ord> PartialEq for IndexedOrdered<T> {
    fn eq(&self, other: &Self) -> bool {
        self.1 == other.1
    }
}

impl<T: Ord> Eq for IndexedOrdered<T> {}

impl<T: Ord> PartialOrd for IndexedOrdered<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord> Ord for IndexedOrdered<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.1.cmp(&other.1)
    }
}

/// A [`merging::ScratchFactory`] whose buffers can never be obtained
#[derive(Debug, Clone, Copy)]
pub struct Failing;

impl merging::ScratchFactory for Failing {
    type Scratch<T> = FailingScratch;

    fn display() -> String {
        "failing".to_string()
    }
}

/// See [`Failing`]
#[derive(Debug)]
pub struct FailingScratch;

impl<T> merging::Scratch<T> for FailingScratch {
    fn try_for_len(_len: usize) -> Result<Self, SortError> {
        Ok(Self)
    }

    fn with_halves<R>(
        &mut self,
        left: usize,
        right: usize,
        _f: impl FnOnce(
            &mut [std::mem::MaybeUninit<T>],
            &mut [std::mem::MaybeUninit<T>],
        ) -> R,
    ) -> Result<R, SortError> {
        // Requests beyond `isize::MAX` bytes fail without touching the allocator
        let source = Vec::<u8>::new()
            .try_reserve(usize::MAX)
            .expect_err("Reserving usize::MAX bytes has to fail");

        Err(SortError::allocation(left + right, source))
    }
}

/// Test the sort on an empty slice and a single element
pub fn test_empty<S: Sort>() {
    S::try_sort::<usize>(&mut []).unwrap();

    let mut single = [42];
    S::try_sort(&mut single).unwrap();
    assert_eq!(single, [42]);
}

/// Test the sort on fixed inputs with known results
pub fn test_scenarios<S: Sort>() {
    let scenarios: [(&[i32], &[i32]); 7] = [
        (
            &[64, 34, 25, 12, 22, 11, 90, 88],
            &[11, 12, 22, 25, 34, 64, 88, 90],
        ),
        (&[1, 2, 3, 4, 5], &[1, 2, 3, 4, 5]),
        (&[5, 4, 3, 2, 1], &[1, 2, 3, 4, 5]),
        (&[7, 7, 7, 7, 7], &[7, 7, 7, 7, 7]),
        (&[3, 1, 4, 1, 5, 9, 2, 6], &[1, 1, 2, 3, 4, 5, 6, 9]),
        (&[2, 1], &[1, 2]),
        (&[42], &[42]),
    ];

    for (input, expected) in scenarios {
        let mut values = input.to_vec();
        S::try_sort(&mut values).unwrap();
        assert_eq!(values, expected, "{} failed on {input:?}", S::display());
    }

    let mut records = [(1, 'a'), (2, 'b'), (1, 'c')];
    S::try_sort_by_key(&mut records, |record| record.0).unwrap();
    assert_eq!(records, [(1, 'a'), (1, 'c'), (2, 'b')]);
}

/// Test the sort on some random ordered slices and check they are sorted afterwords
pub fn test_random_sorted<const RUNS: usize, const TEST_SIZE: usize, S: Sort>() {
    let mut rng = test_rng();

    let mut values: Box<[usize]> = (0..TEST_SIZE).collect();

    for run in 0..RUNS {
        values.shuffle(&mut rng);
        S::try_sort(&mut values).unwrap();
        assert!(
            values.iter().copied().eq(0..TEST_SIZE),
            "Run {run} was not sorted"
        );
    }

    let mut values: Box<[usize]> = std::iter::repeat_n(0..TEST_SIZE / 4, 4).flatten().collect();
    for run in 0..RUNS {
        values.shuffle(&mut rng);
        S::try_sort(&mut values).unwrap();
        assert!(values.is_sorted(), "Run {run} was not sorted");

        // Sorting again must not change anything
        let sorted = values.clone();
        S::try_sort(&mut values).unwrap();
        assert_eq!(values, sorted, "Run {run} changed a sorted slice");
    }
}

/// Like [`test_random_sorted`] but additionally checks that the sort was stable
pub fn test_random_stable_sorted<const RUNS: usize, const TEST_SIZE: usize, S: Sort>() {
    assert!(S::IS_STABLE);

    let mut rng = test_rng();
    let mut values: Box<[usize]> = std::iter::repeat_n(0..TEST_SIZE / 4, 4).flatten().collect();
    let mut ordered_values: Box<[IndexedOrdered<usize>]>;

    for run in 0..RUNS {
        values.shuffle(&mut rng);
        ordered_values = IndexedOrdered::map_iter(values.iter().copied()).collect();
        S::try_sort(&mut ordered_values).unwrap();
        assert!(
            IndexedOrdered::is_stable_sorted(&ordered_values),
            "Run {run} was not stable sorted"
        );
    }
}

/// Sort inconsistently ordered and panicking elements. Neither may cause UB, and a panicking
/// comparison must leave the slice a permutation of its input.
pub fn test_soundness<S: Sort>() {
    const TEST_SIZE: usize = 1000;
    const RUNS: usize = 100;

    let mut rng = test_rng();

    for run in 0..RUNS {
        let mut elements: Box<[RandomOrdered]> = RandomOrdered::new_iter(rng.random())
            .take(TEST_SIZE)
            .collect();
        S::try_sort(&mut elements).unwrap();
        assert_eq!(elements.len(), TEST_SIZE);
        drop(elements);

        let values: Box<[u32]> = std::iter::repeat_with(|| rng.random())
            .take(TEST_SIZE)
            .collect();
        let mut expected = values.to_vec();
        expected.sort();

        let mut elements: Box<[MaybePanickingOrdered<TEST_SIZE, u32>]> =
            MaybePanickingOrdered::map_iter(values.into_iter(), rng.random()).collect();

        // The types are not actually unwind safe but must not trigger UB anyway
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            S::try_sort(&mut elements)
        }));

        let mut remaining: Vec<u32> = elements.iter().map(|element| *element.value()).collect();
        remaining.sort();
        assert_eq!(remaining, expected, "Run {run} lost or duplicated elements");
    }
}

/// Count comparisons on random permutations and check they stay within `n log2(n)` up to a
/// small constant factor
pub fn test_comparison_bound<S: Sort>() {
    let mut rng = test_rng();

    for size in [1_000, 10_000, 100_000] {
        let mut values: Box<[u64]> = (0..size as u64).collect();
        values.shuffle(&mut rng);

        let mut comparisons = 0u64;
        S::try_sort_by(&mut values, |a, b| {
            comparisons += 1;
            a.cmp(b)
        })
        .unwrap();
        assert!(values.is_sorted());

        let n_log_n = size as f64 * (size as f64).log2();
        let ratio = comparisons as f64 / n_log_n;
        assert!(
            (0.5..=1.25).contains(&ratio),
            "{} used {comparisons} comparisons for {size} elements (ratio {ratio})",
            S::display(),
        );
    }
}

/// Check that an allocation failure is reported and leaves the slice a permutation of its input
pub fn test_allocation_failure<S: Sort>() {
    let mut values = [5, 3, 8, 1, 9, 2, 7];

    let result = S::try_sort(&mut values);
    assert!(matches!(result, Err(SortError::Allocation { .. })));

    values.sort();
    assert_eq!(values, [1, 2, 3, 5, 7, 8, 9]);
}
