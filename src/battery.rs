//! The fixed battery of correctness checks run by the `test` command

use crate::cli::Algorithm;

/// The outcome of a single check
#[derive(Debug)]
pub struct CheckResult {
    pub name: &'static str,
    /// `None` if the check passed, otherwise what went wrong
    pub failure: Option<String>,
}

/// Integer inputs and the output they have to sort to
const INTEGER_CASES: [(&str, &[i64], &[i64]); 8] = [
    (
        "basic array",
        &[64, 34, 25, 12, 22, 11, 90, 88],
        &[11, 12, 22, 25, 34, 64, 88, 90],
    ),
    ("already sorted", &[1, 2, 3, 4, 5], &[1, 2, 3, 4, 5]),
    ("reverse sorted", &[5, 4, 3, 2, 1], &[1, 2, 3, 4, 5]),
    ("single element", &[42], &[42]),
    ("two elements", &[2, 1], &[1, 2]),
    ("all equal", &[7, 7, 7, 7, 7], &[7, 7, 7, 7, 7]),
    (
        "with duplicates",
        &[3, 1, 4, 1, 5, 9, 2, 6],
        &[1, 1, 2, 3, 4, 5, 6, 9],
    ),
    ("empty", &[], &[]),
];

/// Run every check against `algorithm`
pub fn run(algorithm: Algorithm) -> Vec<CheckResult> {
    let mut results: Vec<CheckResult> = INTEGER_CASES
        .iter()
        .map(|&(name, input, expected)| CheckResult {
            name,
            failure: check_sorts_to(algorithm, input, expected),
        })
        .collect();

    results.push(CheckResult {
        name: "stability",
        failure: check_stability(algorithm),
    });
    results.push(CheckResult {
        name: "idempotence",
        failure: check_idempotence(algorithm),
    });
    results.push(CheckResult {
        name: "float total order",
        failure: check_floats(algorithm),
    });

    results
}

fn check_sorts_to(algorithm: Algorithm, input: &[i64], expected: &[i64]) -> Option<String> {
    let mut values = input.to_vec();

    match algorithm.sort(&mut values) {
        Err(error) => Some(error.to_string()),
        Ok(()) if values != expected => Some(format!("expected {expected:?}, got {values:?}")),
        Ok(()) => None,
    }
}

fn check_stability(algorithm: Algorithm) -> Option<String> {
    let mut records = [(1, 'a'), (2, 'b'), (1, 'c'), (0, 'd'), (2, 'e')];
    let expected = [(0, 'd'), (1, 'a'), (1, 'c'), (2, 'b'), (2, 'e')];

    match algorithm.sort_by(&mut records, |a, b| a.0.cmp(&b.0)) {
        Err(error) => Some(error.to_string()),
        Ok(()) if records != expected => {
            Some(format!("expected {expected:?}, got {records:?}"))
        }
        Ok(()) => None,
    }
}

fn check_idempotence(algorithm: Algorithm) -> Option<String> {
    let mut values: Vec<i64> = (0..1000).map(|value| (value * 7919) % 1009).collect();

    if let Err(error) = algorithm.sort(&mut values) {
        return Some(error.to_string());
    }

    let sorted = values.clone();
    match algorithm.sort(&mut values) {
        Err(error) => Some(error.to_string()),
        Ok(()) if values != sorted => Some("sorting a sorted slice changed it".to_string()),
        Ok(()) => None,
    }
}

fn check_floats(algorithm: Algorithm) -> Option<String> {
    let mut values = [2.5, f64::NAN, -1.0, f64::INFINITY, -0.0, 0.0];

    if let Err(error) = algorithm.sort_by(&mut values, f64::total_cmp) {
        return Some(error.to_string());
    }

    let ordered = values[0] == -1.0
        && values[1] == 0.0
        && values[1].is_sign_negative()
        && values[2] == 0.0
        && values[2].is_sign_positive()
        && values[3] == 2.5
        && values[4] == f64::INFINITY
        && values[5].is_nan();

    (!ordered).then(|| format!("unexpected order {values:?}"))
}
