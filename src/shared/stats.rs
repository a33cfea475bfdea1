use std::cmp::Ordering;

/// Cut points splitting a sample into four equal-probability groups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartiles {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

impl Quartiles {
    /// Quartiles using the exclusive method (the sample is treated as drawn
    /// from a wider population, so the extremes are never cut points).
    /// Returns `None` for fewer than two values.
    pub fn exclusive(values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        let mut data = values.to_vec();
        data.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        const N: usize = 4;
        let len = data.len();
        let m = len + 1;
        let cut = |i: usize| {
            let j = (i * m / N).clamp(1, len - 1);
            let delta = (i * m) as f64 - (j * N) as f64;
            (data[j - 1] * (N as f64 - delta) + data[j] * delta) / N as f64
        };
        Some(Self {
            q1: cut(1),
            median: cut(2),
            q3: cut(3),
        })
    }

    pub fn interquartile_range(&self) -> f64 {
        self.q3 - self.q1
    }

    /// `(q1 - k * iqr, q3 + k * iqr)`
    pub fn fence(&self, k: f64) -> (f64, f64) {
        let iqr = self.interquartile_range();
        (self.q1 - k * iqr, self.q3 + k * iqr)
    }
}

#[test]
fn quartiles_four_values_test() {
    let q = Quartiles::exclusive(&[40.0, 10.0, 30.0, 20.0]).unwrap();
    assert_eq!(q.q1, 12.5);
    assert_eq!(q.median, 25.0);
    assert_eq!(q.q3, 37.5);
}

#[test]
fn quartiles_odd_values_test() {
    let q = Quartiles::exclusive(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]).unwrap();
    assert_eq!(q.q1, 2.0);
    assert_eq!(q.median, 4.0);
    assert_eq!(q.q3, 6.0);
}

#[test]
fn quartiles_too_few_test() {
    assert!(Quartiles::exclusive(&[]).is_none());
    assert!(Quartiles::exclusive(&[1.0]).is_none());
}

#[test]
fn fence_test() {
    let q = Quartiles::exclusive(&[10.0, 20.0, 30.0, 40.0]).unwrap();
    assert_eq!(q.fence(0.5), (0.0, 50.0));
}
