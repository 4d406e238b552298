use crate::PkError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, PkError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PkError::NonFinite { what, value: v })
    }
}

/// Finite and strictly positive, e.g. an absolute temperature or a pressure.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, PkError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(PkError::InvalidArg { what })
    }
}

/// Ensure a per-component vector has one entry per component.
pub fn ensure_len(values: &[Real], expected: usize, what: &'static str) -> Result<(), PkError> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(PkError::LengthMismatch {
            what,
            expected,
            got: values.len(),
        })
    }
}

/// Scale non-negative amounts so they sum to one.
///
/// Fails if any entry is negative or non-finite, or if the total is zero.
pub fn normalize(values: &[Real]) -> Result<Vec<Real>, PkError> {
    let mut total = 0.0;
    for &v in values {
        ensure_finite(v, "fraction")?;
        if v < 0.0 {
            return Err(PkError::InvalidArg {
                what: "negative fraction",
            });
        }
        total += v;
    }
    if total <= 0.0 {
        return Err(PkError::InvalidArg {
            what: "fractions sum to zero",
        });
    }
    Ok(values.iter().map(|v| v / total).collect())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn normalized_sum_is_one(values in prop::collection::vec(0.0_f64..10.0_f64, 1..8)) {
            if let Ok(x) = normalize(&values) {
                let sum: f64 = x.iter().sum();
                prop_assert!((sum - 1.0).abs() < 1e-9);
            }
        }
    }
}
