use crate::error::{AppError, Result};

pub fn mean(samples: &[f64]) -> Result<f64> {
    if samples.is_empty() {
        return Err(AppError::EmptyInput("mean"));
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

pub fn median(samples: &[f64]) -> Result<f64> {
    if samples.is_empty() {
        return Err(AppError::EmptyInput("median"));
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]).unwrap(), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]).unwrap(), 2.5);
        assert_eq!(median(&[7.5]).unwrap(), 7.5);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 6.0]).unwrap(), 3.0);
    }

    #[test]
    fn test_empty_input_fails_fast() {
        let err = median(&[]).unwrap_err();
        assert!(matches!(err, AppError::EmptyInput("median")));
        assert_eq!(
            err.to_string(),
            "Cannot compute median of an empty sample set"
        );

        assert!(matches!(mean(&[]), Err(AppError::EmptyInput("mean"))));
    }
}
