//! Tolerant weight parsing and per-polygon accumulation.

use crate::config::AggregateMode;
use crate::types::Value;

/// Interprets an attribute value as a weight.
///
/// Integers and reals are taken as-is, text is trimmed and parsed. Null,
/// booleans, unparsable text and non-finite results yield `None`.
///
/// ```
/// use polysum::Value;
/// use polysum::compute::weight::parse_weight;
///
/// assert_eq!(parse_weight(&Value::from(" 4 ")), Some(4.0));
/// assert_eq!(parse_weight(&Value::from("abc")), None);
/// assert_eq!(parse_weight(&Value::Null), None);
/// ```
pub fn parse_weight(value: &Value) -> Option<f64> {
    let weight = match value {
        Value::Int(i) => *i as f64,
        Value::Float(x) => *x,
        Value::Text(s) => s.trim().parse::<f64>().ok()?,
        Value::Null | Value::Bool(_) => return None,
    };
    weight.is_finite().then_some(weight)
}

/// Running weight sum for one polygon.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator {
    sum: f64,
    matched: usize,
    skipped: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a contained point's weight; unparsable values count as zero.
    ///
    /// Returns whether the value was used.
    pub fn add(&mut self, value: &Value) -> bool {
        self.matched += 1;
        match parse_weight(value) {
            Some(weight) => {
                self.sum += weight;
                true
            }
            None => {
                self.skipped += 1;
                false
            }
        }
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Contained points seen, including skipped ones.
    pub fn matched(&self) -> usize {
        self.matched
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Final attribute value for the output column.
    ///
    /// A sum that overflowed to infinity, or an integer result outside the
    /// `i64` range, is reported as [`Value::Null`].
    pub fn finish(&self, mode: AggregateMode) -> Value {
        if !self.sum.is_finite() {
            log::warn!(
                "Weight sum over {} points overflowed, writing NULL",
                self.matched
            );
            return Value::Null;
        }

        let whole = match mode {
            AggregateMode::Float => return Value::Float(self.sum),
            AggregateMode::Truncate => self.sum.trunc(),
            AggregateMode::Round => self.sum.round(),
        };
        // 2^63 is exactly representable; i64::MAX is not.
        if whole < -I64_BOUND || whole >= I64_BOUND {
            log::warn!("Weight sum {} does not fit an integer column, writing NULL", self.sum);
            return Value::Null;
        }
        Value::Int(whole as i64)
    }
}

const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weight_variants() {
        assert_eq!(parse_weight(&Value::Int(3)), Some(3.0));
        assert_eq!(parse_weight(&Value::Float(2.5)), Some(2.5));
        assert_eq!(parse_weight(&Value::from("1e3")), Some(1000.0));
        assert_eq!(parse_weight(&Value::from("-0.5")), Some(-0.5));
        assert_eq!(parse_weight(&Value::from("")), None);
        assert_eq!(parse_weight(&Value::Bool(true)), None);
    }

    #[test]
    fn test_parse_weight_rejects_non_finite() {
        assert_eq!(parse_weight(&Value::from("NaN")), None);
        assert_eq!(parse_weight(&Value::from("inf")), None);
        assert_eq!(parse_weight(&Value::Float(f64::NEG_INFINITY)), None);
    }

    #[test]
    fn test_accumulator_skips_malformed() {
        let mut acc = Accumulator::new();
        assert!(acc.add(&Value::from("4")));
        assert!(!acc.add(&Value::from("abc")));
        assert!(acc.add(&Value::from("6")));

        assert_eq!(acc.sum(), 10.0);
        assert_eq!(acc.matched(), 3);
        assert_eq!(acc.skipped(), 1);
        assert_eq!(acc.finish(AggregateMode::Truncate), Value::Int(10));
    }

    #[test]
    fn test_finish_modes() {
        let mut acc = Accumulator::new();
        acc.add(&Value::Float(1.25));
        acc.add(&Value::Float(1.5));

        assert_eq!(acc.finish(AggregateMode::Truncate), Value::Int(2));
        assert_eq!(acc.finish(AggregateMode::Round), Value::Int(3));
        assert_eq!(acc.finish(AggregateMode::Float), Value::Float(2.75));

        let mut negative = Accumulator::new();
        negative.add(&Value::Float(-2.5));
        assert_eq!(negative.finish(AggregateMode::Truncate), Value::Int(-2));
        assert_eq!(negative.finish(AggregateMode::Round), Value::Int(-3));
    }

    #[test]
    fn test_overflowing_sum_is_null() {
        // Finite weights whose running sum passes through infinity.
        let mut acc = Accumulator::new();
        acc.add(&Value::Float(1e308));
        acc.add(&Value::Float(1e308));
        acc.add(&Value::Float(-1e308));

        assert!(!acc.sum().is_finite());
        assert_eq!(acc.finish(AggregateMode::Truncate), Value::Null);
        assert_eq!(acc.finish(AggregateMode::Round), Value::Null);
        assert_eq!(acc.finish(AggregateMode::Float), Value::Null);
    }

    #[test]
    fn test_sum_beyond_integer_range() {
        let mut acc = Accumulator::new();
        acc.add(&Value::Float(1e19));

        assert_eq!(acc.finish(AggregateMode::Truncate), Value::Null);
        assert_eq!(acc.finish(AggregateMode::Round), Value::Null);
        assert_eq!(acc.finish(AggregateMode::Float), Value::Float(1e19));

        let mut low = Accumulator::new();
        low.add(&Value::Int(i64::MIN));
        assert_eq!(low.finish(AggregateMode::Truncate), Value::Int(i64::MIN));
    }

    #[test]
    fn test_empty_accumulator_is_zero() {
        assert_eq!(Accumulator::new().finish(AggregateMode::Truncate), Value::Int(0));
    }
}
