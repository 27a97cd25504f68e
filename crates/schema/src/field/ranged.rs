use std::fmt;

use crate::error::{Result, SchemaError};

/// Optional inclusive lower and upper bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds<T> {
    min: Option<T>,
    max: Option<T>,
}

impl<T> Default for Bounds<T> {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
        }
    }
}

impl<T: PartialOrd + fmt::Display> Bounds<T> {
    /// Fails when both bounds are set and `min > max`.
    pub fn new(min: Option<T>, max: Option<T>) -> Result<Self> {
        if let (Some(lo), Some(hi)) = (&min, &max) {
            if lo > hi {
                return Err(SchemaError::invalid_argument(format!(
                    "min {lo} is greater than max {hi}"
                )));
            }
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn min(&self) -> Option<&T> {
        self.min.as_ref()
    }

    #[must_use]
    pub fn max(&self) -> Option<&T> {
        self.max.as_ref()
    }

    /// A missing bound leaves that side open.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.min.as_ref().is_none_or(|lo| lo <= value)
            && self.max.as_ref().is_none_or(|hi| value <= hi)
    }

    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// A field whose accepted values are limited to a `[min, max]` range.
pub trait RangedField {
    type Bound: PartialOrd + fmt::Display;

    fn bounds(&self) -> &Bounds<Self::Bound>;

    fn min(&self) -> Option<&Self::Bound> {
        self.bounds().min()
    }

    fn max(&self) -> Option<&Self::Bound> {
        self.bounds().max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_bounds_fail() {
        assert!(Bounds::new(Some(5), Some(1)).is_err());
        assert!(Bounds::new(Some(1.5), Some(1.0)).is_err());
    }

    #[test]
    fn equal_bounds_are_allowed() {
        let bounds = Bounds::new(Some(3), Some(3)).unwrap();
        assert!(bounds.contains(&3));
        assert!(!bounds.contains(&2));
        assert!(!bounds.contains(&4));
    }

    #[test]
    fn one_sided_bounds() {
        let lower = Bounds::new(Some(0), None).unwrap();
        assert!(lower.contains(&0));
        assert!(lower.contains(&i64::MAX));
        assert!(!lower.contains(&-1));

        let upper = Bounds::new(None, Some(10)).unwrap();
        assert!(upper.contains(&i64::MIN));
        assert!(!upper.contains(&11));
    }

    #[test]
    fn unbounded_contains_everything() {
        let bounds = Bounds::<f64>::default();
        assert!(bounds.is_unbounded());
        assert!(bounds.contains(&f64::MAX));
        assert_eq!(bounds.min(), None);
    }
}
