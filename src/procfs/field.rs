//! Per-field extraction result.
//!
//! A `Field` keeps "zero" and "zero because missing" apart. The parsing layer
//! only ever produces `Present` or `Absent`; record builders decide defaults.

use serde::Serialize;

/// Why a field could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Absence {
    /// The interface file does not exist or could not be read.
    MissingSource,
    /// The file was read but the key or position is not there.
    NotFound,
    /// The raw text could not be parsed as the declared kind.
    Malformed,
}

/// A single extracted value, or the reason it is absent.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Present(T),
    Absent(Absence),
}

impl<T> Field<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Field::Present(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Present(v) => Some(v),
            Field::Absent(_) => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Present(v) => Some(v),
            Field::Absent(_) => None,
        }
    }

    pub fn absence(&self) -> Option<Absence> {
        match self {
            Field::Present(_) => None,
            Field::Absent(reason) => Some(*reason),
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Field::Present(v) => v,
            Field::Absent(_) => default,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Field<U> {
        match self {
            Field::Present(v) => Field::Present(f(v)),
            Field::Absent(reason) => Field::Absent(reason),
        }
    }

    /// Chains a fallible conversion; a failed conversion becomes `Absent(Malformed)`.
    pub fn and_then<U, F: FnOnce(T) -> Option<U>>(self, f: F) -> Field<U> {
        match self {
            Field::Present(v) => match f(v) {
                Some(u) => Field::Present(u),
                None => Field::Absent(Absence::Malformed),
            },
            Field::Absent(reason) => Field::Absent(reason),
        }
    }
}

impl<T: Default> Field<T> {
    pub fn or_default(self) -> T {
        self.unwrap_or(T::default())
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Field::Present(v),
            None => Field::Absent(Absence::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_zero_differs_from_present_zero() {
        let present: Field<u64> = Field::Present(0);
        let absent: Field<u64> = Field::Absent(Absence::NotFound);

        assert_ne!(present, absent);
        assert_eq!(present.clone().or_default(), absent.clone().or_default());
        assert!(present.is_present());
        assert_eq!(absent.absence(), Some(Absence::NotFound));
    }

    #[test]
    fn test_and_then_marks_failed_conversion_malformed() {
        let field = Field::Present("abc".to_string());
        let parsed = field.and_then(|s| s.parse::<u64>().ok());
        assert_eq!(parsed, Field::Absent(Absence::Malformed));

        let missing: Field<String> = Field::Absent(Absence::MissingSource);
        let parsed = missing.and_then(|s| s.parse::<u64>().ok());
        assert_eq!(parsed, Field::Absent(Absence::MissingSource));
    }
}
