use std::fmt::Debug;

/// Outcome of parsing cell text: distinguishes "no input" from
/// "unparseable input" so the commit path can report the right thing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseResult<T, E> {
    None,
    Valid(T),
    Invalid(E),
    Incomplete,
}

impl<T, E> Default for ParseResult<T, E> {
    fn default() -> Self {
        ParseResult::None
    }
}

impl<T, E> ParseResult<T, E> {
    pub fn map<RT>(self, f: impl FnOnce(T) -> RT) -> ParseResult<RT, E> {
        match self {
            ParseResult::None => ParseResult::None,
            ParseResult::Valid(v) => ParseResult::Valid(f(v)),
            ParseResult::Invalid(e) => ParseResult::Invalid(e),
            ParseResult::Incomplete => ParseResult::Incomplete,
        }
    }

    pub fn get(self) -> Option<T> {
        match self {
            ParseResult::Valid(v) => Some(v),
            _ => None,
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        match self {
            ParseResult::None | ParseResult::Invalid(_) | ParseResult::Incomplete => default,
            ParseResult::Valid(t) => t,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ParseResult::Valid(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ParseResult::None | ParseResult::Incomplete)
    }
}

impl<T, E: Default> From<Option<T>> for ParseResult<T, E> {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => ParseResult::Valid(v),
            None => ParseResult::Invalid(E::default()),
        }
    }
}

impl<T, E> From<Result<T, E>> for ParseResult<T, E> {
    fn from(r: Result<T, E>) -> Self {
        match r {
            Ok(v) => ParseResult::Valid(v),
            Err(e) => ParseResult::Invalid(e),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn map_keeps_shape() {
        let valid: ParseResult<u32, ()> = ParseResult::Valid(21);
        assert_eq!(valid.map(|v| v * 2), ParseResult::Valid(42));
        let invalid: ParseResult<u32, ()> = ParseResult::Invalid(());
        assert_eq!(invalid.map(|v| v * 2), ParseResult::Invalid(()));
    }

    #[test]
    fn accessors() {
        let valid: ParseResult<u32, ()> = ParseResult::Valid(7);
        assert!(valid.is_valid());
        assert!(!valid.is_empty());
        assert_eq!(valid.clone().get(), Some(7));
        assert_eq!(valid.unwrap_or(0), 7);

        let none: ParseResult<u32, ()> = ParseResult::None;
        assert!(none.is_empty());
        assert_eq!(none.unwrap_or(3), 3);
    }

    #[test]
    fn conversions() {
        let from_some: ParseResult<u32, ()> = Some(5).into();
        assert_eq!(from_some, ParseResult::Valid(5));
        let from_none: ParseResult<u32, ()> = None.into();
        assert_eq!(from_none, ParseResult::Invalid(()));
        let from_err: ParseResult<u32, String> = Err("bad".to_string()).into();
        assert_eq!(from_err, ParseResult::Invalid("bad".to_string()));
    }
}
