//! Reversible mappers: edit a field through a supported proxy type.
//!
//! A mapper must obey the round-trip law: whenever `try_map(v)` yields `m`,
//! `try_unmap(m)` yields a value equal to `v`. Mappers refuse inputs they
//! cannot round-trip instead of producing lossy output.

use std::fmt::Display;
use std::marker::PhantomData;
use std::str::FromStr;

/// Translates between a field's real type and the type its editor edits.
pub trait ReversibleMapper {
    type Original;
    type Mapped;

    fn try_map(&self, value: &Self::Original) -> Option<Self::Mapped>;

    fn try_unmap(&self, value: &Self::Mapped) -> Option<Self::Original>;
}

/// Edits a list of strings as one delimited line, e.g. `a, b, c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedList {
    separator: char,
}

impl DelimitedList {
    pub fn new(separator: char) -> Self {
        Self { separator }
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    fn is_representable(&self, item: &str) -> bool {
        !item.is_empty() && item.trim() == item && !item.contains(self.separator)
    }
}

impl Default for DelimitedList {
    fn default() -> Self {
        Self::new(',')
    }
}

impl ReversibleMapper for DelimitedList {
    type Original = Vec<String>;
    type Mapped = String;

    fn try_map(&self, value: &Vec<String>) -> Option<String> {
        if !value.iter().all(|item| self.is_representable(item)) {
            return None;
        }
        Some(value.join(&format!("{} ", self.separator)))
    }

    fn try_unmap(&self, value: &String) -> Option<Vec<String>> {
        Some(
            value
                .split(self.separator)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

/// Edits any `FromStr + Display` value as text.
#[derive(Debug)]
pub struct ParsedText<T> {
    marker: PhantomData<fn() -> T>,
}

impl<T> ParsedText<T> {
    pub fn new() -> Self {
        Self { marker: PhantomData }
    }
}

impl<T> Default for ParsedText<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ParsedText<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: FromStr + Display> ReversibleMapper for ParsedText<T> {
    type Original = T;
    type Mapped = String;

    fn try_map(&self, value: &T) -> Option<String> {
        Some(value.to_string())
    }

    fn try_unmap(&self, value: &String) -> Option<T> {
        value.trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use super::*;

    fn assert_round_trip<M>(mapper: &M, value: M::Original)
    where
        M: ReversibleMapper,
        M::Original: PartialEq + std::fmt::Debug,
    {
        let mapped = mapper.try_map(&value).expect("value should map");
        let restored = mapper.try_unmap(&mapped).expect("mapped value should unmap");
        assert_eq!(restored, value);
    }

    #[test]
    fn delimited_list_round_trips_representable_items() {
        let mapper = DelimitedList::default();
        assert_round_trip(&mapper, vec!["alpha".to_string(), "beta gamma".to_string()]);
        assert_round_trip(&mapper, Vec::new());
        assert_eq!(mapper.try_map(&vec!["a".into(), "b".into()]), Some("a, b".to_string()));
    }

    #[test]
    fn delimited_list_refuses_lossy_items() {
        let mapper = DelimitedList::new(';');
        assert_eq!(mapper.try_map(&vec!["a;b".to_string()]), None);
        assert_eq!(mapper.try_map(&vec![" padded".to_string()]), None);
        assert_eq!(mapper.try_map(&vec![String::new()]), None);
    }

    #[test]
    fn delimited_list_unmap_drops_blank_segments() {
        let mapper = DelimitedList::default();
        assert_eq!(mapper.try_unmap(&" a ,, b ,".to_string()), Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn parsed_text_round_trips_and_rejects_garbage() {
        assert_round_trip(&ParsedText::<i64>::new(), -42);
        assert_round_trip(&ParsedText::<f64>::new(), 0.1 + 0.2);
        let address: SocketAddr = "127.0.0.1:8080".parse().expect("socket address");
        assert_round_trip(&ParsedText::<SocketAddr>::new(), address);

        assert_eq!(ParsedText::<u8>::new().try_unmap(&"300".to_string()), None);
    }
}
