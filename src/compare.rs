use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::domain::{Field, SortDirection};
use crate::record::{FieldValue, Record};

/// Orders two records by `key`.
///
/// Numbers compare numerically and strings by `locale_cmp`, both reversed for
/// descending order. A missing value sorts after every present value in either
/// direction, so the comparison stays a total order.
pub fn compare(a: &Record, b: &Record, key: Field, direction: SortDirection) -> Ordering {
    let ordering = match (a.get(key), b.get(key)) {
        (FieldValue::Missing, FieldValue::Missing) => return Ordering::Equal,
        (FieldValue::Missing, _) => return Ordering::Greater,
        (_, FieldValue::Missing) => return Ordering::Less,
        (FieldValue::Number(x), FieldValue::Number(y)) => x.cmp(&y),
        (FieldValue::Text(x), FieldValue::Text(y)) => locale_cmp(x, y),
        // Fields are typed, a number never meets a string.
        _ => Ordering::Equal,
    };
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Stable in-place sort of `records` by `key`.
pub fn sort_records(records: &mut [Record], key: Field, direction: SortDirection) {
    records.sort_by(|a, b| compare(a, b, key, direction));
}

/// Case and accent insensitive comparison with a raw tie break.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
