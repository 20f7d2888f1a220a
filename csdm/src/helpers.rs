use num_traits::Num;
use std::fmt::Debug;
use tracing::warn;

use crate::errors::{Error, Result};

/// Words that stand for an infinite value in quantity strings. Longer words come first, so
/// "infinity" isn't read as "inf" followed by "inity".
///
pub(crate) const INFINITY_SENTINELS: [&str; 5] = ["infinity", "Infinity", "inf", "Inf", "∞"];

/// Whether the first whitespace separated token of `value` is one of the infinity sentinels.
pub(crate) fn is_infinity_sentinel(value: &str) -> bool {
    value
        .split_whitespace()
        .next()
        .map_or(false, |token| INFINITY_SENTINELS.contains(&token))
}

/// Make sure every value is strictly greater than the one before it.
pub(crate) fn is_strictly_ascending<N>(values: &[N]) -> bool
where
    N: Num + Debug + PartialOrd,
{
    values.windows(2).all(|pair| pair[0] < pair[1])
}

/// Reduce `values` to `count` elements.
///
/// A count can only ever shrink the stored values. Asking for more values than are stored, or for
/// none at all, is an error and leaves `values` untouched.
///
pub(crate) fn truncate<T>(values: &mut Vec<T>, count: usize) -> Result<()> {
    let len = values.len();
    if count == 0 {
        return Err(Error::value("count", "the count must be a positive integer"));
    }
    if count > len {
        return Err(Error::value(
            "count",
            format!("cannot increase the count from {len} to {count}"),
        ));
    }

    if count < len {
        warn!(
            from = len,
            to = count,
            "reducing the count of the dimension, values past the new count are removed"
        );
        values.truncate(count);
    }

    Ok(())
}
