//! Expand list arguments into placeholders and translate
//! placeholders into the dialect's syntax.
//!
//! A list argument replaces the next `(?)` in the query with
//! one placeholder per element:
//!
//! ```text
//! select * from foo where i = ? and j in (?)   ["i", [1, 2]]
//! select * from foo where i = ? and j in (?,?) ["i", 1, 2]
//! ```
//!
//! Dialects with numbered placeholders get `$1`, `$2`, ... instead of `?`.
//! The query is not parsed: a `?` or `(?)` inside a string literal
//! or a comment is treated like any other.

use tracing::trace;

use crate::config::Dialect;
use crate::driver::{Arg, Value};
use crate::Error;

/// List placeholder.
pub const MARKER: &str = "(?)";

/// Single placeholder.
pub const PLACEHOLDER: char = '?';

/// Query and arguments ready to send to the database.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub query: String,
    pub args: Vec<Value>,
}

/// Rewrite the query and flatten its arguments.
///
/// List arguments consume `(?)` markers left to right, in argument order.
/// Scalars are passed through and don't touch the query. Markers left over
/// once list arguments run out are kept as they are, so `(?)` can still be
/// bound to a scalar. An empty list keeps its marker and binds nothing.
///
/// Fails only if there are more list arguments than markers.
pub fn transform(
    dialect: Dialect,
    query: &str,
    args: impl IntoIterator<Item = Arg>,
) -> Result<Transformed, Error> {
    let markers = query
        .match_indices(MARKER)
        .map(|(offset, _)| offset)
        .collect::<Vec<_>>();
    let mut markers_iter = markers.iter();

    let mut rewritten = String::with_capacity(query.len());
    let mut values = vec![];
    // Offset into the query up to which it's been copied.
    let mut copied = 0;

    for (position, arg) in args.into_iter().enumerate() {
        match arg {
            Arg::Scalar(value) => values.push(value),
            Arg::List(list) => {
                let Some(&offset) = markers_iter.next() else {
                    return Err(Error::UnmatchedList {
                        position,
                        markers: markers.len(),
                    });
                };

                rewritten.push_str(&query[copied..offset]);
                expand(&mut rewritten, list.len());
                copied = offset + MARKER.len();

                values.extend(list);
            }
        }
    }

    rewritten.push_str(&query[copied..]);

    let query = if dialect.numbered_placeholders() {
        number_placeholders(&rewritten)
    } else {
        rewritten
    };

    trace!("{} [{} args]", query, values.len());

    Ok(Transformed {
        query,
        args: values,
    })
}

/// Write a list marker expanded to `len` placeholders.
fn expand(query: &mut String, len: usize) {
    if len == 0 {
        query.push_str(MARKER);
        return;
    }

    query.push('(');
    for i in 0..len {
        if i > 0 {
            query.push(',');
        }
        query.push(PLACEHOLDER);
    }
    query.push(')');
}

/// Replace every `?` with `$1`, `$2`, ... left to right.
pub fn number_placeholders(query: &str) -> String {
    let mut numbered = String::with_capacity(query.len() + query.len() / 4);
    let mut number = 0_usize;

    for c in query.chars() {
        if c == PLACEHOLDER {
            number += 1;
            numbered.push('$');
            numbered.push_str(&number.to_string());
        } else {
            numbered.push(c);
        }
    }

    numbered
}
