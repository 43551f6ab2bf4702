use crate::error::PatternError;

pub(crate) const PARAM_PREFIX: char = ':';
pub(crate) const WILDCARD: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'p> {
    Static(&'p str),
    Param(&'p str),
    Wildcard,
}

/// Canonical form shared by registration and lookup: repeated separators collapse, the
/// trailing separator goes away, and the result always starts with `/`.
///
/// # Example
/// ```
/// use micro_router::matcher::normalize_path;
///
/// assert_eq!(normalize_path("//users///42/"), "/users/42");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len() + 1);
    for segment in split_segments(path) {
        normalized.push('/');
        normalized.push_str(segment);
    }

    if normalized.is_empty() {
        normalized.push('/');
    }
    normalized
}

/// Appends `path` to a mount point, inserting a separator when `path` has none.
///
/// The result is not normalized.
pub fn join_path(base: &str, path: &str) -> String {
    if path.is_empty() || path.starts_with('/') { format!("{base}{path}") } else { format!("{base}/{path}") }
}

#[inline]
pub(crate) fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

pub(crate) fn parse(pattern: &str) -> Result<Vec<Segment<'_>>, PatternError> {
    let raw = split_segments(pattern).collect::<Vec<_>>();
    let last = raw.len().saturating_sub(1);

    raw.into_iter()
        .enumerate()
        .map(|(position, segment)| {
            if segment == WILDCARD {
                if position == last { Ok(Segment::Wildcard) } else { Err(PatternError::WildcardNotLast { position }) }
            } else if let Some(name) = segment.strip_prefix(PARAM_PREFIX) {
                if name.is_empty() { Err(PatternError::EmptyParamName { position }) } else { Ok(Segment::Param(name)) }
            } else {
                Ok(Segment::Static(segment))
            }
        })
        .collect()
}
