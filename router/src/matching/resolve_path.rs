use std::borrow::Cow;

/// Resolves `to` against the absolute path `from`.
///
/// `.` stays at the current level and `..` moves up one level, never above
/// the root. The first other segment ends the walk and the rest of `to` is
/// appended verbatim. A trailing `.` or `..` behaves as if followed by `/`.
pub fn resolve_relative_path<'a>(to: &'a str, from: &'a str) -> Cow<'a, str> {
    if to.starts_with('/') {
        return Cow::Borrowed(to);
    }
    if !from.starts_with('/') {
        tracing::warn!(
            "cannot resolve a relative location without an absolute path. \
             Trying to resolve \"{to}\" from \"{from}\". It should look like \
             \"/{from}\"."
        );
        return Cow::Borrowed(to);
    }
    if to.is_empty() {
        return Cow::Borrowed(from);
    }

    let from_segments: Vec<&str> = from.split('/').collect();
    let mut to_segments: Vec<&str> = to.split('/').collect();
    if matches!(to_segments.last(), Some(&".") | Some(&"..")) {
        to_segments.push("");
    }

    let mut position = from_segments.len() - 1;
    let mut to_position = 0;
    while let Some(segment) = to_segments.get(to_position) {
        match *segment {
            "." => {}
            ".." => {
                if position > 1 {
                    position -= 1;
                }
            }
            _ => break,
        }
        to_position += 1;
    }

    Cow::Owned(format!(
        "{}/{}",
        from_segments[..position].join("/"),
        to_segments[to_position..].join("/")
    ))
}

/// Removes `base` from the start of `pathname`, ignoring case.
///
/// Returns `/` if nothing is left, and `pathname` unchanged if `base` is
/// empty or is not a prefix.
pub fn strip_base<'a>(pathname: &'a str, base: &str) -> &'a str {
    if base.is_empty() {
        return pathname;
    }
    match pathname.get(..base.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(base) => {
            match &pathname[base.len()..] {
                "" => "/",
                rest => rest,
            }
        }
        _ => pathname,
    }
}

fn normalize(path: &str) -> Cow<'_, str> {
    let s = path.trim_start_matches('/').trim_end_matches('/');
    if s.is_empty() {
        s.into()
    } else {
        format!("/{s}").into()
    }
}

/// Joins a parent path pattern and a child path pattern with a single `/`.
///
/// A trailing splat on the parent is dropped, since nothing can follow it.
pub fn join_paths(from: &str, to: &str) -> String {
    let joined = remove_wildcard(&normalize(from)).to_string() + &normalize(to);
    if joined.is_empty() {
        "/".to_string()
    } else {
        joined
    }
}

fn remove_wildcard(text: &str) -> &str {
    match text.rsplit_once('/') {
        Some((prefix, last)) if last.starts_with('*') => prefix,
        _ => text,
    }
}
