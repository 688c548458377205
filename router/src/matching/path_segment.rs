use crate::RouterError;
use regex::Regex;

/// A dynamic param as declared in a path pattern, e.g. `:id(\d+)?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamToken {
    pub name: String,
    /// Custom regular expression, without the surrounding parentheses.
    pub regexp: Option<String>,
    pub optional: bool,
    pub repeatable: bool,
}

/// One piece of a path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathToken {
    Static(String),
    Param(ParamToken),
    /// `*name`: everything from here to the end of the path.
    Splat(String),
}

/// A `/`-separated segment of a path pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSegment(pub Vec<PathToken>);

impl PathSegment {
    /// The param, if it makes up the whole segment.
    pub fn sole_param(&self) -> Option<&ParamToken> {
        match self.0.as_slice() {
            [PathToken::Param(param)] => Some(param),
            _ => None,
        }
    }

    pub fn splat(&self) -> Option<&str> {
        match self.0.as_slice() {
            [PathToken::Splat(name)] => Some(name),
            _ => None,
        }
    }

    pub fn is_static(&self) -> bool {
        self.0.iter().all(|t| matches!(t, PathToken::Static(_)))
    }

    /// The literal text of a static segment.
    pub fn as_static(&self) -> Option<String> {
        self.is_static().then(|| {
            self.0
                .iter()
                .filter_map(|t| match t {
                    PathToken::Static(s) => Some(s.as_str()),
                    _ => None,
                })
                .collect()
        })
    }
}

/// A tokenized path pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedPath {
    pub segments: Vec<PathSegment>,
    /// The pattern ends with `/` (and is not the root).
    pub trailing_slash: bool,
}

impl TokenizedPath {
    pub fn params(&self) -> impl Iterator<Item = &ParamToken> {
        self.segments.iter().flat_map(|s| {
            s.0.iter().filter_map(|t| match t {
                PathToken::Param(p) => Some(p),
                _ => None,
            })
        })
    }

    pub fn has_dynamic_parts(&self) -> bool {
        self.segments.iter().any(|s| !s.is_static())
    }
}

fn invalid(pattern: &str, reason: impl Into<String>) -> RouterError {
    RouterError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.into(),
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Splits an absolute path pattern into segments of static text, params and
/// splats.
pub fn tokenize_path(pattern: &str) -> Result<TokenizedPath, RouterError> {
    if pattern.is_empty() || pattern == "/" {
        return Ok(TokenizedPath::default());
    }
    let Some(body) = pattern.strip_prefix('/') else {
        return Err(invalid(pattern, "a path pattern must start with \"/\""));
    };

    let trailing_slash = body.ends_with('/');
    let body = body.strip_suffix('/').unwrap_or(body);

    let raw_segments: Vec<&str> = body.split('/').collect();
    let last = raw_segments.len() - 1;
    let mut segments = Vec::with_capacity(raw_segments.len());
    let mut seen = Vec::new();

    for (idx, raw) in raw_segments.into_iter().enumerate() {
        let segment = tokenize_segment(pattern, raw, idx == last)?;

        for token in &segment.0 {
            let name = match token {
                PathToken::Param(p) => &p.name,
                PathToken::Splat(name) => name,
                PathToken::Static(_) => continue,
            };
            if seen.contains(name) {
                return Err(invalid(
                    pattern,
                    format!("duplicate param name \"{name}\""),
                ));
            }
            seen.push(name.clone());
        }
        if segment.splat().is_some() && trailing_slash {
            return Err(invalid(pattern, "nothing can follow a splat"));
        }
        segments.push(segment);
    }

    Ok(TokenizedPath {
        segments,
        trailing_slash,
    })
}

fn tokenize_segment(
    pattern: &str,
    raw: &str,
    is_last: bool,
) -> Result<PathSegment, RouterError> {
    if let Some(name) = raw.strip_prefix('*') {
        if name.is_empty() || !name.chars().all(is_name_char) {
            return Err(invalid(pattern, "a splat needs a name, as in \"*rest\""));
        }
        if !is_last {
            return Err(invalid(pattern, "a splat must be the last segment"));
        }
        return Ok(PathSegment(vec![PathToken::Splat(name.to_string())]));
    }

    let mut tokens = Vec::new();
    let mut buffer = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => buffer.push(escaped),
                None => {
                    return Err(invalid(pattern, "dangling escape character"))
                }
            },
            ':' => {
                if !buffer.is_empty() {
                    tokens.push(PathToken::Static(std::mem::take(&mut buffer)));
                }
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if !is_name_char(c) {
                        break;
                    }
                    name.push(c);
                    chars.next();
                }
                if name.is_empty() {
                    return Err(invalid(pattern, "a param needs a name"));
                }

                let regexp = if chars.peek() == Some(&'(') {
                    chars.next();
                    Some(read_custom_regexp(pattern, &mut chars)?)
                } else {
                    None
                };

                let (optional, repeatable) = match chars.peek() {
                    Some('?') => (true, false),
                    Some('*') => (true, true),
                    Some('+') => (false, true),
                    _ => (false, false),
                };
                if optional || repeatable {
                    chars.next();
                }

                tokens.push(PathToken::Param(ParamToken {
                    name,
                    regexp,
                    optional,
                    repeatable,
                }));
            }
            c => buffer.push(c),
        }
    }
    if !buffer.is_empty() {
        tokens.push(PathToken::Static(buffer));
    }

    let segment = PathSegment(tokens);
    let repeatable_in_mixed = segment.sole_param().is_none()
        && segment.0.iter().any(
            |t| matches!(t, PathToken::Param(p) if p.repeatable),
        );
    if repeatable_in_mixed {
        return Err(invalid(
            pattern,
            "a repeatable param must be the only thing in its segment",
        ));
    }
    Ok(segment)
}

fn read_custom_regexp(
    pattern: &str,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<String, RouterError> {
    let mut regexp = String::new();
    let mut depth = 0usize;
    loop {
        match chars.next() {
            None => {
                return Err(invalid(pattern, "unfinished custom regexp"));
            }
            Some('\\') => {
                regexp.push('\\');
                if let Some(c) = chars.next() {
                    regexp.push(c);
                }
            }
            Some('(') => {
                depth += 1;
                regexp.push('(');
            }
            Some(')') if depth == 0 => break,
            Some(')') => {
                depth -= 1;
                regexp.push(')');
            }
            Some(c) => regexp.push(c),
        }
    }

    match Regex::new(&format!("^(?:{regexp})$")) {
        Ok(re) if re.captures_len() > 1 => Err(invalid(
            pattern,
            format!(
                "custom regexp \"{regexp}\" has capturing groups, use (?:...) \
                 instead"
            ),
        )),
        Ok(_) => Ok(regexp),
        Err(e) => Err(invalid(
            pattern,
            format!("custom regexp \"{regexp}\" is invalid: {e}"),
        )),
    }
}
