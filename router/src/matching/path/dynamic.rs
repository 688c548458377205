use super::{MatchPath, PathOptions};
use crate::{
    encoding::{decode, encode_param, encode_path},
    matching::{ParamToken, PathSegment, PathToken, TokenizedPath},
    MatchMiss, ParamParser, ParamValue, Params, RouterError,
};
use regex::Regex;
use rustc_hash::FxHashMap;

const DEFAULT_PARAM_RE: &str = "[^/]+?";

#[derive(Debug, Clone)]
struct DynamicParam {
    name: String,
    parser: ParamParser,
    optional: bool,
    repeatable: bool,
    /// Declared as a `*splat`: keeps its `/`s and is empty when absent.
    splat: bool,
    /// Checks built values against a custom regexp.
    validator: Option<Regex>,
}

/// A path backed by one regular expression, with one capture group per
/// param.
///
/// Optional params may be absent (`null`), repeatable params are split on
/// `/` when matching and joined with `/` when building.
///
/// # Examples
/// ```rust
/// use route_resolver::{params, DynamicPath, MatchPath, ParamValue};
///
/// let path = DynamicPath::parse("/users/:id/:tab?").unwrap();
/// let params = path.match_path("/users/42").unwrap();
/// assert_eq!(params.get_str("id"), Some("42"));
/// assert_eq!(params.get("tab"), Some(&ParamValue::Null));
///
/// let built = path.build_path(&params! { "id" => "7", "tab" => "info" });
/// assert_eq!(built.unwrap(), "/users/7/info");
/// ```
#[derive(Debug, Clone)]
pub struct DynamicPath {
    re: Regex,
    params: Vec<DynamicParam>,
    segments: Vec<PathSegment>,
    trailing_slash: bool,
    /// Every segment is an optional param, so `/` matches with all of them
    /// absent.
    root_optional: bool,
}

impl DynamicPath {
    /// Compiles a path pattern with default options and string params.
    pub fn parse(pattern: &str) -> Result<Self, RouterError> {
        let tokenized = crate::matching::tokenize_path(pattern)?;
        Self::from_tokens(
            pattern,
            &tokenized,
            PathOptions::default(),
            &FxHashMap::default(),
        )
    }

    pub(crate) fn from_tokens(
        pattern: &str,
        tokenized: &TokenizedPath,
        options: PathOptions,
        parsers: &FxHashMap<String, ParamParser>,
    ) -> Result<Self, RouterError> {
        let mut re = String::from(if options.sensitive { "^" } else { "(?i)^" });
        let mut params = Vec::new();
        let splats: Vec<&str> =
            tokenized.segments.iter().filter_map(|s| s.splat()).collect();
        // splats are compiled as optional catch-all params
        let segments: Vec<PathSegment> = tokenized
            .segments
            .iter()
            .map(|segment| match segment.splat() {
                Some(name) => PathSegment(vec![PathToken::Param(ParamToken {
                    name: name.to_string(),
                    regexp: Some(".*".to_string()),
                    optional: true,
                    repeatable: false,
                })]),
                None => segment.clone(),
            })
            .collect();

        let mut push_param = |token: &ParamToken| -> Result<(), RouterError> {
            let validator = match &token.regexp {
                Some(custom) => Some(Regex::new(&format!("^(?:{custom})$")).map_err(
                    |e| RouterError::InvalidPattern {
                        pattern: pattern.to_string(),
                        reason: e.to_string(),
                    },
                )?),
                None => None,
            };
            params.push(DynamicParam {
                name: token.name.clone(),
                parser: parsers.get(&token.name).cloned().unwrap_or_default(),
                optional: token.optional,
                repeatable: token.repeatable,
                splat: splats.contains(&token.name.as_str()),
                validator,
            });
            Ok(())
        };

        for segment in &segments {
            if let Some(param) = segment.sole_param() {
                push_param(param)?;
                let inner = param.regexp.as_deref().unwrap_or(DEFAULT_PARAM_RE);
                let body = if param.repeatable {
                    format!("((?:{inner})(?:/(?:{inner}))*)")
                } else {
                    format!("({inner})")
                };
                if param.optional {
                    re.push_str(&format!("(?:/{body})?"));
                } else {
                    re.push('/');
                    re.push_str(&body);
                }
                continue;
            }

            re.push('/');
            for token in &segment.0 {
                match token {
                    PathToken::Static(text) => re.push_str(&regex::escape(text)),
                    PathToken::Param(param) => {
                        push_param(param)?;
                        let inner =
                            param.regexp.as_deref().unwrap_or(DEFAULT_PARAM_RE);
                        re.push('(');
                        re.push_str(inner);
                        re.push(')');
                        if param.optional {
                            re.push('?');
                        }
                    }
                    PathToken::Splat(_) => unreachable!("splats were rewritten above"),
                }
            }
        }

        if segments.is_empty() {
            re.push('/');
        } else if !options.strict {
            re.push_str("/?");
        } else if tokenized.trailing_slash {
            re.push('/');
        }
        re.push('$');

        let re = Regex::new(&re).map_err(|e| RouterError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        let root_optional = !segments.is_empty()
            && !tokenized.trailing_slash
            && segments
                .iter()
                .all(|s| s.sole_param().is_some_and(|p| p.optional));

        Ok(Self {
            re,
            params,
            segments,
            trailing_slash: tokenized.trailing_slash,
            root_optional,
        })
    }

    /// The names of the params, in the order they appear in the path.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }

    fn param(&self, name: &str) -> Option<&DynamicParam> {
        self.params.iter().find(|p| p.name == name)
    }

    fn build_value(
        &self,
        param: &DynamicParam,
        params: &Params,
    ) -> Result<Option<String>, RouterError> {
        let value = match params.get(&param.name) {
            Some(value) if !value.is_empty() => value,
            _ if param.optional => return Ok(None),
            _ => return Err(RouterError::MissingParam(param.name.clone())),
        };

        let encode_one = |value: &ParamValue| -> Result<String, RouterError> {
            let raw = param
                .parser
                .set(value)
                .map_err(|e| e.into_router_error(&param.name))?;
            if let Some(validator) = &param.validator {
                if !validator.is_match(&raw) {
                    return Err(RouterError::InvalidParam {
                        param: param.name.clone(),
                        reason: format!(
                            "\"{raw}\" does not match {}",
                            validator.as_str()
                        ),
                    });
                }
            }
            Ok(if param.splat {
                encode_path(&raw)
            } else {
                encode_param(&raw)
            })
        };

        let built = match value {
            ParamValue::List(values) if param.repeatable => values
                .iter()
                .map(encode_one)
                .collect::<Result<Vec<_>, _>>()?
                .join("/"),
            ParamValue::List(_) => {
                return Err(RouterError::InvalidParam {
                    param: param.name.clone(),
                    reason: "a list is only valid for a repeatable param"
                        .to_string(),
                })
            }
            value => encode_one(value)?,
        };
        Ok(Some(built))
    }
}

impl MatchPath for DynamicPath {
    fn match_path(&self, path: &str) -> Result<Params, MatchMiss> {
        let subject = if self.root_optional && path == "/" { "" } else { path };
        let captures = self.re.captures(subject).ok_or(MatchMiss)?;

        let mut params = Params::with_capacity(self.params.len());
        for (idx, param) in self.params.iter().enumerate() {
            let value = match captures.get(idx + 1) {
                None if param.repeatable => ParamValue::List(Vec::new()),
                None if param.splat => ParamValue::String(String::new()),
                None => ParamValue::Null,
                Some(m) if param.repeatable => ParamValue::List(
                    m.as_str()
                        .split('/')
                        .map(|raw| param.parser.get(&decode(raw)))
                        .collect::<Result<_, _>>()
                        .map_err(|e| {
                            tracing::trace!("param \"{}\" rejected: {e}", param.name);
                            MatchMiss
                        })?,
                ),
                Some(m) => param.parser.get(&decode(m.as_str())).map_err(|e| {
                    tracing::trace!("param \"{}\" rejected: {e}", param.name);
                    MatchMiss
                })?,
            };
            params.insert(param.name.clone(), value);
        }
        Ok(params)
    }

    fn build_path(&self, params: &Params) -> Result<String, RouterError> {
        let mut path = String::new();

        for segment in &self.segments {
            if let Some(token) = segment.sole_param() {
                let Some(param) = self.param(&token.name) else {
                    continue;
                };
                if let Some(value) = self.build_value(param, params)? {
                    path.push('/');
                    path.push_str(&value);
                }
                continue;
            }

            path.push('/');
            for token in &segment.0 {
                match token {
                    PathToken::Static(text) => path.push_str(text),
                    PathToken::Param(token) => {
                        if let Some(param) = self.param(&token.name) {
                            if let Some(value) = self.build_value(param, params)? {
                                path.push_str(&value);
                            }
                        }
                    }
                    PathToken::Splat(_) => {}
                }
            }
        }

        if path.is_empty() {
            path.push('/');
        } else if self.trailing_slash && !path.ends_with('/') {
            path.push('/');
        }
        Ok(path)
    }
}
