use crate::{MatchMiss, ParamParser, ParamValue, Params, RouterError};
use std::{fmt::Debug, sync::Arc};

/// Matches the params a route reads from the hash and builds them back.
///
/// Hashes are handled decoded, with their leading `#`.
pub trait MatchHash: Debug + Send + Sync {
    fn match_hash(&self, hash: &str) -> Result<Params, MatchMiss>;

    fn build_hash(&self, params: &Params) -> Result<String, RouterError>;
}

/// Reads one param from the whole hash.
#[derive(Debug, Clone)]
pub struct HashParam {
    param: String,
    parser: ParamParser,
    default: Option<ParamValue>,
    required: bool,
}

impl HashParam {
    pub fn new(param: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            parser: ParamParser::String,
            default: None,
            required: false,
        }
    }

    pub fn parser(mut self, parser: ParamParser) -> Self {
        self.parser = parser;
        self
    }

    /// Used when the hash is empty or cannot be parsed. A value equal to
    /// the default builds an empty hash.
    pub fn default(mut self, value: impl Into<ParamValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Makes an empty hash (with no default) a miss.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn param_name(&self) -> &str {
        &self.param
    }
}

impl MatchHash for HashParam {
    fn match_hash(&self, hash: &str) -> Result<Params, MatchMiss> {
        let raw = hash.strip_prefix('#').unwrap_or(hash);
        let value = if raw.is_empty() {
            match &self.default {
                Some(default) => default.clone(),
                None if self.required => return Err(MatchMiss),
                None => ParamValue::Null,
            }
        } else {
            match self.parser.get(raw) {
                Ok(value) => value,
                Err(e) => {
                    tracing::trace!("hash param \"{}\" rejected: {e}", self.param);
                    self.default.clone().ok_or(MatchMiss)?
                }
            }
        };

        let mut params = Params::with_capacity(1);
        params.insert(self.param.clone(), value);
        Ok(params)
    }

    fn build_hash(&self, params: &Params) -> Result<String, RouterError> {
        match params.get(&self.param) {
            None | Some(ParamValue::Null) => Ok(String::new()),
            Some(value) if self.default.as_ref() == Some(value) => Ok(String::new()),
            Some(value) => {
                let raw = self
                    .parser
                    .set(value)
                    .map_err(|e| e.into_router_error(&self.param))?;
                Ok(if raw.is_empty() {
                    raw
                } else {
                    format!("#{raw}")
                })
            }
        }
    }
}

/// The hash part of a route record.
#[derive(Debug, Clone)]
pub enum HashPattern {
    Param(HashParam),
    Custom(Arc<dyn MatchHash>),
}

impl HashPattern {
    pub fn custom(matcher: impl MatchHash + 'static) -> Self {
        HashPattern::Custom(Arc::new(matcher))
    }
}

impl MatchHash for HashPattern {
    fn match_hash(&self, hash: &str) -> Result<Params, MatchMiss> {
        match self {
            HashPattern::Param(p) => p.match_hash(hash),
            HashPattern::Custom(p) => p.match_hash(hash),
        }
    }

    fn build_hash(&self, params: &Params) -> Result<String, RouterError> {
        match self {
            HashPattern::Param(p) => p.build_hash(params),
            HashPattern::Custom(p) => p.build_hash(params),
        }
    }
}

impl From<HashParam> for HashPattern {
    fn from(value: HashParam) -> Self {
        HashPattern::Param(value)
    }
}
