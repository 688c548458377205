use crate::{
    LocationQuery, MatchMiss, ParamParser, ParamValue, Params, QueryValue,
    RouterError,
};
use std::{fmt::Debug, sync::Arc};

/// Matches the params a route reads from the query and builds them back.
///
/// Each pattern only concerns its own keys, so the patterns of every record
/// in a matched chain can be combined by merging their outputs.
pub trait MatchQuery: Debug + Send + Sync {
    fn match_query(&self, query: &LocationQuery) -> Result<Params, MatchMiss>;

    fn build_query(&self, params: &Params) -> Result<LocationQuery, RouterError>;

    /// The query keys this pattern reads and writes.
    ///
    /// When building a location relative to another one, a listed key that
    /// the pattern does not build is dropped instead of being carried over.
    fn query_keys(&self) -> Vec<&str> {
        Vec::new()
    }
}

/// Whether a query param holds one value or all of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryFormat {
    /// The last value of the key.
    #[default]
    Value,
    /// Every value of the key, as a list.
    Array,
}

/// Reads one param from one query key.
///
/// # Examples
/// ```rust
/// use route_resolver::{
///     parse_query, MatchQuery, ParamParser, ParamValue, QueryParam,
/// };
///
/// let page = QueryParam::new("page").parser(ParamParser::Int).default(1i64);
/// let params = page.match_query(&parse_query("page=3")).unwrap();
/// assert_eq!(params.get("page"), Some(&ParamValue::Int(3)));
///
/// let params = page.match_query(&parse_query("")).unwrap();
/// assert_eq!(params.get("page"), Some(&ParamValue::Int(1)));
/// assert!(page.build_query(&params).unwrap().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct QueryParam {
    param: String,
    key: String,
    format: QueryFormat,
    parser: ParamParser,
    default: Option<ParamValue>,
    required: bool,
}

impl QueryParam {
    /// Reads the param `param` from the query key of the same name.
    pub fn new(param: impl Into<String>) -> Self {
        let param = param.into();
        Self {
            key: param.clone(),
            param,
            format: QueryFormat::Value,
            parser: ParamParser::String,
            default: None,
            required: false,
        }
    }

    /// Reads from a query key different from the param name.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn format(mut self, format: QueryFormat) -> Self {
        self.format = format;
        self
    }

    pub fn parser(mut self, parser: ParamParser) -> Self {
        self.parser = parser;
        self
    }

    /// Used when the key is missing or its value cannot be parsed. A value
    /// equal to the default is left out when building.
    pub fn default(mut self, value: impl Into<ParamValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Makes a bare key, or a missing key with no default, a miss.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn param_name(&self) -> &str {
        &self.param
    }

    pub fn query_key(&self) -> &str {
        &self.key
    }

    fn parse_values(
        &self,
        value: &QueryValue,
    ) -> Result<ParamValue, crate::ParamError> {
        match self.format {
            QueryFormat::Value => match value.last() {
                Some(raw) => self.parser.get(raw),
                None => Ok(ParamValue::Null),
            },
            QueryFormat::Array => value
                .all()
                .into_iter()
                .flatten()
                .map(|raw| self.parser.get(raw))
                .collect::<Result<Vec<_>, _>>()
                .map(ParamValue::List),
        }
    }

    /// The value of a key absent from the query. `None` leaves the param
    /// out, so it builds back to nothing.
    fn missing(&self) -> Result<Option<ParamValue>, MatchMiss> {
        match (&self.default, self.format) {
            (Some(default), _) => Ok(Some(default.clone())),
            (None, _) if self.required => Err(MatchMiss),
            (None, QueryFormat::Value) => Ok(None),
            (None, QueryFormat::Array) => Ok(Some(ParamValue::List(Vec::new()))),
        }
    }
}

impl MatchQuery for QueryParam {
    fn match_query(&self, query: &LocationQuery) -> Result<Params, MatchMiss> {
        let value = match query.get(&self.key) {
            None => self.missing()?,
            Some(raw) => {
                if self.format == QueryFormat::Value
                    && matches!(raw, QueryValue::List(_))
                {
                    tracing::warn!(
                        "query key \"{}\" appears more than once, using the \
                         last value",
                        self.key
                    );
                }
                match self.parse_values(raw) {
                    // a bare key
                    Ok(ParamValue::Null) if self.required => return Err(MatchMiss),
                    Ok(value) => Some(value),
                    Err(e) => {
                        tracing::trace!("query param \"{}\" rejected: {e}", self.key);
                        Some(self.default.clone().ok_or(MatchMiss)?)
                    }
                }
            }
        };

        let mut params = Params::with_capacity(1);
        if let Some(value) = value {
            params.insert(self.param.clone(), value);
        }
        Ok(params)
    }

    fn build_query(&self, params: &Params) -> Result<LocationQuery, RouterError> {
        let mut query = LocationQuery::new();
        let Some(value) = params.get(&self.param) else {
            return Ok(query);
        };
        if self.default.as_ref() == Some(value) {
            return Ok(query);
        }

        let set = |value: &ParamValue| {
            self.parser
                .set(value)
                .map_err(|e| e.into_router_error(&self.param))
        };
        let built = match (value, self.format) {
            (ParamValue::Null, _) => QueryValue::Null,
            (ParamValue::List(values), QueryFormat::Array) => QueryValue::List(
                values
                    .iter()
                    .map(|v| set(v).map(Some))
                    .collect::<Result<_, _>>()?,
            ),
            (value, QueryFormat::Array) => QueryValue::List(vec![Some(set(value)?)]),
            (ParamValue::List(_), QueryFormat::Value) => {
                return Err(RouterError::InvalidParam {
                    param: self.param.clone(),
                    reason: "a list needs the array query format".to_string(),
                })
            }
            (value, QueryFormat::Value) => QueryValue::Value(set(value)?),
        };
        query.replace(self.key.clone(), built);
        Ok(query)
    }

    fn query_keys(&self) -> Vec<&str> {
        vec![self.key.as_str()]
    }
}

/// The query half of a route record.
#[derive(Debug, Clone)]
pub enum QueryPattern {
    Param(QueryParam),
    Custom(Arc<dyn MatchQuery>),
}

impl QueryPattern {
    pub fn custom(matcher: impl MatchQuery + 'static) -> Self {
        QueryPattern::Custom(Arc::new(matcher))
    }
}

impl MatchQuery for QueryPattern {
    fn match_query(&self, query: &LocationQuery) -> Result<Params, MatchMiss> {
        match self {
            QueryPattern::Param(p) => p.match_query(query),
            QueryPattern::Custom(p) => p.match_query(query),
        }
    }

    fn build_query(&self, params: &Params) -> Result<LocationQuery, RouterError> {
        match self {
            QueryPattern::Param(p) => p.build_query(params),
            QueryPattern::Custom(p) => p.build_query(params),
        }
    }

    fn query_keys(&self) -> Vec<&str> {
        match self {
            QueryPattern::Param(p) => p.query_keys(),
            QueryPattern::Custom(p) => p.query_keys(),
        }
    }
}

impl From<QueryParam> for QueryPattern {
    fn from(value: QueryParam) -> Self {
        QueryPattern::Param(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{params, parse_query};

    #[test]
    fn value_format_reads_last_value() {
        let tab = QueryParam::new("tab");
        let params = tab.match_query(&parse_query("tab=a&tab=b")).unwrap();
        assert_eq!(params.get_str("tab"), Some("b"));
    }

    #[test]
    fn array_format_reads_every_value() {
        let ids = QueryParam::new("ids")
            .key("id")
            .format(QueryFormat::Array)
            .parser(ParamParser::Int);
        let params = ids.match_query(&parse_query("id=1&id&id=3")).unwrap();
        assert_eq!(
            params.get("ids"),
            Some(&ParamValue::List(vec![ParamValue::Int(1), ParamValue::Int(3)]))
        );
        let query = ids.build_query(&params).unwrap();
        assert_eq!(query.to_query_string(), "?id=1&id=3");
    }

    #[test]
    fn missing_key_is_left_out_unless_required() {
        let q = QueryParam::new("q");
        let params = q.match_query(&LocationQuery::new()).unwrap();
        assert!(params.is_empty());
        assert!(q.build_query(&params).unwrap().is_empty());
        assert_eq!(
            q.clone().required().match_query(&LocationQuery::new()),
            Err(MatchMiss)
        );
    }

    #[test]
    fn bare_key_is_null_and_builds_back() {
        let q = QueryParam::new("q").default("x");
        let params = q.match_query(&parse_query("q")).unwrap();
        assert_eq!(params.get("q"), Some(&ParamValue::Null));
        assert_eq!(q.build_query(&params).unwrap().to_query_string(), "?q");
        assert_eq!(
            q.required().match_query(&parse_query("q")),
            Err(MatchMiss)
        );
    }

    #[test]
    fn default_value_is_not_built() {
        let page = QueryParam::new("page").parser(ParamParser::Int).default(1i64);
        assert!(page.build_query(&params! { "page" => 1i64 }).unwrap().is_empty());
        assert_eq!(
            page.build_query(&params! { "page" => 2i64 })
                .unwrap()
                .to_query_string(),
            "?page=2"
        );
        assert_eq!(page.query_keys(), ["page"]);
    }

    #[test]
    fn unparsable_value_falls_back_to_default() {
        let page = QueryParam::new("page").parser(ParamParser::Int);
        assert_eq!(page.match_query(&parse_query("page=x")), Err(MatchMiss));
        let page = page.default(1i64);
        assert_eq!(
            page.match_query(&parse_query("page=x")).unwrap().get("page"),
            Some(&ParamValue::Int(1))
        );
    }

    #[test]
    fn build_skips_absent_params() {
        let q = QueryParam::new("q");
        assert!(q.build_query(&params! {}).unwrap().is_empty());
        assert_eq!(
            q.build_query(&params! { "q" => ParamValue::Null })
                .unwrap()
                .to_query_string(),
            "?q"
        );
    }
}
