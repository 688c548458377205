use route_resolver::{
    params, tokenize_path, DynamicPath, HashParam, HashPattern, MatchHash,
    MatchMiss, MatchPath, MatchQuery, ParamCodec, ParamError, ParamParser,
    ParamValue, Params, PathOptions, PathPattern, QueryFormat, QueryParam,
    QueryPattern, RouterError, StarPath, StaticPath, parse_query,
    LocationQuery,
};
use rustc_hash::FxHashMap;

fn round_trips(pattern: &PathPattern, path: &str) {
    let params = pattern
        .match_path(path)
        .unwrap_or_else(|_| panic!("{path} should match {pattern:?}"));
    assert_eq!(pattern.build_path(&params).unwrap(), path);
}

#[test]
fn canonical_paths_round_trip() {
    let cases = [
        ("/", "/"),
        ("/about", "/about"),
        ("/users/:id", "/users/42"),
        ("/users/:id", "/users/a%20b"),
        ("/users/:id/:tab?", "/users/1"),
        ("/users/:id/:tab?", "/users/1/info"),
        ("/files/:path+", "/files/a/b/c"),
        ("/files/:path*", "/files"),
        ("/docs/*rest", "/docs/guide/intro"),
        ("/docs/*rest", "/docs"),
        ("/:lang?/about", "/about"),
        ("/:lang?/about", "/en/about"),
        (r"/orders/:id(\d+)", "/orders/12"),
        ("/v:major.:minor", "/v1.2"),
        ("/users/:id/", "/users/1/"),
        ("/users/:id/*rest", "/users/1/a/b"),
        ("/users/:id/*rest", "/users/1"),
    ];
    for (pattern, path) in cases {
        round_trips(&PathPattern::parse(pattern).unwrap(), path);
    }

    let insensitive = PathOptions {
        sensitive: false,
        strict: true,
    };
    let docs =
        PathPattern::compile("/docs/*rest", insensitive, &FxHashMap::default())
            .unwrap();
    assert!(matches!(docs, PathPattern::Dynamic(_)));
    round_trips(&docs, "/docs/guide/intro");
    round_trips(&docs, "/docs");
    assert_eq!(
        docs.build_path(&params! { "rest" => "guide/intro" }).unwrap(),
        "/docs/guide/intro"
    );
}

#[test]
fn static_paths_are_exact() {
    let pattern = PathPattern::parse("/about").unwrap();
    assert!(matches!(pattern, PathPattern::Static(_)));
    assert_eq!(pattern.match_path("/about/"), Err(MatchMiss));
    assert_eq!(pattern.match_path("/About"), Err(MatchMiss));
    assert_eq!(
        StaticPath::new("/a").build_path(&params! { "x" => "y" }).unwrap(),
        "/a"
    );
}

#[test]
fn star_captures_remainder() {
    let star = StarPath::new("/docs", "rest");
    let params = star.match_path("/docs/a/b").unwrap();
    assert_eq!(params.get_str("rest"), Some("a/b"));
    assert!(star.build_path(&params! { "rest" => 1i64 }).is_err());
}

#[test]
fn dynamic_missing_param_is_an_error() {
    let path = DynamicPath::parse("/users/:id").unwrap();
    assert_eq!(
        path.build_path(&Params::new()),
        Err(RouterError::MissingParam("id".to_string()))
    );
}

#[test]
fn dynamic_param_values_are_encoded() {
    let path = DynamicPath::parse("/search/:term").unwrap();
    assert_eq!(
        path.build_path(&params! { "term" => "a/b c" }).unwrap(),
        "/search/a%2Fb%20c"
    );
    let params = path.match_path("/search/a%2Fb%20c").unwrap();
    assert_eq!(params.get_str("term"), Some("a/b c"));
}

#[test]
fn int_parser_rejects_other_text() {
    let mut parsers = FxHashMap::default();
    parsers.insert("id".to_string(), ParamParser::Int);
    let pattern =
        PathPattern::compile("/users/:id", PathOptions::default(), &parsers)
            .unwrap();
    assert_eq!(
        pattern.match_path("/users/42").unwrap().get("id"),
        Some(&ParamValue::Int(42))
    );
    assert_eq!(pattern.match_path("/users/me"), Err(MatchMiss));
    assert!(matches!(
        pattern.build_path(&params! { "id" => "me" }),
        Err(RouterError::InvalidParam { .. })
    ));
    assert_eq!(
        pattern.build_path(&params! { "id" => 7i64 }).unwrap(),
        "/users/7"
    );
}

#[derive(Debug)]
struct Slug;

impl ParamCodec for Slug {
    fn get(&self, raw: &str) -> Result<ParamValue, ParamError> {
        if raw.chars().all(|c| c.is_ascii_lowercase() || c == '-') {
            Ok(ParamValue::String(raw.replace('-', " ")))
        } else {
            Err(ParamError::new("not a slug"))
        }
    }

    fn set(&self, value: &ParamValue) -> Result<String, ParamError> {
        value
            .as_str()
            .map(|s| s.replace(' ', "-"))
            .ok_or_else(|| ParamError::new("expected a string"))
    }
}

#[test]
fn custom_param_codec() {
    let mut parsers = FxHashMap::default();
    parsers.insert("title".to_string(), ParamParser::custom(Slug));
    let pattern =
        PathPattern::compile("/posts/:title", PathOptions::default(), &parsers)
            .unwrap();
    let params = pattern.match_path("/posts/hello-world").unwrap();
    assert_eq!(params.get_str("title"), Some("hello world"));
    assert_eq!(pattern.build_path(&params).unwrap(), "/posts/hello-world");
    assert_eq!(pattern.match_path("/posts/Hello"), Err(MatchMiss));
}

#[derive(Debug)]
struct Prefixed;

impl MatchPath for Prefixed {
    fn match_path(&self, path: &str) -> Result<Params, MatchMiss> {
        let id = path.strip_prefix("/~").ok_or(MatchMiss)?;
        Ok(params! { "user" => id })
    }

    fn build_path(&self, params: &Params) -> Result<String, RouterError> {
        let user = params
            .get_str("user")
            .ok_or_else(|| RouterError::MissingParam("user".to_string()))?;
        Ok(format!("/~{user}"))
    }
}

#[test]
fn custom_path_pattern() {
    let pattern = PathPattern::custom(Prefixed);
    round_trips(&pattern, "/~ana");
    assert_eq!(pattern.match_path("/ana"), Err(MatchMiss));
}

#[test]
fn invalid_patterns_are_rejected() {
    for pattern in [
        "users",
        "/:a/:a",
        "/:",
        "/:id(\\d+",
        "/:id((\\d+))",
        "/*rest/more",
        "/a-:parts+",
        "/a\\",
    ] {
        assert!(
            matches!(
                PathPattern::parse(pattern),
                Err(RouterError::InvalidPattern { .. })
            ),
            "{pattern} should be rejected"
        );
    }
}

#[test]
fn tokenizer_reports_trailing_slash() {
    let tokens = tokenize_path("/users/:id/").unwrap();
    assert!(tokens.trailing_slash);
    assert_eq!(tokens.segments.len(), 2);
    assert_eq!(tokens.params().count(), 1);
}

#[test]
fn query_patterns_compose() {
    let page = QueryPattern::from(
        QueryParam::new("page").parser(ParamParser::Int).default(1i64),
    );
    let tags = QueryPattern::from(
        QueryParam::new("tags").key("tag").format(QueryFormat::Array),
    );
    let query = parse_query("tag=a&tag=b&page=3");

    let mut params = page.match_query(&query).unwrap();
    params.merge(tags.match_query(&query).unwrap());
    assert_eq!(params.get("page"), Some(&ParamValue::Int(3)));
    assert_eq!(params.get("tags"), Some(&ParamValue::from(vec!["a", "b"])));

    let mut built = LocationQuery::new();
    built.merge(page.build_query(&params).unwrap());
    built.merge(tags.build_query(&params).unwrap());
    assert_eq!(built.to_query_string(), "?page=3&tag=a&tag=b");
}

#[test]
fn required_query_param_misses_when_absent() {
    let q = QueryParam::new("q").required();
    assert_eq!(q.match_query(&parse_query("other=1")), Err(MatchMiss));
    assert!(q.match_query(&parse_query("q=x")).is_ok());
}

#[test]
fn hash_pattern_round_trips() {
    let hash = HashPattern::from(HashParam::new("section"));
    let params = hash.match_hash("#intro").unwrap();
    assert_eq!(params.get_str("section"), Some("intro"));
    assert_eq!(hash.build_hash(&params).unwrap(), "#intro");
    assert_eq!(
        hash.match_hash("").unwrap().get("section"),
        Some(&ParamValue::Null)
    );
}
