use route_resolver::{Resolver, ResolverOptions, RouteDef, RouterError};
use std::{fs::File, io::Write};
use tempfile::NamedTempFile;

const OPTIONS_OK: &str = r#"
base = "/app"
sensitive = false
strict = false
"#;

const OPTIONS_ERR: &str = r#"
- invalid toml -
"#;

#[test]
fn options_from_str() {
    let options = ResolverOptions::from_toml_str(OPTIONS_OK).unwrap();
    assert_eq!(
        options,
        ResolverOptions::builder()
            .base("/app")
            .sensitive(false)
            .strict(false)
            .build()
    );
}

#[test]
fn missing_keys_keep_defaults() {
    let options = ResolverOptions::from_toml_str("base = \"/app\"").unwrap();
    assert_eq!(options.base, "/app");
    assert!(options.sensitive);
    assert!(options.strict);
    assert_eq!(
        ResolverOptions::from_toml_str("").unwrap(),
        ResolverOptions::default()
    );
}

#[test]
fn invalid_toml_is_a_config_error() {
    assert!(matches!(
        ResolverOptions::from_toml_str(OPTIONS_ERR),
        Err(RouterError::Config(_))
    ));
}

#[test]
fn options_from_file() {
    let tmp = NamedTempFile::new().unwrap();
    {
        let mut output = File::create(&tmp).unwrap();
        write!(output, "{OPTIONS_OK}").unwrap();
    }
    let options = ResolverOptions::from_file(tmp.path()).unwrap();
    assert_eq!(options.base, "/app");
    assert!(!options.strict);

    let mut resolver = Resolver::<()>::with_options(options);
    resolver.add_matcher(RouteDef::new("/Docs").name("docs")).unwrap();
    let docs = resolver
        .resolve(resolver.strip_base("/APP/docs/"), None)
        .unwrap();
    assert_eq!(docs.name, "docs");
    assert_eq!(resolver.href(&docs), "/app/docs/");
}

#[test]
fn missing_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        ResolverOptions::from_file(dir.path().join("missing.toml")),
        Err(RouterError::Config(_))
    ));
}
