use route_resolver::{
    LocationAsName, ParamParser, ParamValue, Resolver, RouteDef, RouterError,
    StarPath, NO_MATCH,
};

fn paths(resolver: &Resolver<()>) -> Vec<String> {
    resolver
        .get_matchers()
        .iter()
        .map(|r| r.path().unwrap_or("<custom>").to_string())
        .collect()
}

#[test]
fn nested_paths_are_joined() {
    let mut resolver = Resolver::<()>::new();
    resolver
        .add_matcher(
            RouteDef::new("/users")
                .name("users")
                .child(RouteDef::new(":id").name("user"))
                .child(RouteDef::new("/settings").name("settings")),
        )
        .unwrap();

    let users = resolver.get_matcher("users").unwrap();
    let user = resolver.get_matcher("user").unwrap();
    assert_eq!(user.path(), Some("/users/:id"));

    let settings = resolver.get_matcher("settings").unwrap();
    assert_eq!(settings.path(), Some("/settings"));
    assert_eq!(settings.parent(), user.parent());

    let location = resolver.resolve("/settings", None).unwrap();
    assert_eq!(location.matched.len(), 2);
    assert_eq!(location.matched[0].name(), users.name());
}

#[test]
fn routes_without_name_or_target_only_group_children() {
    let mut resolver = Resolver::<()>::new();
    let admin = resolver
        .add_matcher(
            RouteDef::new("/admin").child(RouteDef::new("users").name("admin-users")),
        )
        .unwrap();
    assert!(admin.is_group());
    assert!(admin.name().is_generated());

    assert!(resolver.resolve("/admin", None).unwrap().is_no_match());
    let users = resolver.resolve("/admin/users", None).unwrap();
    assert_eq!(users.name, "admin-users");
    assert!(users.matched[0].is_group());

    assert_eq!(
        resolver
            .resolve(LocationAsName::new(admin.name()), None)
            .unwrap_err(),
        RouterError::GroupRecord(admin.name().clone())
    );
}

#[test]
fn a_target_makes_a_route_resolvable() {
    let mut resolver = Resolver::<&str>::new();
    let home = resolver
        .add_matcher(RouteDef::new("/").target("Home"))
        .unwrap();
    assert!(!home.is_group());
    let location = resolver.resolve("/", None).unwrap();
    assert_eq!(&location.name, home.name());
    assert_eq!(location.leaf().and_then(|r| r.target()), Some(&"Home"));
}

#[test]
fn duplicate_names_are_rejected() {
    let mut resolver = Resolver::<()>::new();
    resolver.add_matcher(RouteDef::new("/a").name("a")).unwrap();
    assert_eq!(
        resolver
            .add_matcher(RouteDef::new("/b").name("b").child(RouteDef::new("c").name("a")))
            .unwrap_err(),
        RouterError::DuplicateName("a".into())
    );
    assert!(!resolver.has_matcher("b"));
    assert_eq!(paths(&resolver), ["/a"]);
}

#[test]
fn the_no_match_name_is_reserved() {
    let mut resolver = Resolver::<()>::new();
    assert_eq!(
        resolver
            .add_matcher(RouteDef::new("/x").name(NO_MATCH))
            .unwrap_err(),
        RouterError::ReservedName
    );
}

#[test]
fn custom_patterns_only_take_absolute_children() {
    let mut resolver = Resolver::<()>::new();
    assert_eq!(
        resolver
            .add_matcher(
                RouteDef::with_pattern(StarPath::new("/legacy", "rest"))
                    .name("legacy")
                    .child(RouteDef::new("x")),
            )
            .unwrap_err(),
        RouterError::CannotNest
    );
    resolver
        .add_matcher(
            RouteDef::with_pattern(StarPath::new("/legacy", "rest"))
                .name("legacy")
                .child(RouteDef::new("/legacy-help").name("help")),
        )
        .unwrap();
    assert_eq!(paths(&resolver), ["/legacy-help", "<custom>"]);
}

#[test]
fn children_can_be_added_later() {
    let mut resolver = Resolver::<()>::new();
    resolver
        .add_matcher(
            RouteDef::new("/users")
                .name("users")
                .param("id", ParamParser::Int)
                .child(RouteDef::new(":id").name("user")),
        )
        .unwrap();
    let settings = resolver
        .add_child_matcher("users", RouteDef::new("settings").name("user-settings"))
        .unwrap();
    assert_eq!(settings.path(), Some("/users/settings"));
    assert_eq!(
        settings.parent(),
        resolver.get_matcher("user").unwrap().parent()
    );

    // added later, so it ranks behind the earlier routes
    assert_eq!(
        paths(&resolver),
        ["/users/:id", "/users", "/users/settings"]
    );
    let location = resolver.resolve("/users/settings", None).unwrap();
    assert_eq!(location.name, "user-settings");
    assert_eq!(location.matched.len(), 2);

    let location = resolver.resolve("/users/7", None).unwrap();
    assert_eq!(location.params.get("id"), Some(&ParamValue::Int(7)));

    assert_eq!(
        resolver
            .add_child_matcher("missing", RouteDef::new("x"))
            .unwrap_err(),
        RouterError::UnknownParent("missing".into())
    );
}

#[test]
fn aliases_match_under_another_path() {
    let mut resolver = Resolver::<()>::new();
    resolver
        .add_matcher(
            RouteDef::new("/people")
                .name("people")
                .alias("/users")
                .child(RouteDef::new(":id").name("person").alias("p/:id")),
        )
        .unwrap();
    assert_eq!(
        paths(&resolver),
        [
            "/people/:id",
            "/people/p/:id",
            "/people",
            "/users/:id",
            "/users/p/:id",
            "/users"
        ]
    );

    let location = resolver.resolve("/users/p/3", None).unwrap();
    assert_eq!(location.name, "person");
    assert_eq!(location.path, "/users/p/3");
    assert!(location.leaf().unwrap().alias_of().is_some());
    assert_eq!(location.matched[0].path(), Some("/users"));
    assert!(location.matched[0].alias_of().is_some());

    let named = resolver
        .resolve(LocationAsName::new("person").params(location.params.clone()), None)
        .unwrap();
    assert_eq!(named.full_path, "/people/3");
}

#[test]
fn removing_a_route_detaches_its_children() {
    let mut resolver = Resolver::<()>::new();
    resolver
        .add_matcher(
            RouteDef::new("/people")
                .name("people")
                .alias("/users")
                .child(RouteDef::new(":id").name("person")),
        )
        .unwrap();

    let removed = resolver.remove_matcher("people").unwrap();
    assert_eq!(removed.name(), "people");
    assert!(!resolver.has_matcher("people"));
    assert!(resolver.has_matcher("person"));
    assert_eq!(paths(&resolver), ["/people/:id", "/users/:id"]);

    assert!(resolver.resolve("/people/1", None).unwrap().is_no_match());
    assert!(resolver.resolve("/users/1", None).unwrap().is_no_match());
    assert_eq!(
        resolver
            .resolve(LocationAsName::new("person"), None)
            .unwrap_err(),
        RouterError::DetachedRecord("person".into())
    );

    assert!(resolver.remove_matcher("people").is_none());
    resolver.clear_matchers();
    assert!(resolver.get_matchers().is_empty());
}
