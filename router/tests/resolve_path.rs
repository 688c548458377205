use route_resolver::{resolve_relative_path, strip_base};

#[test]
fn absolute_paths_are_kept() {
    assert_eq!(resolve_relative_path("/add", "/users/ana"), "/add");
}

#[test]
fn parent_segments_move_up() {
    assert_eq!(resolve_relative_path("../add", "/users/ana"), "/add");
    assert_eq!(resolve_relative_path("../add", "/users/ana/"), "/users/add");
}

#[test]
fn current_segment_stays() {
    assert_eq!(
        resolve_relative_path("./add", "/users/ana/"),
        "/users/ana/add"
    );
    assert_eq!(resolve_relative_path("./add", "/users/ana"), "/users/add");
    assert_eq!(resolve_relative_path("add", "/users/ana"), "/users/add");
}

#[test]
fn parent_segments_stop_at_root() {
    assert_eq!(resolve_relative_path("../../../add", "/users/ana"), "/add");
    assert_eq!(resolve_relative_path("../../..", "/users/ana"), "/");
}

#[test]
fn trailing_dots_keep_a_trailing_slash() {
    assert_eq!(resolve_relative_path(".", "/users/ana"), "/users/");
    assert_eq!(resolve_relative_path("..", "/users/ana/a"), "/users/");
}

#[test]
fn only_leading_dots_are_resolved() {
    assert_eq!(
        resolve_relative_path("./a/../b", "/users/ana"),
        "/users/a/../b"
    );
}

#[test]
fn empty_target_is_the_current_path() {
    assert_eq!(resolve_relative_path("", "/users/ana"), "/users/ana");
}

#[test]
fn non_absolute_from_is_passed_through() {
    assert_eq!(resolve_relative_path("add", "users"), "add");
}

#[test]
fn strip_base_ignores_case() {
    assert_eq!(strip_base("/Base/foo", "/base"), "/foo");
    assert_eq!(strip_base("/base", "/base"), "/");
    assert_eq!(strip_base("/other/foo", "/base"), "/other/foo");
    assert_eq!(strip_base("/foo", ""), "/foo");
}
