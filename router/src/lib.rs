#![forbid(unsafe_code)]

//! Translates between URLs and typed route locations.
//!
//! Routes are declared as a tree of [`RouteDef`]s and compiled by a
//! [`Resolver`] into a flat table of [`RouteRecord`]s. The resolver then
//! turns any [`RouteLocationRaw`] (a URL string, a path, a route name with
//! params, or changes to the current location) into a [`ResolvedLocation`]:
//! the matched records from the root down, the params read from the path,
//! query and hash, and the canonical full path.
//!
//! ```rust
//! use route_resolver::{
//!     params, LocationAsRelative, ParamParser, ParamValue, QueryParam,
//!     Resolver, RouteDef,
//! };
//!
//! let mut resolver = Resolver::<&str>::new();
//! resolver
//!     .add_matcher(
//!         RouteDef::new("/users")
//!             .query(QueryParam::new("sort"))
//!             .child(
//!                 RouteDef::new(":id")
//!                     .name("user")
//!                     .target("UserPage")
//!                     .param("id", ParamParser::Int),
//!             ),
//!     )
//!     .unwrap();
//!
//! let user = resolver.resolve("/users/42?sort=name", None).unwrap();
//! assert_eq!(user.name, "user");
//! assert_eq!(user.params.get("id"), Some(&ParamValue::Int(42)));
//! assert_eq!(user.params.get_str("sort"), Some("name"));
//! assert_eq!(user.leaf().and_then(|r| r.target()), Some(&"UserPage"));
//!
//! let next = resolver
//!     .resolve(
//!         LocationAsRelative::new().params(params! { "id" => 7i64 }),
//!         Some(&user),
//!     )
//!     .unwrap();
//! assert_eq!(next.full_path, "/users/7?sort=name");
//! ```
//!
//! Strings that match no route resolve to a location named [`NO_MATCH`];
//! unknown route names and other programming errors are [`RouterError`]s.

pub mod encoding;
mod error;
pub mod location;
mod matching;
mod name;
mod options;
mod params;
mod query;
mod resolver;

pub use error::*;
pub use location::{parse_url, stringify_url, Url};
pub use matching::*;
pub use name::*;
pub use options::*;
pub use params::*;
pub use query::*;
pub use resolver::*;
