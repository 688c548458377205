mod hash_pattern;
mod path;
mod path_segment;
mod query_pattern;
pub(crate) mod resolve_path;
mod route;
mod table;

pub use hash_pattern::*;
pub use path::*;
pub use path_segment::*;
pub use query_pattern::*;
pub use resolve_path::*;
pub use route::*;
pub use table::RecordKey;
pub(crate) use table::RouteTable;
