// File IO: source adapters in, tabular + hierarchical projections out

pub mod error;
pub mod hierarchical;
pub mod reader;
pub mod slug;
pub mod sources;
pub mod tabular;

pub use error::{SourceError, WriteError};
pub use hierarchical::{build_hierarchy, export_hierarchical, write_hierarchical, Hierarchy, Leaf};
pub use sources::{load_all, open_source};
pub use tabular::{export_tabular, write_tabular};

/// Header of the tabular projection, in column order.
pub const TABULAR_HEADER: [&str; 4] = ["software_name", "github_slug", "ror_id", "extraction_methods"];
