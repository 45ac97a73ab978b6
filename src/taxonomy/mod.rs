mod closure;
mod data;
mod filter;
mod project;
mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use data::RadialScheme;
pub use filter::{ExplorerFilters, FilterCache};
pub use project::{ExplorerGraph, RenderedNode};
pub use store::{TaxonInfo, TaxonomyStore};
