// Incremental search-and-filter pipeline.
// keystroke -> debounce -> sequenced directory request -> local filters -> presenter.
// Filter changes skip the first two stages and never reach the network.

pub mod debounce;
pub mod filter;
pub mod pipeline;
pub mod presenter;
pub mod sequence;

pub use filter::RoleFilter;
pub use pipeline::{spawn, PipelineConfig};
