mod consolidate;
mod normalize;
mod organize;
mod util;

pub use consolidate::Consolidate;
pub use normalize::Normalize;
pub use organize::Organize;
