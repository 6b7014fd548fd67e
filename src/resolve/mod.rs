mod index;
mod normalize;
mod resolver;

pub use index::{build_index, NameIndex};
pub use normalize::normalize;
pub use resolver::{NameResolver, ResolvedMatch};
