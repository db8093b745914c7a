pub mod dict;
pub mod error;
pub mod hash;
mod iter;
mod slot;

pub use dict::{FixedDict, PutMode};
pub use error::{DictError, Result};
pub use hash::{Fnv1aHasher, FnvBuildHasher};
pub use iter::Iter;
