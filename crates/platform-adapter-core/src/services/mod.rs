//! Services built on top of the capability ports.

mod resolver;

pub use resolver::{ProbingResolver, ProbingResolverBuilder};
