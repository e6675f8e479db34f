pub mod nodesource;
pub mod usage;

pub use nodesource::NodeSourceRequest;
pub use usage::TaskUsage;
