pub mod dummy;
pub mod factory;
pub mod kmeans;
pub mod logistic;
pub mod method_trait;
pub mod svm;
pub mod utils;

pub use method_trait::Method;
