//! Product catalog: record types, the repository seam used by adapters and
//! the JSON file-backed store that implements it.

pub mod domain;
pub mod repository;
pub mod seed;
pub mod store;

pub use domain::{NewProduct, Product, ProductPatch};
pub use repository::ProductRepository;
pub use store::ProductStore;
