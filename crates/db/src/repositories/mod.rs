//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod line_observation_repo;
pub mod waiting_customer_meta_repo;

pub use line_observation_repo::LineObservationRepo;
pub use waiting_customer_meta_repo::WaitingCustomerMetaRepo;
