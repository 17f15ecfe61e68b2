//! Payment / order aggregate core of a gift certificate shop.
//!
//! The crate exposes three layers: a storage access layer executing
//! parameterized SQL on a unit-of-work transaction, a pure aggregate builder
//! grouping joined rows into the `Payment` owning graph, and a payment
//! service that orchestrates storage calls, validates pagination input, and
//! converts not-found conditions into domain errors. Transport concerns
//! (routing, link assembly, wire rendering) live outside this crate.

pub mod aggregate;
pub mod dao;
pub mod entities;
pub mod error;
pub mod executor;
pub mod service;
pub mod unit_of_work;

pub use dao::PaymentDao;
pub use entities::{GiftCertificate, Payment, User, UserOrder};
pub use error::{ServiceError, ServiceResult, StoreError, StoreResult};
pub use executor::Executor;
pub use service::{Page, PaymentService, MAX_PAGE_SIZE};
pub use unit_of_work::{SqliteUnitOfWork, SqliteUnitOfWorkSession, UnitOfWork, UnitOfWorkSession};
