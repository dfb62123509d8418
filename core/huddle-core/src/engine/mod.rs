//! Database Engine Module

pub mod constructors;
pub mod database;
pub mod policy;
pub mod registry;

pub use database::Database;
pub use policy::{
    Clock, FixedClock, IdGenerator, RecordPolicy, SequentialIds, SystemClock, UuidGenerator,
    primary_key_field,
};
