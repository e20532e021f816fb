//! Domain layer for the queue client.
//!
//! This module contains the queue rules (status labels, refresh cadence,
//! name masking inputs) independent of the HTTP transport and the storage
//! backend. Infrastructure implements the traits declared here.

pub mod entity;
pub mod error;
pub mod gateway;
pub mod policy;
pub mod store;
pub mod value_object;

pub use entity::{
    ApplicationForm, ClientRecord, ClientSession, QueueEntry, Settings, Submission, WaitingList,
};
pub use error::{GatewayError, StorageError, ValueObjectError};
pub use gateway::{AdminGateway, QueueGateway};
pub use policy::{RetryPolicy, refresh_rate};
pub use store::KeyValueStore;
pub use value_object::{ClientName, ClientStatus, LightType};

#[cfg(test)]
pub use gateway::MockQueueGateway;
