//! Remote procedure gateway abstraction.
//!
//! The use cases and the poller only see this trait; the HTTP client in
//! `infrastructure::gateway` implements it (dependency inversion).

use async_trait::async_trait;
use serde_json::Value;

use super::{
    entity::{ApplicationForm, Settings, Submission, WaitingList},
    error::GatewayError,
    value_object::{ClientName, ClientStatus},
};

/// Queue-facing functions of the spreadsheet endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueueGateway: Send + Sync {
    /// Register a new application.
    ///
    /// `Err(GatewayError::Application(_))` carries the endpoint's refusal
    /// message (duplicate name, queue full...).
    async fn submit_application(&self, form: &ApplicationForm) -> Result<Submission, GatewayError>;

    /// Public waiting list plus the record of `client_name`, if any.
    async fn get_waiting_list(
        &self,
        client_name: &ClientName,
    ) -> Result<WaitingList, GatewayError>;

    async fn get_meeting_settings(&self) -> Result<Settings, GatewayError>;
}

/// Administrative functions. The password is forwarded as-is; checking it
/// is the endpoint's job.
#[async_trait]
pub trait AdminGateway: Send + Sync {
    async fn get_admin_clients_list(&self, password: &str) -> Result<Value, GatewayError>;

    async fn update_client_status(
        &self,
        row: u32,
        new_status: &ClientStatus,
        password: &str,
    ) -> Result<Value, GatewayError>;

    async fn update_settings(&self, settings: &Settings) -> Result<Value, GatewayError>;
}
