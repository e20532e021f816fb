//! Apps Script RPC client.
//!
//! Every call is a `POST` of `{"function", "parameters"}` to the single web
//! app URL. A non-2xx status fails immediately; a 2xx body with an `error`
//! string is an application-level failure.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::{
    domain::{
        AdminGateway, ApplicationForm, ClientName, ClientStatus, GatewayError, QueueGateway,
        Settings, Submission, WaitingList,
    },
    infrastructure::dto::rpc::{
        RpcRequest, SettingsDto, SubmissionDto, WaitingListDto, application_error,
        application_parameters,
    },
};

/// Default timeout for RPC requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the spreadsheet-backed RPC endpoint.
#[derive(Debug, Clone)]
pub struct SheetsRpcClient {
    client: reqwest::Client,
    endpoint: String,
}

impl SheetsRpcClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - The web app URL (`https://script.google.com/macros/s/<id>/exec`)
    pub fn new(endpoint: &str) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Call a remote function and return its raw JSON result.
    pub async fn call_function(
        &self,
        function: &str,
        parameters: Value,
    ) -> Result<Value, GatewayError> {
        let request = RpcRequest::new(function, parameters);
        debug!("RPC call: {}", function);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("API call failed: {}: {}", function, e);
                GatewayError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("API call failed: {}: HTTP {}", function, status);
            return Err(GatewayError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        debug!("RPC response ({}): {}", function, body);

        serde_json::from_str(&body).map_err(|e| {
            error!("Failed to decode response of {}: {}", function, e);
            GatewayError::Decode(e.to_string())
        })
    }

    /// Call a function whose result must not carry an `error` field.
    async fn call_checked(&self, function: &str, parameters: Value) -> Result<Value, GatewayError> {
        let body = self.call_function(function, parameters).await?;
        if let Some(message) = application_error(&body) {
            debug!("RPC {} returned application error: {}", function, message);
            return Err(GatewayError::Application(message));
        }
        Ok(body)
    }

    async fn call_typed<T: DeserializeOwned>(
        &self,
        function: &str,
        parameters: Value,
    ) -> Result<T, GatewayError> {
        let body = self.call_checked(function, parameters).await?;
        serde_json::from_value(body).map_err(|e| GatewayError::Decode(e.to_string()))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Client registry
    // ─────────────────────────────────────────────────────────────────────

    pub async fn get_all_clients(&self) -> Result<Value, GatewayError> {
        self.call_checked("getAllClients", json!({})).await
    }

    pub async fn get_pending_clients(&self) -> Result<Value, GatewayError> {
        self.call_checked("getPendingClients", json!({})).await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Light lookup (尋燈)
    // ─────────────────────────────────────────────────────────────────────

    pub async fn get_all_data(&self, sheet_name: &str) -> Result<Value, GatewayError> {
        self.call_checked("getAllData", json!({ "sheetName": sheet_name }))
            .await
    }

    pub async fn export_to_sheet(
        &self,
        sheet_name: &str,
        marked_data: Value,
    ) -> Result<Value, GatewayError> {
        self.call_checked(
            "exportToSheet",
            json!({ "sheetName": sheet_name, "markedData": marked_data }),
        )
        .await
    }

    // ─────────────────────────────────────────────────────────────────────
    // System maintenance
    // ─────────────────────────────────────────────────────────────────────

    pub async fn initialize_system(&self) -> Result<Value, GatewayError> {
        self.call_checked("initializeSystem", json!({})).await
    }

    pub async fn test_system(&self) -> Result<Value, GatewayError> {
        self.call_checked("testSystem", json!({})).await
    }

    pub async fn repair_client_data(&self) -> Result<Value, GatewayError> {
        self.call_checked("repairClientData", json!({})).await
    }

    pub async fn add_test_client(&self) -> Result<Value, GatewayError> {
        self.call_checked("addTestClient", json!({})).await
    }

    pub async fn get_taiwan_date(&self) -> Result<Value, GatewayError> {
        self.call_checked("getTaiwanDate", json!({})).await
    }
}

#[async_trait]
impl QueueGateway for SheetsRpcClient {
    async fn submit_application(&self, form: &ApplicationForm) -> Result<Submission, GatewayError> {
        let dto: SubmissionDto = self
            .call_typed("submitApplication", application_parameters(form))
            .await?;
        Ok(dto.into())
    }

    async fn get_waiting_list(
        &self,
        client_name: &ClientName,
    ) -> Result<WaitingList, GatewayError> {
        let dto: WaitingListDto = self
            .call_typed(
                "getWaitingList",
                json!({ "clientName": client_name.as_str() }),
            )
            .await?;
        Ok(dto.into())
    }

    async fn get_meeting_settings(&self) -> Result<Settings, GatewayError> {
        let dto: SettingsDto = self.call_typed("getMeetingSettings", json!({})).await?;
        Ok(dto.into())
    }
}

#[async_trait]
impl AdminGateway for SheetsRpcClient {
    async fn get_admin_clients_list(&self, password: &str) -> Result<Value, GatewayError> {
        self.call_checked("getAdminClientsList", json!({ "password": password }))
            .await
    }

    async fn update_client_status(
        &self,
        row: u32,
        new_status: &ClientStatus,
        password: &str,
    ) -> Result<Value, GatewayError> {
        self.call_checked(
            "updateClientStatus",
            json!({ "row": row, "newStatus": new_status.label(), "password": password }),
        )
        .await
    }

    async fn update_settings(&self, settings: &Settings) -> Result<Value, GatewayError> {
        let parameters = serde_json::to_value(SettingsDto::from(settings))
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        self.call_checked("updateSettings", parameters).await
    }
}
