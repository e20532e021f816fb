//! Core domain models for the queue client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::value_object::{ClientName, ClientStatus, LightType};

/// The visitor this client is currently tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSession {
    pub name: ClientName,
    /// Last status the sheet reported; `None` until the first poll answers
    pub status: Option<ClientStatus>,
    pub queue_number: Option<u32>,
}

impl ClientSession {
    /// Session for a name whose status is not known yet
    pub fn new(name: ClientName) -> Self {
        Self {
            name,
            status: None,
            queue_number: None,
        }
    }

    pub fn with_status(name: ClientName, status: ClientStatus) -> Self {
        Self {
            name,
            status: Some(status),
            queue_number: None,
        }
    }

    /// Whether the queue has nothing more to tell this visitor
    pub fn is_terminal(&self) -> bool {
        self.status.as_ref().is_some_and(ClientStatus::is_terminal)
    }

    /// Fold a server record into the session.
    ///
    /// A record without a status keeps the last known one.
    pub fn apply(&mut self, record: &ClientRecord) {
        if let Some(status) = &record.status {
            self.status = Some(status.clone());
        }
        if record.queue_number.is_some() {
            self.queue_number = record.queue_number;
        }
    }
}

/// One row of the public waiting list.
///
/// Rebuilt from scratch on every poll; there is no identity across polls.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueueEntry {
    pub queue_number: Option<u32>,
    /// Name as the server shows it, normally already masked
    pub display_name: Option<String>,
    pub status: Option<ClientStatus>,
}

/// The server's view of the tracked visitor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientRecord {
    pub status: Option<ClientStatus>,
    pub queue_number: Option<u32>,
}

/// Answer to a waiting-list lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WaitingList {
    /// `None` is the authoritative "no such applicant"
    pub client: Option<ClientRecord>,
    pub entries: Vec<QueueEntry>,
}

/// Today's meeting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub light_type: LightType,
    pub meeting_link: String,
    /// Kept as the sheet stores it (integer-as-string)
    pub max_waiting_clients: String,
}

impl Settings {
    pub fn max_waiting_clients(&self) -> Option<u32> {
        self.max_waiting_clients.trim().parse().ok()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            light_type: LightType::Bright,
            meeting_link: String::new(),
            max_waiting_clients: "10".to_string(),
        }
    }
}

/// Application form as submitted by a visitor.
///
/// Only the name has meaning to the client; the remaining form fields
/// (phone, birthday, address...) are forwarded untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationForm {
    pub name: ClientName,
    pub fields: Map<String, Value>,
}

impl ApplicationForm {
    pub fn new(name: ClientName) -> Self {
        Self {
            name,
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// Accepted application.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Submission {
    pub status: Option<ClientStatus>,
    pub queue_number: Option<u32>,
    pub message: Option<String>,
}
