//! Data transfer objects for the spreadsheet RPC endpoint.

pub mod rpc;
