//! Gateway implementations.

pub mod sheets;

pub use sheets::SheetsRpcClient;
