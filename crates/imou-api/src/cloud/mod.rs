// Imou cloud client modules
//
// Hand-written client for the Imou open API. Every operation is a signed
// POST wrapped in the `{ result: { code, msg, data } }` envelope.

pub mod alarms;
pub mod auth;
pub mod client;
pub mod devices;
pub mod media;
pub mod settings;
pub mod storage;

pub use client::{AccountStatus, ImouClient};
