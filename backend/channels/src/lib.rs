//! Inbound channel adapters for the relay.
//!
//! One adapter today, Telegram long polling. The channel-independent part of
//! the pipeline (allow-list, filename derivation, upload, metrics) lives in
//! [`relay`] so adapters stay thin.

pub mod relay;
pub mod telegram;

pub use relay::RelayContext;
pub use telegram::TelegramRelay;
