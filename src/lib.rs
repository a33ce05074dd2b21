//! # SubGhzCli
//!
//! Serial command line for a sub-GHz FSK transmitter.
//!
//! ## Architecture
//!
//! ```text
//! UART RX ISR ──▶ Receiver ──▶ CommandQueue ──▶ Worker ──▶ Dispatcher ──▶ Radio
//!                  (echo,        (5 lines,       (task)        │
//!                   history)      SPSC)            ▲           ▼
//!                                                  └── tx_done ◀── UART TX
//! ```
//!
//! - The receiver never blocks; full queue or full line buffer drops input
//! - The worker blocks on [`sync::Notify`] for new lines and for
//!   transmit-complete between response chunks
//! - Shared editing state lives in one [`console::Session`]

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod config;
pub mod console;
pub mod log_drain;
pub mod log_globals;
pub mod logging;
pub mod radio;
pub mod sync;

pub use config::ConsoleConfig;
pub use console::{CommandQueue, Receiver, Session, Worker, COMMANDS};
pub use log_globals::CLI_LOG_STREAM;
pub use radio::{FskRadio, Radio, RadioPhy, TxConfig};
