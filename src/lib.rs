//! Console client for an Interactive Brokers account.
//!
//! Connects to a running TWS or IB Gateway instance through the [ibapi]
//! crate and renders account indicators and open orders to the terminal.
//! The `monitor` subcommand keeps refreshing the view on a fixed interval
//! until interrupted.
//!
//! The brokerage connection sits behind the [Broker](broker::Broker) trait
//! and the sparkline behind a single function in [render], so the dashboard
//! logic is testable without a gateway.

/// Brokerage client boundary and its `ibapi`-backed implementation.
pub mod broker;

/// Connection settings loaded from `ibc.toml`.
pub mod config;

/// Data shapes produced by a fetch: account snapshot and order records.
pub mod domain;

/// The refresh/render loop behind the `monitor` subcommand.
pub mod monitor;

/// Terminal formatting for account snapshots and order lists.
pub mod render;

mod errors;

pub use errors::Error;
