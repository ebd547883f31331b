use ibapi::accounts::types::AccountGroup;
use ibapi::accounts::{AccountSummaryResult, AccountSummaryTags, PositionUpdate};
use ibapi::orders::Orders;
use ibapi::Client;
use log::{debug, warn};

use crate::config::Config;
use crate::domain::{AccountSnapshot, Indicator, OrderRecord, PositionRecord};
use crate::Error;

/// Account indicators fetched on every refresh.
const SUMMARY_TAGS: &[&str] = &[
    AccountSummaryTags::NET_LIQUIDATION,
    AccountSummaryTags::TOTAL_CASH_VALUE,
    AccountSummaryTags::AVAILABLE_FUNDS,
    AccountSummaryTags::BUYING_POWER,
    AccountSummaryTags::DAY_TRADES_REMAINING,
];

/// Indicator sampled into the snapshot history for the dashboard sparkline.
const CHARTED_TAG: &str = AccountSummaryTags::NET_LIQUIDATION;

/// Samples retained for the sparkline.
const HISTORY_LIMIT: usize = 120;

/// Narrow fetch interface over the brokerage connection. The dashboard only
/// needs these operations, which keeps the loop testable with a fake.
pub trait Broker {
    /// Fetches a fresh account snapshot, replacing any previous one.
    fn fetch_account(&mut self) -> Result<AccountSnapshot, Error>;

    /// Fetches the currently held positions.
    fn fetch_positions(&mut self) -> Result<Vec<PositionRecord>, Error>;

    /// Fetches the current open orders list.
    fn fetch_orders(&mut self) -> Result<Vec<OrderRecord>, Error>;
}

/// Connection to TWS or IB Gateway. Disconnects when dropped.
pub struct Gateway {
    client: Client,
    account: String,
    history: Vec<f64>,
}

impl Gateway {
    /// Connects to the gateway named by the configuration. Connection
    /// failures here are fatal; there is nothing to retry against.
    pub fn connect(config: &Config) -> Result<Gateway, Error> {
        let address = config.gateway_address();
        let client = Client::connect(&address, config.client_id).map_err(|err| Error::Connection(format!("{address}: {err}")))?;

        let accounts = client.managed_accounts()?;
        let account = accounts.into_iter().next().unwrap_or_default();
        debug!("connected to {address} as client {} for account {account}", config.client_id);

        Ok(Gateway {
            client,
            account,
            history: Vec::new(),
        })
    }
}

impl Broker for Gateway {
    fn fetch_account(&mut self) -> Result<AccountSnapshot, Error> {
        let group = AccountGroup("All".to_string());
        let subscription = self.client.account_summary(&group, SUMMARY_TAGS)?;

        let mut indicators = Vec::new();
        for update in &subscription {
            match update {
                AccountSummaryResult::Summary(summary) => {
                    let Ok(value) = summary.value.parse::<f64>() else {
                        debug!("skipping non-numeric indicator {}: {}", summary.tag, summary.value);
                        continue;
                    };
                    indicators.push(Indicator {
                        tag: summary.tag,
                        value,
                        currency: summary.currency,
                    });
                }
                AccountSummaryResult::End => {
                    subscription.cancel();
                    break;
                }
            }
        }
        // Iteration also ends when the stream dies mid-drain; surface that
        // instead of returning a partial snapshot.
        if let Some(err) = subscription.error() {
            return Err(err.into());
        }

        let mut snapshot = AccountSnapshot {
            account: self.account.clone(),
            indicators,
            history: Vec::new(),
        };

        if let Some(sample) = snapshot.value(CHARTED_TAG) {
            self.history.push(sample);
            if self.history.len() > HISTORY_LIMIT {
                self.history.remove(0);
            }
        }
        snapshot.history = self.history.clone();

        Ok(snapshot)
    }

    fn fetch_positions(&mut self) -> Result<Vec<PositionRecord>, Error> {
        let subscription = self.client.positions()?;

        let mut positions = Vec::new();
        while let Some(update) = subscription.next() {
            match update {
                PositionUpdate::Position(position) => {
                    // closed positions report zero size
                    if position.position != 0.0 {
                        positions.push(PositionRecord {
                            symbol: position.contract.symbol.to_string(),
                            quantity: position.position,
                            average_cost: position.average_cost,
                        });
                    }
                }
                PositionUpdate::PositionEnd => {
                    subscription.cancel();
                    break;
                }
            }
        }
        if let Some(err) = subscription.error() {
            return Err(err.into());
        }

        Ok(positions)
    }

    fn fetch_orders(&mut self) -> Result<Vec<OrderRecord>, Error> {
        let subscription = self.client.all_open_orders()?;

        let mut orders = Vec::new();
        for message in &subscription {
            match message {
                Orders::OrderData(data) => orders.push(OrderRecord {
                    order_id: data.order_id,
                    symbol: data.contract.symbol.to_string(),
                    side: data.order.action.to_string(),
                    quantity: data.order.total_quantity,
                    order_type: data.order.order_type.clone(),
                    status: data.order_state.status.clone(),
                    limit_price: data.order.limit_price,
                    aux_price: data.order.aux_price,
                }),
                // Status updates duplicate what the order state already
                // carries for a one-shot listing.
                Orders::OrderStatus(status) => debug!("order {} status {}", status.order_id, status.status),
                Orders::Notice(notice) => warn!("gateway notice {}: {}", notice.code, notice.message),
            }
        }
        if let Some(err) = subscription.error() {
            return Err(err.into());
        }

        Ok(orders)
    }
}
