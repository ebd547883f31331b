/// A point-in-time view of the account. Replaced wholesale on every fetch;
/// nothing is updated incrementally.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccountSnapshot {
    /// Account code, e.g. `DU1234567`.
    pub account: String,
    /// Named account metrics in the order the gateway reported them.
    pub indicators: Vec<Indicator>,
    /// Recent samples of the charted indicator, oldest first.
    pub history: Vec<f64>,
}

impl AccountSnapshot {
    /// Value of a named indicator, if present in this snapshot.
    pub fn value(&self, tag: &str) -> Option<f64> {
        self.indicators.iter().find(|indicator| indicator.tag == tag).map(|indicator| indicator.value)
    }
}

/// A single named account metric, e.g. NetLiquidation.
#[derive(Clone, Debug, PartialEq)]
pub struct Indicator {
    pub tag: String,
    pub value: f64,
    /// Currency of the value. Empty for unitless indicators such as
    /// DayTradesRemaining.
    pub currency: String,
}

/// One position held in the account. Like orders, the list is replaced
/// wholesale on each fetch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionRecord {
    pub symbol: String,
    /// Signed size; negative for short positions.
    pub quantity: f64,
    pub average_cost: f64,
}

impl PositionRecord {
    /// Total cost of the position.
    pub fn cost(&self) -> f64 {
        self.quantity.abs() * self.average_cost
    }
}

/// One open order as reported by the gateway. The list is replaced
/// wholesale on each fetch; records are never diffed against a previous
/// fetch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderRecord {
    pub order_id: i32,
    pub symbol: String,
    /// BUY, SELL or one of the institutional short-sale sides.
    pub side: String,
    pub quantity: f64,
    /// Order type as reported, e.g. LMT or MKT.
    pub order_type: String,
    /// Current order status, e.g. Submitted or PreSubmitted.
    pub status: String,
    pub limit_price: Option<f64>,
    /// Stop price, trailing amount or similar, depending on the order type.
    pub aux_price: Option<f64>,
}
