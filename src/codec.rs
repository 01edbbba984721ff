//! Wire encoding for queue messages.
//!
//! Every payload is a single-line JSON document whose `cmd` field names the
//! record kind; the remaining fields are the record's own, with names fixed
//! by the downstream consumer's parser.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::events::{CartCreateEvent, Kind, OrderCreateEvent, OrderPaidEvent, ViewEvent};

/// A queue message, tagged with the command the consumer dispatches on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd")]
pub enum QueueMessage {
    #[serde(rename = "campaign_view")]
    CampaignView(ViewEvent),
    #[serde(rename = "shopify_cart_create")]
    CartCreate(CartCreateEvent),
    #[serde(rename = "shopify_order_create")]
    OrderCreate(OrderCreateEvent),
    #[serde(rename = "shopify_order_paid")]
    OrderPaid(OrderPaidEvent),
}

impl Kind {
    /// Wire discriminator for this record kind.
    pub fn cmd(self) -> &'static str {
        match self {
            Kind::View => "campaign_view",
            Kind::CartCreate => "shopify_cart_create",
            Kind::OrderCreate => "shopify_order_create",
            Kind::OrderPaid => "shopify_order_paid",
        }
    }
}

impl QueueMessage {
    /// Generate one fresh record of the given kind.
    pub fn generate<R: Rng>(kind: Kind, rng: &mut R) -> Self {
        match kind {
            Kind::View => Self::CampaignView(ViewEvent::generate(rng)),
            Kind::CartCreate => Self::CartCreate(CartCreateEvent::generate(rng)),
            Kind::OrderCreate => Self::OrderCreate(OrderCreateEvent::generate(rng)),
            Kind::OrderPaid => Self::OrderPaid(OrderPaidEvent::generate(rng)),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Self::CampaignView(_) => Kind::View,
            Self::CartCreate(_) => Kind::CartCreate,
            Self::OrderCreate(_) => Kind::OrderCreate,
            Self::OrderPaid(_) => Kind::OrderPaid,
        }
    }

    /// Identifying field for failure logs: the campaign id for views, the
    /// record id for the webhooks.
    pub fn log_id(&self) -> i64 {
        match self {
            Self::CampaignView(view) => i64::from(view.campaign_id),
            Self::CartCreate(cart) => cart.id,
            Self::OrderCreate(order) => order.id,
            Self::OrderPaid(paid) => paid.id,
        }
    }

    /// Render the single-line JSON payload.
    pub fn encode(&self) -> String {
        serde_json::to_string(self).expect("queue message is always serializable")
    }
}
