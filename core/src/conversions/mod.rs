// storefront/src/conversions/mod.rs

//! Forwarding of purchase/engagement signals to the ad platform. Everything in
//! here is best-effort: callers log failures and move on.

use crate::error::StorefrontResult;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

pub mod event;
pub mod http;

pub use event::{BuyerIdentity, ClientInfo, ConversionEvent, EventContext, EventName, OrderFacts};
pub use http::HttpConversions;

#[derive(Debug, Clone, PartialEq)]
pub enum ConversionDelivery {
  Sent(serde_json::Value),
  /// Not sent, e.g. no access token configured.
  Skipped(&'static str),
}

#[async_trait]
pub trait ConversionsSink: Send + Sync {
  async fn send(&self, event: &ConversionEvent) -> StorefrontResult<ConversionDelivery>;
}

/// Local counters for the detached conversion tasks, since their outcome is
/// never propagated to the checkout flow.
#[derive(Debug, Default)]
pub struct ConversionStats {
  sent: AtomicU64,
  skipped: AtomicU64,
  failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConversionCounts {
  pub sent: u64,
  pub skipped: u64,
  pub failed: u64,
}

impl ConversionStats {
  pub fn record(&self, outcome: &StorefrontResult<ConversionDelivery>) {
    let counter = match outcome {
      Ok(ConversionDelivery::Sent(_)) => &self.sent,
      Ok(ConversionDelivery::Skipped(_)) => &self.skipped,
      Err(_) => &self.failed,
    };
    counter.fetch_add(1, Ordering::Relaxed);
  }

  pub fn counts(&self) -> ConversionCounts {
    ConversionCounts {
      sent: self.sent.load(Ordering::Relaxed),
      skipped: self.skipped.load(Ordering::Relaxed),
      failed: self.failed.load(Ordering::Relaxed),
    }
  }
}
