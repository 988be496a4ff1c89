// storefront/src/checkout/submit.rs

//! Order submission, run as a named-step pipeline:
//!
//! 1. `build_order_request` validates the contact and assembles the payload.
//! 2. `create_order` posts it to the backend.
//! 3. `dispatch_purchase_conversion` (optional) spawns the purchase event as a
//!    detached task. The submit path never waits for it.
//! 4. `assemble_confirmation` produces the confirmation view payload.

use crate::api::StorefrontApi;
use crate::checkout::contact_form;
use crate::checkout::selection::ProductSelection;
use crate::conversions::{
  BuyerIdentity, ClientInfo, ConversionEvent, ConversionStats, ConversionsSink, EventContext, OrderFacts,
};
use crate::error::{StorefrontError, StorefrontResult};
use crate::models::contact::ContactInfo;
use crate::models::district::{Coordinate, District};
use crate::models::order::{Confirmation, OrderCreated, OrderRequest, PaymentMethod};
use crate::pipeline::{ContextData, Pipeline, PipelineResult, SkipCondition, StepControl};
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn, Instrument};

pub const ORDER_PHONE_PREFIX: &str = "225";
pub const ORDER_CURRENCY: &str = "FCFA";

#[derive(Debug, Clone, PartialEq)]
pub struct OrderSettings {
  /// Prepended to the locally-formatted phone and WhatsApp numbers.
  pub phone_prefix: String,
  pub currency: String,
  pub payment_method: PaymentMethod,
}

impl Default for OrderSettings {
  fn default() -> Self {
    Self {
      phone_prefix: ORDER_PHONE_PREFIX.to_string(),
      currency: ORDER_CURRENCY.to_string(),
      payment_method: PaymentMethod::CashOnDelivery,
    }
  }
}

/// Everything the checkout collected, ready to be turned into an order.
#[derive(Debug, Clone)]
pub struct OrderDraft {
  pub selection: ProductSelection,
  pub district: District,
  pub pin: Coordinate,
  pub contact: ContactInfo,
  pub ad_id: Option<String>,
  pub client: ClientInfo,
  /// Page the order was placed from, forwarded with the conversion event.
  pub source_url: String,
}

impl OrderDraft {
  pub fn to_request(&self, settings: &OrderSettings) -> OrderRequest {
    let total = self.selection.total_price();
    OrderRequest {
      items: vec![self.selection.line_item()],
      district_id: self.district.id,
      full_name: self.contact.full_name.clone(),
      phone: format!("{}{}", settings.phone_prefix, self.contact.phone),
      whatsapp: format!("{}{}", settings.phone_prefix, self.contact.whatsapp),
      receiver_address: self.contact.address_description.clone(),
      latitude: self.pin.lat,
      longitude: self.pin.lng,
      payment_method: settings.payment_method,
      total_amount: total,
      actual_amount: total,
      discount_amount: 0.0,
      currency: settings.currency.clone(),
      is_web: 1,
      ad_id: self.ad_id.clone(),
    }
  }

  fn purchase_event(&self, created: &OrderCreated) -> ConversionEvent {
    let product = self.selection.product();
    let facts = OrderFacts {
      product_id: product.product_id,
      quantity: self.selection.quantity(),
      unit_price: product.price,
      total_price: self.selection.total_price(),
      order_no: created.result.reference(),
    };
    let ctx = EventContext {
      identity: BuyerIdentity {
        phone: Some(self.contact.phone.clone()),
        ..BuyerIdentity::default()
      },
      client: self.client.clone(),
      source_url: self.source_url.clone(),
      event_time: Utc::now().timestamp(),
    };
    ConversionEvent::purchase(&facts, &ctx)
  }
}

/// Outcome of a successful submission.
#[derive(Debug)]
pub struct SubmissionReceipt {
  pub confirmation: Confirmation,
  /// The detached purchase-conversion task, when one was spawned. Dropping the
  /// handle does not cancel it.
  pub conversion_task: Option<JoinHandle<()>>,
}

struct SubmissionContext {
  draft: OrderDraft,
  settings: OrderSettings,
  request: Option<OrderRequest>,
  created: Option<OrderCreated>,
  conversion_task: Option<JoinHandle<()>>,
  confirmation: Option<Confirmation>,
}

pub struct OrderSubmitter {
  settings: OrderSettings,
  stats: Arc<ConversionStats>,
  pipeline: Pipeline<SubmissionContext>,
}

impl OrderSubmitter {
  pub fn new(api: Arc<dyn StorefrontApi>, conversions: Arc<dyn ConversionsSink>) -> Self {
    Self::with_settings(api, conversions, OrderSettings::default())
  }

  pub fn with_settings(
    api: Arc<dyn StorefrontApi>,
    conversions: Arc<dyn ConversionsSink>,
    settings: OrderSettings,
  ) -> Self {
    let stats = Arc::new(ConversionStats::default());
    let pipeline = build_pipeline(api, conversions, Arc::clone(&stats));
    Self {
      settings,
      stats,
      pipeline,
    }
  }

  pub fn settings(&self) -> &OrderSettings {
    &self.settings
  }

  pub fn stats(&self) -> Arc<ConversionStats> {
    Arc::clone(&self.stats)
  }

  #[instrument(
    name = "OrderSubmitter::submit",
    skip_all,
    fields(product_id = draft.selection.product().product_id, district_id = draft.district.id),
    err(Display)
  )]
  pub async fn submit(&self, draft: OrderDraft) -> StorefrontResult<SubmissionReceipt> {
    let ctx = ContextData::new(SubmissionContext {
      draft,
      settings: self.settings.clone(),
      request: None,
      created: None,
      conversion_task: None,
      confirmation: None,
    });

    match self.pipeline.run(ctx.clone()).await? {
      PipelineResult::Completed => {}
      PipelineResult::Stopped => {
        return Err(StorefrontError::Internal("order submission stopped before completion".to_string()))
      }
    }

    let mut data = ctx.write();
    let confirmation = data
      .confirmation
      .take()
      .ok_or_else(|| StorefrontError::Internal("order submission produced no confirmation".to_string()))?;
    info!(pickup_code = confirmation.pickup_code(), "Order placed.");
    Ok(SubmissionReceipt {
      confirmation,
      conversion_task: data.conversion_task.take(),
    })
  }
}

fn build_pipeline(
  api: Arc<dyn StorefrontApi>,
  conversions: Arc<dyn ConversionsSink>,
  stats: Arc<ConversionStats>,
) -> Pipeline<SubmissionContext> {
  // no purchase event without a response body
  let no_response_body: SkipCondition<SubmissionContext> = Arc::new(|data: &SubmissionContext| {
    data.created.as_ref().map_or(true, |created| created.raw.is_null())
  });

  let mut pipeline = Pipeline::new(&[
    ("build_order_request", false, None),
    ("create_order", false, None),
    ("dispatch_purchase_conversion", true, Some(no_response_body)),
    ("assemble_confirmation", false, None),
  ]);

  pipeline.on("build_order_request", |ctx: ContextData<SubmissionContext>| async move {
    let mut data = ctx.write();
    let errors = contact_form::validate(&data.draft.contact);
    if !errors.is_empty() {
      return Err(StorefrontError::Validation(errors));
    }
    let request = data.draft.to_request(&data.settings);
    data.request = Some(request);
    Ok::<_, StorefrontError>(StepControl::Continue)
  });

  pipeline.on("create_order", move |ctx: ContextData<SubmissionContext>| {
    let api = Arc::clone(&api);
    async move {
      let request = ctx
        .read()
        .request
        .clone()
        .ok_or_else(|| StorefrontError::Internal("order request was not built".to_string()))?;
      let created = api.create_order(&request).await?;
      ctx.write().created = Some(created);
      Ok::<_, StorefrontError>(StepControl::Continue)
    }
  });

  pipeline.on("dispatch_purchase_conversion", move |ctx: ContextData<SubmissionContext>| {
    let conversions = Arc::clone(&conversions);
    let stats = Arc::clone(&stats);
    async move {
      let event = {
        let data = ctx.read();
        let created = data
          .created
          .as_ref()
          .ok_or_else(|| StorefrontError::Internal("no order to report".to_string()))?;
        data.draft.purchase_event(created)
      };
      let span = tracing::info_span!("purchase_conversion", event_id = %event.event_id);
      let task = tokio::spawn(
        async move {
          let outcome = conversions.send(&event).await;
          if let Err(e) = &outcome {
            warn!(error = %e, "Purchase conversion failed.");
          }
          stats.record(&outcome);
        }
        .instrument(span),
      );
      ctx.write().conversion_task = Some(task);
      Ok::<_, StorefrontError>(StepControl::Continue)
    }
  });

  pipeline.on("assemble_confirmation", |ctx: ContextData<SubmissionContext>| async move {
    let mut data = ctx.write();
    let Some(created) = data.created.take() else {
      return Err(StorefrontError::Internal("no order response to confirm".to_string()));
    };
    let draft = &data.draft;
    let confirmation = Confirmation {
      product: draft.selection.product().clone(),
      quantity: draft.selection.quantity(),
      contact: draft.contact.clone(),
      district: draft.district.clone(),
      total_price: draft.selection.total_price(),
      order: created.result,
      raw_response: created.raw,
    };
    data.confirmation = Some(confirmation);
    Ok::<_, StorefrontError>(StepControl::Continue)
  });

  pipeline
}
