//! Apple Pay presentation.
//!
//! The platform payment sheet is reached through the [`PaymentSheet`] trait.
//! [`ApplePayPresentationManager`] decides whether the sheet can be shown,
//! builds the [`PaymentRequest`] it is shown with, and turns a refused
//! presentation into a [`PresentationError`] carrying a fresh diagnostics id.
//! When a [`Router`] is attached, every presentation error is also handed to
//! [`Router::show_error`] as [`FormError::Presentation`].

use std::collections::BTreeSet;
use std::rc::{Rc, Weak};

use serde::Deserialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{FormError, PresentationError};
use crate::form::Router;
use crate::settings::PaymentMethodOptions;
use crate::CardNetwork;

const PAYMENT_METHOD_TYPE: &str = "APPLE_PAY";
const UNAVAILABLE_MESSAGE: &str = "Cannot run ApplePay on this device";

/// Apple Pay settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApplePayOptions {
    /// Name shown on the sheet.
    pub merchant_name: Option<String>,
    /// Require the device to support one of the supported networks rather
    /// than Apple Pay in general.
    pub check_provided_networks: bool,
    /// Ask for a billing postal address.
    pub is_capture_billing_address_enabled: bool,
    /// Shipping contact capture.
    pub shipping_options: Option<ShippingOptions>,
}

/// Shipping contact capture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShippingOptions {
    /// Ask for a shipping postal address.
    pub is_capture_shipping_address_enabled: bool,
    /// Contact fields requested alongside the shipping address.
    pub additional_shipping_contact_fields: Vec<AdditionalShippingContactField>,
}

/// Extra shipping contact fields a merchant may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdditionalShippingContactField {
    /// Full name.
    Name,
    /// Email.
    EmailAddress,
    /// Phone.
    PhoneNumber,
}

/// Contact fields the sheet can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContactField {
    /// Postal address.
    PostalAddress,
    /// Full name.
    Name,
    /// Email.
    EmailAddress,
    /// Phone.
    PhoneNumber,
}

impl From<AdditionalShippingContactField> for ContactField {
    fn from(field: AdditionalShippingContactField) -> Self {
        match field {
            AdditionalShippingContactField::Name => Self::Name,
            AdditionalShippingContactField::EmailAddress => Self::EmailAddress,
            AdditionalShippingContactField::PhoneNumber => Self::PhoneNumber,
        }
    }
}

/// Merchant capabilities advertised to the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MerchantCapability {
    /// 3-D Secure.
    ThreeDSecure,
}

/// A line of the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    /// Label shown on the sheet.
    pub name: String,
    /// Amount in minor units; `None` until known.
    pub amount: Option<i64>,
    /// The amount is an estimate to be finalized later.
    pub is_pending: bool,
}

impl OrderItem {
    /// The sheet line for this item. Items with no amount are dropped unless
    /// they are pending.
    pub fn summary_item(&self) -> Option<SummaryItem> {
        if self.amount.is_none() && !self.is_pending {
            return None;
        }
        Some(SummaryItem {
            label: self.name.clone(),
            amount: self.amount.unwrap_or_default(),
            is_pending: self.is_pending,
        })
    }
}

/// A line on the payment sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryItem {
    /// Label.
    pub label: String,
    /// Amount in minor units.
    pub amount: i64,
    /// Final or pending.
    pub is_pending: bool,
}

/// A shipping option offered on the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingMethod {
    /// Identifier returned on selection.
    pub identifier: String,
    /// Label.
    pub label: String,
    /// Secondary text.
    pub detail: Option<String>,
    /// Amount in minor units.
    pub amount: i64,
}

/// What the checkout asks Apple Pay for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplePayRequest {
    /// ISO 4217 currency code.
    pub currency_code: String,
    /// ISO 3166 country code.
    pub country_code: String,
    /// Apple merchant identifier.
    pub merchant_identifier: String,
    /// Order lines.
    pub items: Vec<OrderItem>,
    /// Shipping choices, if any.
    pub shipping_methods: Option<Vec<ShippingMethod>>,
}

/// The platform-neutral request the sheet is presented with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaymentRequest {
    /// Billing contact fields the user must provide.
    pub required_billing_contact_fields: BTreeSet<ContactField>,
    /// Shipping contact fields the user must provide.
    pub required_shipping_contact_fields: BTreeSet<ContactField>,
    /// ISO 4217 currency code.
    pub currency_code: String,
    /// ISO 3166 country code.
    pub country_code: String,
    /// Apple merchant identifier.
    pub merchant_identifier: String,
    /// Capabilities.
    pub merchant_capabilities: Vec<MerchantCapability>,
    /// Networks the sheet offers.
    pub supported_networks: Vec<CardNetwork>,
    /// Sheet lines.
    pub summary_items: Vec<SummaryItem>,
    /// Shipping choices.
    pub shipping_methods: Vec<ShippingMethod>,
}

/// The platform payment sheet.
pub trait PaymentSheet {
    /// The device can pay with Apple Pay at all.
    fn can_make_payments(&self) -> bool;

    /// The device has a card on one of `networks`.
    fn can_make_payments_using(&self, networks: &[CardNetwork]) -> bool;

    /// Shows the sheet; false if it could not be shown.
    fn present(&self, request: &PaymentRequest) -> bool;
}

/// Gates and presents the Apple Pay sheet.
#[derive(Debug)]
pub struct ApplePayPresentationManager<S> {
    sheet: S,
    options: ApplePayOptions,
    supported_networks: Vec<CardNetwork>,
    router: Option<Weak<dyn Router>>,
}

impl<S: PaymentSheet> ApplePayPresentationManager<S> {
    /// Creates a manager from the payment method settings.
    pub fn new(sheet: S, options: &PaymentMethodOptions) -> Self {
        Self {
            sheet,
            options: options.apple_pay_options.clone().unwrap_or_default(),
            supported_networks: options.supported_networks.clone(),
            router: None,
        }
    }

    /// Attaches the router presentation errors are reported to. Only a weak
    /// reference is kept.
    pub fn with_router<R: Router + 'static>(mut self, router: &Rc<R>) -> Self {
        let router: Weak<R> = Rc::downgrade(router);
        self.router = Some(router);
        self
    }

    /// Whether the sheet can be shown on this device.
    pub fn is_presentable(&self) -> bool {
        if self.options.check_provided_networks {
            self.sheet.can_make_payments_using(&self.supported_networks)
        } else {
            self.sheet.can_make_payments()
        }
    }

    /// Builds the sheet request for `request`.
    pub fn create_request(&self, request: &ApplePayRequest) -> PaymentRequest {
        let mut billing = BTreeSet::new();
        if self.options.is_capture_billing_address_enabled {
            billing.insert(ContactField::PostalAddress);
        }

        PaymentRequest {
            required_billing_contact_fields: billing,
            required_shipping_contact_fields: self.shipping_contact_fields(),
            currency_code: request.currency_code.clone(),
            country_code: request.country_code.clone(),
            merchant_identifier: request.merchant_identifier.clone(),
            merchant_capabilities: vec![MerchantCapability::ThreeDSecure],
            supported_networks: self.supported_networks.clone(),
            summary_items: request
                .items
                .iter()
                .filter_map(OrderItem::summary_item)
                .collect(),
            shipping_methods: request.shipping_methods.clone().unwrap_or_default(),
        }
    }

    /// Presents the sheet.
    pub fn present(&self, request: &ApplePayRequest) -> Result<(), PresentationError> {
        let payment_request = self.create_request(request);
        if !self.sheet.present(&payment_request) {
            let err = PresentationError::UnableToPresentApplePay {
                diagnostics_id: Uuid::new_v4().to_string(),
            };
            error!(
                payment_method = PAYMENT_METHOD_TYPE,
                diagnostics_id = err.diagnostics_id(),
                "unable to present payment sheet"
            );
            return Err(self.report(err));
        }
        info!(payment_method = PAYMENT_METHOD_TYPE, "payment method shown");
        Ok(())
    }

    /// The error to show when [`is_presentable`](Self::is_presentable) is false.
    pub fn error_for_display(&self) -> PresentationError {
        let diagnostics_id = Uuid::new_v4().to_string();
        error!(
            payment_method = PAYMENT_METHOD_TYPE,
            %diagnostics_id,
            "{}",
            UNAVAILABLE_MESSAGE
        );
        if self.options.check_provided_networks {
            PresentationError::UnableToMakePaymentsOnProvidedNetworks { diagnostics_id }
        } else {
            PresentationError::UnableToPresentPaymentMethod {
                payment_method_type: PAYMENT_METHOD_TYPE.to_owned(),
                message: UNAVAILABLE_MESSAGE.to_owned(),
                diagnostics_id,
            }
        }
    }

    /// Checks [`is_presentable`](Self::is_presentable) and reports
    /// [`error_for_display`](Self::error_for_display) when the sheet cannot
    /// be shown.
    ///
    /// # Returns
    ///
    /// `Ok(())` when the sheet can be shown, otherwise the error that was
    /// forwarded to the router.
    pub fn ensure_presentable(&self) -> Result<(), PresentationError> {
        if self.is_presentable() {
            Ok(())
        } else {
            Err(self.report(self.error_for_display()))
        }
    }

    fn report(&self, err: PresentationError) -> PresentationError {
        let forwarded = FormError::Presentation(err.clone());
        match self.router.as_ref().and_then(|router| router.upgrade()) {
            Some(router) => router.show_error(&forwarded),
            None => warn!(error = %forwarded, "router is gone, presentation error not forwarded"),
        }
        err
    }

    fn shipping_contact_fields(&self) -> BTreeSet<ContactField> {
        let Some(shipping) = self
            .options
            .shipping_options
            .as_ref()
            .filter(|s| s.is_capture_shipping_address_enabled)
        else {
            return BTreeSet::new();
        };

        std::iter::once(ContactField::PostalAddress)
            .chain(
                shipping
                    .additional_shipping_contact_fields
                    .iter()
                    .copied()
                    .map(ContactField::from),
            )
            .collect()
    }
}
