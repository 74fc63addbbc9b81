//! Form settings, loaded from TOML.
//!
//! Every section is optional; a missing key takes its default.
//!
//! ```toml
//! flow = "complete_vault_checkout"
//!
//! [card_form]
//! max_years_ahead = 20
//!
//! [payment_method_options]
//! supported_networks = ["visa", "mastercard", "amex"]
//!
//! [payment_method_options.apple_pay_options]
//! merchant_name = "Acme"
//! check_provided_networks = true
//! is_capture_billing_address_enabled = true
//!
//! [payment_method_options.apple_pay_options.shipping_options]
//! is_capture_shipping_address_enabled = true
//! additional_shipping_contact_fields = ["name", "email_address"]
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::apple_pay::ApplePayOptions;
use crate::error::SettingsError;
use crate::form::FlowMode;
use crate::CardNetwork;

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Checkout context the form runs in.
    pub flow: FlowMode,
    /// Card form rules.
    pub card_form: CardFormOptions,
    /// Per payment method options.
    pub payment_method_options: PaymentMethodOptions,
}

/// Card form rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CardFormOptions {
    /// Rejects expiry years further than this many years ahead.
    pub max_years_ahead: Option<u16>,
}

/// Options for payment methods other than the card form itself.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaymentMethodOptions {
    /// Apple Pay, if offered.
    pub apple_pay_options: Option<ApplePayOptions>,
    /// Networks offered to the payment sheet.
    pub supported_networks: Vec<CardNetwork>,
}

impl Default for PaymentMethodOptions {
    fn default() -> Self {
        Self {
            apple_pay_options: None,
            supported_networks: CardNetwork::KNOWN.to_vec(),
        }
    }
}

impl Settings {
    /// Reads settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parses settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }
}
