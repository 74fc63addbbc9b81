//! Card form controller.
//!
//! [`FormController`] owns the text and validation state of the four card
//! fields, masks input as it arrives, derives whether submission is
//! enabled, and drives the single tokenization a form is allowed. Rendering
//! stays with the host, which talks to the controller through three
//! collaborators:
//!
//! - a [`Tokenizer`] receiving the [`PaymentInstrument`] on submit,
//! - a [`Router`] told where to go once the flow ends (held weakly),
//! - an optional [`FormObserver`] mirroring field validity in the UI.
//!
//! # Lifecycle
//!
//! ```text
//! Idle -> Editing -> Submitting -> Finished(Success | Failure)
//!   \________\___________\______-> Finished(Cancelled)
//! ```
//!
//! Finished is terminal: a failed tokenization is not retried and the form
//! never returns to editing.

use std::fmt;
use std::rc::{Rc, Weak};

use serde::Deserialize;
use tracing::{debug, info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::clock::{Clock, SystemClock};
use crate::cvv;
use crate::detect::NetworkDetector;
use crate::error::{FieldValidationError, FormError, TokenizationError};
use crate::expiry::validate_expiry_at;
use crate::format::{format_card_number, format_expiry, redact_number, strip_whitespace};
use crate::instrument::PaymentInstrument;
use crate::mask::{self, EXPIRY_PATTERN};
use crate::settings::Settings;
use crate::validator::{FieldKind, FieldValidationState, FieldValidator};
use crate::CardNetwork;

/// Receives the instrument once the form is submitted.
///
/// `tokenize` returns immediately. The host reports the outcome later, on
/// the same thread, through [`FormController::complete_tokenization`].
pub trait Tokenizer {
    /// Starts tokenizing `instrument`.
    fn tokenize(&mut self, instrument: PaymentInstrument);
}

/// Navigation signals emitted when the flow ends or needs another screen.
pub trait Router {
    /// Tokenization succeeded.
    fn show_success(&self);
    /// Tokenization (or presentation) failed.
    fn show_error(&self, error: &FormError);
    /// The user asked to scan a card.
    fn show_card_scanner(&self);
    /// Cancelled in [`FlowMode::CompleteDirectCheckout`].
    fn show_direct_checkout(&self);
    /// Cancelled in [`FlowMode::CompleteVaultCheckout`].
    fn show_vault_payment_methods(&self);
    /// Cancelled in any other flow.
    fn dismiss(&self);
}

/// UI-side listener for field and form state.
pub trait FormObserver {
    /// A field was re-classified.
    fn on_validity_changed(&mut self, field: FieldKind, state: &FieldValidationState);

    /// The aggregate submit-enabled signal flipped.
    fn on_submit_enabled_changed(&mut self, _enabled: bool) {}

    /// Submission started; the instrument is about to be handed over.
    fn on_submitting(&mut self) {}
}

/// The checkout context the form was opened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowMode {
    /// Pay with the entered card.
    #[default]
    Checkout,
    /// Save the card.
    Vault,
    /// Add a card to the vault from a vault screen.
    AddCardToVault,
    /// Entered from the direct checkout screen.
    CompleteDirectCheckout,
    /// Entered from the vaulted payment methods screen.
    CompleteVaultCheckout,
}

impl FlowMode {
    /// Where the user goes after cancelling.
    pub const fn follow_up(&self) -> FollowUp {
        match self {
            Self::CompleteDirectCheckout => FollowUp::ShowDirectCheckout,
            Self::CompleteVaultCheckout => FollowUp::ShowVaultPaymentMethods,
            Self::Checkout | Self::Vault | Self::AddCardToVault => FollowUp::Dismiss,
        }
    }
}

/// Navigation after a cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// Close the form.
    Dismiss,
    /// Back to direct checkout.
    ShowDirectCheckout,
    /// Back to the vaulted payment methods.
    ShowVaultPaymentMethods,
}

/// How a finished form ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Tokenization succeeded.
    Success,
    /// Tokenization failed.
    Failure,
    /// The user cancelled.
    Cancelled,
}

/// Lifecycle state of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    /// Nothing typed yet.
    #[default]
    Idle,
    /// At least one edit accepted.
    Editing,
    /// Instrument handed to the tokenizer, completion pending.
    Submitting,
    /// Terminal.
    Finished(Outcome),
}

impl FormState {
    /// Fields accept input and submit is possible.
    #[inline]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Idle | Self::Editing)
    }

    /// Terminal state reached.
    #[inline]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }
}

/// Result of [`FormController::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing happened: the form is invalid or no longer editable.
    Ignored,
    /// The instrument went to the tokenizer.
    Submitted,
}

/// Card details read by a card scanner.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ScannedCard {
    /// Card number, any grouping.
    pub number: String,
    /// Month, one or two digits.
    pub expiry_month: String,
    /// Year, two or four digits.
    pub expiry_year: String,
    /// Name, when the scanner read one.
    pub cardholder_name: Option<String>,
}

impl fmt::Debug for ScannedCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScannedCard")
            .field("number", &redact_number(&self.number))
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cardholder_name", &self.cardholder_name)
            .finish()
    }
}

/// State machine behind a card form.
///
/// ```
/// use card_form::clock::FixedClock;
/// use card_form::form::{FormController, FormState, SubmitOutcome, Tokenizer};
/// use card_form::instrument::PaymentInstrument;
/// use card_form::settings::Settings;
/// use card_form::validator::FieldKind;
///
/// #[derive(Default)]
/// struct Collect(Vec<PaymentInstrument>);
/// impl Tokenizer for Collect {
///     fn tokenize(&mut self, instrument: PaymentInstrument) {
///         self.0.push(instrument);
///     }
/// }
///
/// let mut form = FormController::new(Collect::default(), Settings::default())
///     .with_clock(FixedClock::ymd(2026, 10, 16).unwrap());
///
/// form.input(FieldKind::CardNumber, "4111111111111111").unwrap();
/// assert_eq!(form.text(FieldKind::CardNumber), "4111 1111 1111 1111");
/// assert_eq!(form.submit().unwrap(), SubmitOutcome::Ignored);
///
/// form.input(FieldKind::Name, "Jane Doe").unwrap();
/// form.input(FieldKind::Expiry, "1229").unwrap();
/// form.input(FieldKind::Cvv, "123").unwrap();
/// assert!(form.is_submit_enabled());
/// assert_eq!(form.submit().unwrap(), SubmitOutcome::Submitted);
/// assert_eq!(form.state(), FormState::Submitting);
/// assert_eq!(form.tokenizer().0[0].number(), "4111111111111111");
/// ```
pub struct FormController<T: Tokenizer> {
    tokenizer: T,
    router: Option<Weak<dyn Router>>,
    observer: Option<Box<dyn FormObserver>>,
    detector: Option<Box<dyn NetworkDetector>>,
    clock: Box<dyn Clock>,
    settings: Settings,
    state: FormState,
    network: CardNetwork,
    texts: [String; 4],
    validation: [FieldValidationState; 4],
    submit_enabled: bool,
}

impl<T: Tokenizer> FormController<T> {
    /// Creates an idle form with empty fields and an `Unknown` network.
    pub fn new(tokenizer: T, settings: Settings) -> Self {
        Self {
            tokenizer,
            router: None,
            observer: None,
            detector: None,
            clock: Box::new(SystemClock),
            settings,
            state: FormState::Idle,
            network: CardNetwork::Unknown,
            texts: Default::default(),
            validation: Default::default(),
            submit_enabled: false,
        }
    }

    /// Attaches the router. Only a weak reference is kept.
    pub fn with_router<R: Router + 'static>(mut self, router: &Rc<R>) -> Self {
        let router: Weak<R> = Rc::downgrade(router);
        self.router = Some(router);
        self
    }

    /// Attaches a validity observer.
    pub fn with_observer(mut self, observer: impl FormObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Installs a detector that updates the network as the number is typed.
    pub fn with_detector(mut self, detector: impl NetworkDetector + 'static) -> Self {
        self.detector = Some(Box::new(detector));
        self
    }

    /// Replaces the system clock used for expiry checks.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Handles new text for `field`.
    ///
    /// `raw` is the whole text the field would hold after the keystroke.
    /// The card number and expiry are masked; a CVV edit the field refuses
    /// leaves the form untouched. Only `field` is re-validated.
    ///
    /// # Errors
    ///
    /// [`FormError::NotEditable`] once the form has been submitted or has
    /// finished.
    pub fn input(&mut self, field: FieldKind, raw: &str) -> Result<(), FormError> {
        self.ensure_editable()?;

        let text = match field {
            FieldKind::CardNumber => {
                if let Some(detected) = self.detector.as_ref().map(|d| d.detect(raw)) {
                    self.apply_network(detected);
                }
                format_card_number(raw, self.network)
            }
            FieldKind::Expiry => mask::apply(EXPIRY_PATTERN, raw),
            FieldKind::Cvv => {
                let current = &self.texts[FieldKind::Cvv.index()];
                let is_insertion = raw.chars().count() > current.chars().count();
                if !cvv::accepts_edit(raw, is_insertion) {
                    debug!(field = %field, "edit rejected");
                    return Ok(());
                }
                raw.to_owned()
            }
            FieldKind::Name => raw.to_owned(),
        };

        if self.state == FormState::Idle {
            self.state = FormState::Editing;
        }
        self.texts[field.index()] = text;
        self.revalidate(field);
        Ok(())
    }

    /// Changes the network CVV is validated against.
    ///
    /// The CVV is re-classified and the number is re-grouped with the
    /// network's pattern.
    pub fn set_network(&mut self, network: CardNetwork) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.apply_network(network);
        Ok(())
    }

    /// True if any field fails validation.
    pub fn form_is_not_valid(&self) -> bool {
        let fields = FieldKind::ALL.map(|kind| (kind, Some(self.texts[kind.index()].as_str())));
        self.validator().form_is_not_valid(fields)
    }

    /// Whether the submit control should be enabled.
    pub fn is_submit_enabled(&self) -> bool {
        self.state.is_editable() && !self.form_is_not_valid()
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> FormState {
        self.state
    }

    /// Current (masked) text of `field`.
    #[inline]
    pub fn text(&self, field: FieldKind) -> &str {
        &self.texts[field.index()]
    }

    /// Last classification of `field`.
    #[inline]
    pub fn validation(&self, field: FieldKind) -> &FieldValidationState {
        &self.validation[field.index()]
    }

    /// Network CVV is currently validated against.
    #[inline]
    pub fn network(&self) -> CardNetwork {
        self.network
    }

    /// Checkout context the form runs in.
    #[inline]
    pub fn flow(&self) -> FlowMode {
        self.settings.flow
    }

    /// The tokenization collaborator.
    #[inline]
    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Submits the form.
    ///
    /// An invalid form, or one that already left editing, is ignored:
    /// no instrument is built and the tokenizer is not called.
    ///
    /// # Returns
    ///
    /// [`SubmitOutcome::Submitted`] when the instrument went to the
    /// tokenizer, [`SubmitOutcome::Ignored`] otherwise.
    pub fn submit(&mut self) -> Result<SubmitOutcome, FormError> {
        if !self.state.is_editable() {
            debug!(state = ?self.state, "submit ignored: form not editable");
            return Ok(SubmitOutcome::Ignored);
        }
        if self.form_is_not_valid() {
            debug!("submit ignored: form is not valid");
            return Ok(SubmitOutcome::Ignored);
        }

        let instrument = self.build_instrument()?;
        info!(
            number = %redact_number(instrument.number()),
            network = %self.network,
            flow = ?self.settings.flow,
            "submitting card"
        );

        self.state = FormState::Submitting;
        self.refresh_submit_enabled();
        if let Some(observer) = self.observer.as_mut() {
            observer.on_submitting();
        }
        self.tokenizer.tokenize(instrument);
        Ok(SubmitOutcome::Submitted)
    }

    /// Delivers the tokenizer's result.
    ///
    /// Valid once per submission. A completion with nothing in flight (a
    /// duplicate, or one arriving after cancel) is logged and otherwise
    /// ignored.
    pub fn complete_tokenization(
        &mut self,
        result: Result<(), TokenizationError>,
    ) -> Result<(), FormError> {
        if self.state != FormState::Submitting {
            warn!(state = ?self.state, "tokenization completion ignored: nothing in flight");
            return Err(FormError::NoSubmissionInFlight);
        }

        match result {
            Ok(()) => {
                self.state = FormState::Finished(Outcome::Success);
                info!("tokenization succeeded");
                self.route("show_success", |router| router.show_success());
            }
            Err(err) => {
                self.state = FormState::Finished(Outcome::Failure);
                warn!(error = %err, "tokenization failed");
                let err = FormError::Tokenization(err);
                self.route("show_error", |router| router.show_error(&err));
            }
        }
        Ok(())
    }

    /// Cancels the form and routes to the flow's follow-up screen.
    ///
    /// Returns `None` when the form had already finished.
    pub fn cancel(&mut self) -> Option<FollowUp> {
        if self.state.is_finished() {
            debug!(state = ?self.state, "cancel ignored: form already finished");
            return None;
        }

        self.state = FormState::Finished(Outcome::Cancelled);
        self.refresh_submit_enabled();

        let follow_up = self.settings.flow.follow_up();
        info!(?follow_up, "form cancelled");
        match follow_up {
            FollowUp::ShowDirectCheckout => {
                self.route("show_direct_checkout", |router| router.show_direct_checkout());
            }
            FollowUp::ShowVaultPaymentMethods => {
                self.route("show_vault_payment_methods", |router| {
                    router.show_vault_payment_methods()
                });
            }
            FollowUp::Dismiss => self.route("dismiss", |router| router.dismiss()),
        }
        Some(follow_up)
    }

    /// Asks the router to show the card scanner.
    pub fn show_scanner(&self) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.route("show_card_scanner", |router| router.show_card_scanner());
        Ok(())
    }

    /// Fills the form from a scan, as if the user had typed it.
    pub fn apply_scan(&mut self, card: &ScannedCard) -> Result<(), FormError> {
        self.ensure_editable()?;
        debug!(number = %redact_number(&card.number), "applying scanned card");

        self.input(FieldKind::CardNumber, &card.number)?;
        let expiry = format_expiry(&card.expiry_month, &card.expiry_year);
        self.input(FieldKind::Expiry, &expiry)?;
        if let Some(name) = card.cardholder_name.as_deref() {
            self.input(FieldKind::Name, name)?;
        }
        Ok(())
    }

    fn validator(&self) -> FieldValidator {
        FieldValidator::new(self.network, self.clock.today())
            .with_max_years_ahead(self.settings.card_form.max_years_ahead)
    }

    fn ensure_editable(&self) -> Result<(), FormError> {
        if self.state.is_editable() {
            Ok(())
        } else {
            Err(FormError::NotEditable { state: self.state })
        }
    }

    fn apply_network(&mut self, network: CardNetwork) {
        if network == self.network {
            return;
        }
        debug!(from = %self.network, to = %network, "network changed");
        self.network = network;

        let number = &mut self.texts[FieldKind::CardNumber.index()];
        if !number.is_empty() {
            *number = format_card_number(number, network);
        }
        self.revalidate(FieldKind::Cvv);
    }

    fn revalidate(&mut self, field: FieldKind) {
        let text = &self.texts[field.index()];
        let state = self.validator().classify(field, Some(text.as_str()));
        debug!(field = %field, valid = ?state.as_hint(), "field validated");

        if let Some(observer) = self.observer.as_mut() {
            observer.on_validity_changed(field, &state);
        }
        self.validation[field.index()] = state;
        self.refresh_submit_enabled();
    }

    fn refresh_submit_enabled(&mut self) {
        let enabled = self.is_submit_enabled();
        if enabled == self.submit_enabled {
            return;
        }
        self.submit_enabled = enabled;
        debug!(enabled, "submit enabled changed");
        if let Some(observer) = self.observer.as_mut() {
            observer.on_submit_enabled_changed(enabled);
        }
    }

    fn build_instrument(&self) -> Result<PaymentInstrument, FormError> {
        let expiry = validate_expiry_at(
            self.text(FieldKind::Expiry),
            self.clock.today(),
            self.settings.card_form.max_years_ahead,
        )
        .map_err(FieldValidationError::from)?;

        Ok(PaymentInstrument::new(
            strip_whitespace(self.text(FieldKind::CardNumber)),
            self.text(FieldKind::Cvv).to_owned(),
            expiry.month_string(),
            expiry.year_string(),
            self.text(FieldKind::Name).to_owned(),
        ))
    }

    fn route(&self, signal: &'static str, send: impl FnOnce(&dyn Router)) {
        match self.router.as_ref().and_then(|router| router.upgrade()) {
            Some(router) => send(router.as_ref()),
            None => warn!(signal, "router is gone, navigation skipped"),
        }
    }
}
