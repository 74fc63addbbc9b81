//! Integration tests for the card form.
//!
//! The form is driven the way a host drives it: keystrokes in, collaborator
//! signals out, recorded through shared handles.

use std::cell::RefCell;
use std::rc::Rc;

use card_form::apple_pay::{
    ApplePayPresentationManager, ApplePayRequest, OrderItem, PaymentRequest, PaymentSheet,
};
use card_form::clock::FixedClock;
use card_form::detect::PrefixDetector;
use card_form::{
    CardNetwork, FieldKind, FieldValidationState, FlowMode, FollowUp, FormController, FormError,
    FormObserver, FormState, Outcome, PaymentInstrument, PresentationError, Router, ScannedCard,
    Settings, SubmitOutcome, TokenizationError, Tokenizer,
};

// =============================================================================
// RECORDING COLLABORATORS
// =============================================================================

/// Tokenizer that keeps every instrument it is handed.
#[derive(Clone, Default)]
struct RecordingTokenizer(Rc<RefCell<Vec<PaymentInstrument>>>);

impl Tokenizer for RecordingTokenizer {
    fn tokenize(&mut self, instrument: PaymentInstrument) {
        self.0.borrow_mut().push(instrument);
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Signal {
    Success,
    Error(FormError),
    CardScanner,
    DirectCheckout,
    VaultPaymentMethods,
    Dismiss,
}

#[derive(Default)]
struct RecordingRouter(RefCell<Vec<Signal>>);

impl RecordingRouter {
    fn signals(&self) -> Vec<Signal> {
        self.0.borrow().clone()
    }
}

impl Router for RecordingRouter {
    fn show_success(&self) {
        self.0.borrow_mut().push(Signal::Success);
    }
    fn show_error(&self, error: &FormError) {
        self.0.borrow_mut().push(Signal::Error(error.clone()));
    }
    fn show_card_scanner(&self) {
        self.0.borrow_mut().push(Signal::CardScanner);
    }
    fn show_direct_checkout(&self) {
        self.0.borrow_mut().push(Signal::DirectCheckout);
    }
    fn show_vault_payment_methods(&self) {
        self.0.borrow_mut().push(Signal::VaultPaymentMethods);
    }
    fn dismiss(&self) {
        self.0.borrow_mut().push(Signal::Dismiss);
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Validity(FieldKind, FieldValidationState),
    SubmitEnabled(bool),
    Submitting,
}

#[derive(Clone, Default)]
struct RecordingObserver(Rc<RefCell<Vec<Event>>>);

impl FormObserver for RecordingObserver {
    fn on_validity_changed(&mut self, field: FieldKind, state: &FieldValidationState) {
        self.0.borrow_mut().push(Event::Validity(field, state.clone()));
    }
    fn on_submit_enabled_changed(&mut self, enabled: bool) {
        self.0.borrow_mut().push(Event::SubmitEnabled(enabled));
    }
    fn on_submitting(&mut self) {
        self.0.borrow_mut().push(Event::Submitting);
    }
}

struct Harness {
    form: FormController<RecordingTokenizer>,
    tokenized: Rc<RefCell<Vec<PaymentInstrument>>>,
    router: Rc<RecordingRouter>,
    events: Rc<RefCell<Vec<Event>>>,
}

fn harness_with(settings: Settings) -> Harness {
    let tokenizer = RecordingTokenizer::default();
    let tokenized = Rc::clone(&tokenizer.0);
    let observer = RecordingObserver::default();
    let events = Rc::clone(&observer.0);
    let router = Rc::new(RecordingRouter::default());

    let form = FormController::new(tokenizer, settings)
        .with_router(&router)
        .with_observer(observer)
        .with_clock(FixedClock::ymd(2026, 10, 16).unwrap());

    Harness {
        form,
        tokenized,
        router,
        events,
    }
}

fn harness() -> Harness {
    harness_with(Settings::default())
}

fn fill_jane_doe(form: &mut FormController<RecordingTokenizer>) {
    form.input(FieldKind::CardNumber, "4111111111111111").unwrap();
    form.input(FieldKind::Expiry, "12/29").unwrap();
    form.input(FieldKind::Cvv, "123").unwrap();
    form.input(FieldKind::Name, "Jane Doe").unwrap();
}

// =============================================================================
// SUBMISSION
// =============================================================================

#[test]
fn test_valid_form_submits_instrument() {
    let mut h = harness();
    fill_jane_doe(&mut h.form);

    assert!(!h.form.form_is_not_valid());
    assert!(h.form.is_submit_enabled());
    assert_eq!(h.form.submit(), Ok(SubmitOutcome::Submitted));
    assert_eq!(h.form.state(), FormState::Submitting);

    let tokenized = h.tokenized.borrow();
    assert_eq!(tokenized.len(), 1);
    let instrument = &tokenized[0];
    assert_eq!(instrument.number(), "4111111111111111");
    assert_eq!(instrument.cvv(), "123");
    assert_eq!(instrument.expiration_month(), "12");
    assert_eq!(instrument.expiration_year(), "2029");
    assert_eq!(instrument.cardholder_name(), "Jane Doe");
}

#[test]
fn test_invalid_form_never_tokenizes() {
    let mut h = harness();
    fill_jane_doe(&mut h.form);
    h.form.input(FieldKind::Expiry, "01/20").unwrap();

    assert!(h.form.form_is_not_valid());
    assert!(!h.form.is_submit_enabled());
    assert_eq!(h.form.submit(), Ok(SubmitOutcome::Ignored));
    assert!(h.tokenized.borrow().is_empty());
    assert!(!h.events.borrow().contains(&Event::Submitting));
}

#[test]
fn test_empty_form_never_tokenizes() {
    let mut h = harness();
    assert_eq!(h.form.submit(), Ok(SubmitOutcome::Ignored));
    assert!(h.tokenized.borrow().is_empty());
    assert_eq!(h.form.state(), FormState::Idle);
}

#[test]
fn test_success_routes_once() {
    let mut h = harness();
    fill_jane_doe(&mut h.form);
    h.form.submit().unwrap();
    h.form.complete_tokenization(Ok(())).unwrap();

    assert_eq!(h.form.state(), FormState::Finished(Outcome::Success));
    assert_eq!(h.router.signals(), vec![Signal::Success]);

    // Duplicate completion
    assert_eq!(
        h.form.complete_tokenization(Ok(())),
        Err(FormError::NoSubmissionInFlight)
    );
    assert_eq!(h.router.signals(), vec![Signal::Success]);
}

#[test]
fn test_failure_is_final() {
    let mut h = harness();
    fill_jane_doe(&mut h.form);
    h.form.submit().unwrap();
    h.form
        .complete_tokenization(Err(TokenizationError::new("card declined")))
        .unwrap();

    assert_eq!(h.form.state(), FormState::Finished(Outcome::Failure));
    assert_eq!(
        h.router.signals(),
        vec![Signal::Error(FormError::Tokenization(TokenizationError::new(
            "card declined"
        )))]
    );

    assert_eq!(h.form.submit(), Ok(SubmitOutcome::Ignored));
    assert_eq!(h.tokenized.borrow().len(), 1);
    assert!(!h.form.is_submit_enabled());
    assert!(matches!(
        h.form.input(FieldKind::Cvv, "456"),
        Err(FormError::NotEditable { .. })
    ));
}

#[test]
fn test_completion_without_submit_is_rejected() {
    let mut h = harness();
    assert_eq!(
        h.form.complete_tokenization(Ok(())),
        Err(FormError::NoSubmissionInFlight)
    );
    assert!(h.router.signals().is_empty());
    assert_eq!(h.form.state(), FormState::Idle);
}

// =============================================================================
// OBSERVER
// =============================================================================

#[test]
fn test_observer_sees_field_and_aggregate_changes() {
    let mut h = harness();
    fill_jane_doe(&mut h.form);

    let events = h.events.borrow().clone();
    assert_eq!(
        events.first(),
        Some(&Event::Validity(FieldKind::CardNumber, FieldValidationState::Valid))
    );
    // Enabled exactly once, after the last field became valid
    let enabled: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, Event::SubmitEnabled(_)))
        .collect();
    assert_eq!(enabled, vec![&Event::SubmitEnabled(true)]);
    assert_eq!(events.last(), Some(&Event::SubmitEnabled(true)));

    h.form.input(FieldKind::Cvv, "12").unwrap();
    let events = h.events.borrow().clone();
    assert_eq!(
        &events[events.len() - 2..],
        &[
            Event::Validity(FieldKind::Cvv, FieldValidationState::NotAvailable),
            Event::SubmitEnabled(false),
        ]
    );
}

#[test]
fn test_only_edited_field_is_revalidated() {
    let mut h = harness();
    h.form.input(FieldKind::Name, "Jane").unwrap();
    h.events.borrow_mut().clear();

    h.form.input(FieldKind::CardNumber, "4111").unwrap();
    let events = h.events.borrow().clone();
    assert_eq!(
        events,
        vec![Event::Validity(
            FieldKind::CardNumber,
            FieldValidationState::NotAvailable
        )]
    );
}

#[test]
fn test_submit_notifies_submitting_and_disables() {
    let mut h = harness();
    fill_jane_doe(&mut h.form);
    h.events.borrow_mut().clear();
    h.form.submit().unwrap();

    assert_eq!(
        *h.events.borrow(),
        vec![Event::SubmitEnabled(false), Event::Submitting]
    );
}

// =============================================================================
// MASKING THROUGH THE FORM
// =============================================================================

#[test]
fn test_number_masking() {
    let mut h = harness();
    h.form
        .input(FieldKind::CardNumber, "4111111111111111")
        .unwrap();
    assert_eq!(h.form.text(FieldKind::CardNumber), "4111 1111 1111 1111");

    h.form
        .input(FieldKind::CardNumber, "4111111111111111111")
        .unwrap();
    assert_eq!(
        h.form.text(FieldKind::CardNumber),
        "4111 1111 1111 1111 111"
    );

    h.form
        .input(FieldKind::CardNumber, "41111111111111111112222")
        .unwrap();
    assert_eq!(
        h.form.text(FieldKind::CardNumber),
        "4111 1111 1111 1111 111"
    );
}

#[test]
fn test_expiry_masking() {
    let mut h = harness();
    h.form.input(FieldKind::Expiry, "1229").unwrap();
    assert_eq!(h.form.text(FieldKind::Expiry), "12/29");

    h.form.input(FieldKind::Expiry, "12").unwrap();
    assert_eq!(h.form.text(FieldKind::Expiry), "12");

    h.form.input(FieldKind::Expiry, "12/2").unwrap();
    assert_eq!(h.form.text(FieldKind::Expiry), "12/2");
    assert_eq!(
        h.form.validation(FieldKind::Expiry),
        &FieldValidationState::NotAvailable
    );
}

// =============================================================================
// NETWORK
// =============================================================================

#[test]
fn test_network_change_revalidates_cvv_only() {
    let mut h = harness();
    h.form.input(FieldKind::Cvv, "123").unwrap();
    assert!(h.form.validation(FieldKind::Cvv).is_valid());
    h.events.borrow_mut().clear();

    h.form.set_network(CardNetwork::Amex).unwrap();
    assert_eq!(
        *h.events.borrow(),
        vec![Event::Validity(
            FieldKind::Cvv,
            FieldValidationState::NotAvailable
        )]
    );

    h.form.input(FieldKind::Cvv, "1234").unwrap();
    assert!(h.form.validation(FieldKind::Cvv).is_valid());
}

#[test]
fn test_detector_drives_network() {
    let tokenizer = RecordingTokenizer::default();
    let mut form = FormController::new(tokenizer, Settings::default())
        .with_detector(PrefixDetector)
        .with_clock(FixedClock::ymd(2026, 10, 16).unwrap());

    form.input(FieldKind::CardNumber, "3782").unwrap();
    assert_eq!(form.network(), CardNetwork::Amex);
    form.input(FieldKind::CardNumber, "378282246310005").unwrap();
    assert_eq!(form.text(FieldKind::CardNumber), "3782 822463 10005");

    form.input(FieldKind::CardNumber, "4111111111111111").unwrap();
    assert_eq!(form.network(), CardNetwork::Visa);
    assert_eq!(form.text(FieldKind::CardNumber), "4111 1111 1111 1111");
}

#[test]
fn test_amex_form_submits() {
    let mut h = harness();
    h.form.set_network(CardNetwork::Amex).unwrap();
    h.form
        .input(FieldKind::CardNumber, "378282246310005")
        .unwrap();
    h.form.input(FieldKind::Expiry, "0330").unwrap();
    h.form.input(FieldKind::Cvv, "1234").unwrap();
    h.form.input(FieldKind::Name, "A. N. Other").unwrap();

    assert_eq!(h.form.text(FieldKind::CardNumber), "3782 822463 10005");
    assert_eq!(h.form.submit(), Ok(SubmitOutcome::Submitted));
    let tokenized = h.tokenized.borrow();
    assert_eq!(tokenized[0].number(), "378282246310005");
    assert_eq!(tokenized[0].expiration_month(), "03");
    assert_eq!(tokenized[0].expiration_year(), "2030");
}

// =============================================================================
// CANCEL, SCANNER, ROUTER LIFETIME
// =============================================================================

#[test]
fn test_cancel_routes_by_flow() {
    for (flow, follow_up, signal) in [
        (FlowMode::Checkout, FollowUp::Dismiss, Signal::Dismiss),
        (FlowMode::Vault, FollowUp::Dismiss, Signal::Dismiss),
        (
            FlowMode::CompleteDirectCheckout,
            FollowUp::ShowDirectCheckout,
            Signal::DirectCheckout,
        ),
        (
            FlowMode::CompleteVaultCheckout,
            FollowUp::ShowVaultPaymentMethods,
            Signal::VaultPaymentMethods,
        ),
    ] {
        let mut h = harness_with(Settings {
            flow,
            ..Settings::default()
        });
        assert_eq!(h.form.cancel(), Some(follow_up));
        assert_eq!(h.form.state(), FormState::Finished(Outcome::Cancelled));
        assert_eq!(h.router.signals(), vec![signal]);
    }
}

#[test]
fn test_completion_after_cancel_is_ignored() {
    let mut h = harness();
    fill_jane_doe(&mut h.form);
    h.form.submit().unwrap();
    h.form.cancel();

    assert_eq!(
        h.form.complete_tokenization(Err(TokenizationError::new("late"))),
        Err(FormError::NoSubmissionInFlight)
    );
    assert_eq!(h.router.signals(), vec![Signal::Dismiss]);
    assert_eq!(h.form.state(), FormState::Finished(Outcome::Cancelled));
}

#[test]
fn test_scanner_round_trip() {
    let mut h = harness();
    h.form.show_scanner().unwrap();
    assert_eq!(h.router.signals(), vec![Signal::CardScanner]);

    let scanned = ScannedCard {
        number: "4111 1111 1111 1111".into(),
        expiry_month: "12".into(),
        expiry_year: "29".into(),
        cardholder_name: None,
    };
    h.form.apply_scan(&scanned).unwrap();
    assert_eq!(h.form.text(FieldKind::Expiry), "12/29");
    assert_eq!(h.form.text(FieldKind::Name), "");
    assert!(h.form.form_is_not_valid());

    h.form.input(FieldKind::Name, "Jane Doe").unwrap();
    h.form.input(FieldKind::Cvv, "123").unwrap();
    assert!(h.form.is_submit_enabled());
}

#[test]
fn test_router_dropped_by_host() {
    let mut h = harness();
    assert_eq!(Rc::strong_count(&h.router), 1);

    h.router = Rc::new(RecordingRouter::default());
    fill_jane_doe(&mut h.form);
    h.form.submit().unwrap();

    // The form held only a weak handle to the first router
    assert_eq!(h.form.complete_tokenization(Ok(())), Ok(()));
    assert_eq!(h.form.state(), FormState::Finished(Outcome::Success));
    assert!(h.router.signals().is_empty());
}

// =============================================================================
// SETTINGS
// =============================================================================

#[test]
fn test_settings_drive_form() {
    let settings = Settings::from_toml_str(
        r#"
flow = "complete_direct_checkout"

[card_form]
max_years_ahead = 5
"#,
    )
    .unwrap();
    let mut h = harness_with(settings);
    assert_eq!(h.form.flow(), FlowMode::CompleteDirectCheckout);

    fill_jane_doe(&mut h.form);
    h.form.input(FieldKind::Expiry, "12/39").unwrap();
    assert!(h.form.validation(FieldKind::Expiry).is_invalid());
    assert_eq!(h.form.submit(), Ok(SubmitOutcome::Ignored));

    assert_eq!(h.form.cancel(), Some(FollowUp::ShowDirectCheckout));
}

// =============================================================================
// APPLE PAY
// =============================================================================

struct DeclinedSheet;

impl PaymentSheet for DeclinedSheet {
    fn can_make_payments(&self) -> bool {
        false
    }
    fn can_make_payments_using(&self, _networks: &[CardNetwork]) -> bool {
        false
    }
    fn present(&self, _request: &PaymentRequest) -> bool {
        false
    }
}

#[test]
fn test_apple_pay_unavailable_error_reaches_router() {
    let settings = Settings::from_toml_str(
        r#"
[payment_method_options.apple_pay_options]
check_provided_networks = true
"#,
    )
    .unwrap();
    let router = Rc::new(RecordingRouter::default());
    let manager = ApplePayPresentationManager::new(DeclinedSheet, &settings.payment_method_options)
        .with_router(&router);
    assert!(!manager.is_presentable());

    let err = manager.ensure_presentable().unwrap_err();
    assert!(matches!(
        err,
        PresentationError::UnableToMakePaymentsOnProvidedNetworks { .. }
    ));
    assert_eq!(
        router.signals(),
        vec![Signal::Error(FormError::Presentation(err))]
    );

    let request = ApplePayRequest {
        currency_code: "USD".into(),
        country_code: "US".into(),
        merchant_identifier: "merchant.test".into(),
        items: vec![OrderItem {
            name: "Total".into(),
            amount: Some(1000),
            is_pending: false,
        }],
        shipping_methods: None,
    };
    let err = manager.present(&request).unwrap_err();
    assert!(matches!(
        err,
        PresentationError::UnableToPresentApplePay { .. }
    ));
    assert_eq!(router.signals().len(), 2);
    assert_eq!(
        router.signals()[1],
        Signal::Error(FormError::Presentation(err))
    );
}
