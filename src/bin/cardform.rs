//! Command-line tool for the card form rules.
//!
//! # Usage
//!
//! ```bash
//! # Mask keystrokes the way the form does
//! cardform mask 4111111111111111
//! cardform mask 1229 --field expiry
//!
//! # Check a whole form
//! cardform check --name "Jane Doe" --number 4111111111111111 --expiry 12/29 --cvv 123
//! cardform check --number 378282246310005 --cvv 1234 --output json
//!
//! # Single fields
//! cardform cvv 1234 --network amex
//! cardform expiry 12/29 --max-years 20
//! cardform detect 3782
//! ```
//!
//! Set `RUST_LOG=debug` to see the form's trace output on stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use card_form::clock::{Clock, SystemClock};
use card_form::detect::{NetworkDetector, PrefixDetector};
use card_form::mask::{self, EXPIRY_PATTERN};
use card_form::{
    cvv, expiry, format, CardNetwork, FieldKind, FieldValidationState, FieldValidator, Settings,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cardform")]
#[command(author, version, about = "Card form validation and masking tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mask raw input with a field pattern
    Mask {
        /// Raw keystrokes
        input: String,

        /// Field whose pattern to use
        #[arg(short, long, default_value = "number")]
        field: MaskField,

        /// Network grouping for card numbers (detected when omitted)
        #[arg(short, long)]
        network: Option<NetworkArg>,

        /// Custom pattern, `#` for each digit
        #[arg(short, long)]
        pattern: Option<String>,
    },

    /// Validate every field of a form
    Check {
        /// Cardholder name
        #[arg(long)]
        name: Option<String>,

        /// Card number
        #[arg(long)]
        number: Option<String>,

        /// Expiry date (MM/YY)
        #[arg(long)]
        expiry: Option<String>,

        /// Security code
        #[arg(long)]
        cvv: Option<String>,

        /// Network for the CVV (detected from the number when omitted)
        #[arg(short, long)]
        network: Option<NetworkArg>,

        /// Settings file (TOML)
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Validate a CVV
    Cvv {
        /// CVV to validate
        cvv: String,

        /// Card network (affects expected length)
        #[arg(short, long, default_value = "unknown")]
        network: NetworkArg,
    },

    /// Validate an expiry date
    Expiry {
        /// Expiry date (MM/YY or MM/YYYY)
        date: String,

        /// Maximum years in future to accept
        #[arg(short, long)]
        max_years: Option<u16>,
    },

    /// Detect the card network from a (partial) number
    Detect {
        /// Card number or prefix
        card_number: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MaskField {
    Number,
    Expiry,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum NetworkArg {
    Visa,
    Mastercard,
    Amex,
    Discover,
    DinersClub,
    Jcb,
    UnionPay,
    Maestro,
    Mir,
    Elo,
    Unknown,
}

impl From<NetworkArg> for CardNetwork {
    fn from(arg: NetworkArg) -> Self {
        match arg {
            NetworkArg::Visa => CardNetwork::Visa,
            NetworkArg::Mastercard => CardNetwork::Mastercard,
            NetworkArg::Amex => CardNetwork::Amex,
            NetworkArg::Discover => CardNetwork::Discover,
            NetworkArg::DinersClub => CardNetwork::DinersClub,
            NetworkArg::Jcb => CardNetwork::Jcb,
            NetworkArg::UnionPay => CardNetwork::UnionPay,
            NetworkArg::Maestro => CardNetwork::Maestro,
            NetworkArg::Mir => CardNetwork::Mir,
            NetworkArg::Elo => CardNetwork::Elo,
            NetworkArg::Unknown => CardNetwork::Unknown,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Mask {
            input,
            field,
            network,
            pattern,
        } => cmd_mask(&input, field, network.map(Into::into), pattern.as_deref()),
        Commands::Check {
            name,
            number,
            expiry,
            cvv,
            network,
            settings,
            output,
        } => {
            let settings = match settings.map(Settings::from_file).transpose() {
                Ok(settings) => settings.unwrap_or_default(),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            let fields = [
                (FieldKind::Name, name),
                (FieldKind::CardNumber, number),
                (FieldKind::Expiry, expiry),
                (FieldKind::Cvv, cvv),
            ];
            cmd_check(&fields, network.map(Into::into), &settings, output)
        }
        Commands::Cvv { cvv: input, network } => cmd_cvv(&input, network.into()),
        Commands::Expiry { date, max_years } => cmd_expiry(&date, max_years),
        Commands::Detect { card_number } => cmd_detect(&card_number),
    }
}

fn cmd_mask(
    input: &str,
    field: MaskField,
    network: Option<CardNetwork>,
    pattern: Option<&str>,
) -> ExitCode {
    let masked = match (pattern, field) {
        (Some(pattern), _) => mask::apply(pattern, input),
        (None, MaskField::Expiry) => mask::apply(EXPIRY_PATTERN, input),
        (None, MaskField::Number) => {
            let network = network.unwrap_or_else(|| PrefixDetector.detect(input));
            format::format_card_number(input, network)
        }
    };
    println!("{}", masked);
    ExitCode::SUCCESS
}

fn cmd_check(
    fields: &[(FieldKind, Option<String>); 4],
    network: Option<CardNetwork>,
    settings: &Settings,
    output: OutputFormat,
) -> ExitCode {
    let network = network.unwrap_or_else(|| {
        fields[FieldKind::CardNumber.index()]
            .1
            .as_deref()
            .map_or(CardNetwork::Unknown, |number| PrefixDetector.detect(number))
    });
    let validator = FieldValidator::new(network, SystemClock.today())
        .with_max_years_ahead(settings.card_form.max_years_ahead);

    let results: Vec<(FieldKind, FieldValidationState)> = fields
        .iter()
        .map(|(kind, text)| (*kind, validator.classify(*kind, text.as_deref())))
        .collect();
    let form_valid = !validator.form_is_not_valid(
        fields
            .iter()
            .map(|(kind, text)| (*kind, text.as_deref())),
    );

    match output {
        OutputFormat::Text => {
            println!("Network: {}", network.name());
            for (kind, state) in &results {
                match state {
                    FieldValidationState::Valid => println!("{:<7} valid", kind.label()),
                    FieldValidationState::NotAvailable => println!("{:<7} incomplete", kind.label()),
                    FieldValidationState::Invalid(e) => println!("{:<7} invalid: {}", kind.label(), e),
                }
            }
            println!("Form valid: {}", if form_valid { "yes" } else { "no" });
        }
        OutputFormat::Json => {
            let field_json: serde_json::Map<String, serde_json::Value> = results
                .iter()
                .map(|(kind, state)| {
                    let value = match state {
                        FieldValidationState::Valid => json!({ "state": "valid" }),
                        FieldValidationState::NotAvailable => json!({ "state": "not_available" }),
                        FieldValidationState::Invalid(e) => {
                            json!({ "state": "invalid", "error": e.to_string() })
                        }
                    };
                    (kind.label().to_owned(), value)
                })
                .collect();
            let report = json!({
                "network": network.name(),
                "valid": form_valid,
                "fields": field_json,
            });
            println!("{}", report);
        }
    }

    if form_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn cmd_cvv(input: &str, network: CardNetwork) -> ExitCode {
    match cvv::validate_cvv(input, network) {
        Ok(()) => {
            println!("Valid: yes");
            println!("Length: {} digits", input.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("Valid: no");
            println!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_expiry(date: &str, max_years: Option<u16>) -> ExitCode {
    match expiry::validate_expiry_at(date, SystemClock.today(), max_years) {
        Ok(exp) => {
            println!("Valid: yes");
            println!("Month: {}", exp.month_string());
            println!("Year: {}", exp.year_string());
            println!("Formatted: {}", exp);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("Valid: no");
            println!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_detect(card_number: &str) -> ExitCode {
    if !card_number.chars().any(|c| c.is_ascii_digit()) {
        eprintln!("Error: No digits provided");
        return ExitCode::FAILURE;
    }

    let network = PrefixDetector.detect(card_number);
    println!("Detected Network: {}", network.name());
    println!("Valid Lengths: {:?}", network.valid_lengths());
    match network.cvv_length() {
        Some(length) => println!("CVV Length: {}", length),
        None => println!("CVV Length: 3 or 4"),
    }
    println!("Pattern: {}", network.number_pattern());
    ExitCode::SUCCESS
}
