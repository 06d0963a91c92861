//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Ledger configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Bank statement import configuration.
    #[serde(default)]
    pub import: ImportConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Reporting currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Account codes whose balances count as partner receivables.
    #[serde(default = "default_receivable_codes")]
    pub receivable_account_codes: Vec<String>,
    /// Account codes whose balances count as partner payables.
    #[serde(default = "default_payable_codes")]
    pub payable_account_codes: Vec<String>,
}

fn default_currency() -> String {
    "JPY".to_string()
}

fn default_receivable_codes() -> Vec<String> {
    vec!["1130".to_string()] // 売掛金
}

fn default_payable_codes() -> Vec<String> {
    vec!["2110".to_string()] // 買掛金
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            receivable_account_codes: default_receivable_codes(),
            payable_account_codes: default_payable_codes(),
        }
    }
}

/// Bank statement import configuration.
///
/// Drives duplicate detection and the fallback accounts used when no
/// mapping rule matches a row.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    /// Days either side of a row searched for existing entries.
    #[serde(default = "default_window_days")]
    pub window_days: i64,
    /// Largest amount difference still treated as equal.
    #[serde(default = "default_amount_tolerance")]
    pub amount_tolerance: Decimal,
    /// Similarity above which an existing entry matches.
    #[serde(default = "default_match_similarity")]
    pub match_similarity: Decimal,
    /// Similarity above which two rows in the same batch match.
    #[serde(default = "default_batch_similarity")]
    pub batch_similarity: Decimal,
    /// Confidence at or above which a row is skipped.
    #[serde(default = "default_skip_confidence")]
    pub skip_confidence: Decimal,
    /// Confidence at or above which a row needs review.
    #[serde(default = "default_review_confidence")]
    pub review_confidence: Decimal,
    /// Debit account code used when no rule matches.
    #[serde(default = "default_suspense_debit")]
    pub suspense_debit_code: String,
    /// Credit account code used when no rule matches.
    #[serde(default = "default_suspense_credit")]
    pub suspense_credit_code: String,
}

fn default_window_days() -> i64 {
    1
}

fn default_amount_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

fn default_match_similarity() -> Decimal {
    Decimal::new(7, 1)
}

fn default_batch_similarity() -> Decimal {
    Decimal::new(9, 1)
}

fn default_skip_confidence() -> Decimal {
    Decimal::new(95, 2)
}

fn default_review_confidence() -> Decimal {
    Decimal::new(8, 1)
}

fn default_suspense_debit() -> String {
    "1190".to_string() // 仮払金
}

fn default_suspense_credit() -> String {
    "2190".to_string() // 仮受金
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            amount_tolerance: default_amount_tolerance(),
            match_similarity: default_match_similarity(),
            batch_similarity: default_batch_similarity(),
            skip_confidence: default_skip_confidence(),
            review_confidence: default_review_confidence(),
            suspense_debit_code: default_suspense_debit(),
            suspense_credit_code: default_suspense_credit(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("CHOUBO")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("ledger.receivable_account_codes")
                    .with_list_parse_key("ledger.payable_account_codes"),
            )
            .build()?;

        config.try_deserialize()
    }
}
