//! Process configuration, read only from the environment.
//!
//! The command line takes no arguments besides `--help` and `--version`.

use anyhow::{Context, Result, bail};
use cardsync_core::{DateRange, ImportIdScheme, SyncJob, Translator};
use cardsync_ledger::DEFAULT_BASE_URL;
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Deserialize;

const ENV_HELP: &str = "\
Configuration is read from the environment:
  LEDGER_ACCESS_TOKEN         ledger API personal access token
  LEDGER_BUDGET_ID            budget holding the card account
  LEDGER_ACCOUNT_ID           ledger account that mirrors the card
  LEDGER_SOURCE_CATEGORY_ID   category assigned to card usage
  SOURCE_URL                  card provider base URL
  SOURCE_USERNAME             card provider username
  SOURCE_PASSWORD             card provider password
  SOURCE_CARD_SERIAL_NUMBER   card to sync
  INSECURE                    \"true\" or \"1\" skips ledger TLS verification
  LEDGER_URL                  ledger API base URL (optional)
  IMPORT_ID_SCHEME            timestamped (default) or stable";

#[derive(Parser, Debug)]
#[command(
    name = "cardsync",
    version,
    about = "Import transit-card transactions into a budget ledger",
    after_help = ENV_HELP
)]
pub struct Cli {}

/// Raw environment values; keys arrive lowercased.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EnvSettings {
    ledger_access_token: Option<String>,
    ledger_budget_id: Option<String>,
    ledger_account_id: Option<String>,
    ledger_source_category_id: Option<String>,
    source_url: Option<String>,
    source_username: Option<String>,
    source_password: Option<String>,
    source_card_serial_number: Option<String>,
    insecure: Option<String>,
    ledger_url: Option<String>,
    import_id_scheme: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub ledger_access_token: String,
    pub ledger_budget_id: String,
    pub ledger_account_id: String,
    pub ledger_source_category_id: String,
    pub source_url: String,
    pub source_username: String,
    pub source_password: String,
    pub source_card_serial_number: String,
    pub insecure: bool,
    pub ledger_url: String,
    pub import_id_scheme: ImportIdScheme,
}

/// Only `"true"` and `"1"` count as true.
pub fn parse_truthy(s: &str) -> bool {
    matches!(s, "true" | "1")
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Reads `vars` in place of the process environment when given.
    pub fn load(vars: Option<config::Map<String, String>>) -> Result<Self> {
        let settings: EnvSettings = config::Config::builder()
            .add_source(config::Environment::default().ignore_empty(true).source(vars))
            .build()
            .and_then(|c| c.try_deserialize())
            .context("failed to read configuration from the environment")?;

        settings.validate()
    }

    /// The run's job: the 30 days before `now`'s UTC date, translated with
    /// `now` as the import time.
    pub fn sync_job(&self, now: DateTime<Utc>) -> SyncJob {
        let translator = Translator::new(
            &self.ledger_account_id,
            &self.ledger_source_category_id,
            now,
        )
        .with_import_ids(self.import_id_scheme);

        SyncJob {
            budget_id: self.ledger_budget_id.clone(),
            card_serial_number: self.source_card_serial_number.clone(),
            range: DateRange::last_30_days(now.date_naive()),
            translator,
        }
    }
}

impl EnvSettings {
    fn validate(self) -> Result<Config> {
        let mut missing = Vec::new();
        let mut require = |value: Option<String>, key: &'static str| match value
            .filter(|v| !v.trim().is_empty())
        {
            Some(v) => v,
            None => {
                missing.push(key);
                String::new()
            }
        };

        let config = Config {
            ledger_access_token: require(self.ledger_access_token, "LEDGER_ACCESS_TOKEN"),
            ledger_budget_id: require(self.ledger_budget_id, "LEDGER_BUDGET_ID"),
            ledger_account_id: require(self.ledger_account_id, "LEDGER_ACCOUNT_ID"),
            ledger_source_category_id: require(
                self.ledger_source_category_id,
                "LEDGER_SOURCE_CATEGORY_ID",
            ),
            source_url: require(self.source_url, "SOURCE_URL"),
            source_username: require(self.source_username, "SOURCE_USERNAME"),
            source_password: require(self.source_password, "SOURCE_PASSWORD"),
            source_card_serial_number: require(
                self.source_card_serial_number,
                "SOURCE_CARD_SERIAL_NUMBER",
            ),
            insecure: self.insecure.as_deref().is_some_and(parse_truthy),
            ledger_url: self
                .ledger_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            import_id_scheme: match self.import_id_scheme {
                Some(s) => s
                    .parse()
                    .map_err(anyhow::Error::msg)
                    .context("invalid IMPORT_ID_SCHEME")?,
                None => ImportIdScheme::default(),
            },
        };

        if !missing.is_empty() {
            bail!(
                "missing required environment variables: {}",
                missing.join(", ")
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use clap::CommandFactory;

    fn vars(extra: &[(&str, &str)]) -> config::Map<String, String> {
        let mut map = config::Map::new();
        for (key, value) in [
            ("LEDGER_ACCESS_TOKEN", "tok"),
            ("LEDGER_BUDGET_ID", "budget"),
            ("LEDGER_ACCOUNT_ID", "acct"),
            ("LEDGER_SOURCE_CATEGORY_ID", "cat"),
            ("SOURCE_URL", "https://cards.example.com"),
            ("SOURCE_USERNAME", "user"),
            ("SOURCE_PASSWORD", "pass"),
            ("SOURCE_CARD_SERIAL_NUMBER", "6014640000000000"),
        ]
        .iter()
        .chain(extra)
        {
            map.insert(key.to_string(), value.to_string());
        }
        map
    }

    #[test]
    fn test_cli_has_no_arguments() {
        Cli::command().debug_assert();
        assert!(Cli::try_parse_from(["cardsync"]).is_ok());
        assert!(Cli::try_parse_from(["cardsync", "--ledger-access-token", "tok"]).is_err());
        assert!(Cli::try_parse_from(["cardsync", "tok"]).is_err());
    }

    #[test]
    fn test_loads_required_values() {
        let cfg = Config::load(Some(vars(&[]))).unwrap();
        assert_eq!(cfg.ledger_access_token, "tok");
        assert_eq!(cfg.source_card_serial_number, "6014640000000000");
        assert!(!cfg.insecure);
        assert_eq!(cfg.ledger_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.import_id_scheme, ImportIdScheme::Timestamped);
    }

    #[test]
    fn test_missing_values_are_all_named() {
        let mut map = vars(&[]);
        map.remove("LEDGER_BUDGET_ID");
        map.remove("SOURCE_PASSWORD");
        let err = Config::load(Some(map)).unwrap_err().to_string();
        assert_eq!(
            err,
            "missing required environment variables: LEDGER_BUDGET_ID, SOURCE_PASSWORD"
        );
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let err = Config::load(Some(vars(&[("LEDGER_ACCESS_TOKEN", "")])))
            .unwrap_err()
            .to_string();
        assert!(err.contains("LEDGER_ACCESS_TOKEN"), "{err}");
    }

    #[test]
    fn test_insecure_truthy_values() {
        for (value, expected) in [
            ("true", true),
            ("1", true),
            ("TRUE", false),
            ("yes", false),
            ("0", false),
        ] {
            let cfg = Config::load(Some(vars(&[("INSECURE", value)]))).unwrap();
            assert_eq!(cfg.insecure, expected, "INSECURE={value}");
        }
    }

    #[test]
    fn test_unknown_import_id_scheme_is_rejected() {
        let err = Config::load(Some(vars(&[("IMPORT_ID_SCHEME", "random")]))).unwrap_err();
        assert!(format!("{err:#}").contains("invalid IMPORT_ID_SCHEME"));
    }

    #[test]
    fn test_sync_job_uses_last_30_days_and_config_ids() {
        let cfg = Config::load(Some(vars(&[
            ("IMPORT_ID_SCHEME", "stable"),
            ("LEDGER_URL", "http://localhost:8080/v1"),
        ])))
        .unwrap();
        assert_eq!(cfg.ledger_url, "http://localhost:8080/v1");

        let now = Utc.with_ymd_and_hms(2024, 1, 8, 15, 42, 7).unwrap();
        let job = cfg.sync_job(now);

        assert_eq!(job.budget_id, "budget");
        assert_eq!(job.card_serial_number, "6014640000000000");
        assert_eq!(job.range.to, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(job.range.from, NaiveDate::from_ymd_opt(2023, 12, 9).unwrap());
        assert_eq!(job.translator.account_id, "acct");
        assert_eq!(job.translator.category_id, "cat");
        assert_eq!(job.translator.import_ids, ImportIdScheme::Stable);
        assert_eq!(job.translator.imported_at, now);
    }
}
