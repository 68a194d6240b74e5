//! CLI configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Log output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// What to do when the stored cart is malformed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CorruptPolicy {
    /// Refuse to start and report the problem.
    Fail,

    /// Log a warning and start from an empty cart.
    Reset,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "AVANCE_LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "AVANCE_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

/// Avance storefront cart
#[derive(Debug, Parser)]
#[command(name = "avance", about = "Avance storefront cart", long_about = None)]
pub struct CliConfig {
    /// Directory holding the durable cart slot
    #[arg(long, env = "AVANCE_DATA_DIR", default_value = ".avance", global = true)]
    pub data_dir: PathBuf,

    /// Behaviour when the stored cart is malformed
    #[arg(
        long,
        env = "AVANCE_CORRUPT_POLICY",
        value_enum,
        default_value_t = CorruptPolicy::Fail,
        global = true
    )]
    pub on_corrupt: CorruptPolicy,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Page to show or action to take
    #[command(subcommand)]
    pub command: Command,
}

/// Storefront pages and cart actions.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List the catalog
    Shop,

    /// Show a product's detail page
    Product {
        /// Product id
        id: String,
    },

    /// Add one unit of a product to the cart
    Add {
        /// Product id
        id: String,
    },

    /// Increase a cart line's quantity by one
    Inc {
        /// Product id
        id: String,
    },

    /// Decrease a cart line's quantity by one, removing it at zero
    Dec {
        /// Product id
        id: String,
    },

    /// Remove a line from the cart
    Remove {
        /// Product id
        id: String,
    },

    /// Empty the cart
    Clear,

    /// Show the cart
    Cart,

    /// Proceed to checkout
    Checkout,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
