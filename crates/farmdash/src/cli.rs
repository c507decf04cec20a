//! Command-line arguments.

use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use domain::models::{product::ProductCategory, transaction::PaymentMethod};
use services::services::config::ClientConfig;

#[derive(Parser, Debug)]
#[command(
    name = "farmdash",
    version,
    about = "Manage the farm dashboard from the command line"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of the one in the user config directory
    #[arg(long, global = true, env = "FARMDASH_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the dashboard API
    #[arg(long, global = true, env = "FARMDASH_API_URL", value_name = "URL")]
    pub api_url: Option<String>,
}

impl Cli {
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(ClientConfig::default_path)
    }

    /// File, then `FARMDASH_*` environment, then flags.
    pub fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let config = match self.config_path() {
            Some(path) => ClientConfig::load(&path)
                .with_context(|| format!("failed to read config from {}", path.display()))?,
            None => ClientConfig::default(),
        };
        let mut config = config.apply_env();
        if let Some(url) = &self.api_url {
            config.api_base_url = url.clone();
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Resource {
    Products,
    Transactions,
    Customers,
    Staff,
    Operations,
    Consumptions,
    Services,
    Notifications,
    Templates,
    Emails,
    Blogs,
    Faqs,
    AcademicLevels,
    Courses,
    Documents,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(long, env = "FARMDASH_EMAIL")]
        email: Option<String>,

        /// Prompted for when omitted
        #[arg(long, env = "FARMDASH_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign out and forget the saved session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List one page of a resource, newest first
    #[command(alias = "ls")]
    List {
        resource: Resource,

        #[arg(short, long, default_value_t = 1)]
        page: u64,

        #[arg(long)]
        page_size: Option<u64>,
    },

    /// Show one record as JSON
    Show { resource: Resource, id: String },

    /// Search a resource by name
    Search { resource: Resource, term: String },

    /// Delete one record
    #[command(alias = "rm")]
    Delete {
        resource: Resource,
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete several records at once
    MassDelete {
        resource: Resource,

        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,

        #[arg(short, long)]
        yes: bool,
    },

    /// Suspend a staff account
    Suspend {
        id: String,

        #[arg(short, long)]
        yes: bool,
    },

    /// List transactions within a date range
    Transactions {
        /// First day, YYYY-MM-DD
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day, YYYY-MM-DD
        #[arg(long)]
        to: Option<NaiveDate>,

        #[arg(short, long, default_value_t = 1)]
        page: u64,
    },

    /// Record a part payment against a transaction
    PartPayment { id: String, amount: f64 },

    /// Create a product
    AddProduct {
        #[arg(long)]
        name: String,

        #[arg(long)]
        price: f64,

        #[arg(long, default_value_t = 0)]
        stock: i64,

        #[arg(long, default_value = "other")]
        category: ProductCategory,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long)]
        unit: Option<String>,

        /// Product photo to upload
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
    },

    /// Sell products: each item is PRODUCT_ID or PRODUCT_ID:QUANTITY
    Checkout {
        #[arg(required = true, num_args = 1.., value_parser = parse_item)]
        items: Vec<(String, u32)>,

        #[arg(long, default_value = "Walk-in customer")]
        customer_name: String,

        /// Customer id, for registered customers
        #[arg(long)]
        customer: Option<String>,

        #[arg(long, default_value = "cash")]
        payment: PaymentMethod,

        /// Defaults to the full amount
        #[arg(long)]
        amount_paid: Option<f64>,
    },

    /// Render a message template with KEY=VALUE variables
    Preview {
        id: String,

        #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
        vars: Vec<(String, String)>,
    },

    /// Print the effective configuration
    Config {
        /// Write it to the config file
        #[arg(long)]
        save: bool,
    },
}

fn parse_item(raw: &str) -> anyhow::Result<(String, u32)> {
    let (id, quantity) = match raw.split_once(':') {
        Some((id, quantity)) => (
            id,
            quantity
                .parse::<u32>()
                .with_context(|| format!("invalid quantity in {raw:?}"))?,
        ),
        None => (raw, 1),
    };
    if id.trim().is_empty() {
        bail!("missing product id in {raw:?}");
    }
    if quantity == 0 {
        bail!("quantity must be at least 1 in {raw:?}");
    }
    Ok((id.trim().to_string(), quantity))
}

fn parse_var(raw: &str) -> anyhow::Result<(String, String)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("expected KEY=VALUE, got {raw:?}");
    };
    Ok((key.trim().to_string(), value.to_string()))
}
