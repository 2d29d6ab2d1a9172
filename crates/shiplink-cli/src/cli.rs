//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "shiplink",
    version,
    about = "Reconcile customs shipment records against a reference trade source",
    long_about = "Reconcile customs bill-of-lading shipments against a reference trade source.\n\n\
                  Attributes free-text shipper names to parent companies, links monthly\n\
                  country aggregates across both sources and estimates the tonnage left\n\
                  unaccounted for by company-level records."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Pipeline configuration file (TOML). Built-in defaults are used when omitted.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow shipper names and other row values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List canonical crops and the commodity labels mapped to them.
    Crops,

    /// Attribute shipper names to parent companies.
    Resolve(ResolveArgs),

    /// Link monthly country totals of two sources for one crop.
    Link(LinkArgs),

    /// Estimate the tonnage not covered by company-level records.
    Reconcile(ReconcileArgs),
}

#[derive(Parser)]
pub struct ResolveArgs {
    /// Shipment CSV with a shipper column.
    #[arg(long = "shipments", value_name = "CSV")]
    pub shipments: PathBuf,

    /// Land-ownership CSV used to build the subsidiary directory.
    #[arg(long = "land", value_name = "CSV")]
    pub land: PathBuf,

    /// Two-column CSV (`text`, `translation`) of operating-company names.
    ///
    /// Without a glossary names are matched untranslated.
    #[arg(long = "glossary", value_name = "CSV")]
    pub glossary: Option<PathBuf>,

    /// Write the shipments with a `company_std` column.
    #[arg(long = "output", value_name = "CSV")]
    pub output: Option<PathBuf>,

    #[arg(long = "shipper-column", default_value = "shipper")]
    pub shipper_column: String,

    #[arg(long = "weight-column", default_value = "weight_ton")]
    pub weight_column: String,
}

#[derive(Parser)]
pub struct LinkArgs {
    /// Company-level (bill-of-lading) CSV.
    #[arg(long = "left", value_name = "CSV")]
    pub left: PathBuf,

    /// Reference CSV.
    #[arg(long = "right", value_name = "CSV")]
    pub right: PathBuf,

    /// Canonical crop both sides are restricted to.
    #[arg(long = "crop")]
    pub crop: String,

    /// Write the joined unique matches.
    #[arg(long = "output", value_name = "CSV")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub columns: SourceColumns,

    #[arg(long = "left-suffix", default_value = "_a")]
    pub left_suffix: String,

    #[arg(long = "right-suffix", default_value = "_b")]
    pub right_suffix: String,
}

#[derive(Parser)]
pub struct ReconcileArgs {
    /// Company-level CSV with a company column.
    #[arg(long = "company", value_name = "CSV")]
    pub company: PathBuf,

    /// Reference CSV.
    #[arg(long = "reference", value_name = "CSV")]
    pub reference: PathBuf,

    /// Restrict both sources to one canonical crop.
    #[arg(long = "crop")]
    pub crop: Option<String>,

    /// Row label for the company side when a crop is given.
    #[arg(long = "entity", default_value = "Company")]
    pub entity: String,

    /// Write the residual table.
    #[arg(long = "output", value_name = "CSV")]
    pub output: Option<PathBuf>,

    #[arg(long = "company-column", default_value = "company_std")]
    pub company_column: String,

    #[arg(long = "weight-column", default_value = "weight_ton")]
    pub weight_column: String,

    #[arg(long = "commodity-column", default_value = "commodity")]
    pub commodity_column: String,
}

/// Column names shared by both sides of a link run.
#[derive(Args, Clone)]
pub struct SourceColumns {
    #[arg(long = "date-column", default_value = "date")]
    pub date: String,

    #[arg(long = "country-column", default_value = "country")]
    pub country: String,

    #[arg(long = "commodity-column", default_value = "commodity")]
    pub commodity: String,

    #[arg(long = "weight-column", default_value = "weight_ton")]
    pub weight: String,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
