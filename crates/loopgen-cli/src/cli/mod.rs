//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "loopgen",
    bin_name = "loopgen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "LoopBack application scaffolding",
    long_about = "loopgen generates LoopBack applications and edits their \
                  server configuration: middleware phases, data sources and \
                  SOAP client models.",
    after_help = "EXAMPLES:\n\
        \x20 loopgen app notes-app --template notes\n\
        \x20 loopgen middleware morgan --phase logging --before routes\n\
        \x20 loopgen datasource weather --connector soap --url http://example.com/weather\n\
        \x20 loopgen soap --datasource weather --service Weather --binding WeatherSoap",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new LoopBack application.
    #[command(
        visible_alias = "new",
        about = "Create a new LoopBack application",
        after_help = "EXAMPLES:\n\
            \x20 loopgen app my-api\n\
            \x20 loopgen app my-notes --template notes --loopback-version 3.x\n\
            \x20 loopgen app legacy --loopback-version 2.x --template empty-server --no-explorer"
    )]
    App(AppArgs),

    /// Register a middleware in `server/middleware.json`.
    #[command(
        about = "Add a middleware to a phase",
        after_help = "EXAMPLES:\n\
            \x20 loopgen middleware morgan --phase logging --before routes\n\
            \x20 loopgen middleware ./middleware/tracker --phase routes --sub-phase before\n\
            \x20 loopgen middleware compression --phase initial --params '{\"threshold\": 512}'"
    )]
    Middleware(MiddlewareArgs),

    /// List middleware phases in pipeline order.
    #[command(about = "List middleware phases")]
    Phases(ProjectArgs),

    /// Add a data source to `server/datasources.json`.
    #[command(
        visible_alias = "ds",
        about = "Add a data source",
        after_help = "EXAMPLES:\n\
            \x20 loopgen datasource db --connector memory\n\
            \x20 loopgen datasource weather --connector soap --url http://example.com/weather\n\
            \x20 loopgen datasource mongo --connector mongodb --option url=mongodb://localhost/app"
    )]
    Datasource(DatasourceArgs),

    /// Generate models from a SOAP data source's WSDL.
    #[command(
        about = "Generate SOAP client models",
        after_help = "EXAMPLES:\n\
            \x20 loopgen soap --datasource weather\n\
            \x20 loopgen soap --datasource calc --service Calculator --binding CalculatorSoap --operation Add"
    )]
    Soap(SoapArgs),

    /// List available application templates.
    #[command(
        visible_alias = "ls",
        about = "List application templates",
        after_help = "EXAMPLES:\n\
            \x20 loopgen list\n\
            \x20 loopgen list --loopback-version 2.x --format json"
    )]
    List(ListArgs),

    /// Initialise a loopgen configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 loopgen init           # default location\n\
            \x20 loopgen init --local   # .loopgen.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 loopgen completions bash > ~/.local/share/bash-completion/completions/loopgen\n\
            \x20 loopgen completions zsh  > ~/.zfunc/_loopgen\n\
            \x20 loopgen completions fish > ~/.config/fish/completions/loopgen.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the loopgen configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 loopgen config get defaults.loopback_version\n\
            \x20 loopgen config list\n\
            \x20 loopgen config path"
    )]
    Config(ConfigCommands),
}

// ── shared ────────────────────────────────────────────────────────────────────

/// Location of the LoopBack project being edited.
#[derive(Debug, Args)]
pub struct ProjectArgs {
    #[arg(
        short = 'p',
        long = "project",
        value_name = "DIR",
        default_value = ".",
        help = "LoopBack project root"
    )]
    pub project: PathBuf,
}

// ── app ───────────────────────────────────────────────────────────────────────

/// Arguments for `loopgen app`.
#[derive(Debug, Args)]
pub struct AppArgs {
    /// Application name. Prompted for when omitted.
    #[arg(value_name = "NAME", help = "Application name")]
    pub name: Option<String>,

    /// Directory to create; defaults to `./<name>`.
    #[arg(short = 'd', long = "dir", value_name = "DIR", help = "Target directory")]
    pub dir: Option<PathBuf>,

    #[arg(
        short = 't',
        long = "template",
        value_name = "TEMPLATE",
        help = "Application template (api-server, empty-server, hello-world, notes)"
    )]
    pub template: Option<String>,

    #[arg(
        short = 'l',
        long = "loopback-version",
        value_name = "VERSION",
        help = "LoopBack version (2.x or 3.x)"
    )]
    pub loopback_version: Option<String>,

    /// Leave `loopback-component-explorer` out.
    #[arg(long = "no-explorer", help = "Do not mount the API explorer")]
    pub no_explorer: bool,

    #[arg(short = 'y', long = "yes", help = "Skip confirmation and create immediately")]
    pub yes: bool,

    /// Write into an existing directory.
    #[arg(long = "force", help = "Write into an existing directory")]
    pub force: bool,

    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── middleware ────────────────────────────────────────────────────────────────

/// Arguments for `loopgen middleware`.
#[derive(Debug, Args)]
pub struct MiddlewareArgs {
    /// Module path or `module#export` to register.
    #[arg(value_name = "SOURCE", help = "Middleware source, e.g. morgan or loopback#rest")]
    pub source: String,

    /// Phase to register in; created when missing.
    #[arg(long = "phase", value_name = "PHASE", help = "Target phase")]
    pub phase: Option<String>,

    #[arg(long = "sub-phase", value_enum, help = "Register in phase:before or phase:after")]
    pub sub_phase: Option<SubPhaseArg>,

    /// Place a new phase ahead of this phase group.
    #[arg(long = "before", value_name = "PHASE", conflicts_with = "after")]
    pub before: Option<String>,

    /// Place a new phase behind this phase group.
    #[arg(long = "after", value_name = "PHASE")]
    pub after: Option<String>,

    /// Route paths the middleware is mounted on (repeatable).
    #[arg(long = "path", value_name = "PATH")]
    pub paths: Vec<String>,

    /// Middleware parameters as a JSON object.
    #[arg(long = "params", value_name = "JSON")]
    pub params: Option<String>,

    #[arg(long = "disabled", help = "Register with enabled: false")]
    pub disabled: bool,

    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SubPhaseArg {
    Before,
    After,
}

// ── datasource ────────────────────────────────────────────────────────────────

/// Arguments for `loopgen datasource`.
#[derive(Debug, Args)]
pub struct DatasourceArgs {
    #[arg(value_name = "NAME", help = "Data source name")]
    pub name: String,

    #[arg(
        long = "connector",
        value_name = "CONNECTOR",
        default_value = "memory",
        help = "Connector name (memory, soap, mongodb, ...)"
    )]
    pub connector: String,

    /// Service endpoint; required for SOAP data sources.
    #[arg(long = "url", value_name = "URL")]
    pub url: Option<String>,

    /// WSDL location when it differs from `<url>?wsdl`.
    #[arg(long = "wsdl", value_name = "LOCATION")]
    pub wsdl: Option<String>,

    #[arg(long = "no-remoting", help = "Set remotingEnabled: false on SOAP data sources")]
    pub no_remoting: bool,

    /// Extra connector option, `key=value` (repeatable). Values parse as JSON
    /// when possible.
    #[arg(long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    #[command(flatten)]
    pub project: ProjectArgs,
}

// ── soap ──────────────────────────────────────────────────────────────────────

/// Arguments for `loopgen soap`.
#[derive(Debug, Args)]
pub struct SoapArgs {
    /// SOAP data source the generated API model is attached to.
    #[arg(long = "datasource", value_name = "NAME")]
    pub datasource: Option<String>,

    /// WSDL location overriding the data source's.
    #[arg(long = "wsdl", value_name = "LOCATION")]
    pub wsdl: Option<String>,

    #[arg(long = "service", value_name = "SERVICE")]
    pub service: Option<String>,

    #[arg(long = "binding", value_name = "BINDING")]
    pub binding: Option<String>,

    /// Operation to expose (repeatable); all operations when omitted.
    #[arg(long = "operation", value_name = "OPERATION")]
    pub operations: Vec<String>,

    #[command(flatten)]
    pub project: ProjectArgs,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `loopgen list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only templates offered for this LoopBack version.
    #[arg(short = 'l', long = "loopback-version", value_name = "VERSION")]
    pub loopback_version: Option<String>,

    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `loopgen init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.loopgen.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `loopgen completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `loopgen config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.template`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
