//! Clappia CLI
//!
//! Command-line front-end for the app-definition and submission operations.
//! Each subcommand prints the operation's response as JSON and exits non-zero
//! when the operation failed.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use clappia_api::{
    AggregationDimension, AggregationMetric, AggregationQuery, AppSection, ClappiaClient,
    ClientConfig, DefinitionOptions, ExportFormat, ExportOptions, FieldProperties, FieldType,
    OperationResponse, SubmissionFilters, SubmissionQuery, DEFAULT_AGGREGATION_PAGE_SIZE,
    DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS,
};

const DEFAULT_LOG_FILTER: &str = "clappia_api=warn";

#[derive(Parser)]
#[command(name = "clappia")]
#[command(about = "Manage Clappia apps and submissions")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    connection: Connection,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Connection {
    /// Clappia API key
    #[arg(long, env = "CLAPPIA_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// API base URL
    #[arg(long, env = "CLAPPIA_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Workplace ID
    #[arg(long, env = "CLAPPIA_WORKPLACE_ID", global = true)]
    workplace_id: Option<String>,

    /// Request timeout in seconds
    #[arg(
        long,
        env = "CLAPPIA_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        global = true
    )]
    timeout: u64,
}

impl Connection {
    fn config(&self) -> ClientConfig {
        ClientConfig::new(
            self.api_key.as_deref().unwrap_or_default(),
            &self.base_url,
            self.workplace_id.as_deref().unwrap_or_default(),
        )
        .with_timeout(self.timeout)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch an app definition
    GetDefinition {
        /// App ID (uppercase letters and digits)
        app_id: String,

        /// Language of labels in the definition
        #[arg(long, default_value = "en")]
        language: String,

        /// Strip HTML from labels
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        strip_html: bool,

        /// Include tags
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        include_tags: bool,
    },

    /// Create an app from a JSON file of sections
    CreateApp {
        /// App name (at least 3 characters)
        #[arg(long)]
        name: String,

        /// Email of the requesting user
        #[arg(long)]
        requester: String,

        /// JSON file: [{"sectionName": ..., "fields": [{"fieldType": ..., "label": ...}]}]
        #[arg(long)]
        sections: PathBuf,
    },

    /// Add a field to an app
    AddField {
        #[arg(long)]
        app_id: String,

        #[arg(long)]
        requester: String,

        #[arg(long)]
        section_index: usize,

        #[arg(long)]
        field_index: usize,

        /// Field type, e.g. singleLineText, dropDown, file
        #[arg(long)]
        field_type: FieldType,

        /// Field label (overrides any label in --properties)
        #[arg(long)]
        label: Option<String>,

        /// JSON file of optional properties keyed by wire name
        #[arg(long)]
        properties: Option<PathBuf>,
    },

    /// Update properties of an existing field
    UpdateField {
        #[arg(long)]
        app_id: String,

        #[arg(long)]
        requester: String,

        /// Field name as shown in the app definition
        #[arg(long)]
        field_name: String,

        /// JSON file of properties to change, keyed by wire name
        #[arg(long)]
        properties: PathBuf,
    },

    /// Create a submission from a JSON data file
    CreateSubmission {
        #[arg(long)]
        app_id: String,

        #[arg(long)]
        requester: String,

        /// JSON object of field name to value
        #[arg(long)]
        data: PathBuf,
    },

    /// Edit an existing submission
    EditSubmission {
        #[arg(long)]
        app_id: String,

        #[arg(long)]
        submission_id: String,

        #[arg(long)]
        requester: String,

        /// JSON object of field name to new value
        #[arg(long)]
        data: PathBuf,
    },

    /// Change a submission's workflow status
    UpdateStatus {
        #[arg(long)]
        app_id: String,

        #[arg(long)]
        submission_id: String,

        #[arg(long)]
        requester: String,

        /// New status name
        #[arg(long)]
        status: String,

        #[arg(long)]
        comments: Option<String>,
    },

    /// Replace a submission's owners
    UpdateOwners {
        #[arg(long)]
        app_id: String,

        #[arg(long)]
        submission_id: String,

        #[arg(long)]
        requester: String,

        /// Owner email (repeatable); invalid addresses are skipped
        #[arg(long = "owner", required = true)]
        owners: Vec<String>,
    },

    /// List submissions
    GetSubmissions {
        #[arg(long)]
        app_id: String,

        #[arg(long)]
        requester: String,

        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u32,

        /// Page backwards
        #[arg(long)]
        backward: bool,

        /// JSON filter file: {"queries": [{"queries": [{"conditions": [...]}]}]}
        #[arg(long)]
        filters: Option<PathBuf>,
    },

    /// Aggregate submissions
    Aggregate {
        #[arg(long)]
        app_id: String,

        #[arg(long)]
        requester: String,

        /// JSON file: [{"key": ..., "type": "STANDARD"|"CUSTOM", "sort_direction": "asc"|"desc"}]
        #[arg(long)]
        dimensions: Option<PathBuf>,

        /// JSON file: [{"aggregation_type": "count"|"sum"|..., "key": ..., "type": ...}]
        #[arg(long)]
        metrics: Option<PathBuf>,

        /// X-axis label (repeatable)
        #[arg(long = "x-axis-label")]
        x_axis_labels: Vec<String>,

        #[arg(long, default_value_t = DEFAULT_AGGREGATION_PAGE_SIZE)]
        page_size: u32,

        #[arg(long)]
        backward: bool,

        #[arg(long)]
        filters: Option<PathBuf>,
    },

    /// Export submissions to Excel or CSV
    Export {
        #[arg(long)]
        app_id: String,

        #[arg(long)]
        requester: String,

        /// Excel or Csv
        #[arg(long, default_value = "Excel")]
        format: ExportFormat,

        /// Column to include (repeatable; all columns when omitted)
        #[arg(long = "field-name")]
        field_names: Vec<String>,

        #[arg(long)]
        filters: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let client = ClappiaClient::new(cli.connection.config());
    let pretty = cli.pretty;

    let result = match cli.command {
        Commands::GetDefinition {
            app_id,
            language,
            strip_html,
            include_tags,
        } => {
            let options = DefinitionOptions {
                language,
                strip_html,
                include_tags,
            };
            emit(&client.get_definition(&app_id, options), pretty)
        }

        Commands::CreateApp {
            name,
            requester,
            sections,
        } => read_json::<Vec<AppSection>>(&sections, "sections")
            .and_then(|sections| emit(&client.create_app(&name, &requester, sections), pretty)),

        Commands::AddField {
            app_id,
            requester,
            section_index,
            field_index,
            field_type,
            label,
            properties,
        } => read_properties(properties.as_deref()).and_then(|mut props| {
            if label.is_some() {
                props.label = label;
            }
            let response = client.add_field(
                &app_id,
                &requester,
                section_index,
                field_index,
                field_type,
                props,
            );
            emit(&response, pretty)
        }),

        Commands::UpdateField {
            app_id,
            requester,
            field_name,
            properties,
        } => read_properties(Some(properties.as_path())).and_then(|props| {
            emit(
                &client.update_field(&app_id, &requester, &field_name, props),
                pretty,
            )
        }),

        Commands::CreateSubmission {
            app_id,
            requester,
            data,
        } => read_json::<Value>(&data, "data")
            .and_then(|data| emit(&client.create_submission(&app_id, &requester, data), pretty)),

        Commands::EditSubmission {
            app_id,
            submission_id,
            requester,
            data,
        } => read_json::<Value>(&data, "data").and_then(|data| {
            emit(
                &client.edit_submission(&app_id, &submission_id, &requester, data),
                pretty,
            )
        }),

        Commands::UpdateStatus {
            app_id,
            submission_id,
            requester,
            status,
            comments,
        } => emit(
            &client.update_submission_status(
                &app_id,
                &submission_id,
                &requester,
                &status,
                comments.as_deref(),
            ),
            pretty,
        ),

        Commands::UpdateOwners {
            app_id,
            submission_id,
            requester,
            owners,
        } => emit(
            &client.update_submission_owners(&app_id, &submission_id, &requester, &owners),
            pretty,
        ),

        Commands::GetSubmissions {
            app_id,
            requester,
            page_size,
            backward,
            filters,
        } => read_filters(filters.as_deref()).and_then(|filters| {
            let query = SubmissionQuery {
                page_size,
                forward: !backward,
                filters,
            };
            emit(&client.get_submissions(&app_id, &requester, query), pretty)
        }),

        Commands::Aggregate {
            app_id,
            requester,
            dimensions,
            metrics,
            x_axis_labels,
            page_size,
            backward,
            filters,
        } => run_aggregate(
            &client,
            AggregateArgs {
                app_id,
                requester,
                dimensions,
                metrics,
                x_axis_labels,
                page_size,
                backward,
                filters,
            },
            pretty,
        ),

        Commands::Export {
            app_id,
            requester,
            format,
            field_names,
            filters,
        } => read_filters(filters.as_deref()).and_then(|filters| {
            let options = ExportOptions {
                format,
                field_names: (!field_names.is_empty()).then_some(field_names),
                filters,
            };
            emit(&client.export_submissions(&app_id, &requester, options), pretty)
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

struct AggregateArgs {
    app_id: String,
    requester: String,
    dimensions: Option<PathBuf>,
    metrics: Option<PathBuf>,
    x_axis_labels: Vec<String>,
    page_size: u32,
    backward: bool,
    filters: Option<PathBuf>,
}

fn run_aggregate(client: &ClappiaClient, args: AggregateArgs, pretty: bool) -> Result<(), u8> {
    let dimensions = match &args.dimensions {
        Some(path) => read_json::<Vec<AggregationDimension>>(path, "dimensions")?,
        None => Vec::new(),
    };
    let metrics = match &args.metrics {
        Some(path) => read_json::<Vec<AggregationMetric>>(path, "metrics")?,
        None => Vec::new(),
    };
    let query = AggregationQuery {
        dimensions,
        metrics,
        x_axis_labels: args.x_axis_labels,
        forward: !args.backward,
        page_size: args.page_size,
        filters: read_filters(args.filters.as_deref())?,
    };
    emit(
        &client.get_submissions_aggregation(&args.app_id, &args.requester, query),
        pretty,
    )
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T, u8> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        eprintln!("Error reading {} from {}: {}", what, path.display(), e);
        1u8
    })?;
    serde_json::from_str(&content).map_err(|e| {
        eprintln!("Error: invalid {} in {}: {}", what, path.display(), e);
        1u8
    })
}

fn read_properties(path: Option<&Path>) -> Result<FieldProperties, u8> {
    match path {
        Some(path) => read_json(path, "properties"),
        None => Ok(FieldProperties::default()),
    }
}

fn read_filters(path: Option<&Path>) -> Result<Option<SubmissionFilters>, u8> {
    let Some(path) = path else {
        return Ok(None);
    };
    let raw: Value = read_json(path, "filters")?;
    SubmissionFilters::from_value(&raw).map(Some).map_err(|e| {
        eprintln!("Error: {}", e);
        1u8
    })
}

/// Print a response; a failed operation maps to exit code 1.
fn emit<R: OperationResponse>(response: &R, pretty: bool) -> Result<(), u8> {
    let output = if pretty {
        serde_json::to_string_pretty(response)
    } else {
        serde_json::to_string(response)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        1u8
    })?;

    println!("{}", output);

    if response.is_success() {
        Ok(())
    } else {
        Err(1)
    }
}
