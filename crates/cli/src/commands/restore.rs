//! restore command - Restore archival objects of a bucket
//!
//! Lists the bucket, sends a restore request for every object in the
//! archival class and prints an aggregate summary.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use cw_core::{
    Config, ConfigManager, Error, Result, RunDisposition, RunReport, RunSummary, S3Config,
};
use cw_s3::S3Client;
use jiff::SignedDuration;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Deadline for building the storage client
const CLIENT_INIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Restore archival objects of a bucket
#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Number of concurrent restore workers [default: 10]
    #[arg(long = "count", env = "COUNT")]
    pub workers_count: Option<usize>,

    /// Simulate operations without actually restoring objects
    #[arg(
        long = "dry-run",
        env = "DRY_RUN",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub dry_run: bool,

    /// Config file [default: <config dir>/cold2warm/config.toml]
    #[arg(long, env = "COLD2WARM_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub s3: S3Args,
}

/// Storage connection options
#[derive(Args, Debug)]
pub struct S3Args {
    /// Region where the bucket is hosted (e.g., nl-ams) [default: nl-ams]
    #[arg(long = "s3-region", env = "S3_REGION")]
    pub region: Option<String>,

    /// Custom S3 endpoint (e.g., s3.nl-ams.scw.cloud), without the bucket name
    #[arg(long = "s3-endpoint", env = "S3_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Access key ID
    #[arg(long = "s3-access-key", env = "S3_ACCESS_KEY", hide_env_values = true)]
    pub access_key: Option<String>,

    /// Secret access key
    #[arg(long = "s3-secret-key", env = "S3_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Target bucket
    #[arg(long = "s3-bucket-name", env = "S3_BUCKET_NAME")]
    pub bucket_name: Option<String>,

    /// Days to keep restored copies [default: 30]
    #[arg(long = "s3-days", env = "S3_RESTORE_DAYS")]
    pub days: Option<i32>,

    /// Only restore objects under this prefix (e.g., backups/)
    #[arg(long = "s3-prefix", env = "S3_OBJECT_PREFIX")]
    pub prefix: Option<String>,
}

impl RestoreArgs {
    /// Layer command-line and environment values over the config file
    fn apply(self, config: &mut Config) {
        if let Some(count) = self.workers_count {
            config.worker.workers_count = count;
        }
        config.worker.dry_run |= self.dry_run;

        let s3 = &mut config.s3;
        let overrides = [
            (self.s3.region, &mut s3.region),
            (self.s3.endpoint, &mut s3.endpoint),
            (self.s3.access_key, &mut s3.access_key),
            (self.s3.secret_key, &mut s3.secret_key),
            (self.s3.bucket_name, &mut s3.bucket_name),
            (self.s3.prefix, &mut s3.prefix),
        ];
        for (value, slot) in overrides {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(days) = self.s3.days {
            s3.days = days;
        }
    }
}

/// JSON output for a finished run
#[derive(Debug, Serialize)]
struct SummaryOutput {
    bucket: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    dry_run: bool,
    #[serde(flatten)]
    summary: RunSummary,
    total_objects_size_human: String,
    total_in_progress_size_human: String,
    avg_object_size_human: String,
    elapsed_secs: i64,
}

impl SummaryOutput {
    fn new(bucket: &str, report: &RunReport) -> Self {
        let (status, error) = match &report.disposition {
            RunDisposition::Completed => ("completed", None),
            RunDisposition::Cancelled => ("cancelled", None),
            RunDisposition::ListingFailed(e) => ("listing_failed", Some(e.clone())),
        };
        let summary = report.summary.clone();

        Self {
            bucket: bucket.to_string(),
            status,
            error,
            dry_run: report.dry_run,
            total_objects_size_human: human_size(summary.total_objects_size),
            total_in_progress_size_human: human_size(summary.total_in_progress_size),
            avg_object_size_human: human_size(summary.avg_object_size),
            summary,
            elapsed_secs: report.elapsed().as_secs(),
        }
    }
}

fn human_size(bytes: i64) -> String {
    humansize::format_size(bytes.max(0) as u64, humansize::BINARY)
}

/// Execute the restore command
pub async fn execute(
    args: RestoreArgs,
    output_config: OutputConfig,
    cancel: CancellationToken,
) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let config_manager = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => match ConfigManager::new() {
            Ok(cm) => cm,
            Err(e) => {
                formatter.error(&format!("Failed to locate config: {e}"));
                return ExitCode::from_error(&e);
            }
        },
    };

    let mut config = match config_manager.load() {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("Failed to load config: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    args.apply(&mut config);
    if let Err(e) = config.validate() {
        formatter.error(&e.to_string());
        return ExitCode::from_error(&e);
    }

    let client = match create_client(&config.s3, &cancel).await {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("Failed to create S3 client: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    info!(
        workers = config.worker.workers_count,
        bucket = %config.s3.bucket_name,
        region = %config.s3.region,
        prefix = %config.s3.prefix,
        restore_duration_days = config.s3.days,
        dry_run = config.worker.dry_run,
        "Starting Glacier object restoration"
    );

    let report = match cw_core::start(cancel, &config.worker, Arc::new(client)).await {
        Ok(r) => r,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    if report.is_cancelled() {
        error!("Operation cancelled by user");
    }

    print_summary(&formatter, &config.s3.bucket_name, &report);
    exit_code_for(&report.disposition)
}

async fn create_client(config: &S3Config, cancel: &CancellationToken) -> Result<S3Client> {
    tokio::select! {
        _ = cancel.cancelled() => Err(Error::Cancelled),
        created = tokio::time::timeout(CLIENT_INIT_TIMEOUT, S3Client::new(config)) => {
            created.unwrap_or_else(|_| {
                Err(Error::Timeout(format!(
                    "S3 client not ready within {CLIENT_INIT_TIMEOUT:?}"
                )))
            })
        }
    }
}

fn exit_code_for(disposition: &RunDisposition) -> ExitCode {
    match disposition {
        RunDisposition::Completed => ExitCode::Success,
        RunDisposition::Cancelled => ExitCode::Interrupted,
        RunDisposition::ListingFailed(_) => ExitCode::NetworkError,
    }
}

fn print_summary(formatter: &Formatter, bucket: &str, report: &RunReport) {
    if formatter.is_json() {
        formatter.json(&SummaryOutput::new(bucket, report));
        return;
    }

    let summary = &report.summary;
    let bucket = formatter.style_name(bucket);
    let total_size = formatter.style_size(&human_size(summary.total_objects_size));

    match &report.disposition {
        RunDisposition::Completed if report.dry_run => formatter.success(&format!(
            "Dry run: {} archival object(s) ({total_size}) in {bucket} would be restored",
            summary.total_objects
        )),
        RunDisposition::Completed => formatter.success(&format!(
            "Restore requested for {} of {} archival object(s) ({total_size}) in {bucket}",
            summary.restored(),
            summary.total_objects
        )),
        RunDisposition::Cancelled => formatter.warning(
            "Run cancelled; the summary covers objects processed before the interruption",
        ),
        RunDisposition::ListingFailed(e) => {
            formatter.error(&format!("Listing stopped early: {e}"));
        }
    }

    let elapsed = SignedDuration::from_secs(report.elapsed().as_secs());
    let rows = vec![
        ("Total objects".to_string(), summary.total_objects.to_string()),
        ("Total size".to_string(), human_size(summary.total_objects_size)),
        ("Average object size".to_string(), human_size(summary.avg_object_size)),
        ("Restores in progress".to_string(), summary.in_progress_restore.to_string()),
        ("In-progress size".to_string(), human_size(summary.total_in_progress_size)),
        ("Failed restores".to_string(), summary.failed_restore.to_string()),
        ("Elapsed".to_string(), format!("{elapsed:#}")),
    ];
    formatter.println(&formatter.table(&rows));
}
