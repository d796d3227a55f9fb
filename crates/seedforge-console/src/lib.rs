//! Colorful console output for pipeline runs.
//!
//! Provides a custom `tracing` layer that formats pipeline events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Pipeline and stage lifecycle, cluster choice, validation, export
//! - **DEBUG**: Cluster candidate scores and allocation summaries
//! - **TRACE**: Individual allocation decisions
//!
//! Everything is written to stderr so stdout stays free for command results.

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static RUN_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_DIRECTIVE: &str = "seedforge_solver=info";

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect.
/// Prints the banner and sets up tracing; `RUST_LOG` overrides the default
/// `seedforge_solver=info` filter.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let mut filter = EnvFilter::builder()
            .with_default_directive(
                DEFAULT_DIRECTIVE
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            )
            .from_env_lossy();
        if let Ok(directive) = "seedforge_io=info".parse() {
            filter = filter.add_directive(directive);
        }

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(PipelineConsoleLayer)
            .try_init();
    });
}

// Marks the start of a run for elapsed time tracking.
fn mark_run_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    RUN_START_NANOS.store(nanos, Ordering::Relaxed);
}

fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = RUN_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
 ____                _ _____
/ ___|  ___  ___  __| |  ___|__  _ __ __ _  ___
\___ \ / _ \/ _ \/ _` | |_ / _ \| '__/ _` |/ _ \
 ___) |  __/  __/ (_| |  _| (_) | | | (_| |  __/
|____/ \___|\___|\__,_|_|  \___/|_|  \__, |\___|
                                     |___/
"#;

    let version_line = format!("               v{} - Assortment Seed Planner\n", VERSION);

    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{}", banner.bright_green());
    let _ = writeln!(stderr, "{}", version_line.bright_white().bold());
    let _ = stderr.flush();
}

/// A tracing layer that formats pipeline events with colors.
pub struct PipelineConsoleLayer;

impl<S: Subscriber> Layer<S> for PipelineConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();

        if !target.starts_with("seedforge_solver")
            && !target.starts_with("seedforge_io")
            && !target.starts_with("seedforge::")
        {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stderr(), "{}", output);
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    message: Option<String>,
    stage: Option<String>,
    status: Option<String>,
    error: Option<String>,
    path: Option<String>,
    export_path: Option<String>,
    features: Option<String>,
    k: Option<u64>,
    row: Option<u64>,
    store_count: Option<u64>,
    line_count: Option<u64>,
    violations: Option<u64>,
    critical: Option<u64>,
    max_skus_per_store: Option<u64>,
    duration_ms: Option<u64>,
    budget: Option<f64>,
    budget_left: Option<f64>,
    total_cost: Option<f64>,
    silhouette: Option<f64>,
    ok: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        let s = s.trim_matches('"').to_string();
        match field.name() {
            "event" => self.event = Some(s),
            "message" => self.message = Some(s),
            "stage" => self.stage = Some(s),
            "status" => self.status = Some(s),
            "error" => self.error = Some(s),
            "path" => self.path = Some(s),
            "features" => self.features = Some(s),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "k" => self.k = Some(value),
            "row" => self.row = Some(value),
            "store_count" => self.store_count = Some(value),
            "line_count" => self.line_count = Some(value),
            "violations" => self.violations = Some(value),
            "critical" => self.critical = Some(value),
            "max_skus_per_store" => self.max_skus_per_store = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match field.name() {
            "budget" => self.budget = Some(value),
            "budget_left" => self.budget_left = Some(value),
            "total_cost" => self.total_cost = Some(value),
            "silhouette" => self.silhouette = Some(value),
            _ => {}
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "ok" {
            self.ok = Some(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "message" => self.message = Some(value.to_string()),
            "stage" => self.stage = Some(value.to_string()),
            "status" => self.status = Some(value.to_string()),
            "error" => self.error = Some(value.to_string()),
            "path" => self.path = Some(value.to_string()),
            "export_path" => self.export_path = Some(value.to_string()),
            "features" => self.features = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    let event = v.event.as_deref().unwrap_or("");

    match event {
        "pipeline_start" => format_pipeline_start(v),
        "pipeline_end" => format_pipeline_end(v),
        "pipeline_cancelled" => format_cancelled(v),
        "stage_start" => format_stage_start(v),
        "stage_end" => format_stage_end(v),
        "stage_failed" => format_stage_failed(v),
        "clusters_selected" => format_clusters(v),
        "allocation_complete" => format_allocation(v, level),
        "validation_complete" => format_validation(v),
        "export_skipped" => format_export_skipped(v),
        "plan_exported" => format_exported(v),
        _ if level <= Level::WARN => format_warning(v, level),
        _ => String::new(),
    }
}

fn format_warning(v: &EventVisitor, level: Level) -> String {
    let Some(message) = v.message.as_deref() else {
        return String::new();
    };
    let marker = if level == Level::ERROR {
        "✗".bright_red().bold().to_string()
    } else {
        "!".yellow().bold().to_string()
    };
    let mut output = format!("{} {} {}", format_elapsed(), marker, message.yellow());
    match (v.path.as_deref(), v.row) {
        (Some(path), Some(row)) => output.push_str(&format!(" │ {}:{}", path, row)),
        (Some(path), None) => output.push_str(&format!(" │ {}", path)),
        _ => {}
    }
    if let Some(error) = v.error.as_deref() {
        output.push_str(&format!(" │ {}", error.bright_red()));
    }
    output
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn format_pipeline_start(v: &EventVisitor) -> String {
    mark_run_start();
    let k = match v.k {
        Some(k) if k > 0 => k.to_formatted_string(&Locale::en),
        _ => "auto".to_string(),
    };

    format!(
        "{} {} Planning │ features {} │ k {} │ budget {} │ {} SKUs/store",
        format_elapsed(),
        "▶".bright_green().bold(),
        v.features.as_deref().unwrap_or("-").bright_yellow(),
        k.bright_yellow(),
        format_money(v.budget.unwrap_or(0.0)).bright_yellow(),
        v.max_skus_per_store
            .unwrap_or(0)
            .to_formatted_string(&Locale::en)
            .bright_yellow(),
    )
}

fn format_stage_start(v: &EventVisitor) -> String {
    format!(
        "{} {} {} started",
        format_elapsed(),
        "▶".bright_blue(),
        v.stage.as_deref().unwrap_or("unknown").white().bold()
    )
}

fn format_stage_end(v: &EventVisitor) -> String {
    format!(
        "{} {} {} ended │ {}",
        format_elapsed(),
        "◀".bright_blue(),
        v.stage.as_deref().unwrap_or("unknown").white().bold(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow()
    )
}

fn format_stage_failed(v: &EventVisitor) -> String {
    format!(
        "{} {} {} failed │ {}",
        format_elapsed(),
        "✗".bright_red().bold(),
        v.stage.as_deref().unwrap_or("unknown").white().bold(),
        v.error.as_deref().unwrap_or("").bright_red()
    )
}

fn format_cancelled(v: &EventVisitor) -> String {
    format!(
        "{} {} Cancelled before {}",
        format_elapsed(),
        "■".yellow().bold(),
        v.stage.as_deref().unwrap_or("unknown").white().bold()
    )
}

fn format_clusters(v: &EventVisitor) -> String {
    let silhouette = match v.silhouette {
        Some(s) if s.is_finite() => format!("{:.3}", s),
        _ => "n/a".to_string(),
    };
    format!(
        "{} {} {} clusters │ {} stores │ silhouette {}",
        format_elapsed(),
        "◆".bright_magenta(),
        v.k.unwrap_or(0).to_formatted_string(&Locale::en).bright_magenta().bold(),
        v.store_count.unwrap_or(0).to_formatted_string(&Locale::en).white(),
        silhouette.bright_magenta()
    )
}

fn format_allocation(v: &EventVisitor, level: Level) -> String {
    if level != Level::DEBUG {
        return String::new();
    }
    format!(
        "{} {} {} lines │ {} left",
        format_elapsed(),
        "⚡".bright_cyan(),
        v.line_count.unwrap_or(0).to_formatted_string(&Locale::en).white(),
        format_money(v.budget_left.unwrap_or(0.0)).bright_yellow()
    )
}

fn format_validation(v: &EventVisitor) -> String {
    let violations = v.violations.unwrap_or(0);
    let critical = v.critical.unwrap_or(0);
    let verdict = if v.ok.unwrap_or(violations == 0) {
        "OK".bright_green().bold().to_string()
    } else if critical > 0 {
        "INVALID".bright_red().bold().to_string()
    } else {
        "WARNINGS".yellow().bold().to_string()
    };

    format!(
        "{} {} Validation │ {} violations │ {} critical │ {}",
        format_elapsed(),
        "◆".bright_cyan(),
        violations.to_formatted_string(&Locale::en).white(),
        critical.to_formatted_string(&Locale::en).white(),
        verdict
    )
}

fn format_export_skipped(v: &EventVisitor) -> String {
    format!(
        "{} {} Export skipped │ {} violations need review",
        format_elapsed(),
        "!".yellow().bold(),
        v.violations.unwrap_or(0).to_formatted_string(&Locale::en).yellow()
    )
}

fn format_exported(v: &EventVisitor) -> String {
    format!(
        "{} {} Exported {} lines │ {}",
        format_elapsed(),
        "✓".bright_green(),
        v.line_count.unwrap_or(0).to_formatted_string(&Locale::en).white(),
        v.path.as_deref().unwrap_or("").bright_white()
    )
}

fn format_pipeline_end(v: &EventVisitor) -> String {
    let status = v.status.as_deref().unwrap_or("unknown");
    let status_colored = if status == "exported" {
        status.to_uppercase().bright_green().bold().to_string()
    } else {
        status.to_uppercase().yellow().bold().to_string()
    };

    let mut output = format!(
        "{} {} Planning complete │ {} │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        status_colored
    );

    let inner_width: usize = 58;
    let border = "═".repeat(inner_width);
    output.push_str("\n\n");
    output.push_str(&format!("╔{}╗", border).bright_cyan().to_string());
    output.push('\n');

    let rows = [
        ("Lines:", v.line_count.unwrap_or(0).to_formatted_string(&Locale::en)),
        ("Total cost:", format_money(v.total_cost.unwrap_or(0.0))),
        (
            "Export:",
            match v.export_path.as_deref() {
                Some(p) if !p.is_empty() => p.to_string(),
                _ => "skipped".to_string(),
            },
        ),
    ];
    for (label, value) in rows {
        output.push_str(&format!(
            "{}  {:<14}{:>40}  {}",
            "║".bright_cyan(),
            label,
            value,
            "║".bright_cyan()
        ));
        output.push('\n');
    }

    output.push_str(&format!("╚{}╝", border).bright_cyan().to_string());
    output.push('\n');
    output
}

fn format_money(amount: f64) -> String {
    let cents = (amount * 100.0).round();
    let sign = if cents < 0.0 { "-" } else { "" };
    let cents = cents.abs() as u64;
    format!(
        "{}${}.{:02}",
        sign,
        (cents / 100).to_formatted_string(&Locale::en),
        cents % 100
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}
