//! Subcommand implementations.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use seedforge::{
    load_capacity_csv, load_forecast_csv, AllocationLine, CapacityData, ClusterResult,
    ClusterSelector, ConstraintValidator, CsvExportSink, CsvSkuSource, CsvStoreSource,
    ExportSink, ForecastLookup, JsonFilePlanRepository, Pipeline, PipelineRequest,
    PlanRepository, PlannerConfig, SeedAllocator, SeedOutcome, SkuSource, StoreSource,
    ValidationRules,
};

use crate::{PlanArgs, StoreArgs};

/// Lines JSON: either a bare list or a `generate` outcome.
#[derive(Deserialize)]
#[serde(untagged)]
enum LinesFile {
    Outcome(SeedOutcome),
    Lines(Vec<AllocationLine>),
}

impl LinesFile {
    fn into_lines(self) -> Vec<AllocationLine> {
        match self {
            LinesFile::Outcome(outcome) => outcome.lines,
            LinesFile::Lines(lines) => lines,
        }
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn read_lines(path: &Path) -> Result<Vec<AllocationLine>> {
    Ok(read_json::<LinesFile>(path)?.into_lines())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn features(config: &PlannerConfig, args: &StoreArgs) -> Vec<String> {
    if args.features.is_empty() {
        config.features.clone()
    } else {
        args.features.clone()
    }
}

fn forecast_table(path: Option<&Path>) -> Result<Option<Arc<dyn ForecastLookup>>> {
    match path {
        Some(path) => {
            let table = load_forecast_csv(path)?;
            Ok(Some(Arc::new(table)))
        }
        None => Ok(None),
    }
}

fn capacity_data(config: &PlannerConfig, path: Option<&Path>) -> Option<CapacityData> {
    let path = path.or(config.validation.capacity_csv.as_deref())?;
    Some(CapacityData::from_load(
        load_capacity_csv(path),
        config.validation.max_space_per_store,
    ))
}

pub fn cluster(config: &PlannerConfig, args: StoreArgs) -> Result<()> {
    let features = features(config, &args);
    let stores = CsvStoreSource::new(&args.stores)
        .with_features(features.iter().cloned())
        .load_stores()?;
    let result =
        ClusterSelector::new(config.clustering.clone()).select(&stores, &features, args.k)?;
    print_json(&result)
}

pub fn generate(
    config: &PlannerConfig,
    skus: &Path,
    clusters: &Path,
    plan: PlanArgs,
    forecast: Option<&Path>,
) -> Result<()> {
    let clusters: ClusterResult = read_json(clusters)?;
    let skus = CsvSkuSource::new(skus).load_skus()?;
    let forecast = forecast_table(forecast)?;

    let outcome = SeedAllocator::new(config.allocation.clone()).allocate(
        &skus,
        &clusters.assignment,
        plan.budget,
        plan.max_skus_per_store,
        forecast.as_deref(),
    )?;
    print_json(&outcome)
}

pub fn validate(
    config: &PlannerConfig,
    lines: &Path,
    plan: PlanArgs,
    capacity: Option<&Path>,
) -> Result<()> {
    let lines = read_lines(lines)?;
    let mut rules =
        ValidationRules::for_request(plan.budget, plan.max_skus_per_store, &config.validation);
    if let Some(data) = capacity_data(config, capacity) {
        rules = rules.with_capacity(data, config.validation.space_per_unit);
    }

    let report = ConstraintValidator::new(&rules).validate(&lines);
    print_json(&report)
}

pub fn auto(
    config: &PlannerConfig,
    store_args: StoreArgs,
    skus: &Path,
    plan: PlanArgs,
    forecast: Option<&Path>,
    capacity: Option<&Path>,
    identifier: Option<String>,
) -> Result<()> {
    let features = features(config, &store_args);
    let stores = CsvStoreSource::new(&store_args.stores).with_features(features.iter().cloned());
    let skus = CsvSkuSource::new(skus);

    let sink: Arc<dyn ExportSink> = Arc::new(CsvExportSink::from_config(&config.export));
    let mut pipeline = Pipeline::new(config.clone(), sink);
    if let Some(forecast) = forecast_table(forecast)? {
        pipeline = pipeline.with_forecast(forecast);
    }
    // Without --capacity the pipeline reads validation.capacity_csv itself.
    if let Some(path) = capacity {
        pipeline = pipeline.with_capacity(CapacityData::from_load(
            load_capacity_csv(path),
            config.validation.max_space_per_store,
        ));
    }

    let mut request = PipelineRequest::new(features, plan.budget, plan.max_skus_per_store)
        .with_export_identifier(identifier.unwrap_or_else(|| config.export.identifier.clone()));
    request.k = store_args.k;

    match pipeline.run(&stores, &skus, request) {
        Ok(state) => print_json(&state),
        Err(failure) => {
            print_json(&failure.state)?;
            Err(failure.error.into())
        }
    }
}

pub fn publish(config: &PlannerConfig, name: &str, lines: &Path) -> Result<()> {
    let lines = read_lines(lines)?;
    let repo = JsonFilePlanRepository::in_dir(&config.export.out_dir);
    let plan = repo.publish(name, lines)?;

    #[derive(Serialize)]
    struct Published<'a> {
        plan_id: &'a str,
        version: u32,
        status: &'a str,
    }
    print_json(&Published {
        plan_id: &plan.plan_id,
        version: plan.version,
        status: plan.status.as_str(),
    })
}

pub fn export(config: &PlannerConfig, plan_id: &str) -> Result<()> {
    let repo = JsonFilePlanRepository::in_dir(&config.export.out_dir);
    let Some(plan) = repo.get(plan_id)? else {
        bail!("Plan not found: {}", plan_id);
    };

    let path = CsvExportSink::from_config(&config.export).export(plan_id, &plan.lines)?;
    println!("{}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_file_accepts_both_shapes() {
        let dir = tempfile::TempDir::new().unwrap();
        let line = AllocationLine::new("S1", "SKU-01", 2, 5.0, 0);

        let bare = dir.path().join("lines.json");
        fs::write(&bare, serde_json::to_string(&vec![line.clone()]).unwrap()).unwrap();
        assert_eq!(read_lines(&bare).unwrap(), vec![line.clone()]);

        let outcome = SeedOutcome {
            lines: vec![line.clone()],
            budget_left: 90.0,
            initial_budget: 100.0,
        };
        let wrapped = dir.path().join("outcome.json");
        fs::write(&wrapped, serde_json::to_string(&outcome).unwrap()).unwrap();
        assert_eq!(read_lines(&wrapped).unwrap(), vec![line]);
    }

    #[test]
    fn test_capacity_from_config_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = PlannerConfig::default();
        assert!(capacity_data(&config, None).is_none());

        config.validation.capacity_csv = Some(dir.path().join("missing.csv"));
        assert!(matches!(
            capacity_data(&config, None),
            Some(CapacityData::Unavailable(_))
        ));
    }
}
