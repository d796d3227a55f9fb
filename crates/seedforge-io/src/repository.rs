//! Plan repositories.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;
use uuid::Uuid;

use seedforge_core::{
    AllocationLine, PlanRepository, PlanStatus, PublishedPlan, Result, SeedForgeError,
};

use crate::error::AdapterError;

fn new_plan(
    existing: &[PublishedPlan],
    name: &str,
    lines: Vec<AllocationLine>,
) -> Result<PublishedPlan> {
    if name.trim().is_empty() {
        return Err(SeedForgeError::invalid_input("plan name must not be empty"));
    }
    let previous = existing.iter().filter(|p| p.name == name).count();
    Ok(PublishedPlan {
        plan_id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        version: previous as u32 + 1,
        status: PlanStatus::Published,
        lines,
        published_at: Utc::now(),
    })
}

/// Plans held in memory for the life of the process.
#[derive(Debug, Default)]
pub struct InMemoryPlanRepository {
    plans: Mutex<Vec<PublishedPlan>>,
}

impl InMemoryPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PublishedPlan>> {
        self.plans.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PlanRepository for InMemoryPlanRepository {
    fn publish(&self, name: &str, lines: Vec<AllocationLine>) -> Result<PublishedPlan> {
        let mut plans = self.lock();
        let plan = new_plan(&plans, name, lines)?;
        plans.push(plan.clone());
        Ok(plan)
    }

    fn get(&self, plan_id: &str) -> Result<Option<PublishedPlan>> {
        Ok(self.lock().iter().find(|p| p.plan_id == plan_id).cloned())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PlanFile {
    plans: Vec<PublishedPlan>,
}

/// Plans stored in one JSON file, rewritten atomically on every publish.
#[derive(Debug)]
pub struct JsonFilePlanRepository {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFilePlanRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// `{out_dir}/plans.json`.
    pub fn in_dir(out_dir: impl AsRef<Path>) -> Self {
        Self::new(out_dir.as_ref().join("plans.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> std::result::Result<PlanFile, AdapterError> {
        let path = self.path.as_path();
        if !path.exists() {
            return Ok(PlanFile::default());
        }
        let content = fs::read_to_string(path).map_err(|e| AdapterError::io(path, e))?;
        if content.trim().is_empty() {
            return Ok(PlanFile::default());
        }
        serde_json::from_str(&content).map_err(|e| AdapterError::json(path, e))
    }

    fn save(&self, file: &PlanFile) -> std::result::Result<(), AdapterError> {
        let path = self.path.as_path();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| AdapterError::io(dir, e))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| AdapterError::io(dir, e))?;
        serde_json::to_writer_pretty(tmp.as_file_mut(), file)
            .map_err(|e| AdapterError::json(path, e))?;
        tmp.as_file_mut()
            .flush()
            .map_err(|e| AdapterError::io(path, e))?;
        tmp.persist(path).map_err(|e| AdapterError::io(path, e.error))?;
        Ok(())
    }
}

impl PlanRepository for JsonFilePlanRepository {
    fn publish(&self, name: &str, lines: Vec<AllocationLine>) -> Result<PublishedPlan> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut file = self.load().map_err(AdapterError::into_storage)?;
        let plan = new_plan(&file.plans, name, lines)?;
        file.plans.push(plan.clone());
        self.save(&file).map_err(AdapterError::into_storage)?;

        info!(
            event = "plan_published",
            plan_id = %plan.plan_id,
            name = %plan.name,
            version = plan.version as u64,
            line_count = plan.lines.len() as u64,
        );
        Ok(plan)
    }

    fn get(&self, plan_id: &str) -> Result<Option<PublishedPlan>> {
        let file = self.load().map_err(AdapterError::into_storage)?;
        Ok(file.plans.into_iter().find(|p| p.plan_id == plan_id))
    }
}
