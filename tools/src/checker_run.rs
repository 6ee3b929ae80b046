//! Driving the sanity checker across a whole annotation store.

use anyhow::{bail, Context, Result};
use indicatif::ProgressBar;
use rayon::prelude::*;

use annotation_store::{AnnotationStore, ImageAnnotation};
use label_model::GeometryKind;
use sanity_core::{check_image, pseudo_job_name, CheckerConfig, ImageOutcome, JobStatistics};

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Project whitelist; empty means every project in the store.
    pub projects: Vec<String>,
    /// Project blacklist, applied after the whitelist.
    pub exclude_projects: Vec<String>,
    pub kinds: Vec<GeometryKind>,
    /// Store nothing when set; also disables auto-fixes.
    pub dry_run: bool,
    pub config: CheckerConfig,
}

impl RunOptions {
    fn auto_fix(&self) -> bool {
        !self.dry_run
    }
}

/// Check every selected project and dataset. Images within a dataset
/// are checked in parallel, one session and checker pair per image.
/// Any store or check failure aborts the run.
pub fn run_sanity_checks(
    store: &(impl AnnotationStore + Sync),
    opts: &RunOptions,
) -> Result<JobStatistics> {
    let available = store.list_projects().context("list projects")?;
    let selected: Vec<String> = if opts.projects.is_empty() {
        available.clone()
    } else {
        for name in &opts.projects {
            if !available.contains(name) {
                bail!("project not found: {name}");
            }
        }
        opts.projects.clone()
    };
    let selected: Vec<String> = selected
        .into_iter()
        .filter(|p| !opts.exclude_projects.contains(p))
        .collect();

    let mut stats = JobStatistics::default();
    for project in &selected {
        for dataset in store.list_datasets(project)? {
            run_dataset(store, opts, &mut stats, project, &dataset)?;
        }
    }
    Ok(stats)
}

fn run_dataset(
    store: &(impl AnnotationStore + Sync),
    opts: &RunOptions,
    stats: &mut JobStatistics,
    project: &str,
    dataset: &str,
) -> Result<()> {
    let batch = store.load_annotations(project, dataset)?;
    println!("Processing dataset: {project} - {dataset}");
    let progress = ProgressBar::new(batch.len() as u64);

    let outcomes: Vec<ImageOutcome> = batch
        .into_par_iter()
        .map(|image| {
            let outcome = check_image(
                &image.image_name,
                image.annotation,
                &opts.kinds,
                &opts.config,
                opts.auto_fix(),
            )
            .with_context(|| format!("check {project}/{dataset}/{}", image.image_name));
            progress.inc(1);
            outcome
        })
        .collect::<Result<Vec<_>>>()?;
    progress.finish_and_clear();

    let mut updated = Vec::new();
    for outcome in outcomes {
        for (kind, counts) in &outcome.counts {
            stats.record(
                &pseudo_job_name(project, dataset, *kind),
                *kind,
                counts.labels,
                counts.issues,
            );
        }
        if outcome.mutated {
            updated.push(ImageAnnotation {
                image_name: outcome.image_name,
                annotation: outcome.annotation,
            });
        }
    }

    if !updated.is_empty() && !opts.dry_run {
        store
            .store_annotations(project, dataset, &updated)
            .with_context(|| format!("store annotations for {project}/{dataset}"))?;
        log::info!(
            "stored {} updated annotations for {project}/{dataset}",
            updated.len()
        );
    }
    Ok(())
}
