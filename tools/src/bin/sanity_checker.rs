use std::fs;

use anyhow::{Context, Result};
use clap::Parser;

use annotation_store::LocalStore;
use annotation_tools::{load_checker_config, run_sanity_checks, RunOptions};
use cli_support::{RunArgs, SelectionArgs, StoreArgs};

#[derive(Parser, Debug)]
#[command(
    name = "sanity_checker",
    about = "Run sanity checks on the labels in an annotation store, \
             tagging defects and auto-fixing what can be fixed"
)]
struct Args {
    #[command(flatten)]
    store: StoreArgs,
    #[command(flatten)]
    selection: SelectionArgs,
    #[command(flatten)]
    run: RunArgs,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.run.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if args.run.dry_run {
        log::warn!("dry run: tags and fixes will not be stored");
    }

    let config = load_checker_config(args.run.config.as_deref())?;
    let store = LocalStore::new(&args.store.root);
    let opts = RunOptions {
        projects: args.selection.projects.clone(),
        exclude_projects: args.selection.exclude_projects.clone(),
        kinds: args.selection.kinds(),
        dry_run: args.run.dry_run,
        config,
    };

    let stats = run_sanity_checks(&store, &opts)?;
    println!("Sanity checks finished with the following results.");
    println!("{}", stats.render_table());

    if let Some(dir) = &args.run.results_path {
        fs::create_dir_all(dir)
            .with_context(|| format!("create results directory {}", dir.display()))?;
        let path = dir.join("sanity_checks.json");
        let raw = serde_json::to_vec_pretty(&stats)?;
        fs::write(&path, raw).with_context(|| format!("write {}", path.display()))?;
        println!("Saved results to file: {}", path.display());
    }

    if args.run.dry_run {
        log::warn!("this was a dry run: tags and fixes have not been stored");
    }
    Ok(())
}
