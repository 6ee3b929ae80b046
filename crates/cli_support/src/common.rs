use clap::{Args, ValueEnum};
use label_model::GeometryKind;
use std::path::PathBuf;

/// Location of the annotation store.
#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    /// Root directory of the annotation store.
    #[arg(long, env = "ANNOTATION_STORE_ROOT", default_value = "assets/annotations")]
    pub root: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GeometryArg {
    Rectangle,
    Bitmap,
}

impl From<GeometryArg> for GeometryKind {
    fn from(arg: GeometryArg) -> Self {
        match arg {
            GeometryArg::Rectangle => GeometryKind::Rectangle,
            GeometryArg::Bitmap => GeometryKind::Bitmap,
        }
    }
}

/// Project and geometry selection shared by checking tools.
#[derive(Debug, Clone, Args)]
pub struct SelectionArgs {
    /// Check only this project; may be given multiple times. Default:
    /// every project in the store.
    #[arg(long = "project", short = 'p')]
    pub projects: Vec<String>,
    /// Skip this project; may be given multiple times. Applied after
    /// the whitelist.
    #[arg(long = "exclude-project")]
    pub exclude_projects: Vec<String>,
    /// Geometry kinds to check; may be given multiple times. Default:
    /// both.
    #[arg(long = "geometry", value_enum)]
    pub geometry: Vec<GeometryArg>,
}

impl SelectionArgs {
    /// Selected geometry kinds, defaulting to all of them.
    pub fn kinds(&self) -> Vec<GeometryKind> {
        if self.geometry.is_empty() {
            vec![GeometryKind::Rectangle, GeometryKind::Bitmap]
        } else {
            let mut kinds: Vec<GeometryKind> = Vec::new();
            for kind in self.geometry.iter().map(|&g| GeometryKind::from(g)) {
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
            }
            kinds
        }
    }
}

/// Run-mode switches shared by checking tools.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Compute checks but store nothing; auto-fixes are disabled.
    #[arg(long)]
    pub dry_run: bool,
    /// Print every discovered defect.
    #[arg(long)]
    pub verbose: bool,
    /// Directory for the JSON results summary; created if missing.
    #[arg(long)]
    pub results_path: Option<PathBuf>,
    /// Checker thresholds TOML file.
    #[arg(long, env = "SANITY_CHECKER_CONFIG")]
    pub config: Option<PathBuf>,
}
