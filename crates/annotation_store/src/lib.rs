//! Access to batches of image annotations, keyed by project and dataset.
//!
//! The [`AnnotationStore`] trait is the seam towards whatever service
//! owns the labels; [`LocalStore`] is the filesystem-backed
//! implementation used by the tools. Any failure is surfaced as a
//! [`StoreError`] and treated as fatal by callers; there is no retry.

use std::fs;
use std::path::{Path, PathBuf};

use label_model::Annotation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json error at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("project not found: {0}")]
    ProjectNotFound(String),
    #[error("dataset not found: {project}/{dataset}")]
    DatasetNotFound { project: String, dataset: String },
}

/// One image's annotation, as loaded from or written to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAnnotation {
    pub image_name: String,
    pub annotation: Annotation,
}

pub trait AnnotationStore {
    fn list_projects(&self) -> Result<Vec<String>, StoreError>;
    fn list_datasets(&self, project: &str) -> Result<Vec<String>, StoreError>;
    fn load_annotations(
        &self,
        project: &str,
        dataset: &str,
    ) -> Result<Vec<ImageAnnotation>, StoreError>;
    /// Rewrite the annotation files for the given images only.
    fn store_annotations(
        &self,
        project: &str,
        dataset: &str,
        updated: &[ImageAnnotation],
    ) -> Result<(), StoreError>;
}

/// Filesystem layout: `<root>/<project>/<dataset>/ann/<image name>.json`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ann_dir(&self, project: &str, dataset: &str) -> PathBuf {
        self.root.join(project).join(dataset).join("ann")
    }

    fn list_dirs(path: &Path) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        let entries = fs::read_dir(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

impl AnnotationStore for LocalStore {
    fn list_projects(&self) -> Result<Vec<String>, StoreError> {
        Self::list_dirs(&self.root)
    }

    fn list_datasets(&self, project: &str) -> Result<Vec<String>, StoreError> {
        let project_dir = self.root.join(project);
        if !project_dir.is_dir() {
            return Err(StoreError::ProjectNotFound(project.to_string()));
        }
        Self::list_dirs(&project_dir)
    }

    fn load_annotations(
        &self,
        project: &str,
        dataset: &str,
    ) -> Result<Vec<ImageAnnotation>, StoreError> {
        let ann_dir = self.ann_dir(project, dataset);
        if !ann_dir.is_dir() {
            return Err(StoreError::DatasetNotFound {
                project: project.to_string(),
                dataset: dataset.to_string(),
            });
        }
        let mut batch = Vec::new();
        let entries = fs::read_dir(&ann_dir).map_err(|source| StoreError::Io {
            path: ann_dir.clone(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: ann_dir.clone(),
                source,
            })?;
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(image_name) = file_name.strip_suffix(".json") else {
                continue;
            };
            let raw = fs::read(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            let annotation: Annotation =
                serde_json::from_slice(&raw).map_err(|source| StoreError::Json {
                    path: path.clone(),
                    source,
                })?;
            batch.push(ImageAnnotation {
                image_name: image_name.to_string(),
                annotation,
            });
        }
        batch.sort_by(|a, b| a.image_name.cmp(&b.image_name));
        Ok(batch)
    }

    fn store_annotations(
        &self,
        project: &str,
        dataset: &str,
        updated: &[ImageAnnotation],
    ) -> Result<(), StoreError> {
        let ann_dir = self.ann_dir(project, dataset);
        if !ann_dir.is_dir() {
            return Err(StoreError::DatasetNotFound {
                project: project.to_string(),
                dataset: dataset.to_string(),
            });
        }
        for image in updated {
            let path = ann_dir.join(format!("{}.json", image.image_name));
            let raw = serde_json::to_vec_pretty(&image.annotation).map_err(|source| {
                StoreError::Json {
                    path: path.clone(),
                    source,
                }
            })?;
            fs::write(&path, raw).map_err(|source| StoreError::Io { path: path.clone(), source })?;
        }
        Ok(())
    }
}
