//! Persistent store of recorded gesture samples.
//!
//! Each gesture label owns an ordered list of feature vectors (recording
//! order). The store is written to a JSON object, one key per label, and every
//! mutation is durable before it becomes visible in memory: the new map is
//! built on a copy, written to a temporary file and renamed over the old one,
//! and only then swapped in. A failed write leaves both disk and memory as
//! they were.
//!
//! Labels may also own an artifact directory (reference images captured while
//! recording) under `samples_dir/<label>/`, which follows renames and deletes.

use crate::{
    constants::MAX_LISTED_ARTIFACTS,
    features::{extract_pose, FeatureVector},
    landmarks::HandPose,
    Error, Result,
};
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::{
    collections::BTreeMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

type SampleMap = BTreeMap<String, Vec<FeatureVector>>;

/// Gesture label to samples mapping with write-before-acknowledge persistence
#[derive(Debug, Clone)]
pub struct GestureStore {
    path: Option<PathBuf>,
    samples_dir: Option<PathBuf>,
    gestures: SampleMap,
}

/// Per-label training statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelStats {
    /// Number of samples recorded for the label
    pub samples: usize,
    /// Mean squared distance of the samples from their centroid
    pub variance: f64,
}

/// Store-wide training statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingStats {
    /// Human-readable model description
    pub model_type: &'static str,
    /// Number of samples pooled across all labels
    pub total_samples: usize,
    /// Leave-one-out nearest-neighbour accuracy, in percent
    pub accuracy: f64,
    /// Mean of per-label variances
    pub loss: f64,
    /// Per-label breakdown (labels with at least one sample)
    pub breakdown: BTreeMap<String, LabelStats>,
}

impl GestureStore {
    /// Open a store backed by `path`, loading it if the file exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the file exists but cannot be read or
    /// is not a JSON object. Individual malformed records are normalized or
    /// dropped with a warning instead.
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(path: P, samples_dir: Q) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let gestures = if path.exists() {
            let gestures = load_file(&path)?;
            info!(
                "Loaded {} gestures from {}: {:?}",
                gestures.len(),
                path.display(),
                gestures.keys().collect::<Vec<_>>()
            );
            gestures
        } else {
            warn!("Gestures file not found at {}. Starting fresh.", path.display());
            SampleMap::new()
        };

        Ok(Self {
            path: Some(path),
            samples_dir: Some(samples_dir.as_ref().to_path_buf()),
            gestures,
        })
    }

    /// A store that never touches the filesystem
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            samples_dir: None,
            gestures: SampleMap::new(),
        }
    }

    /// Re-read the backing file, replacing in-memory contents.
    ///
    /// # Errors
    ///
    /// Same as [`GestureStore::open`].
    pub fn reload(&mut self) -> Result<()> {
        if let Some(path) = &self.path {
            self.gestures = if path.exists() { load_file(path)? } else { SampleMap::new() };
        }
        Ok(())
    }

    /// Extract features from `pose` and append them to `label`'s samples,
    /// creating the label if needed. Returns the new sample count.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for an unusable label, [`Error::Persistence`]
    /// if the write fails (in which case nothing changes).
    pub fn add_sample(&mut self, label: &str, pose: &HandPose) -> Result<usize> {
        self.add_features(label, extract_pose(pose))
    }

    /// Append an already-extracted feature vector to `label`.
    ///
    /// # Errors
    ///
    /// See [`GestureStore::add_sample`].
    pub fn add_features(&mut self, label: &str, features: FeatureVector) -> Result<usize> {
        validate_label(label)?;
        let mut next = self.gestures.clone();
        let samples = next.entry(label.to_string()).or_default();
        samples.push(features);
        let count = samples.len();
        self.commit(next)?;
        info!("Gesture '{label}' sample saved. Total samples: {count}");
        Ok(count)
    }

    /// Remove the sample at `index` from `label`. The label stays even when its
    /// last sample is removed.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown label or out-of-range index,
    /// [`Error::Persistence`] if the write fails.
    pub fn delete_sample(&mut self, label: &str, index: usize) -> Result<()> {
        let len = self
            .gestures
            .get(label)
            .map(Vec::len)
            .ok_or_else(|| Error::NotFound(format!("gesture '{label}'")))?;
        if index >= len {
            return Err(Error::NotFound(format!(
                "sample {index} of gesture '{label}' ({len} samples)"
            )));
        }

        let mut next = self.gestures.clone();
        if let Some(samples) = next.get_mut(label) {
            samples.remove(index);
        }
        self.commit(next)?;
        debug!("Deleted sample {index} of '{label}'");
        Ok(())
    }

    /// Move all samples of `old` under `new`. Renaming to the same name is a no-op.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if `old` is unknown, [`Error::Conflict`] if `new`
    /// already exists, [`Error::Persistence`] if the write fails.
    pub fn rename_label(&mut self, old: &str, new: &str) -> Result<()> {
        if !self.gestures.contains_key(old) {
            return Err(Error::NotFound(format!("gesture '{old}'")));
        }
        if old == new {
            return Ok(());
        }
        validate_label(new)?;
        if self.gestures.contains_key(new) {
            return Err(Error::Conflict(format!("gesture '{new}' already exists")));
        }

        let mut next = self.gestures.clone();
        if let Some(samples) = next.remove(old) {
            next.insert(new.to_string(), samples);
        }
        self.commit(next)?;

        if let (Some(old_dir), Some(new_dir)) = (self.artifact_dir(old), self.artifact_dir(new)) {
            if old_dir.exists() && !new_dir.exists() {
                if let Err(e) = fs::rename(&old_dir, &new_dir) {
                    warn!("Failed to move artifacts of '{old}' to '{new}': {e}");
                }
            }
        }

        info!("Renamed gesture '{old}' to '{new}'");
        Ok(())
    }

    /// Remove `label`, its samples and its artifact directory.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the label is unknown, [`Error::Persistence`] if
    /// the write fails.
    pub fn delete_label(&mut self, label: &str) -> Result<()> {
        if !self.gestures.contains_key(label) {
            return Err(Error::NotFound(format!("gesture '{label}'")));
        }

        let mut next = self.gestures.clone();
        next.remove(label);
        self.commit(next)?;

        if let Some(dir) = self.artifact_dir(label) {
            if dir.exists() {
                if let Err(e) = fs::remove_dir_all(&dir) {
                    warn!("Failed to remove artifacts of '{label}': {e}");
                }
            }
        }

        info!("Deleted gesture '{label}'");
        Ok(())
    }

    /// Store a reference image for `label`, named by the current time in milliseconds.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the label is unknown, [`Error::InvalidInput`] for
    /// an in-memory store, [`Error::Io`] if the write fails.
    pub fn save_artifact(&self, label: &str, jpeg: &[u8]) -> Result<PathBuf> {
        if !self.gestures.contains_key(label) {
            return Err(Error::NotFound(format!("gesture '{label}'")));
        }
        let dir = self
            .artifact_dir(label)
            .ok_or_else(|| Error::InvalidInput("store has no samples directory".to_string()))?;
        fs::create_dir_all(&dir)?;

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let mut file = dir.join(format!("{millis}.jpg"));
        let mut bump = 1;
        while file.exists() {
            file = dir.join(format!("{millis}_{bump}.jpg"));
            bump += 1;
        }
        fs::write(&file, jpeg)?;
        info!("Saved image sample to {}", file.display());
        Ok(file)
    }

    /// Artifact images of `label`, newest first, at most 30
    #[must_use]
    pub fn list_artifacts(&self, label: &str) -> Vec<PathBuf> {
        let Some(dir) = self.artifact_dir(label) else {
            return Vec::new();
        };
        let Ok(entries) = fs::read_dir(&dir) else {
            return Vec::new();
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "jpg"))
            .collect();
        files.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
        files.truncate(MAX_LISTED_ARTIFACTS);
        files
    }

    /// Directory holding `label`'s artifacts, if this store has one and the
    /// label is a usable directory name
    #[must_use]
    pub fn artifact_dir(&self, label: &str) -> Option<PathBuf> {
        validate_label(label).ok()?;
        self.samples_dir.as_ref().map(|dir| dir.join(label))
    }

    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.gestures.contains_key(label)
    }

    #[must_use]
    pub fn samples(&self, label: &str) -> Option<&[FeatureVector]> {
        self.gestures.get(label).map(Vec::as_slice)
    }

    /// All labels with their samples, in label order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FeatureVector])> {
        self.gestures.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.gestures.keys().map(String::as_str)
    }

    /// Label names with their sample counts
    #[must_use]
    pub fn summary(&self) -> Vec<(String, usize)> {
        self.gestures.iter().map(|(k, v)| (k.clone(), v.len())).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.gestures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gestures.is_empty()
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Compute loss (mean intra-label variance) and leave-one-out 1-NN accuracy
    #[must_use]
    pub fn training_stats(&self) -> TrainingStats {
        let mut breakdown = BTreeMap::new();
        let mut pooled: Vec<(&str, &FeatureVector)> = Vec::new();
        let mut total_variance = 0.0;

        for (label, samples) in self.iter() {
            if samples.is_empty() {
                continue;
            }
            let variance = variance_from_centroid(samples);
            total_variance += variance;
            pooled.extend(samples.iter().map(|s| (label, s)));
            breakdown.insert(
                label.to_string(),
                LabelStats {
                    samples: samples.len(),
                    variance,
                },
            );
        }

        let loss = if breakdown.is_empty() {
            0.0
        } else {
            total_variance / breakdown.len() as f64
        };

        TrainingStats {
            model_type: "Geometric Vector Classifier (KNN)",
            total_samples: pooled.len(),
            accuracy: leave_one_out_accuracy(&pooled),
            loss,
            breakdown,
        }
    }

    fn commit(&mut self, next: SampleMap) -> Result<()> {
        if let Some(path) = &self.path {
            write_file(path, &next)?;
        }
        self.gestures = next;
        Ok(())
    }
}

fn validate_label(label: &str) -> Result<()> {
    if label.trim().is_empty() {
        return Err(Error::InvalidInput("gesture name required".to_string()));
    }
    if label.contains(['/', '\\']) || label == "." || label == ".." {
        return Err(Error::InvalidInput(format!("invalid gesture name '{label}'")));
    }
    Ok(())
}

fn variance_from_centroid(samples: &[FeatureVector]) -> f64 {
    let dim = samples[0].len();
    let n = samples.len() as f64;
    let mut centroid = vec![0.0; dim];
    for s in samples {
        for (c, v) in centroid.iter_mut().zip(s.as_slice()) {
            *c += v / n;
        }
    }
    samples
        .iter()
        .map(|s| {
            s.as_slice()
                .iter()
                .zip(&centroid)
                .map(|(v, c)| (v - c) * (v - c))
                .sum::<f64>()
        })
        .sum::<f64>()
        / n
}

fn leave_one_out_accuracy(pooled: &[(&str, &FeatureVector)]) -> f64 {
    match pooled.len() {
        0 => return 0.0,
        1 => return 100.0,
        _ => {}
    }

    let correct = pooled
        .iter()
        .enumerate()
        .filter(|(i, (label, sample))| {
            let nearest = pooled
                .iter()
                .enumerate()
                .filter(|(j, _)| j != i)
                .map(|(_, (other_label, other))| (sample.distance(other), *other_label))
                .min_by(|a, b| a.0.total_cmp(&b.0));
            nearest.is_some_and(|(_, predicted)| predicted == *label)
        })
        .count();

    correct as f64 / pooled.len() as f64 * 100.0
}

fn load_file(path: &Path) -> Result<SampleMap> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Persistence(format!("failed to read {}: {e}", path.display())))?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|e| Error::Persistence(format!("failed to parse {}: {e}", path.display())))?;
    let Value::Object(records) = value else {
        return Err(Error::Persistence(format!(
            "{} does not contain a JSON object",
            path.display()
        )));
    };

    Ok(records
        .into_iter()
        .filter_map(|(label, record)| {
            if let Err(e) = validate_label(&label) {
                warn!("Dropping gesture record: {e}");
                return None;
            }
            let samples = normalize_record(&label, record);
            Some((label, samples))
        })
        .collect())
}

/// Accept the current list-of-vectors shape as well as the legacy single
/// vector, dropping anything that is not a valid feature vector.
fn normalize_record(label: &str, record: Value) -> Vec<FeatureVector> {
    let Value::Array(items) = record else {
        warn!("Gesture '{label}' has a non-list record; treating it as empty");
        return Vec::new();
    };

    let rows: Vec<Value> = if items.first().is_some_and(Value::is_number) {
        debug!("Gesture '{label}' uses the single-vector layout; upgrading");
        vec![Value::Array(items)]
    } else {
        items
    };

    rows.into_iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let parsed = serde_json::from_value::<Vec<f64>>(row)
                .map_err(Error::from)
                .and_then(FeatureVector::new);
            match parsed {
                Ok(features) => Some(features),
                Err(e) => {
                    warn!("Dropping sample {i} of gesture '{label}': {e}");
                    None
                }
            }
        })
        .collect()
}

fn write_file(path: &Path, gestures: &SampleMap) -> Result<()> {
    let json = serde_json::to_vec_pretty(gestures)
        .map_err(|e| Error::Persistence(format!("failed to encode gestures: {e}")))?;
    write_atomic(path, &json)
}

/// Replace `path` with `bytes` via a synced temporary file and a rename, so a
/// reader sees either the old or the new content
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let persist_err = |e: std::io::Error| Error::Persistence(format!("failed to write {}: {e}", path.display()));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(persist_err)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut file = fs::File::create(&tmp).map_err(persist_err)?;
    file.write_all(bytes).map_err(persist_err)?;
    file.sync_all().map_err(persist_err)?;
    drop(file);

    fs::rename(&tmp, path).map_err(persist_err)
}
