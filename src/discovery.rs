use crate::constants::SEQUENCE_NAME_SEPARATOR;
use crate::error::Result;
use crate::utils::is_png_file;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// One animation: the PNG files directly inside a single directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    /// Directory relative to the input root (empty for the root itself)
    pub relative_dir: PathBuf,
    /// Flat output name, unique across the run
    pub name: String,
    /// Frame files in playback order (sorted by file name)
    pub frames: Vec<PathBuf>,
}

impl Sequence {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// Walk `root` and return one [`Sequence`] per directory that directly holds
/// at least one PNG, in sorted pre-order.
///
/// Nested qualifying directories each form their own sequence; directories
/// without PNGs are skipped. A name already taken earlier in the walk gets a
/// `_2`, `_3`, ... suffix.
pub fn discover_sequences(root: &Path) -> Result<Vec<Sequence>> {
    let mut sequences = Vec::new();
    let mut taken = HashSet::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let frames = collect_frames(entry.path())?;
        if frames.is_empty() {
            continue;
        }

        let relative_dir = entry
            .path()
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let name = unique_name(sequence_name(&relative_dir, root), &mut taken);

        crate::verbose!(
            "Discovered sequence '{}' with {} frames",
            name,
            frames.len()
        );

        sequences.push(Sequence {
            relative_dir,
            name,
            frames,
        });
    }

    Ok(sequences)
}

/// PNG files directly inside `dir`, sorted by file name.
pub fn collect_frames(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut frames = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_png_file(&path) {
            frames.push(path);
        }
    }
    frames.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(frames)
}

/// Flat name for a sequence directory.
///
/// Path components are joined with `__` so sequences sharing a base name
/// under different parents stay distinct. The root itself takes the root
/// directory's own name.
pub fn sequence_name(relative_dir: &Path, root: &Path) -> String {
    let parts: Vec<String> = relative_dir
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if !parts.is_empty() {
        return parts.join(SEQUENCE_NAME_SEPARATOR);
    }

    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sequence".to_string())
}

/// `name`, or the first free `name_N` (N >= 2), recorded in `taken`.
fn unique_name(name: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(name.clone()) {
        return name;
    }

    let mut suffix = 2;
    loop {
        let candidate = format!("{}_{}", name, suffix);
        if taken.insert(candidate.clone()) {
            crate::warn!(
                "Sequence name '{}' is already used, writing as '{}'",
                name,
                candidate
            );
            return candidate;
        }
        suffix += 1;
    }
}
