use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::models::DatasetEntry;
use crate::utils::MrzEvalError;

/// Discover dataset entries under a root directory.
///
/// Layout convention: one subdirectory per group (country); images are
/// `.jpg` files paired with a `.txt` ground-truth file sharing the base
/// name. Extensions match case-insensitively. Entries come back sorted by
/// group and filename so runs are reproducible.
pub fn discover_entries<P: AsRef<Path>>(root: P) -> Result<Vec<DatasetEntry>, MrzEvalError> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(MrzEvalError::DatasetLayout(format!(
            "Dataset root is not a directory: {}",
            root.display()
        )));
    }

    let mut groups = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            groups.push(path);
        }
    }
    groups.sort();

    let mut entries = Vec::new();
    for group_dir in groups {
        let group_label = group_dir
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();

        let mut files = Vec::new();
        for file in fs::read_dir(&group_dir)? {
            files.push(file?.path());
        }
        files.sort();

        for path in &files {
            let is_image = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("jpg"))
                .unwrap_or(false);
            if !is_image {
                continue;
            }

            let ground_truth_path = files
                .iter()
                .find(|candidate| {
                    candidate.file_stem() == path.file_stem()
                        && candidate
                            .extension()
                            .and_then(|ext| ext.to_str())
                            .map(|ext| ext.eq_ignore_ascii_case("txt"))
                            .unwrap_or(false)
                })
                .cloned();

            if ground_truth_path.is_none() {
                debug!("No ground truth for {}", path.display());
            }

            entries.push(DatasetEntry {
                group_label: group_label.clone(),
                image_path: path.clone(),
                ground_truth_path,
            });
        }
    }

    info!(
        "Discovered {} dataset entries under {}",
        entries.len(),
        root.display()
    );
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        File::create(path).unwrap();
    }

    #[test]
    fn test_discover_pairs_images_with_ground_truth() {
        let root = tempdir().unwrap();
        let deu = root.path().join("deu");
        fs::create_dir(&deu).unwrap();
        touch(&deu.join("a.jpg"));
        let mut gt = File::create(deu.join("a.txt")).unwrap();
        writeln!(gt, "L898902C36UTO7408122F1204159ZE184226B<<<<<10").unwrap();

        let entries = discover_entries(root.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].group_label, "deu");
        assert!(entries[0].ground_truth_path.is_some());
    }

    #[test]
    fn test_discover_case_insensitive_extensions() {
        let root = tempdir().unwrap();
        let fra = root.path().join("fra");
        fs::create_dir(&fra).unwrap();
        touch(&fra.join("b.JPG"));
        touch(&fra.join("b.TXT"));

        let entries = discover_entries(root.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].ground_truth_path.is_some());
    }

    #[test]
    fn test_discover_missing_ground_truth() {
        let root = tempdir().unwrap();
        let usa = root.path().join("usa");
        fs::create_dir(&usa).unwrap();
        touch(&usa.join("c.jpg"));

        let entries = discover_entries(root.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].ground_truth_path.is_none());
    }

    #[test]
    fn test_discover_ignores_other_extensions_and_loose_files() {
        let root = tempdir().unwrap();
        touch(&root.path().join("stray.jpg")); // not in a group directory
        let deu = root.path().join("deu");
        fs::create_dir(&deu).unwrap();
        touch(&deu.join("d.png"));
        touch(&deu.join("notes.txt"));

        let entries = discover_entries(root.path()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_discover_sorted_by_group_then_filename() {
        let root = tempdir().unwrap();
        for group in ["zzz", "aaa"] {
            let dir = root.path().join(group);
            fs::create_dir(&dir).unwrap();
            touch(&dir.join("2.jpg"));
            touch(&dir.join("1.jpg"));
        }

        let entries = discover_entries(root.path()).unwrap();
        let order: Vec<(String, String)> = entries
            .iter()
            .map(|e| {
                (
                    e.group_label.clone(),
                    e.image_path.file_name().unwrap().to_str().unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            order,
            vec![
                ("aaa".to_string(), "1.jpg".to_string()),
                ("aaa".to_string(), "2.jpg".to_string()),
                ("zzz".to_string(), "1.jpg".to_string()),
                ("zzz".to_string(), "2.jpg".to_string()),
            ]
        );
    }

    #[test]
    fn test_discover_rejects_missing_root() {
        let root = tempdir().unwrap();
        let missing = root.path().join("nope");
        assert!(discover_entries(&missing).is_err());
    }
}
