use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use walkdir::WalkDir;

use crate::models::AssetKind;

/// A catalog entry derived purely from a preset image filename.
#[derive(Debug, Clone, Serialize)]
pub struct PresetEntry {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub image: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PresetCatalog {
    pub models: Vec<PresetEntry>,
    pub locations: Vec<PresetEntry>,
    pub placements: Vec<PresetEntry>,
}

static IMAGE_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png)$").expect("extension pattern is valid"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static NON_ID_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9-]").expect("id pattern is valid"));

/// Scan the preset directories under `assets_dir` and build the catalog.
/// A missing or unreadable directory logs and contributes an empty list.
pub fn load_presets(assets_dir: &Path) -> PresetCatalog {
    let models = scan_directory(assets_dir, "presets/models", AssetKind::Model);
    let locations = scan_directory(assets_dir, "presets/locations", AssetKind::Location);
    let placements = scan_directory(assets_dir, "presets/placements", AssetKind::Placement);

    log::info!(
        "Loaded {} models, {} locations, {} placements",
        models.len(),
        locations.len(),
        placements.len()
    );

    PresetCatalog {
        models,
        locations,
        placements,
    }
}

/// Locate a preset file by catalog id, matching the filename prefix first and
/// falling back to a substring match.
pub fn find_preset_file(dir: &Path, id: &str) -> Option<PathBuf> {
    if id.is_empty() {
        return None;
    }

    let mut fallback = None;
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .flatten()
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = match entry.file_name().to_str() {
            Some(name) => name,
            None => continue,
        };
        if !IMAGE_EXTENSION.is_match(file_name) {
            continue;
        }
        if file_name.starts_with(id) || preset_id(file_name).starts_with(id) {
            return Some(entry.path().to_path_buf());
        }
        if fallback.is_none() && file_name.contains(id) {
            fallback = Some(entry.path().to_path_buf());
        }
    }
    fallback
}

fn scan_directory(assets_dir: &Path, sub_path: &str, kind: AssetKind) -> Vec<PresetEntry> {
    let dir = assets_dir.join(sub_path);
    let mut entries = Vec::new();

    for entry in WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::error!("Failed to scan {}: {}", dir.display(), err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = match entry.file_name().to_str() {
            Some(name) => name,
            None => continue,
        };
        if !IMAGE_EXTENSION.is_match(file_name) {
            continue;
        }
        entries.push(entry_from_filename(file_name, sub_path, kind));
    }

    entries
}

fn preset_id(file_name: &str) -> String {
    let name = IMAGE_EXTENSION.replace(file_name, "");
    let lowercased = name.to_lowercase();
    let id = WHITESPACE.replace_all(&lowercased, "-");
    NON_ID_CHARS.replace_all(&id, "").to_string()
}

fn entry_from_filename(file_name: &str, sub_path: &str, kind: AssetKind) -> PresetEntry {
    let name = IMAGE_EXTENSION.replace(file_name, "").to_string();
    let id = preset_id(file_name);
    let image = format!("/{}/{}", sub_path, file_name);

    match kind {
        AssetKind::Model => {
            // "female" contains "male": the female check must come first.
            let gender = if id.contains("female") {
                "female"
            } else if id.contains("male") {
                "male"
            } else {
                "unisex"
            };

            PresetEntry {
                id,
                name,
                gender: Some(gender.to_string()),
                image,
                description: format!("{} model", capitalize(gender)),
                prompt: None,
            }
        }
        AssetKind::Location | AssetKind::Placement => {
            let prompt = format!(
                "a professional commercial product photography background in a {} setting, empty, no products, no humans, 8k resolution",
                name.to_lowercase()
            );

            PresetEntry {
                id,
                name: name.clone(),
                gender: None,
                image,
                description: format!("{} background", name),
                prompt: Some(prompt),
            }
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn seed_presets(root: &Path) {
        let models = root.join("presets/models");
        let locations = root.join("presets/locations");
        let placements = root.join("presets/placements");
        fs::create_dir_all(&models).unwrap();
        fs::create_dir_all(&locations).unwrap();
        fs::create_dir_all(&placements).unwrap();

        fs::write(models.join("Emma Female.jpg"), b"img").unwrap();
        fs::write(models.join("Liam Male.png"), b"img").unwrap();
        fs::write(models.join("Alex.jpeg"), b"img").unwrap();
        fs::write(models.join("README.txt"), b"not an image").unwrap();
        fs::write(locations.join("Brick Wall.jpg"), b"img").unwrap();
        fs::write(placements.join("Marble Counter.png"), b"img").unwrap();
    }

    #[test]
    fn catalog_scans_all_three_directories() {
        let tmp = tempfile::tempdir().unwrap();
        seed_presets(tmp.path());

        let catalog = load_presets(tmp.path());
        assert_eq!(catalog.models.len(), 3);
        assert_eq!(catalog.locations.len(), 1);
        assert_eq!(catalog.placements.len(), 1);
    }

    #[test]
    fn model_gender_inference_checks_female_first() {
        let tmp = tempfile::tempdir().unwrap();
        seed_presets(tmp.path());

        let catalog = load_presets(tmp.path());
        let gender_of = |id: &str| {
            catalog
                .models
                .iter()
                .find(|m| m.id == id)
                .and_then(|m| m.gender.clone())
                .unwrap()
        };

        assert_eq!(gender_of("emma-female"), "female");
        assert_eq!(gender_of("liam-male"), "male");
        assert_eq!(gender_of("alex"), "unisex");
    }

    #[test]
    fn location_entries_carry_background_prompts() {
        let tmp = tempfile::tempdir().unwrap();
        seed_presets(tmp.path());

        let catalog = load_presets(tmp.path());
        let wall = &catalog.locations[0];
        assert_eq!(wall.id, "brick-wall");
        assert_eq!(wall.name, "Brick Wall");
        assert_eq!(wall.description, "Brick Wall background");
        assert!(wall.prompt.as_deref().unwrap().contains("brick wall setting"));
        assert!(wall.gender.is_none());
    }

    #[test]
    fn ids_are_kebab_case_without_special_characters() {
        assert_eq!(preset_id("Emma Female.jpg"), "emma-female");
        assert_eq!(preset_id("Café  Corner!.PNG"), "caf-corner");
        assert_eq!(preset_id("loft_23.jpeg"), "loft23");
    }

    #[test]
    fn missing_directory_scans_to_empty_catalog() {
        let tmp = tempfile::tempdir().unwrap();
        let catalog = load_presets(&tmp.path().join("nope"));
        assert!(catalog.models.is_empty());
        assert!(catalog.locations.is_empty());
        assert!(catalog.placements.is_empty());
    }

    #[test]
    fn preset_files_resolve_by_id_prefix() {
        let tmp = tempfile::tempdir().unwrap();
        seed_presets(tmp.path());
        let models_dir = tmp.path().join("presets/models");

        let by_prefix = find_preset_file(&models_dir, "Emma").unwrap();
        assert!(by_prefix.ends_with("Emma Female.jpg"));

        let by_id = find_preset_file(&models_dir, "emma-female").unwrap();
        assert!(by_id.ends_with("Emma Female.jpg"));

        let by_substring = find_preset_file(&models_dir, "Male").unwrap();
        assert!(by_substring.ends_with("Liam Male.png"));

        assert!(find_preset_file(&models_dir, "zoe").is_none());
        assert!(find_preset_file(&models_dir, "").is_none());
    }
}
