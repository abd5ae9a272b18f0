use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use crate::error::IngestError;

pub const LOCAL_STATE_FILE: &str = "Local State";
pub const FIREFOX_PROFILES_DIR: &str = "Profiles";
pub const SINGLE_PROFILE_KEY: &str = "default";

const CHROMIUM_NAME_PROPERTIES: [&str; 4] = ["gaia_given_name", "gaia_name", "name", "shortcut_name"];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileHandle {
    pub name: Option<String>,
    pub path: PathBuf,
}

impl ProfileHandle {
    pub fn new(name: Option<String>, path: PathBuf) -> Self {
        Self { name, path }
    }

    /// Last path component, used to tell snapshot files apart.
    pub fn dir_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "profile".to_string())
    }
}

/// Case-insensitive alias index over the profiles of one storage root.
#[derive(Debug, Default, Clone)]
pub struct ProfileIndex {
    handles: Vec<Arc<ProfileHandle>>,
    keys: HashMap<String, usize>,
}

impl ProfileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a profile and returns its slot for further aliases.
    pub fn add_profile(&mut self, handle: ProfileHandle) -> usize {
        self.handles.push(Arc::new(handle));
        self.handles.len() - 1
    }

    pub fn add_alias(&mut self, slot: usize, alias: &str) {
        let key = alias.trim().to_lowercase();
        if key.is_empty() || slot >= self.handles.len() {
            return;
        }
        self.keys.insert(key, slot);
    }

    pub fn get(&self, name: &str) -> Option<Arc<ProfileHandle>> {
        self.keys
            .get(&name.trim().to_lowercase())
            .map(|slot| Arc::clone(&self.handles[*slot]))
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<ProfileHandle>, IngestError> {
        self.get(name)
            .ok_or_else(|| IngestError::ProfileNotFound(name.to_string()))
    }

    /// Every distinct profile once, in registration order. Aliases do not
    /// produce extra visits.
    pub fn profiles(&self) -> impl Iterator<Item = &Arc<ProfileHandle>> {
        self.handles.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Profiles to ingest: the named one, or all of them.
    pub fn select(&self, requested: Option<&str>) -> Result<Vec<Arc<ProfileHandle>>, IngestError> {
        match requested {
            Some(name) => Ok(vec![self.resolve(name)?]),
            None => Ok(self.handles.clone()),
        }
    }
}

pub fn resolve_chromium_profiles(storage_root: &Path) -> Result<ProfileIndex, IngestError> {
    let local_state_path = storage_root.join(LOCAL_STATE_FILE);
    let file = File::open(&local_state_path).map_err(|e| IngestError::MetadataUnreadable {
        path: local_state_path.clone(),
        reason: e.to_string(),
    })?;
    let local_state: serde_json::Value = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| IngestError::MetadataUnreadable {
            path: local_state_path.clone(),
            reason: e.to_string(),
        })?;

    let info_cache = local_state
        .get("profile")
        .and_then(|profile| profile.get("info_cache"))
        .and_then(|info_cache| info_cache.as_object())
        .ok_or_else(|| IngestError::MetadataShapeUnexpected {
            path: local_state_path.clone(),
            reason: "missing object profile.info_cache".to_string(),
        })?;

    let mut index = ProfileIndex::new();
    for (dir_name, info) in info_cache {
        let display_name = info
            .get("name")
            .and_then(|v| v.as_str())
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        let slot = index.add_profile(ProfileHandle::new(
            display_name.or_else(|| Some(dir_name.clone())),
            storage_root.join(dir_name),
        ));
        index.add_alias(slot, dir_name);

        for property in CHROMIUM_NAME_PROPERTIES {
            if let Some(name) = info.get(property).and_then(|v| v.as_str()) {
                index.add_alias(slot, name);
            }
        }
    }

    log::info!(
        "resolved {} chromium profile(s) from {}",
        index.len(),
        local_state_path.display()
    );
    Ok(index)
}

/// Opera GX keeps a single profile directly in the storage root.
pub fn resolve_single_profile(storage_root: &Path) -> ProfileIndex {
    let mut index = ProfileIndex::new();
    let slot = index.add_profile(ProfileHandle::new(
        Some(SINGLE_PROFILE_KEY.to_string()),
        storage_root.to_path_buf(),
    ));
    index.add_alias(slot, SINGLE_PROFILE_KEY);
    index
}

pub fn resolve_firefox_profiles(storage_root: &Path) -> Result<ProfileIndex, IngestError> {
    let profiles_dir = storage_root.join(FIREFOX_PROFILES_DIR);
    if !profiles_dir.is_dir() {
        return Err(IngestError::ProfilesDirMissing(profiles_dir));
    }

    let mut index = ProfileIndex::new();
    for entry in WalkDir::new(&profiles_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
    {
        let dir_name = entry.file_name().to_string_lossy().into_owned();
        let profile_name = firefox_profile_name(&dir_name).to_string();
        log::info!("found firefox profile '{profile_name}'");

        let slot = index.add_profile(ProfileHandle::new(
            Some(profile_name.clone()),
            entry.path().to_path_buf(),
        ));
        index.add_alias(slot, &profile_name);
    }

    Ok(index)
}

/// `<salt>.<name>` → `<name>`; names without a dot are kept whole.
pub fn firefox_profile_name(dir_name: &str) -> &str {
    match dir_name.split_once('.') {
        Some((_, name)) => name,
        None => dir_name,
    }
}
