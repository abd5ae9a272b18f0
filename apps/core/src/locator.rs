use std::path::{Path, PathBuf};

use crate::error::IngestError;
use crate::model::BrowserFamily;

/// Where profile data lives on disk for a Chromium-family browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromiumLayout {
    /// Profiles are listed in a `Local State` file at the storage root.
    LocalState,
    /// No `Local State`; the storage root is the only profile (Opera GX).
    SingleProfile,
}

/// Family plus the layout details its reader needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserKind {
    Chromium(ChromiumLayout),
    Firefox,
}

impl BrowserKind {
    pub fn family(self) -> BrowserFamily {
        match self {
            Self::Chromium(_) => BrowserFamily::Chromium,
            Self::Firefox => BrowserFamily::Firefox,
        }
    }

    pub fn is_single_profile(self) -> bool {
        matches!(self, Self::Chromium(ChromiumLayout::SingleProfile))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppDataRoot {
    Local,
    Roaming,
}

#[derive(Debug, Clone, Copy)]
pub struct KnownBrowser {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub kind: BrowserKind,
    /// Relative subpaths, `/`-separated, tried in order.
    pub candidates: &'static [(AppDataRoot, &'static str)],
}

pub fn known_browsers() -> &'static [KnownBrowser] {
    use AppDataRoot::{Local, Roaming};

    const BROWSERS: &[KnownBrowser] = &[
        KnownBrowser {
            name: "Google Chrome",
            aliases: &["chrome"],
            kind: BrowserKind::Chromium(ChromiumLayout::LocalState),
            candidates: &[
                (Local, "Google/Chrome/User Data"),
                (Local, "Google/Chrome Beta/User Data"),
                (Local, "Google/Chrome Dev/User Data"),
                (Local, "Google/Chrome SxS/User Data"),
            ],
        },
        KnownBrowser {
            name: "Microsoft Edge",
            aliases: &["edge"],
            kind: BrowserKind::Chromium(ChromiumLayout::LocalState),
            candidates: &[
                (Local, "Microsoft/Edge/User Data"),
                (Local, "Microsoft/Edge Beta/User Data"),
                (Local, "Microsoft/Edge Dev/User Data"),
                (Local, "Microsoft/Edge SxS/User Data"),
            ],
        },
        KnownBrowser {
            name: "Brave",
            aliases: &["brave browser"],
            kind: BrowserKind::Chromium(ChromiumLayout::LocalState),
            candidates: &[
                (Local, "BraveSoftware/Brave-Browser/User Data"),
                (Local, "BraveSoftware/Brave-Browser-Beta/User Data"),
                (Local, "BraveSoftware/Brave-Browser-Nightly/User Data"),
            ],
        },
        KnownBrowser {
            name: "Vivaldi",
            aliases: &[],
            kind: BrowserKind::Chromium(ChromiumLayout::LocalState),
            candidates: &[(Local, "Vivaldi/User Data")],
        },
        KnownBrowser {
            name: "Chromium",
            aliases: &[],
            kind: BrowserKind::Chromium(ChromiumLayout::LocalState),
            candidates: &[(Local, "Chromium/User Data")],
        },
        KnownBrowser {
            name: "Opera GX",
            aliases: &["operagx", "opera gx stable"],
            kind: BrowserKind::Chromium(ChromiumLayout::SingleProfile),
            candidates: &[(Roaming, "Opera Software/Opera GX Stable")],
        },
        KnownBrowser {
            name: "Firefox",
            aliases: &["mozilla firefox", "firefox developer edition", "firefox nightly"],
            kind: BrowserKind::Firefox,
            candidates: &[
                (Roaming, "Mozilla/Firefox"),
                (
                    Local,
                    "Packages/Mozilla.Firefox_n80bbvh6b1yt2/LocalCache/Roaming/Mozilla/Firefox",
                ),
            ],
        },
        KnownBrowser {
            name: "Zen",
            aliases: &["zen browser"],
            kind: BrowserKind::Firefox,
            candidates: &[(Roaming, "zen")],
        },
        KnownBrowser {
            name: "Floorp",
            aliases: &[],
            kind: BrowserKind::Firefox,
            candidates: &[(Roaming, "Floorp")],
        },
        KnownBrowser {
            name: "Waterfox",
            aliases: &[],
            kind: BrowserKind::Firefox,
            candidates: &[(Roaming, "Waterfox")],
        },
        KnownBrowser {
            name: "LibreWolf",
            aliases: &[],
            kind: BrowserKind::Firefox,
            candidates: &[(Roaming, "librewolf")],
        },
    ];
    BROWSERS
}

/// The host-provided view of the default browser and the per-user
/// app-data roots. Captured at session start and on reload only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserContext {
    pub identifier: String,
    pub local_app_data: PathBuf,
    pub roaming_app_data: PathBuf,
    pub icon_path: String,
}

impl BrowserContext {
    pub fn new(
        identifier: impl Into<String>,
        local_app_data: impl Into<PathBuf>,
        roaming_app_data: impl Into<PathBuf>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            local_app_data: local_app_data.into(),
            roaming_app_data: roaming_app_data.into(),
            icon_path: String::new(),
        }
    }

    pub fn with_icon_path(mut self, icon_path: impl Into<String>) -> Self {
        self.icon_path = icon_path.into();
        self
    }

    /// Reads `LOCALAPPDATA` and `APPDATA`; missing variables become empty
    /// roots, which simply never match a candidate.
    pub fn from_env(identifier: impl Into<String>) -> Self {
        let local = std::env::var_os("LOCALAPPDATA").map(PathBuf::from);
        let roaming = std::env::var_os("APPDATA").map(PathBuf::from);
        Self::new(
            identifier,
            local.unwrap_or_default(),
            roaming.unwrap_or_default(),
        )
    }

    fn root(&self, root: AppDataRoot) -> &Path {
        match root {
            AppDataRoot::Local => &self.local_app_data,
            AppDataRoot::Roaming => &self.roaming_app_data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedBrowser {
    pub name: &'static str,
    pub kind: BrowserKind,
    pub storage_root: PathBuf,
}

impl LocatedBrowser {
    pub fn family(&self) -> BrowserFamily {
        self.kind.family()
    }
}

pub fn find_known_browser(identifier: &str) -> Option<&'static KnownBrowser> {
    let wanted = identifier.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    known_browsers().iter().find(|browser| {
        browser.name.to_lowercase() == wanted
            || browser.aliases.iter().any(|alias| *alias == wanted)
    })
}

pub fn candidate_roots(
    context: &BrowserContext,
) -> Result<(&'static KnownBrowser, Vec<PathBuf>), IngestError> {
    let browser = find_known_browser(&context.identifier)
        .ok_or_else(|| IngestError::BrowserUnsupported(context.identifier.clone()))?;

    let candidates = browser
        .candidates
        .iter()
        .filter(|(root, _)| !context.root(*root).as_os_str().is_empty())
        .map(|(root, subpath)| {
            subpath
                .split('/')
                .fold(context.root(*root).to_path_buf(), |path, segment| {
                    path.join(segment)
                })
        })
        .collect();

    Ok((browser, candidates))
}

pub fn locate(context: &BrowserContext) -> Result<LocatedBrowser, IngestError> {
    let (browser, candidates) = candidate_roots(context)?;

    let Some(storage_root) = candidates.iter().find(|candidate| candidate.is_dir()).cloned()
    else {
        return Err(IngestError::StorageRootNotFound {
            browser: browser.name.to_string(),
            candidates,
        });
    };

    log::info!(
        "found user data directory for '{}': {}",
        browser.name,
        storage_root.display()
    );
    Ok(LocatedBrowser {
        name: browser.name,
        kind: browser.kind,
        storage_root,
    })
}
