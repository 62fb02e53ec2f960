//! Typed views of the files a Steam installation keeps its state in
//!
//! Each file is parsed into a [Value](crate::Value) and then projected onto
//! one of the shapes below, so only the handful of fields that are declared
//! here are retained.
//!
//! ```no_run
//! use appvdf::steam::{LibraryFolders, LoginUsers};
//!
//! let steam = "/home/user/.steam/steam";
//! let libraries = LibraryFolders::load(steam)?;
//! if let Some(manifest) = libraries.find_manifest(4000) {
//!     println!("branch: {}", manifest.branch());
//! }
//!
//! let users = LoginUsers::load(steam)?;
//! if let Some((id, user)) = users.last_login() {
//!     println!("{} ({})", user.persona_name, id);
//! }
//! # Ok::<(), appvdf::Error>(())
//! ```

use crate::appinfo::AppInfoReader;
use crate::errors::Error;
use crate::project::{project, Shape};
use crate::text;
use crate::VdfShape;
use std::collections::HashMap;
use std::path::Path;

/// `steamapps/libraryfolders.vdf`
#[derive(VdfShape, Debug, Clone, Default, PartialEq)]
pub struct LibraryFolders {
    pub libraryfolders: HashMap<String, LibraryFolder>,
}

/// A directory that games are installed into
#[derive(VdfShape, Debug, Clone, Default, PartialEq)]
pub struct LibraryFolder {
    pub path: String,
    pub label: String,

    /// Installed applications and their size on disk
    pub apps: HashMap<u32, u64>,
}

/// `config/loginusers.vdf`
#[derive(VdfShape, Debug, Clone, Default, PartialEq)]
pub struct LoginUsers {
    /// Accounts keyed by their 64 bit steam id
    pub users: HashMap<u64, SteamUser>,
}

#[derive(VdfShape, Debug, Clone, Default, PartialEq)]
pub struct SteamUser {
    pub account_name: String,
    pub persona_name: String,
    pub most_recent: i32,
    pub timestamp: i64,
}

/// `steamapps/appmanifest_<appid>.acf`
#[derive(VdfShape, Debug, Clone, Default, PartialEq)]
pub struct AppManifest {
    pub app_state: AppState,
}

#[derive(VdfShape, Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub appid: u32,
    pub name: String,
    pub installdir: String,
    pub state_flags: u32,
    pub scheduled_auto_update: u64,
    pub user_config: UserConfig,
}

#[derive(VdfShape, Debug, Clone, Default, PartialEq)]
pub struct UserConfig {
    pub language: String,
    pub beta_key: String,
}

/// The `Software/Valve/Steam` nesting shared by the config files
#[derive(VdfShape, Debug, Clone, Default, PartialEq)]
pub struct ConfigStore<T> {
    pub software: Software<T>,
}

#[derive(VdfShape, Debug, Clone, Default, PartialEq)]
pub struct Software<T> {
    pub valve: Valve<T>,
}

#[derive(VdfShape, Debug, Clone, Default, PartialEq)]
pub struct Valve<T> {
    pub steam: T,
}

/// `config/config.vdf`
#[derive(VdfShape, Debug, Clone, Default, PartialEq)]
pub struct SteamConfig {
    pub install_config_store: ConfigStore<SteamSection>,
}

#[derive(VdfShape, Debug, Clone, Default, PartialEq)]
pub struct SteamSection {
    pub compat_tool_mapping: HashMap<u32, CompatToolMapping>,
}

/// The compatibility tool forced for an application
#[derive(VdfShape, Debug, Clone, Default, PartialEq)]
pub struct CompatToolMapping {
    pub name: String,
}

/// `userdata/<account id>/config/localconfig.vdf`
#[derive(VdfShape, Debug, Clone, Default, PartialEq)]
pub struct LocalConfig {
    pub user_local_config_store: ConfigStore<LocalSteamSection>,
}

#[derive(VdfShape, Debug, Clone, Default, PartialEq)]
pub struct LocalSteamSection {
    pub apps: HashMap<u32, AppLocalConfig>,
}

#[derive(VdfShape, Debug, Clone, Default, PartialEq)]
pub struct AppLocalConfig {
    pub launch_options: String,
}

/// The document of an `appcache/appinfo.vdf` record
#[derive(VdfShape, Debug, Clone, Default, PartialEq)]
pub struct AppInfo {
    pub appinfo: AppInfoData,
}

#[derive(VdfShape, Debug, Clone, Default, PartialEq)]
pub struct AppInfoData {
    pub appid: u32,
    pub common: AppCommon,
    pub config: AppConfig,
}

#[derive(VdfShape, Debug, Clone, Default, PartialEq)]
pub struct AppCommon {
    pub name: String,
    pub r#type: String,
    pub oslist: String,
}

#[derive(VdfShape, Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub installdir: String,

    /// Launch entries keyed by their (numeric) position
    pub launch: HashMap<String, Launch>,
}

#[derive(VdfShape, Debug, Clone, Default, PartialEq)]
pub struct Launch {
    pub executable: String,
    pub arguments: String,
    pub description: String,

    #[vdf(rename = "type")]
    pub launch_type: String,
    pub config: LaunchConfig,
}

#[derive(VdfShape, Debug, Clone, Default, PartialEq)]
pub struct LaunchConfig {
    pub beta_key: String,
    pub os_list: String,
    pub os_arch: String,
}

/// Parse the KeyValues text file and project it onto the shape
///
/// Values that could not be projected are logged and skipped.
pub fn load_text_file<T: Shape>(path: impl AsRef<Path>) -> Result<T, Error> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let value = text::parse(&data)?;
    let projection = project::<T>(&value)?;
    tracing::debug!(
        path = %path.display(),
        skipped = projection.diagnostics.len(),
        "loaded key values file"
    );
    Ok(projection.value)
}

/// Find the application's record in the appinfo cache and project it
///
/// Returns `Ok(None)` when the cache has no record for the application.
pub fn load_app_info(path: impl AsRef<Path>, appid: u32) -> Result<Option<AppInfo>, Error> {
    let Some(record) = AppInfoReader::open(path)?.find(appid)? else {
        return Ok(None);
    };

    let projection = project::<AppInfo>(&record.into_value())?;
    Ok(Some(projection.value))
}

/// The account id of a 64 bit steam id, which names the user's directory
/// under `userdata`
///
/// ```
/// assert_eq!(appvdf::steam::account_id(76561197960287930), 22202);
/// ```
pub fn account_id(steam_id64: u64) -> u32 {
    (steam_id64 & 0xFFFF_FFFF) as u32
}

/// Numeric keys in ascending order followed by the rest
fn by_numeric_key(a: &str, b: &str) -> std::cmp::Ordering {
    let numeric = |x: &str| x.parse::<u64>().unwrap_or(u64::MAX);
    numeric(a).cmp(&numeric(b)).then_with(|| a.cmp(b))
}

impl LibraryFolders {
    /// Load `steamapps/libraryfolders.vdf` from the steam directory
    pub fn load(steam: impl AsRef<Path>) -> Result<Self, Error> {
        load_text_file(steam.as_ref().join("steamapps").join("libraryfolders.vdf"))
    }

    /// Returns the libraries ordered by their key
    pub fn libraries(&self) -> Vec<&LibraryFolder> {
        let mut entries: Vec<_> = self.libraryfolders.iter().collect();
        entries.sort_by(|(a, _), (b, _)| by_numeric_key(a, b));
        entries.into_iter().map(|(_, library)| library).collect()
    }

    /// Load the manifest of the application from the first library that has
    /// a readable one
    pub fn find_manifest(&self, appid: u32) -> Option<AppManifest> {
        self.libraries().into_iter().find_map(|library| {
            let path = Path::new(&library.path)
                .join("steamapps")
                .join(format!("appmanifest_{}.acf", appid));
            match load_text_file::<AppManifest>(&path) {
                Ok(manifest) => Some(manifest),
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "no usable manifest");
                    None
                }
            }
        })
    }
}

impl LoginUsers {
    /// Load `config/loginusers.vdf` from the steam directory
    pub fn load(steam: impl AsRef<Path>) -> Result<Self, Error> {
        load_text_file(steam.as_ref().join("config").join("loginusers.vdf"))
    }

    /// The user marked as most recent, otherwise the user with the latest
    /// timestamp
    pub fn last_login(&self) -> Option<(u64, &SteamUser)> {
        if let Some((id, user)) = self.users.iter().find(|(_, user)| user.most_recent == 1) {
            return Some((*id, user));
        }

        self.users
            .iter()
            .filter(|(_, user)| user.timestamp > 0)
            .max_by_key(|(id, user)| (user.timestamp, std::cmp::Reverse(**id)))
            .map(|(id, user)| (*id, user))
    }
}

impl AppManifest {
    /// The beta branch the user opted into, otherwise `main`
    pub fn branch(&self) -> &str {
        match self.app_state.user_config.beta_key.as_str() {
            "" => "main",
            x => x,
        }
    }

    /// Returns true when the application is fully installed and has no
    /// pending update
    pub fn is_in_good_state(&self) -> bool {
        self.app_state.state_flags == 4 && self.app_state.scheduled_auto_update == 0
    }
}

impl SteamConfig {
    /// Load `config/config.vdf` from the steam directory
    pub fn load(steam: impl AsRef<Path>) -> Result<Self, Error> {
        load_text_file(steam.as_ref().join("config").join("config.vdf"))
    }

    /// The compatibility tool mappings
    pub fn compat_tools(&self) -> &HashMap<u32, CompatToolMapping> {
        &self
            .install_config_store
            .software
            .valve
            .steam
            .compat_tool_mapping
    }

    /// Returns true if the application is mapped to a proton build
    pub fn uses_proton(&self, appid: u32) -> bool {
        self.compat_tools()
            .get(&appid)
            .map_or(false, |x| x.name.to_ascii_lowercase().contains("proton"))
    }
}

impl LocalConfig {
    /// Load the user's `localconfig.vdf` from the steam directory
    pub fn load(steam: impl AsRef<Path>, account_id: u32) -> Result<Self, Error> {
        let path = steam
            .as_ref()
            .join("userdata")
            .join(account_id.to_string())
            .join("config")
            .join("localconfig.vdf");
        load_text_file(path)
    }

    /// The launch options the user configured for the application
    pub fn launch_options(&self, appid: u32) -> Option<&str> {
        self.user_local_config_store
            .software
            .valve
            .steam
            .apps
            .get(&appid)
            .map(|x| x.launch_options.as_str())
    }
}

impl AppInfo {
    /// Launch entries that apply to the platform (`windows`, `linux`,
    /// `macos`), ordered by their key
    pub fn launches_for<'a>(
        &'a self,
        platform: &'a str,
    ) -> impl Iterator<Item = &'a Launch> + 'a {
        let mut entries: Vec<_> = self.appinfo.config.launch.iter().collect();
        entries.sort_by(|(a, _), (b, _)| by_numeric_key(a, b));
        entries.into_iter().map(|(_, launch)| launch).filter(move |launch| {
            let os_list = launch.config.os_list.as_str();
            os_list.is_empty() || os_list.split(',').any(|x| x.trim() == platform)
        })
    }
}
