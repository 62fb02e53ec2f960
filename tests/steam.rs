use appvdf::steam::{
    account_id, load_app_info, load_text_file, AppManifest, LibraryFolders, LocalConfig,
    LoginUsers, SteamConfig,
};
use appvdf::{Object, Value};
use std::path::{Path, PathBuf};

mod common;
use common::{appinfo_file, object, text};

fn steam_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/steam")
}

#[test]
fn test_library_folders() {
    let libraries = LibraryFolders::load(steam_dir()).unwrap();
    let ordered = libraries.libraries();
    assert_eq!(ordered.len(), 2);
    assert_eq!(ordered[0].path, "/home/user/.local/share/Steam");
    assert_eq!(ordered[0].apps.get(&4000), Some(&4436571612));
    assert_eq!(ordered[1].label, "games");
}

#[test]
fn test_find_manifest() {
    let mut libraries = LibraryFolders::load(steam_dir()).unwrap();

    // Point the second library at the fixture directory, the first one
    // doesn't exist and is passed over
    let library = libraries.libraryfolders.get_mut("1").unwrap();
    library.path = steam_dir().to_string_lossy().into_owned();

    let manifest = libraries.find_manifest(4000).unwrap();
    assert_eq!(manifest.app_state.appid, 4000);
    assert_eq!(manifest.app_state.installdir, "GarrysMod");
    assert_eq!(manifest.branch(), "x86-64");
    assert!(manifest.is_in_good_state());
    assert!(libraries.find_manifest(440).is_none());
}

#[test]
fn test_app_manifest() {
    let path = steam_dir().join("steamapps/appmanifest_4000.acf");
    let manifest: AppManifest = load_text_file(path).unwrap();
    assert_eq!(manifest.app_state.name, "Garry's Mod");
    assert_eq!(manifest.app_state.state_flags, 4);
    assert_eq!(manifest.app_state.user_config.language, "english");
}

#[test]
fn test_login_users() {
    let users = LoginUsers::load(steam_dir()).unwrap();
    let (id, user) = users.last_login().unwrap();
    assert_eq!(id, 76561197960287930);
    assert_eq!(user.account_name, "gaben");
    assert_eq!(account_id(id), 22202);
}

#[test]
fn test_config_and_local_config() {
    let config = SteamConfig::load(steam_dir()).unwrap();
    assert!(config.uses_proton(4000));
    assert!(!config.uses_proton(440));
    assert_eq!(config.compat_tools().len(), 3);

    let local = LocalConfig::load(steam_dir(), 22202).unwrap();
    assert_eq!(local.launch_options(4000), Some("-novid -console"));
    assert_eq!(local.launch_options(440), Some(""));
    assert_eq!(local.launch_options(10), None);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = LocalConfig::load(steam_dir(), 1).unwrap_err();
    assert!(matches!(err.kind(), appvdf::ErrorKind::Io(_)));
}

#[test]
fn test_load_app_info() {
    let launch: Object = object(vec![
        (
            "0",
            Value::Object(object(vec![
                ("executable", text("hl2.exe")),
                ("arguments", text("-game garrysmod")),
                (
                    "config",
                    Value::Object(object(vec![("oslist", text("windows"))])),
                ),
            ])),
        ),
        (
            "1",
            Value::Object(object(vec![
                ("executable", text("hl2.sh")),
                (
                    "config",
                    Value::Object(object(vec![("oslist", text("linux"))])),
                ),
            ])),
        ),
    ]);

    let document = object(vec![(
        "appinfo",
        Value::Object(object(vec![
            ("appid", Value::Int32(4000)),
            (
                "common",
                Value::Object(object(vec![
                    ("name", text("Garry's Mod")),
                    ("type", text("Game")),
                ])),
            ),
            (
                "config",
                Value::Object(object(vec![
                    ("installdir", text("GarrysMod")),
                    ("launch", Value::Object(launch)),
                ])),
            ),
        ])),
    )]);

    let data = appinfo_file(0x29, &[(10, Object::new()), (4000, document)]);
    let path = std::env::temp_dir().join(format!("appvdf-appinfo-{}.vdf", std::process::id()));
    std::fs::write(&path, data).unwrap();

    let info = load_app_info(&path, 4000).unwrap().unwrap();
    let missing = load_app_info(&path, 20).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(missing.is_none());
    assert_eq!(info.appinfo.appid, 4000);
    assert_eq!(info.appinfo.common.r#type, "Game");
    assert_eq!(info.appinfo.config.installdir, "GarrysMod");

    let linux: Vec<_> = info.launches_for("linux").collect();
    assert_eq!(linux.len(), 1);
    assert_eq!(linux[0].executable, "hl2.sh");
    assert_eq!(
        info.launches_for("windows").next().map(|x| x.arguments.as_str()),
        Some("-game garrysmod")
    );
}
