#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Config service over the memory and filesystem stores.

use haptic_config::{
    ConfigError, ConfigService, ConfigStore, FsConfigStore, MemoryConfigStore, PROXY_SETTINGS_KEY,
};
use haptic_proxy::ProxySettings;

#[test]
fn missing_proxy_settings_fall_back_to_defaults() {
    let service = ConfigService::new(MemoryConfigStore::new());
    let settings = service.load_proxy_settings().unwrap();
    assert_eq!(settings, ProxySettings::default());
}

#[test]
fn proxy_settings_survive_a_save_load_cycle_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let service = ConfigService::new(FsConfigStore::at(dir.path()).unwrap());
    let settings = ProxySettings {
        radius: 0.004,
        force_shading_enabled: true,
        use_dynamic_proxy: true,
        ..ProxySettings::default()
    };
    service.save_proxy_settings(&settings).unwrap();
    assert!(dir.path().join("proxy.json").exists());

    let reopened = ConfigService::new(FsConfigStore::at(dir.path()).unwrap());
    assert_eq!(reopened.load_proxy_settings().unwrap(), settings);
}

#[test]
fn partial_files_keep_defaults_for_missing_fields() {
    let store = MemoryConfigStore::new();
    store
        .save_raw(PROXY_SETTINGS_KEY, br#"{ "radius": 0.02, "friction_enabled": false }"#)
        .unwrap();
    let service = ConfigService::new(store);
    let settings = service.load_proxy_settings().unwrap();
    assert_eq!(settings.radius, 0.02);
    assert!(!settings.friction_enabled);
    assert_eq!(settings.epsilon_base, ProxySettings::default().epsilon_base);
}

#[test]
fn invalid_stored_settings_are_rejected() {
    let store = MemoryConfigStore::new();
    store
        .save_raw(PROXY_SETTINGS_KEY, br#"{ "radius": -1.0 }"#)
        .unwrap();
    let service = ConfigService::new(store);
    assert!(matches!(
        service.load_proxy_settings(),
        Err(ConfigError::Invalid(_))
    ));

    let bad = ProxySettings {
        epsilon_base: f64::NAN,
        ..ProxySettings::default()
    };
    assert!(matches!(
        service.save_proxy_settings(&bad),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn malformed_json_is_a_serde_error() {
    let store = MemoryConfigStore::new();
    store.save_raw(PROXY_SETTINGS_KEY, b"{ radius").unwrap();
    let service = ConfigService::new(store);
    assert!(matches!(
        service.load_proxy_settings(),
        Err(ConfigError::Serde(_))
    ));
}

#[test]
fn empty_blob_reads_as_missing() {
    let store = MemoryConfigStore::new();
    store.save_raw("scene", b"").unwrap();
    let service = ConfigService::new(store);
    assert_eq!(service.load::<ProxySettings>("scene").unwrap(), None);
    assert_eq!(service.store().keys().unwrap(), vec!["scene".to_owned()]);
}

#[test]
fn fs_store_rejects_path_like_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsConfigStore::at(dir.path().join("nested")).unwrap();
    assert!(store.base_dir().is_dir());
    for key in ["", "..", "a/b", "a\\b"] {
        assert!(matches!(
            store.save_raw(key, b"{}"),
            Err(ConfigError::InvalidKey(_))
        ));
    }
    assert!(matches!(store.load_raw("absent"), Err(ConfigError::NotFound)));
}
