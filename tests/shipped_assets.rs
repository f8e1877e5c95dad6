use outpost::game::command::CommandCatalog;
use outpost::game::config::{
    load_catalog, ConfigError, GameConfig, InitialConfig, CATALOG_PATH, INITIAL_CONFIG_PATH,
};

#[test]
fn test_shipped_catalog_matches_builtin() {
    let shipped = load_catalog(CATALOG_PATH).expect("assets/catalog.ron should load");
    let builtin = CommandCatalog::builtin();

    assert_eq!(shipped.commands(), builtin.commands());
    assert_eq!(shipped.unit_types(), builtin.unit_types());
}

#[test]
fn test_shipped_initial_config_matches_defaults() {
    let shipped = InitialConfig::load(INITIAL_CONFIG_PATH).expect("initial config should load");
    assert_eq!(shipped, InitialConfig::default());
}

#[test]
fn test_shipped_game_config_matches_defaults() {
    let source = std::fs::read_to_string("assets/game_config.ron").unwrap();
    let shipped: GameConfig = ron::from_str(&source).unwrap();
    let defaults = GameConfig::default();

    assert_eq!(shipped.camera, defaults.camera);
    assert_eq!(shipped.key_camera_zoom, defaults.key_camera_zoom);
    assert_eq!(shipped.key_additive_select, defaults.key_additive_select);
}

#[test]
fn test_missing_files_fall_back() {
    assert!(InitialConfig::load("assets/does_not_exist.ron").is_err());
    assert_eq!(
        InitialConfig::load_or_default("assets/does_not_exist.ron"),
        InitialConfig::default()
    );
    assert!(load_catalog("assets/does_not_exist.ron").is_err());
}

#[test]
fn test_partial_initial_config_uses_defaults_for_the_rest() {
    let config = InitialConfig::from_ron("(build_queue_capacity: 8)", "inline").unwrap();
    assert_eq!(config.build_queue_capacity, 8);
    assert_eq!(config.layer_spacing_multiplier, 3.5);
    assert_eq!(config.formation(), InitialConfig::default().formation());
}

#[test]
fn test_out_of_range_initial_config_is_rejected() {
    for source in [
        "(build_queue_capacity: 0)",
        "(build_queue_capacity: 9223372036854775807)",
        "(layer_spacing_multiplier: 0.0)",
        "(unit_spacing_multiplier: -2.0)",
        "(selection_click_radius: 0.0)",
        "(arrival_threshold: -0.5)",
        "(demo_spawn_spread: -1.0)",
    ] {
        assert!(
            matches!(InitialConfig::from_ron(source, "inline"), Err(ConfigError::Invalid { .. })),
            "{} should be rejected",
            source
        );
    }

    let path = std::env::temp_dir().join(format!("outpost_bad_config_{}.ron", std::process::id()));
    std::fs::write(&path, "(build_queue_capacity: 9223372036854775807)").unwrap();
    assert_eq!(InitialConfig::load_or_default(&path), InitialConfig::default());
    let _ = std::fs::remove_file(&path);
}
