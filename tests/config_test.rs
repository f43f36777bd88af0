// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证 config_kv 配置读取与默认值
// ==========================================


use class_schedule::config::{config_keys, ConfigManager, ImportConfig, ImportConfigReader};
use class_schedule::importer::ImportError;
use test_helpers::{create_test_db, insert_config, open_test_connection};

#[tokio::test]
async fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let config_manager = ConfigManager::new(&db_path);
    assert!(
        config_manager.is_ok(),
        "ConfigManager should be created successfully"
    );
}

#[tokio::test]
async fn test_defaults_without_rows() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config_manager = ConfigManager::new(&db_path).unwrap();

    let config = ImportConfig::load(&config_manager).await.unwrap();
    assert_eq!(config, ImportConfig::default());
}

#[tokio::test]
async fn test_config_kv_created_on_fresh_db() {
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    let db_path = temp_file.path().to_str().unwrap();

    let config_manager = ConfigManager::new(db_path).unwrap();
    assert_eq!(config_manager.get_era_offset().await.unwrap(), 543);
}

#[tokio::test]
async fn test_overrides_are_read() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_config(&conn, config_keys::EXPECTED_COLUMNS, "31").unwrap();
    insert_config(&conn, config_keys::ERA_OFFSET, " 600 ").unwrap();
    insert_config(&conn, config_keys::ALLOWED_EXTENSIONS, "csv").unwrap();

    let config_manager = ConfigManager::new(&db_path).unwrap();
    let config = ImportConfig::load(&config_manager).await.unwrap();

    assert_eq!(config.expected_columns, 31);
    assert_eq!(config.era_offset, 600);
    assert_eq!(config.allowed_extensions, vec!["csv"]);
}

#[tokio::test]
async fn test_non_global_scope_is_ignored() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    conn.execute(
        "INSERT INTO config_kv (scope_id, key, value) VALUES ('faculty-sci', ?1, '40')",
        [config_keys::EXPECTED_COLUMNS],
    )
    .unwrap();

    let config_manager = ConfigManager::new(&db_path).unwrap();
    assert_eq!(config_manager.get_expected_column_count().await.unwrap(), 29);
}

#[tokio::test]
async fn test_malformed_values() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_config(&conn, config_keys::ALLOWED_EXTENSIONS, " , ").unwrap();

    let config_manager = ConfigManager::new(&db_path).unwrap();
    let result = ImportConfig::load(&config_manager).await;

    match result {
        Err(ImportError::ConfigValueError { key, .. }) => {
            assert_eq!(key, config_keys::ALLOWED_EXTENSIONS);
        }
        other => panic!("Expected ConfigValueError, got {:?}", other),
    }
}
