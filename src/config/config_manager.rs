// ==========================================
// 课表排课系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询
// 存储: config_kv 表 (key-value + scope)，只读 scope_id='global'
// 缺省: 键不存在时使用内置默认值；键存在但格式错误时报错
// ==========================================

use crate::config::import_config::DEFAULT_ALLOWED_EXTENSIONS;
use crate::config::import_config_trait::ImportConfigReader;
use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::importer::column_layout::SCHEDULE_EXPORT_LAYOUT;
use crate::importer::era_calendar::DEFAULT_ERA_OFFSET;
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        let manager = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        manager.ensure_table()?;
        Ok(manager)
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&conn_guard)?;
        }

        let manager = Self { conn };
        manager.ensure_table()?;
        Ok(manager)
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 确保表存在（如果不存在则创建）
    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS config_kv (
              scope_id TEXT NOT NULL,
              key TEXT NOT NULL,
              value TEXT NOT NULL,
              PRIMARY KEY (scope_id, key)
            );
            "#,
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取配置并解析；键不存在返回 None
    fn read_parsed<T, F>(&self, key: &str, parse: F) -> ImportResult<Option<T>>
    where
        F: FnOnce(&str) -> Result<T, String>,
    {
        let raw = self
            .get_global_config_value(key)
            .map_err(|e| ImportError::ConfigReadError {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        match raw {
            None => Ok(None),
            Some(value) => {
                let parsed = parse(value.trim()).map_err(|message| ImportError::ConfigValueError {
                    key: key.to_string(),
                    value: value.clone(),
                    message,
                })?;
                debug!(key, value = %value, "读取配置覆写");
                Ok(Some(parsed))
            }
        }
    }
}

/// 解析扩展名列表 "xlsx, .CSV" → ["xlsx", "csv"]
fn parse_extension_list(raw: &str) -> Result<Vec<String>, String> {
    let extensions: Vec<String> = raw
        .split(',')
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    if extensions.is_empty() {
        Err("扩展名列表为空".to_string())
    } else {
        Ok(extensions)
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_expected_column_count(&self) -> ImportResult<usize> {
        let value = self.read_parsed(config_keys::EXPECTED_COLUMNS, |v| match v.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err("应为正整数".to_string()),
        })?;
        Ok(value.unwrap_or(SCHEDULE_EXPORT_LAYOUT.column_count))
    }

    async fn get_era_offset(&self) -> ImportResult<i32> {
        let value = self.read_parsed(config_keys::ERA_OFFSET, |v| {
            v.parse::<i32>().map_err(|_| "应为整数".to_string())
        })?;
        Ok(value.unwrap_or(DEFAULT_ERA_OFFSET))
    }

    async fn get_allowed_extensions(&self) -> ImportResult<Vec<String>> {
        let value = self.read_parsed(config_keys::ALLOWED_EXTENSIONS, parse_extension_list)?;
        Ok(value.unwrap_or_else(|| {
            DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect()
        }))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const EXPECTED_COLUMNS: &str = "import.expected_columns";
    pub const ERA_OFFSET: &str = "import.era_offset";
    pub const ALLOWED_EXTENSIONS: &str = "import.allowed_extensions";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_table_empty() {
        let manager = create_manager();
        assert_eq!(manager.get_expected_column_count().await.unwrap(), 29);
        assert_eq!(manager.get_era_offset().await.unwrap(), 543);
        assert_eq!(
            manager.get_allowed_extensions().await.unwrap(),
            vec!["xlsx", "csv"]
        );
    }

    #[tokio::test]
    async fn test_overrides_are_honoured() {
        let manager = create_manager();
        manager
            .set_global_config_value(config_keys::EXPECTED_COLUMNS, "30")
            .unwrap();
        manager
            .set_global_config_value(config_keys::ALLOWED_EXTENSIONS, " .XLSX, csv ,, ods")
            .unwrap();

        assert_eq!(manager.get_expected_column_count().await.unwrap(), 30);
        assert_eq!(
            manager.get_allowed_extensions().await.unwrap(),
            vec!["xlsx", "csv", "ods"]
        );
    }

    #[tokio::test]
    async fn test_malformed_value_is_config_error() {
        let manager = create_manager();
        manager
            .set_global_config_value(config_keys::ERA_OFFSET, "five hundred")
            .unwrap();
        manager
            .set_global_config_value(config_keys::EXPECTED_COLUMNS, "0")
            .unwrap();

        assert!(matches!(
            manager.get_era_offset().await,
            Err(ImportError::ConfigValueError { .. })
        ));
        assert!(matches!(
            manager.get_expected_column_count().await,
            Err(ImportError::ConfigValueError { .. })
        ));
    }

    #[test]
    fn test_upsert_overwrites() {
        let manager = create_manager();
        manager.set_global_config_value("k", "1").unwrap();
        manager.set_global_config_value("k", "2").unwrap();
        assert_eq!(
            manager.get_global_config_value("k").unwrap(),
            Some("2".to_string())
        );
    }
}
