use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{MokaCacheWrapper, ObjectCache};
use crate::config::AppConfig;
use crate::errors::{EduError, Result};
use crate::storage::Storage;

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 准备服务器启动的上下文
/// 包括 TLS 提供者、存储（含迁移）和身份缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // 重复安装时返回 Err，可忽略
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let config = AppConfig::get();

    let storage = crate::storage::create_storage(&config.database)
        .await
        .map_err(|e| EduError::database_connection(format!("创建存储失败: {e}")))?;
    warn!("Storage backend initialized and migrations completed");

    let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::new(&config.cache));
    warn!(
        "Moka cache initialized (capacity {}, ttl {}s)",
        config.cache.max_capacity, config.cache.default_ttl
    );

    Ok(StartupContext { storage, cache })
}
