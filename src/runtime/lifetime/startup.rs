use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::catalog::{CachedCatalog, ContentCatalog};
use crate::config::AppConfig;
use crate::models::badges::registry::BadgeRegistry;
use crate::services::gamification::GamificationService;
use crate::services::progress::ProgressService;
use crate::services::submissions::SubmissionService;
use crate::services::tasks::TaskService;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, warn};

/// 核心启动上下文
///
/// 宿主（HTTP 层、定时作业等）拿到它之后直接调用各服务。
pub struct CoreContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub badges: Arc<BadgeRegistry>,
    pub progress: Arc<ProgressService>,
    pub gamification: Arc<GamificationService>,
    pub tasks: Arc<TaskService>,
    pub submissions: Arc<SubmissionService>,
}

/// 创建缓存实例
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let config = AppConfig::get();
    let cache_type = &config.cache.cache_type;

    warn!("Attempting to create {} cache backend", cache_type);

    // 根据配置选择缓存后端
    if let Some(constructor) = get_object_cache_plugin(cache_type) {
        match constructor().await {
            Ok(cache) => {
                warn!("Successfully created {} cache backend", cache_type);
                return Ok(Arc::from(cache));
            }
            Err(e) => {
                warn!("Failed to create {} cache: {}", cache_type, e);
            }
        }
    } else {
        warn!("Cache backend '{}' not found in registry", cache_type);
    }

    // 配置的后端不可用时回退到内存缓存
    if cache_type != "moka"
        && let Some(fallback_constructor) = get_object_cache_plugin("moka")
    {
        match fallback_constructor().await {
            Ok(cache) => {
                warn!("Successfully created fallback Moka (in-memory) cache backend");
                return Ok(Arc::from(cache));
            }
            Err(fallback_e) => {
                warn!("Failed to create fallback Moka cache: {}", fallback_e);
            }
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// 加载徽章目录
///
/// 配置了路径就从 JSON 文件加载，否则使用内置默认集；
/// 文件损坏直接放弃启动，静默换成默认集会让线上授错徽章。
fn load_badge_registry() -> Arc<BadgeRegistry> {
    let path = &AppConfig::get().gamification.badge_registry_path;
    let registry = if path.is_empty() {
        debug!("Badge registry path not set, using builtin defaults");
        BadgeRegistry::builtin_defaults()
    } else {
        BadgeRegistry::load(path).expect("Failed to load badge registry")
    };
    warn!("Badge registry loaded with {} definitions", registry.len());
    Arc::new(registry)
}

/// 准备核心启动的上下文
///
/// 内容目录由宿主注入，这里为其套上对象缓存装饰器。
pub async fn prepare_core_startup(catalog: Arc<dyn ContentCatalog>) -> CoreContext {
    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    let badges = load_badge_registry();

    let config = AppConfig::get();
    let catalog: Arc<dyn ContentCatalog> = Arc::new(CachedCatalog::new(
        catalog,
        cache.clone(),
        config.cache.default_ttl,
    ));

    let progress = Arc::new(ProgressService::new(storage.clone(), catalog.clone()));
    let gamification = Arc::new(GamificationService::new(storage.clone(), badges.clone()));
    let tasks = Arc::new(TaskService::new(storage.clone()));
    let submissions = Arc::new(SubmissionService::new(
        storage.clone(),
        catalog,
        progress.clone(),
        gamification.clone(),
        tasks.clone(),
    ));

    CoreContext {
        storage,
        cache,
        badges,
        progress,
        gamification,
        tasks,
        submissions,
    }
}
