use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub gamification: GamificationConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,    // 数据库连接 URL（从 scheme 自动推断类型）
    pub pool_size: u32, // 连接池大小
    pub timeout: u64,   // 连接超时 (秒)
}

/// 缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(rename = "type")]
    pub cache_type: String,
    pub default_ttl: u64,
    pub memory: MemoryConfig,
}

/// 内存缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    pub max_capacity: u64,
}

/// 游戏化配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamificationConfig {
    pub badge_registry_path: String, // 徽章定义文件路径，为空则使用内置默认集
    pub cas_max_retries: u32,        // 乐观锁冲突的最大重试次数
    pub cas_retry_backoff_ms: u64,   // 重试退避上限 (毫秒)，实际值加随机抖动
    pub leaderboard: LeaderboardConfig,
}

/// 排行榜配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings {
                system_name: "learnsystem".to_string(),
                environment: "development".to_string(),
                log_level: "info".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://learnsystem.db?mode=rwc".to_string(),
                pool_size: 10,
                timeout: 10,
            },
            cache: CacheConfig {
                cache_type: "moka".to_string(),
                default_ttl: 300,
                memory: MemoryConfig {
                    max_capacity: 10_000,
                },
            },
            gamification: GamificationConfig {
                badge_registry_path: String::new(),
                cas_max_retries: 5,
                cas_retry_backoff_ms: 20,
                leaderboard: LeaderboardConfig {
                    default_limit: 50,
                    max_limit: 200,
                },
            },
        }
    }
}
