use config::{Config, Environment, File, FileFormat};
use stochboard_core::config::{AppConfig, ConfigError};
use thiserror::Error;

/// 覆盖配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "STOCHBOARD_CONFIG";
/// 环境变量前缀，层级以 `__` 分隔，例如 `STOCHBOARD__SERVER__PORT`
const ENV_PREFIX: &str = "STOCHBOARD";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}

/// # Summary
/// 按层级加载配置：内置默认值 < `config/default.toml` < `STOCHBOARD_CONFIG` 指向的文件 < 环境变量。
///
/// # Returns
/// 反序列化并通过校验的 `AppConfig`。
pub fn load() -> Result<AppConfig, SettingsError> {
    let override_path = std::env::var(CONFIG_PATH_ENV).ok();
    load_from(override_path.as_deref(), env_source())
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("market.pairs")
        .try_parsing(true)
}

/// # Logic
/// 1. 可选读取工作目录下的 `config/default.toml`。
/// 2. 若给出覆盖路径则必须存在。
/// 3. 叠加环境变量后反序列化，缺失字段由 `serde(default)` 补齐。
/// 4. 执行 `AppConfig::validate`。
fn load_from(override_path: Option<&str>, env: Environment) -> Result<AppConfig, SettingsError> {
    let mut builder = Config::builder()
        .add_source(File::new("config/default", FileFormat::Toml).required(false));
    if let Some(path) = override_path {
        builder = builder.add_source(File::new(path, FileFormat::Toml).required(true));
    }
    let config: AppConfig = builder.add_source(env).build()?.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
