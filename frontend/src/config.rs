//! 部署配置
//!
//! 后端地址在构建时通过 `ADMIRROR_API_URL` 覆盖，未设置时使用本地默认地址。

use admirror_shared::ClientConfig;

pub fn client_config() -> ClientConfig {
    ClientConfig::from_override(option_env!("ADMIRROR_API_URL"))
}
