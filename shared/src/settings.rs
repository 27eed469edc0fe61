//! 生成器设置
//!
//! 只保存在浏览器本地（`adm_settings`），不会发送给后端。

use serde::{Deserialize, Serialize};

use crate::STORAGE_SETTINGS_KEY;
use crate::session::KeyValueStore;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

/// (值, 显示名)
pub const MODELS: [(&str, &str); 3] = [
    ("gpt-4o", "GPT-4o (High Quality)"),
    ("gpt-4o-mini", "GPT-4o-mini (Fast & Economical)"),
    ("gpt-4-turbo", "GPT-4-Turbo"),
];
pub const IMAGE_SIZES: [(&str, &str); 3] = [
    ("512x512", "512 × 512"),
    ("768x768", "768 × 768"),
    ("1024x1024", "1024 × 1024"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorSettings {
    pub openai_key: String,
    pub model: String,
    pub image_size: String,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            openai_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            image_size: DEFAULT_IMAGE_SIZE.to_string(),
        }
    }
}

impl GeneratorSettings {
    /// 读取设置，缺失或损坏时回退到默认值；空字段同样回退
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        let Some(raw) = store.get(STORAGE_SETTINGS_KEY) else {
            return Self::default();
        };

        match serde_json::from_str::<Self>(&raw) {
            Ok(mut settings) => {
                if settings.model.is_empty() {
                    settings.model = DEFAULT_MODEL.to_string();
                }
                if settings.image_size.is_empty() {
                    settings.image_size = DEFAULT_IMAGE_SIZE.to_string();
                }
                settings
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored settings are unreadable, using defaults");
                Self::default()
            }
        }
    }

    pub fn save<S: KeyValueStore>(&self, store: &S) -> bool {
        match serde_json::to_string(self) {
            Ok(json) => store.set(STORAGE_SETTINGS_KEY, &json),
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize settings");
                false
            }
        }
    }
}
