//! AdMirror 共享核心
//!
//! 与平台无关的部分都放在这里，便于在原生环境下测试：
//! - `request`: HTTP 传输抽象
//! - `client`: 带拦截器的 API 客户端
//! - `protocol`: 后端端点定义
//! - `session`: 会话（token / role）存储
//! - `route`: 路由表与角色守卫

use serde::{Deserialize, Deserializer, Serialize};

pub mod client;
pub mod date;
pub mod error;
pub mod image;
pub mod optimistic;
pub mod protocol;
pub mod request;
pub mod route;
pub mod session;
pub mod settings;

pub use client::{ApiClient, ApiClientBuilder, ClientConfig};
pub use error::{ApiError, ApiResult, ErrorKind};
pub use optimistic::Keyed;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

pub const STORAGE_TOKEN_KEY: &str = "token";
pub const STORAGE_ROLE_KEY: &str = "role";
pub const STORAGE_SETTINGS_KEY: &str = "adm_settings";

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 角色声明
///
/// 仅用于前端选择视图树，不承担任何鉴权职责。
/// 除 `"admin"` 以外的任何值都视为普通用户。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn from_claim(claim: &str) -> Self {
        if claim == "admin" {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl From<String> for Role {
    fn from(claim: String) -> Self {
        Role::from_claim(&claim)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Instagram,
    Facebook,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Instagram, Platform::Facebook];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
        }
    }

    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("facebook") {
            Platform::Facebook
        } else {
            Platform::Instagram
        }
    }
}

/// 后端的 id 有时是 UUID 字符串，有时是整数，统一转成字符串。
fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

fn de_opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "de_id")] String);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|w| w.0))
}

/// 后端偶尔会把文本字段置为 null
fn de_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// 列表端点在没有数据时返回 `{"message": ...}` 而不是空数组。
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Items(Vec<T>),
    Empty { message: String },
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Items(items) => items,
            Listing::Empty { .. } => Vec::new(),
        }
    }
}

/// 广告（只读投影）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ad {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default, deserialize_with = "de_text")]
    pub text: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_ads: u64,
    #[serde(default)]
    pub analyzed_ads: u64,
    #[serde(default)]
    pub generated_ads: u64,
}

/// 最新生成的广告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestAd {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub ad_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub platform: Option<Platform>,
}

impl LatestAd {
    /// 未显式给出平台时，按图片地址或文案中是否提到 facebook 推断
    pub fn platform(&self) -> Platform {
        if let Some(platform) = self.platform {
            return platform;
        }
        let mentions = |s: &Option<String>| {
            s.as_deref()
                .is_some_and(|v| v.to_lowercase().contains("facebook"))
        };
        if mentions(&self.image) || mentions(&self.text) {
            Platform::Facebook
        } else {
            Platform::Instagram
        }
    }
}

/// `/ads-library/latest` 在没有广告时返回 `{"message": ...}`
///
/// `LatestAd` 的字段都是可选的，因此 `Empty` 必须排在前面匹配。
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LatestAdResponse {
    Empty { message: String },
    Ad(LatestAd),
}

impl LatestAdResponse {
    pub fn into_option(self) -> Option<LatestAd> {
        match self {
            LatestAdResponse::Ad(ad) => Some(ad),
            LatestAdResponse::Empty { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextAnalysis {
    #[serde(default)]
    pub analysis: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageAnalysis {
    #[serde(default)]
    pub visual_analysis: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResult {
    /// 分析结果自身的 id；同一广告可能被分析多次
    #[serde(default, deserialize_with = "de_opt_id")]
    pub result_id: Option<String>,
    #[serde(deserialize_with = "de_id")]
    pub ad_id: String,
    #[serde(default, deserialize_with = "de_text")]
    pub text: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub text_analysis: Option<TextAnalysis>,
    #[serde(default)]
    pub image_analysis: Option<ImageAnalysis>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl AnalyticsResult {
    /// 列表渲染用的 key，缺少 `result_id` 时退回广告 id
    pub fn key(&self) -> &str {
        self.result_id.as_deref().unwrap_or(&self.ad_id)
    }
}

/// 当前用户生成的广告（`/ads-library/user`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAd {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default, deserialize_with = "de_text")]
    pub ad_text: String,
    #[serde(default)]
    pub design_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub joined: Option<String>,
    #[serde(default)]
    pub total_ads: u64,
    #[serde(default)]
    pub role: Role,
}

/// 用户行（只读投影）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRow {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl UserRow {
    /// 按关键字（邮箱或姓名，不区分大小写）和角色过滤
    pub fn matches(&self, query: &str, role: Option<Role>) -> bool {
        let haystack = format!(
            "{} {}",
            self.email,
            self.full_name.as_deref().unwrap_or_default()
        )
        .to_lowercase();
        haystack.contains(&query.to_lowercase()) && role.is_none_or(|r| r == self.role)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeneratedAd {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_claims_other_than_admin_are_user() {
        assert_eq!(Role::from_claim("admin"), Role::Admin);
        assert_eq!(Role::from_claim("user"), Role::User);
        assert_eq!(Role::from_claim("editor"), Role::User);
        assert_eq!(Role::from_claim("ADMIN"), Role::User);

        let role: Role = serde_json::from_str("\"moderator\"").unwrap();
        assert_eq!(role, Role::User);
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }

    #[test]
    fn listing_accepts_message_object_as_empty() {
        let empty: Listing<Ad> = serde_json::from_str(r#"{"message":"no ads yet"}"#).unwrap();
        assert!(empty.into_vec().is_empty());

        let items: Listing<Ad> = serde_json::from_str(
            r#"[{"id":"a1","text":"hi","image_url":"/static/x.png","score":7.5,"created_at":"2024-05-01T10:00:00"}]"#,
        )
        .unwrap();
        let items = items.into_vec();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "a1");
        assert_eq!(items[0].score, Some(7.5));
    }

    #[test]
    fn numeric_ids_become_strings() {
        let ad: UserAd =
            serde_json::from_str(r#"{"id":42,"ad_text":"x","design_url":null,"created_at":null}"#)
                .unwrap();
        assert_eq!(ad.id, "42");
    }

    #[test]
    fn latest_ad_platform_is_inferred() {
        let ad: LatestAd = serde_json::from_str(
            r#"{"text":"Big sale on Facebook","image":"http://x/y.png","score":8,"ad_id":"9"}"#,
        )
        .unwrap();
        assert_eq!(ad.platform(), Platform::Facebook);
        assert_eq!(ad.ad_id.as_deref(), Some("9"));

        let resp: LatestAdResponse = serde_json::from_str(r#"{"message":"none"}"#).unwrap();
        assert!(resp.into_option().is_none());
    }

    #[test]
    fn analytics_rows_of_the_same_ad_keep_distinct_result_ids() {
        let rows: Vec<AnalyticsResult> = serde_json::from_str(
            r#"[
                {"result_id":"r1","ad_id":"7","text":"Sale","image_url":null,"score":6,
                 "text_analysis":{"analysis":"ok"},"image_analysis":{},"created_at":"2024-05-01T10:00:00"},
                {"result_id":"r2","ad_id":"7","text":"Sale","image_url":null,"score":8,
                 "text_analysis":{},"image_analysis":{"visual_analysis":"bright"},"created_at":"2024-05-02T10:00:00"}
            ]"#,
        )
        .unwrap();
        assert_eq!(rows[0].ad_id, rows[1].ad_id);
        assert_eq!(rows[0].key(), "r1");
        assert_eq!(rows[1].key(), "r2");
        assert_eq!(rows[1].score, Some(8.0));

        let legacy: AnalyticsResult = serde_json::from_str(r#"{"ad_id":12,"text":null}"#).unwrap();
        assert_eq!(legacy.result_id, None);
        assert_eq!(legacy.key(), "12");
    }

    #[test]
    fn user_row_filter_by_query_and_role() {
        let row = UserRow {
            id: "u1".into(),
            email: "Sara@example.com".into(),
            full_name: Some("Sara Ali".into()),
            role: Role::Admin,
            is_active: true,
            created_at: None,
        };
        assert!(row.matches("sara", None));
        assert!(row.matches("ali", Some(Role::Admin)));
        assert!(!row.matches("ali", Some(Role::User)));
        assert!(!row.matches("omar", None));
    }
}
