use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::request::HttpMethod;
use crate::{
    Ad, AnalyticsResult, DashboardStats, GeneratedAd, LatestAdResponse, Listing, LoginResponse,
    Platform, Role, UserAd, UserRow, UserStats,
};

/// 请求体编码
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// `application/json`
    Json(String),
    /// `application/x-www-form-urlencoded`
    Form(String),
}

/// 定义 API 端点的请求-响应关系及元数据
pub trait ApiRequest {
    /// 该请求返回的响应类型
    type Response: DeserializeOwned;
    /// HTTP 方法
    const METHOD: HttpMethod;
    /// 相对于 base URL 的路径
    fn path(&self) -> String;
    /// 请求体，默认没有
    fn body(&self) -> ApiResult<Option<RequestBody>> {
        Ok(None)
    }
}

fn json_body<T: Serialize>(value: &T) -> ApiResult<Option<RequestBody>> {
    serde_json::to_string(value)
        .map(|s| Some(RequestBody::Json(s)))
        .map_err(|e| ApiError::Encode(e.to_string()))
}

fn form_body(pairs: &[(&str, &str)]) -> RequestBody {
    let encoded = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    RequestBody::Form(encoded)
}

/// 删除类端点的响应内容不重要（204 或 `{"message": ...}`）
pub type Ack = Value;

// =========================================================
// 用户相关 (/users)
// =========================================================

/// 登录，表单编码的 username / password
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/users/login".to_string()
    }

    fn body(&self) -> ApiResult<Option<RequestBody>> {
        Ok(Some(form_body(&[
            ("username", &self.username),
            ("password", &self.password),
        ])))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetUserStats;

impl ApiRequest for GetUserStats {
    type Response = UserStats;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/users/stats".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListUsers;

impl ApiRequest for ListUsers {
    type Response = Vec<UserRow>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/users/all".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateUserRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl ApiRequest for CreateUserRequest {
    type Response = UserRow;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/users/create".to_string()
    }

    fn body(&self) -> ApiResult<Option<RequestBody>> {
        json_body(self)
    }
}

#[derive(Debug, Clone)]
pub struct DeleteUser {
    pub id: String,
}

impl ApiRequest for DeleteUser {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/users/{}", urlencoding::encode(&self.id))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListMyAds;

impl ApiRequest for ListMyAds {
    type Response = Vec<Ad>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/users/my-ads".to_string()
    }
}

// =========================================================
// 广告库 (/ads-library)
// =========================================================

#[derive(Debug, Clone, Copy)]
pub struct GetAdStats;

impl ApiRequest for GetAdStats {
    type Response = DashboardStats;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/ads-library/stats".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetLatestAd;

impl ApiRequest for GetLatestAd {
    type Response = LatestAdResponse;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/ads-library/latest".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListAds;

impl ApiRequest for ListAds {
    type Response = Listing<Ad>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/ads-library/all".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListAnalytics;

impl ApiRequest for ListAnalytics {
    type Response = Vec<AnalyticsResult>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/ads-library/analytics/all".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListUserAds;

impl ApiRequest for ListUserAds {
    type Response = Vec<UserAd>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/ads-library/user".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct DeleteAd {
    pub id: String,
}

impl ApiRequest for DeleteAd {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/ads-library/delete/{}", urlencoding::encode(&self.id))
    }
}

/// 生成广告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateAdRequest {
    pub text: String,
    pub platform: Platform,
}

impl ApiRequest for GenerateAdRequest {
    type Response = GeneratedAd;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/ads-library/generate-enhanced".to_string()
    }

    fn body(&self) -> ApiResult<Option<RequestBody>> {
        json_body(self)
    }
}
