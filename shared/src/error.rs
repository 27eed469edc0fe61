//! 错误类型
//!
//! 网络失败和非 2xx 响应统一表现为 [`ApiError`]，
//! 调用方通过 [`ApiError::kind`] / [`ApiError::status`] 区分。

use serde_json::Value;
use thiserror::Error;

// =========================================================
// 错误分类
// =========================================================

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 请求未能到达后端或没有拿到响应
    Network,
    /// 401: 会话失效，由响应拦截器统一处理
    Unauthorized,
    /// 其他 4xx: 校验失败、资源不存在等
    ClientError,
    /// 5xx: 后端内部错误
    ServerError,
    /// 响应体无法解析
    Decode,
    /// 请求体无法序列化
    Encode,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorKind::Unauthorized,
            500..=599 => ErrorKind::ServerError,
            _ => ErrorKind::ClientError,
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// API 调用错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 网络或传输层错误
    #[error("network error: {0}")]
    Network(String),

    /// 后端返回了非 2xx 状态码
    #[error("backend error: {status}{}", detail_suffix(.detail))]
    Status {
        /// HTTP 状态码
        status: u16,
        /// 后端给出的 `detail`
        detail: Option<String>,
    },

    /// 响应体无法反序列化
    #[error("invalid response format: {0}")]
    Decode(String),

    /// 请求体无法序列化
    #[error("failed to encode request: {0}")]
    Encode(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(" - {}", d))
        .unwrap_or_default()
}

impl ApiError {
    /// 根据失败响应构造错误，尽量提取 FastAPI 风格的 `{"detail": ...}`
    pub fn from_response(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            detail: extract_detail(body),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Status { status, .. } => ErrorKind::from_status(*status),
            ApiError::Decode(_) => ErrorKind::Decode,
            ApiError::Encode(_) => ErrorKind::Encode,
        }
    }

    /// HTTP 状态码（网络、编解码错误没有状态码）
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// 给界面用的提示：优先使用后端的 detail，否则使用页面自己的兜底文案
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

fn extract_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        },
        Ok(Value::String(s)) => Some(s),
        Ok(_) => None,
        Err(_) => Some(body.to_string()),
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_kinds() {
        assert_eq!(ErrorKind::from_status(401), ErrorKind::Unauthorized);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::ClientError);
        assert_eq!(ErrorKind::from_status(422), ErrorKind::ClientError);
        assert_eq!(ErrorKind::from_status(500), ErrorKind::ServerError);
        assert_eq!(ErrorKind::from_status(503), ErrorKind::ServerError);
        assert_eq!(ApiError::Network("offline".into()).kind(), ErrorKind::Network);
    }

    #[test]
    fn detail_is_taken_from_fastapi_payload() {
        let err = ApiError::from_response(409, r#"{"detail":"Email already exists"}"#);
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.detail(), Some("Email already exists"));
        assert_eq!(err.user_message("failed"), "Email already exists");
        assert_eq!(err.to_string(), "backend error: 409 - Email already exists");
    }

    #[test]
    fn structured_detail_is_rendered_compactly() {
        let err = ApiError::from_response(422, r#"{"detail":[{"loc":["body","text"]}]}"#);
        assert_eq!(err.detail(), Some(r#"[{"loc":["body","text"]}]"#));
    }

    #[test]
    fn plain_text_and_empty_bodies() {
        let err = ApiError::from_response(502, "Bad Gateway");
        assert_eq!(err.detail(), Some("Bad Gateway"));
        assert_eq!(err.kind(), ErrorKind::ServerError);

        let err = ApiError::from_response(500, "");
        assert_eq!(err.detail(), None);
        assert_eq!(err.user_message("Something went wrong"), "Something went wrong");
        assert_eq!(err.to_string(), "backend error: 500");
    }

    #[test]
    fn network_errors_have_no_status() {
        let err = ApiError::Network("connection refused".into());
        assert_eq!(err.status(), None);
        assert!(!err.is_unauthorized());
        assert_eq!(err.user_message("Login failed"), "Login failed");
    }
}
