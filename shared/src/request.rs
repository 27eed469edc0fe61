use std::collections::BTreeMap;

use crate::error::{ApiError, ApiResult};

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 方法枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// 通用 HTTP 请求结构
///
/// 请求头按名称保存；同名头（大小写不敏感）后写覆盖先写。
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.set_header(key, value);
        self
    }

    pub fn set_header(&mut self, key: &str, value: &str) {
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(key));
        self.headers.insert(key.to_string(), value.to_string());
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 解析 JSON 响应体，空响应体按 `null` 处理
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> ApiResult<T> {
        let body = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// HTTP 传输特性 (Trait)
///
/// 浏览器下的 future 不是 `Send`，因此使用 `async_trait(?Send)`。
/// 只有拿不到响应时才返回错误，非 2xx 状态码照常返回 `HttpResponse`。
#[async_trait::async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse>;
}

// =========================================================
// 测试用实现: reqwest
// =========================================================

#[cfg(test)]
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

#[cfg(test)]
impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &req.url);

        for (k, v) in req.headers {
            builder = builder.header(k, v);
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("reqwest: {}", e)))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("reqwest body: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_names_are_case_insensitive() {
        let mut req = HttpRequest::new("http://x/a", HttpMethod::Get)
            .with_header("Content-Type", "application/json");
        req.set_header("content-type", "application/x-www-form-urlencoded");

        assert_eq!(req.headers.len(), 1);
        assert_eq!(
            req.header("CONTENT-TYPE"),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn empty_body_decodes_as_null() {
        let resp = HttpResponse {
            status: 204,
            body: String::new(),
        };
        assert!(resp.ok());
        let value: serde_json::Value = resp.json().unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let resp = HttpResponse {
            status: 200,
            body: "<html>".into(),
        };
        let err = resp.json::<Vec<String>>().unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
