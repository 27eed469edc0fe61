//! API 客户端
//!
//! 所有页面共用的唯一客户端工厂：固定 base URL、默认 JSON 内容类型，
//! 以及一对请求 / 响应拦截器。
//!
//! - 请求拦截器：发送前通过注入的 token 访问器读取 token，
//!   存在则附加 `Authorization: Bearer <token>`。
//! - 响应拦截器：2xx 原样通过；状态码恰好为 401 时调用注入的
//!   `on_unauthorized` 钩子（清除 token 并强制跳转登录页），
//!   然后把原错误继续返回给调用方。

use std::rc::Rc;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::{ApiError, ApiResult};
use crate::protocol::{ApiRequest, RequestBody};
use crate::request::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::{
    CONTENT_TYPE_FORM, CONTENT_TYPE_JSON, DEFAULT_API_BASE, HEADER_AUTHORIZATION,
    HEADER_CONTENT_TYPE,
};

// =========================================================
// 客户端配置
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// 部署时的覆盖值为空则使用默认地址
    pub fn from_override(base_url: Option<&str>) -> Self {
        match base_url.map(str::trim) {
            Some(url) if !url.is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

// =========================================================
// 客户端
// =========================================================

type TokenSource = Rc<dyn Fn() -> Option<String>>;
type UnauthorizedHook = Rc<dyn Fn()>;

pub struct ApiClient<T> {
    config: ClientConfig,
    transport: T,
    token_source: TokenSource,
    on_unauthorized: UnauthorizedHook,
}

impl<T: Clone> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            transport: self.transport.clone(),
            token_source: Rc::clone(&self.token_source),
            on_unauthorized: Rc::clone(&self.on_unauthorized),
        }
    }
}

/// 客户端构建器
pub struct ApiClientBuilder<T> {
    config: ClientConfig,
    transport: T,
    token_source: Option<TokenSource>,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl<T: HttpTransport> ApiClientBuilder<T> {
    /// 每次发送请求前调用，返回当前 token
    pub fn token_source(mut self, source: impl Fn() -> Option<String> + 'static) -> Self {
        self.token_source = Some(Rc::new(source));
        self
    }

    /// 收到 401 时调用
    pub fn on_unauthorized(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_unauthorized = Some(Rc::new(hook));
        self
    }

    pub fn build(self) -> ApiClient<T> {
        ApiClient {
            config: self.config,
            transport: self.transport,
            token_source: self.token_source.unwrap_or_else(|| Rc::new(|| None)),
            on_unauthorized: self.on_unauthorized.unwrap_or_else(|| Rc::new(|| {})),
        }
    }
}

impl<T: HttpTransport> ApiClient<T> {
    pub fn builder(config: ClientConfig, transport: T) -> ApiClientBuilder<T> {
        ApiClientBuilder {
            config,
            transport,
            token_source: None,
            on_unauthorized: None,
        }
    }

    /// 发送类型化的端点请求
    pub async fn send<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let body = req.body()?;
        self.request(R::METHOD, &req.path(), body, &[]).await
    }

    pub async fn get<O: DeserializeOwned>(&self, path: &str) -> ApiResult<O> {
        self.request(HttpMethod::Get, path, None, &[]).await
    }

    pub async fn post<B, O>(&self, path: &str, body: Option<&B>) -> ApiResult<O>
    where
        B: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let body = body
            .map(|b| serde_json::to_string(b).map(RequestBody::Json))
            .transpose()
            .map_err(|e| ApiError::Encode(e.to_string()))?;
        self.request(HttpMethod::Post, path, body, &[]).await
    }

    pub async fn delete<O: DeserializeOwned>(&self, path: &str) -> ApiResult<O> {
        self.request(HttpMethod::Delete, path, None, &[]).await
    }

    /// 通用请求入口：路径相对于 base URL，可选请求体与请求头覆盖
    pub async fn request<O: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<RequestBody>,
        headers: &[(&str, &str)],
    ) -> ApiResult<O> {
        let req = self.prepare(method, path, body, headers);
        let resp = self.execute(req).await?;
        resp.json()
    }

    fn prepare(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<RequestBody>,
        headers: &[(&str, &str)],
    ) -> HttpRequest {
        let mut req = HttpRequest::new(&self.config.url(path), method)
            .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON);

        match body {
            Some(RequestBody::Json(json)) => req.body = Some(json),
            Some(RequestBody::Form(form)) => {
                req.set_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_FORM);
                req.body = Some(form);
            }
            None => {}
        }

        for (key, value) in headers {
            req.set_header(key, value);
        }

        req
    }

    async fn execute(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let req = self.intercept_request(req);
        tracing::debug!(method = req.method.as_str(), url = %req.url, "sending request");
        let result = self.transport.send(req).await;
        self.intercept_response(result)
    }

    /// 请求拦截器
    fn intercept_request(&self, mut req: HttpRequest) -> HttpRequest {
        if let Some(token) = (self.token_source)() {
            req.set_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }
        req
    }

    /// 响应拦截器
    fn intercept_response(&self, result: ApiResult<HttpResponse>) -> ApiResult<HttpResponse> {
        let err = match result {
            Ok(resp) if resp.ok() => return Ok(resp),
            Ok(resp) => ApiError::from_response(resp.status, &resp.body),
            Err(e) => e,
        };

        if err.is_unauthorized() {
            tracing::warn!("received 401, clearing session and forcing login");
            (self.on_unauthorized)();
        } else {
            tracing::debug!(error = %err, "request failed");
        }

        Err(err)
    }
}

#[cfg(test)]
mod tests;
