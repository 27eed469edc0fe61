//! HTTP 传输层
//!
//! 使用 `web_sys::fetch` 实现 [`HttpTransport`]，替代 `gloo-net`。
//! 非 2xx 状态码照常返回响应，由客户端的响应拦截器处理。

use admirror_shared::request::{HttpRequest, HttpResponse, HttpTransport};
use admirror_shared::{ApiError, ApiResult};
use async_trait::async_trait;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

fn js_err(context: &str, e: JsValue) -> ApiError {
    ApiError::Network(format!("{}: {:?}", context, e))
}

/// 浏览器 fetch 传输
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl FetchTransport {
    fn build_request(req: &HttpRequest) -> ApiResult<Request> {
        let headers = Headers::new().map_err(|e| js_err("创建 Headers 失败", e))?;

        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| js_err("设置 Header 失败", e))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        Request::new_with_str_and_init(&req.url, &opts).map_err(|e| js_err("请求构建失败", e))
    }

    async fn read_text(resp: &Response) -> ApiResult<String> {
        let promise = resp.text().map_err(|e| js_err("读取响应失败", e))?;

        let text = JsFuture::from(promise)
            .await
            .map_err(|e| js_err("读取响应失败", e))?;

        text.as_string()
            .ok_or_else(|| ApiError::Network("响应体无法转换为字符串".to_string()))
    }
}

#[async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let request = Self::build_request(&req)?;

        let window =
            web_sys::window().ok_or_else(|| ApiError::Network("无法获取 window 对象".into()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| js_err("网络错误", e))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| js_err("Response 类型转换失败", e))?;

        let status = response.status();
        let body = Self::read_text(&response).await?;

        Ok(HttpResponse { status, body })
    }
}
