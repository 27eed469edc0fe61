//! 客户端工厂
//!
//! 所有页面都通过 [`client`] 取得同一种配置的客户端：
//! token 每次请求时从 LocalStorage 读取；收到 401 时丢弃 token 并整页跳转到登录页
//! （已在登录页时不再跳转，保留登录失败提示）。

use admirror_shared::image::normalize_image;
use admirror_shared::route::{AppRoute, forces_login_reload};
use admirror_shared::ApiClient;

use crate::auth::session_store;
use crate::config::client_config;
use crate::web::FetchTransport;
use crate::web::router::{current_path, hard_navigate};

pub type Client = ApiClient<FetchTransport>;

pub fn client() -> Client {
    ApiClient::builder(client_config(), FetchTransport)
        .token_source(|| session_store().token())
        .on_unauthorized(|| {
            session_store().expire();
            if forces_login_reload(&current_path()) {
                hard_navigate(AppRoute::Login.to_path());
            }
        })
        .build()
}

/// 把后端返回的图片引用转换为可直接显示的地址
pub fn image_src(raw: Option<&str>) -> String {
    normalize_image(client_config().base_url(), raw)
}
