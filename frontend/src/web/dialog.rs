//! 浏览器原生对话框
//!
//! 删除确认与阻塞式错误提示。无法获取 window 时 `confirm` 返回 `false`。

pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}
