//! 表单状态管理模块
//!
//! 将零散的 signal 整合为 `FormState` 结构体，负责：
//! - 数据的持有
//! - 数据的重置
//! - 数据到请求对象的转换

use admirror_shared::Role;
use admirror_shared::protocol::CreateUserRequest;
use leptos::prelude::*;

/// 新建用户表单
///
/// 使用 `RwSignal` 因为它实现了 `Copy`，可以直接作为 Props 传递。
#[derive(Clone, Copy)]
pub struct FormState {
    pub full_name: RwSignal<String>,
    pub email: RwSignal<String>,
    pub password: RwSignal<String>,
    pub role: RwSignal<Role>,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            full_name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
            role: RwSignal::new(Role::User),
        }
    }

    /// 重置表单到初始状态
    pub fn reset(&self) {
        self.full_name.set(String::new());
        self.email.set(String::new());
        self.password.set(String::new());
        self.role.set(Role::User);
    }

    /// 将表单状态转换为 API 请求对象，邮箱和姓名去掉首尾空白
    pub fn to_request(&self) -> CreateUserRequest {
        CreateUserRequest {
            full_name: self.full_name.get().trim().to_string(),
            email: self.email.get().trim().to_string(),
            password: self.password.get(),
            role: self.role.get(),
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}
