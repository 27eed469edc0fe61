//! 日志初始化
//!
//! `tracing-subscriber` 的 fmt 层把每条格式化后的日志写到浏览器控制台。
//! wasm32 上没有可用的系统时钟，因此关闭时间戳。

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;
use web_sys::console;

/// 缓冲一条日志，drop 时按级别写入对应的 console 方法
pub struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end();
        if line.is_empty() {
            return;
        }

        let msg = JsValue::from_str(line);
        match self.level {
            Level::ERROR => console::error_1(&msg),
            Level::WARN => console::warn_1(&msg),
            Level::INFO => console::info_1(&msg),
            _ => console::log_1(&msg),
        }
    }
}

#[derive(Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: Level::INFO,
            buf: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buf: Vec::new(),
        }
    }
}

/// 安装全局 subscriber，重复调用只会打印一条警告
pub fn init() {
    let max_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let result = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_max_level(max_level)
        .with_ansi(false)
        .without_time()
        .try_init();

    if let Err(e) = result {
        console::warn_1(&JsValue::from_str(&format!(
            "logging already initialised: {}",
            e
        )));
    }
}
