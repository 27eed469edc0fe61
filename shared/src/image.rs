//! 广告图片地址归一化
//!
//! 后端返回的图片引用有三种形式：
//! - 以 `/` 开头的静态路径：拼接 base URL
//! - `file://` 本地路径：取最后一个 `\` 或 `/` 之后的文件名，
//!   改写为 `<base>/static/generated/<文件名>`
//! - 其余视为已是绝对地址，原样返回

const FILE_SCHEME: &str = "file://";
const GENERATED_PREFIX: &str = "/static/generated/";

/// 归一化图片引用，空值返回空字符串
pub fn normalize_image(base_url: &str, raw: Option<&str>) -> String {
    let Some(url) = raw.map(str::trim).filter(|u| !u.is_empty()) else {
        return String::new();
    };
    let base = base_url.trim_end_matches('/');

    if url.starts_with('/') {
        return format!("{}{}", base, url);
    }

    if has_file_scheme(url) {
        let file_name = url.rsplit(['\\', '/']).next().unwrap_or_default();
        return format!("{}{}{}", base, GENERATED_PREFIX, file_name);
    }

    url.to_string()
}

fn has_file_scheme(url: &str) -> bool {
    url.get(..FILE_SCHEME.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(FILE_SCHEME))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://127.0.0.1:8000";

    #[test]
    fn root_relative_paths_get_the_base() {
        assert_eq!(
            normalize_image(BASE, Some("/static/x.png")),
            "http://127.0.0.1:8000/static/x.png"
        );
    }

    #[test]
    fn windows_file_paths_are_remapped() {
        assert_eq!(
            normalize_image(BASE, Some("file://C:\\Users\\a\\b.png")),
            "http://127.0.0.1:8000/static/generated/b.png"
        );
    }

    #[test]
    fn unix_file_paths_and_scheme_case() {
        assert_eq!(
            normalize_image(BASE, Some("FILE:///home/app/out/ad_17.png")),
            "http://127.0.0.1:8000/static/generated/ad_17.png"
        );
        assert_eq!(
            normalize_image(BASE, Some("file://C:\\gen/mixed\\c.jpg")),
            "http://127.0.0.1:8000/static/generated/c.jpg"
        );
    }

    #[test]
    fn absolute_urls_pass_through() {
        assert_eq!(
            normalize_image(BASE, Some("https://cdn.example.com/x.png")),
            "https://cdn.example.com/x.png"
        );
    }

    #[test]
    fn empty_and_missing_are_empty() {
        assert_eq!(normalize_image(BASE, Some("")), "");
        assert_eq!(normalize_image(BASE, Some("   ")), "");
        assert_eq!(normalize_image(BASE, None), "");
    }

    #[test]
    fn surrounding_whitespace_and_trailing_base_slash() {
        assert_eq!(
            normalize_image("http://api.local/", Some("  /static/y.png ")),
            "http://api.local/static/y.png"
        );
    }
}
