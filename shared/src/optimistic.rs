//! 乐观更新
//!
//! 删除时先从本地列表移除，请求失败再把条目放回原位置。

use crate::{Ad, UserRow};

/// 能按 id 在列表中定位的条目
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Ad {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for UserRow {
    fn key(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Entry<T> {
    index: usize,
    /// 移除时前后最近的保留条目
    prev: Option<String>,
    next: Option<String>,
    item: T,
}

/// 一次已生效、尚未确认的移除
///
/// 同一 id 可能出现在多行（后端按分析结果逐行返回），删除时全部移除。
/// 回滚时优先按移除时的相邻条目定位，相邻条目都不在列表中时退回原下标；
/// 多个删除同时失败时，只有相邻条目仍在列表中的那些能保证顺序。
#[derive(Debug, Clone, PartialEq)]
#[must_use = "a removal must be either committed or rolled back"]
pub struct Removal<T> {
    id: String,
    entries: Vec<Entry<T>>,
}

impl<T: Keyed> Removal<T> {
    /// 从列表中移除所有 `id` 对应的条目，一条都不存在返回 `None`
    pub fn take(list: &mut Vec<T>, id: &str) -> Option<Self> {
        if !list.iter().any(|item| item.key() == id) {
            return None;
        }

        let mut entries = Vec::new();
        let mut pending = Vec::new();
        let mut prev: Option<String> = None;

        for (index, item) in std::mem::take(list).into_iter().enumerate() {
            if item.key() == id {
                pending.push((index, item));
                continue;
            }
            let key = item.key().to_string();
            entries.extend(pending.drain(..).map(|(index, item)| Entry {
                index,
                prev: prev.clone(),
                next: Some(key.clone()),
                item,
            }));
            prev = Some(key);
            list.push(item);
        }
        entries.extend(pending.into_iter().map(|(index, item)| Entry {
            index,
            prev: prev.clone(),
            next: None,
            item,
        }));

        Some(Self {
            id: id.to_string(),
            entries,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// 请求成功，丢弃备份
    pub fn commit(self) -> Vec<T> {
        self.entries.into_iter().map(|entry| entry.item).collect()
    }

    /// 请求失败，逐行放回
    pub fn rollback(self, list: &mut Vec<T>) {
        for entry in self.entries {
            let before_next = entry
                .next
                .as_deref()
                .and_then(|next| list.iter().position(|item| item.key() == next));
            let after_prev = || {
                entry
                    .prev
                    .as_deref()
                    .and_then(|prev| list.iter().rposition(|item| item.key() == prev))
                    .map(|pos| pos + 1)
            };
            let index = before_next
                .or_else(after_prev)
                .unwrap_or_else(|| entry.index.min(list.len()));
            list.insert(index, entry.item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ad(id: &str) -> Ad {
        Ad {
            id: id.to_string(),
            text: format!("ad {}", id),
            image_url: None,
            score: None,
            created_at: None,
        }
    }

    fn ads(ids: &[&str]) -> Vec<Ad> {
        ids.iter().map(|id| ad(id)).collect()
    }

    fn ids(list: &[Ad]) -> Vec<&str> {
        list.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn take_removes_only_that_id() {
        let mut list = ads(&["1", "2", "3"]);
        let removal = Removal::take(&mut list, "2").unwrap();
        assert_eq!(ids(&list), ["1", "3"]);
        assert_eq!(removal.id(), "2");
        assert_eq!(ids(&removal.commit()), ["2"]);
    }

    #[test]
    fn take_removes_every_row_sharing_the_id() {
        let mut list = ads(&["a", "b", "c", "b"]);
        let removal = Removal::take(&mut list, "b").unwrap();
        assert_eq!(ids(&list), ["a", "c"]);
        assert_eq!(ids(&removal.commit()), ["b", "b"]);
    }

    #[test]
    fn rollback_restores_every_repeated_row() {
        let mut list = ads(&["b", "a", "b", "b", "c", "b"]);
        let removal = Removal::take(&mut list, "b").unwrap();
        removal.rollback(&mut list);
        assert_eq!(ids(&list), ["b", "a", "b", "b", "c", "b"]);
    }

    #[test]
    fn rollback_restores_original_position() {
        let mut list = ads(&["1", "2", "3"]);
        let removal = Removal::take(&mut list, "1").unwrap();
        removal.rollback(&mut list);
        assert_eq!(ids(&list), ["1", "2", "3"]);
    }

    #[test]
    fn two_failed_deletes_keep_order_in_either_rollback_order() {
        let mut list = ads(&["a", "b", "c"]);
        let first = Removal::take(&mut list, "a").unwrap();
        let second = Removal::take(&mut list, "b").unwrap();
        first.clone().rollback(&mut list);
        second.clone().rollback(&mut list);
        assert_eq!(ids(&list), ["a", "b", "c"]);

        let mut list = ads(&["a", "b", "c"]);
        let first = Removal::take(&mut list, "a").unwrap();
        let second = Removal::take(&mut list, "b").unwrap();
        second.rollback(&mut list);
        first.rollback(&mut list);
        assert_eq!(ids(&list), ["a", "b", "c"]);
    }

    #[test]
    fn rollback_follows_neighbour_after_list_changes() {
        let mut list = ads(&["1", "2", "3", "4"]);
        let removal = Removal::take(&mut list, "3").unwrap();
        list.insert(0, ad("0"));
        removal.rollback(&mut list);
        assert_eq!(ids(&list), ["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn rollback_into_cleared_list_appends() {
        let mut list = ads(&["1", "2", "3"]);
        let removal = Removal::take(&mut list, "3").unwrap();
        list.clear();
        removal.rollback(&mut list);
        assert_eq!(ids(&list), ["3"]);
    }

    #[test]
    fn unknown_id_is_none() {
        let mut list = ads(&["1"]);
        assert!(Removal::take(&mut list, "9").is_none());
        assert_eq!(list.len(), 1);
    }
}
