//! # 目录层
//!
//! 唯一的根目录，按插入顺序保存目录项，文件名区分大小写且互不相同。
//! 所有操作都在同一把锁下进行；[`Directory::lock`] 交出的守卫
//! 让“先查找、再插入或删除”的组合操作全程持锁。

use alloc::vec::Vec;

use spin::{Mutex, MutexGuard};

use crate::layout::DirEntry;

pub struct Directory {
    entries: Mutex<DirEntries>,
}

/// 目录项序列
#[derive(Debug, Default)]
pub struct DirEntries(Vec<DirEntry>);

impl Directory {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(DirEntries::default()),
        }
    }

    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, DirEntries> {
        self.entries.lock()
    }
}

impl DirEntries {
    pub fn search(&self, name: &str) -> Option<&DirEntry> {
        self.0.iter().find(|entry| entry.name() == name)
    }

    /// 在末尾追加新目录项，调用方须先确认没有同名项
    pub fn insert(&mut self, name: &str) -> &mut DirEntry {
        debug_assert!(self.search(name).is_none(), "{name:?} already exists");
        self.0.push(DirEntry::new(name));
        let last = self.0.len() - 1;
        &mut self.0[last]
    }

    /// 摘除目录项，其余目录项保持原有顺序
    pub fn remove(&mut self, name: &str) -> Option<DirEntry> {
        let index = self.0.iter().position(|entry| entry.name() == name)?;
        Some(self.0.remove(index))
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &DirEntry> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(entries: &DirEntries) -> Vec<&str> {
        entries.iter().map(DirEntry::name).collect()
    }

    #[test]
    fn insertion_order() {
        let directory = Directory::new();
        let mut entries = directory.lock();
        entries.insert("b").bind(0);
        entries.insert("a").bind(1);
        entries.insert("c").bind(2);
        assert_eq!(names(&entries), ["b", "a", "c"]);

        assert_eq!(entries.remove("a").map(|entry| entry.inode_id()), Some(1));
        assert_eq!(names(&entries), ["b", "c"]);

        entries.insert("a").bind(1);
        assert_eq!(names(&entries), ["b", "c", "a"]);
    }

    #[test]
    fn exact_match() {
        let directory = Directory::new();
        let mut entries = directory.lock();
        entries.insert("File.txt").bind(3);

        assert!(entries.search("file.txt").is_none());
        assert!(entries.search("File.txt ").is_none());
        assert_eq!(entries.search("File.txt").map(DirEntry::inode_id), Some(3));
        assert!(entries.remove("file.txt").is_none());
    }
}
