use alloc::vec::Vec;
use core::fmt;

use crate::{DirEntry, Usage};

/// 文件系统的状态报告：按创建顺序列出文件，并汇总各类资源的占用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub files: Vec<DirEntry>,
    pub blocks: Usage,
    pub inodes: Usage,
    pub open_files: Usage,
}

impl Report {
    pub fn file(&self, name: &str) -> Option<&DirEntry> {
        self.files.iter().find(|file| file.name == name)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Current status of the file system:")?;
        writeln!(f)?;
        writeln!(f, " {:>16}{:>10}{:>10}", "File Name", "Length", "iNode #")?;
        for file in &self.files {
            writeln!(f, "{:>16}{:>10}{:>10}", file.name, file.size, file.inode)?;
        }
        writeln!(f)?;

        let Usage { used, total } = self.blocks;
        writeln!(
            f,
            "Total Data Blocks: {total:4},  Used: {used},  Unused: {}",
            self.blocks.free()
        )?;
        let Usage { used, total } = self.inodes;
        writeln!(
            f,
            "Total iNode Blocks: {total:3},  Used: {used},  Unused: {}",
            self.inodes.free()
        )?;
        writeln!(f, "Total Opened Files: {:3}", self.open_files.used)
    }
}
