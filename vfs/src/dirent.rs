use alloc::string::String;

/// 状态报告中的一行：目录项及其文件长度
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    /// File size
    pub size: u64,
    /// Inode number
    pub inode: u32,
}
