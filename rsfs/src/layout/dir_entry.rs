use alloc::borrow::ToOwned;
use alloc::string::String;

/// 尚未绑定 inode 的目录项所用的编号
pub const UNBOUND: u32 = u32::MAX;

/// 文件名到 inode 编号的绑定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    name: String,
    inode_id: u32,
}

impl DirEntry {
    #[inline]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            inode_id: UNBOUND,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn inode_id(&self) -> u32 {
        self.inode_id
    }

    #[inline]
    pub fn bind(&mut self, inode_id: u32) {
        self.inode_id = inode_id;
    }
}
