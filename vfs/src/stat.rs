/// 打开文件的元信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    /// Inode number
    pub inode: u32,
    /// Optimal I/O block size
    pub block_size: u64,
    /// Occupying blocks
    pub blocks: u64,
    /// File size
    pub size: u64,
}

/// 某类资源的占用情况
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub used: usize,
    pub total: usize,
}

impl Usage {
    #[inline]
    pub fn free(&self) -> usize {
        self.total - self.used
    }
}
