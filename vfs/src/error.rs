use derive_more::Display;

/// 文件服务操作的失败原因。
///
/// 读写不足量（到达文件尾或容量上限）不算错误，而是以返回的字节数体现。
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[display(fmt = "file already exists")]
    AlreadyExists,
    #[display(fmt = "no such file")]
    NotFound,
    /// 索引节点或数据块耗尽
    #[display(fmt = "out of inodes or data blocks")]
    AllocationFailed,
    /// 打开文件表没有空闲槽位
    #[display(fmt = "open file table is full")]
    TableFull,
    /// 非法的描述符、长度、打开模式或定位基准
    #[display(fmt = "invalid argument")]
    InvalidArgument,
}

impl core::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
