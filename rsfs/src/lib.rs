//! # rsfs
//!
//! 驻留内存的扁平命名空间文件系统：定长数据块、索引节点、单一目录与有界的打开文件表，
//! 可被多个线程同时调用。

#![no_std]

extern crate alloc;

/* rsfs 的整体架构，自上而下 */

// 文件服务层：创建、打开、读写、定位、关闭、删除与状态报告
mod fs;

// 打开文件表：描述符到访问模式与读写位置的绑定
mod fd_table;

// 目录层：按插入顺序排列的文件名到 inode 编号的绑定
mod directory;

// 索引节点表：inode 位图与 inode 记录
mod inode_table;

// 数据块层：定长缓冲区与数据块位图
mod block_store;

// 内存数据结构层
mod layout;

// 状态报告
mod report;

pub use self::{
    fs::{Fd, RsFileSystem},
    report::Report,
};
pub use vfs::{AccessMode, DirEntry, Error, OpenFlag, Result, Stat, Usage, Whence};

/// 数据块大小（字节）
pub const BLOCK_SIZE: usize = 512;
/// 数据块总数
pub const NUM_BLOCKS: usize = 128;
/// inode 总数
pub const NUM_INODES: usize = 32;
/// 每个 inode 可记录的块编号个数
pub const NUM_POINTER: usize = 10;
/// 打开文件表的槽位数
pub const NUM_OPEN_FILES: usize = 16;
/// 单个文件的容量上限
pub const MAX_FILE_SIZE: usize = NUM_POINTER * BLOCK_SIZE;

type DataBlock = [u8; BLOCK_SIZE];
