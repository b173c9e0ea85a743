//! # 内存数据结构层
//!
//! 各个存储区共用的记录结构，本身不带锁，由上层决定保护方式。

mod bitmap;
pub use bitmap::Bitmap;

mod inode;
pub use inode::{Inode, InodeHandle};

/// 目录项，由目录层独占
mod dir_entry;
pub use dir_entry::DirEntry;
