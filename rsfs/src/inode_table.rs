//! # 索引节点表
//!
//! inode 位图与 inode 记录共用一把读写锁。
//! 拷贝文件数据时持有读锁，删除文件时持有写锁，
//! 所以文件的数据块不会在拷贝途中被释放。

use alloc::vec;
use alloc::vec::Vec;

use spin::RwLock;

use crate::block_store::BlockStore;
use crate::layout::{Bitmap, Inode, InodeHandle};
use crate::{Error, Result, Usage};

pub struct InodeTable {
    inner: RwLock<InodeTableInner>,
}

struct InodeTableInner {
    bitmap: Bitmap,
    /// 空闲的 inode 总处于初始状态
    inodes: Vec<Inode>,
}

impl InodeTable {
    pub fn new(count: usize) -> Self {
        Self {
            inner: RwLock::new(InodeTableInner {
                bitmap: Bitmap::new(count),
                inodes: vec![Inode::default(); count],
            }),
        }
    }

    /// 分配编号最小的空闲 inode
    pub fn alloc(&self) -> Option<InodeHandle> {
        let mut inner = self.inner.write();
        let id = inner.bitmap.alloc()?;
        Some(InodeHandle {
            id: id as u32,
            generation: inner.inodes[id].generation(),
        })
    }

    /// 释放 inode 及其持有的全部数据块
    pub fn dealloc(&self, inode_id: u32, blocks: &BlockStore) {
        let mut inner = self.inner.write();
        let id = inode_id as usize;
        assert!(inner.bitmap.is_set(id), "inode {id} is not in use");

        let inode = &mut inner.inodes[id];
        let length = inode.length;
        let data_blocks = inode.clear();
        debug_assert!(data_blocks.len() >= Inode::count_data_block(length));
        for block_id in data_blocks {
            blocks.dealloc(block_id);
        }
        inner.bitmap.dealloc(id);
    }

    /// 为正在使用的 inode 生成句柄
    pub fn handle(&self, inode_id: u32) -> Option<InodeHandle> {
        let inner = self.inner.read();
        let id = inode_id as usize;
        inner.bitmap.is_set(id).then(|| InodeHandle {
            id: inode_id,
            generation: inner.inodes[id].generation(),
        })
    }

    /// 句柄过期时返回空
    pub fn map<V>(&self, handle: InodeHandle, f: impl FnOnce(&Inode) -> V) -> Option<V> {
        self.inner.read().get(handle).map(f)
    }

    pub fn map_mut<V>(&self, handle: InodeHandle, f: impl FnOnce(&mut Inode) -> V) -> Option<V> {
        self.inner.write().get_mut(handle).map(f)
    }

    /// 获取文件第 `block_index` 块的编号，尚未分配时现场分配并绑定。
    ///
    /// 数据块耗尽时返回 `Ok(None)`，句柄过期时返回错误。
    pub fn block_or_alloc(
        &self,
        handle: InodeHandle,
        block_index: usize,
        blocks: &BlockStore,
    ) -> Result<Option<u32>> {
        let mut inner = self.inner.write();
        let inode = inner.get_mut(handle).ok_or(Error::InvalidArgument)?;

        if let Some(block_id) = inode.block_id(block_index) {
            return Ok(Some(block_id));
        }

        let Some(block_id) = blocks.alloc() else {
            return Ok(None);
        };
        inode.push_block(block_index, block_id);
        log::debug!(
            "inode {}: block #{block_index} bound to data block {block_id}",
            handle.id
        );

        Ok(Some(block_id))
    }

    /// 正在使用的 inode 的文件长度
    pub fn length(&self, inode_id: u32) -> Option<usize> {
        let inner = self.inner.read();
        let id = inode_id as usize;
        inner.bitmap.is_set(id).then(|| inner.inodes[id].length)
    }

    pub fn usage(&self) -> Usage {
        let inner = self.inner.read();
        Usage {
            used: inner.bitmap.used(),
            total: inner.bitmap.capacity(),
        }
    }
}

impl InodeTableInner {
    fn get(&self, handle: InodeHandle) -> Option<&Inode> {
        let id = handle.id as usize;
        self.bitmap
            .is_set(id)
            .then(|| &self.inodes[id])
            .filter(|inode| inode.generation() == handle.generation)
    }

    fn get_mut(&mut self, handle: InodeHandle) -> Option<&mut Inode> {
        let id = handle.id as usize;
        if !self.bitmap.is_set(id) {
            return None;
        }
        Some(&mut self.inodes[id]).filter(|inode| inode.generation() == handle.generation)
    }
}
