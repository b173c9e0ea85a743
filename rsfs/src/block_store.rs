//! # 数据块层
//!
//! 数据块由位图统一分配，每块另有一把锁保护其内容，
//! 不同块上的读写互不阻塞。

use alloc::vec::Vec;

use spin::Mutex;

use crate::layout::Bitmap;
use crate::{BLOCK_SIZE, DataBlock, Error, Result, Usage};

pub struct BlockStore {
    bitmap: Mutex<Bitmap>,
    blocks: Vec<Mutex<DataBlock>>,
}

impl BlockStore {
    /// 开辟 `count` 个数据块，内存不足时失败
    pub fn new(count: usize) -> Result<Self> {
        let mut blocks = Vec::new();
        blocks
            .try_reserve_exact(count)
            .map_err(|_| Error::AllocationFailed)?;
        blocks.extend((0..count).map(|_| Mutex::new([0; BLOCK_SIZE])));

        Ok(Self {
            bitmap: Mutex::new(Bitmap::new(count)),
            blocks,
        })
    }

    /// 分配编号最小的空闲块，用尽时返回空
    pub fn alloc(&self) -> Option<u32> {
        let block_id = self.bitmap.lock().alloc()? as u32;
        log::trace!("block {block_id} allocated");
        Some(block_id)
    }

    /// 释放一个正在使用的块，释放空闲块视为调用方的错误
    pub fn dealloc(&self, block_id: u32) {
        let mut bitmap = self.bitmap.lock();
        self.map_mut(block_id, |data_block| data_block.fill(0));
        bitmap.dealloc(block_id as usize);
        log::trace!("block {block_id} freed");
    }

    #[inline]
    pub fn map<V>(&self, block_id: u32, f: impl FnOnce(&DataBlock) -> V) -> V {
        f(&self.blocks[block_id as usize].lock())
    }

    #[inline]
    pub fn map_mut<V>(&self, block_id: u32, f: impl FnOnce(&mut DataBlock) -> V) -> V {
        f(&mut self.blocks[block_id as usize].lock())
    }

    pub fn usage(&self) -> Usage {
        let bitmap = self.bitmap.lock();
        Usage {
            used: bitmap.used(),
            total: bitmap.capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freed_block_is_zeroed_and_reused() {
        let store = BlockStore::new(4).unwrap();
        let a = store.alloc().unwrap();
        let b = store.alloc().unwrap();
        assert_eq!((a, b), (0, 1));

        store.map_mut(a, |data| data[..3].copy_from_slice(b"abc"));
        store.dealloc(a);
        assert_eq!(store.usage(), Usage { used: 1, total: 4 });

        assert_eq!(store.alloc(), Some(a));
        store.map(a, |data| assert!(data.iter().all(|&byte| byte == 0)));
    }

    #[test]
    fn exhausted() {
        let store = BlockStore::new(2).unwrap();
        assert!(store.alloc().is_some());
        assert!(store.alloc().is_some());
        assert_eq!(store.alloc(), None);
    }
}
