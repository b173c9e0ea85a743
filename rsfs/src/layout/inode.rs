//! 索引节点只有直接索引：[`NUM_POINTER`] 个槽位依次记录数据块编号，
//! 文件增长时自下标0起连续填充，因此容量恒为 `NUM_POINTER * BLOCK_SIZE` 字节。

use alloc::vec::Vec;

use crate::{BLOCK_SIZE, NUM_POINTER};

/// 指向某一代 inode 的句柄。
///
/// inode 被释放后代数递增，旧句柄随之失效。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InodeHandle {
    pub id: u32,
    pub generation: u64,
}

#[derive(Debug, Default, Clone)]
pub struct Inode {
    /// 文件长度（字节）
    pub length: usize,
    /// 直接索引，空槽位为 `None`
    blocks: [Option<u32>; NUM_POINTER],
    generation: u64,
}

impl Inode {
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 文件内第 `block_index` 块对应的数据块编号
    #[inline]
    pub fn block_id(&self, block_index: usize) -> Option<u32> {
        self.blocks.get(block_index).copied().flatten()
    }

    /// 已填充的槽位数
    pub fn count_blocks(&self) -> usize {
        self.blocks.iter().take_while(|slot| slot.is_some()).count()
    }

    /// 把新数据块绑定到下一个空槽位
    pub fn push_block(&mut self, block_index: usize, block_id: u32) {
        assert_eq!(
            block_index,
            self.count_blocks(),
            "inode blocks must be filled contiguously"
        );
        self.blocks[block_index] = Some(block_id);
    }

    /// 恢复初始状态并返回原先持有的数据块编号，代数加一
    pub fn clear(&mut self) -> Vec<u32> {
        let blocks = self.blocks.iter().map_while(|slot| *slot).collect();
        *self = Self {
            generation: self.generation + 1,
            ..Default::default()
        };
        blocks
    }

    /// 容纳 `size` 字节所需的数据块数
    #[inline]
    pub fn count_data_block(size: usize) -> usize {
        size.div_ceil(BLOCK_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn fill_contiguously() {
        let mut inode = Inode::default();
        assert_eq!(inode.count_blocks(), 0);
        assert_eq!(inode.block_id(0), None);

        inode.push_block(0, 7);
        inode.push_block(1, 3);
        assert_eq!(inode.count_blocks(), 2);
        assert_eq!(inode.block_id(1), Some(3));
        assert_eq!(inode.block_id(NUM_POINTER), None);
    }

    #[test]
    #[should_panic(expected = "contiguously")]
    fn gap_rejected() {
        let mut inode = Inode::default();
        inode.push_block(1, 0);
    }

    #[test]
    fn clear_bumps_generation() {
        let mut inode = Inode::default();
        inode.push_block(0, 4);
        inode.push_block(1, 5);
        inode.length = BLOCK_SIZE + 1;

        assert_eq!(inode.clear(), vec![4, 5]);
        assert_eq!(inode.length, 0);
        assert_eq!(inode.count_blocks(), 0);
        assert_eq!(inode.generation(), 1);
    }

    #[test]
    fn data_block_count() {
        assert_eq!(Inode::count_data_block(0), 0);
        assert_eq!(Inode::count_data_block(1), 1);
        assert_eq!(Inode::count_data_block(BLOCK_SIZE), 1);
        assert_eq!(Inode::count_data_block(BLOCK_SIZE + 1), 2);
    }
}
