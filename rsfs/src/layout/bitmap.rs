use alloc::vec;
use alloc::vec::Vec;

/// 位图的基本单元
type BitGroup = u64;

const GROUP_BITS: usize = BitGroup::BITS as usize;

/// 位图，记录一组资源的占用情况。
///
/// 分配总是取编号最小的空闲位，结果可预测。
#[derive(Debug)]
pub struct Bitmap {
    groups: Vec<BitGroup>,
    /// 位图所指示的资源个数
    capacity: usize,
}

impl Bitmap {
    pub fn new(capacity: usize) -> Self {
        Self {
            groups: vec![0; capacity.div_ceil(GROUP_BITS)],
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 分配编号最小的空闲位，位图用尽时返回空
    pub fn alloc(&mut self) -> Option<usize> {
        let (group_index, ingroup_index) =
            self.groups
                .iter()
                .enumerate()
                .find_map(|(group_index, &bits)| {
                    (bits != BitGroup::MAX)
                        .then_some((group_index, bits.trailing_ones() as usize))
                })?;

        let id = group_index * GROUP_BITS + ingroup_index;
        // 最后一组的尾部超出容量
        if id >= self.capacity {
            return None;
        }

        self.groups[group_index] |= 1 << ingroup_index;
        Some(id)
    }

    pub fn dealloc(&mut self, id: usize) {
        let (group_index, ingroup_index) = Self::decode(id);

        // 编号一定得有对应的位
        assert!(id < self.capacity, "bit {id} is out of bitmap");
        assert_ne!(
            self.groups[group_index] & (1 << ingroup_index),
            0,
            "bit {id} is already free"
        );

        self.groups[group_index] &= !(1 << ingroup_index);
    }

    #[inline]
    pub fn is_set(&self, id: usize) -> bool {
        let (group_index, ingroup_index) = Self::decode(id);
        id < self.capacity && self.groups[group_index] & (1 << ingroup_index) != 0
    }

    /// 已占用的位数
    pub fn used(&self) -> usize {
        self.groups
            .iter()
            .map(|bits| bits.count_ones() as usize)
            .sum()
    }
}

impl Bitmap {
    #[inline]
    fn decode(id: usize) -> (usize, usize) {
        (id / GROUP_BITS, id % GROUP_BITS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_lowest_first() {
        let mut bitmap = Bitmap::new(8);
        assert_eq!(bitmap.alloc(), Some(0));
        assert_eq!(bitmap.alloc(), Some(1));
        assert_eq!(bitmap.alloc(), Some(2));

        bitmap.dealloc(1);
        assert_eq!(bitmap.alloc(), Some(1));
        assert_eq!(bitmap.alloc(), Some(3));
        assert_eq!(bitmap.used(), 4);
    }

    #[test]
    fn exhausted() {
        let mut bitmap = Bitmap::new(3);
        for id in 0..3 {
            assert_eq!(bitmap.alloc(), Some(id));
        }
        assert_eq!(bitmap.alloc(), None);
        assert_eq!(bitmap.used(), 3);
    }

    #[test]
    fn spans_groups() {
        let mut bitmap = Bitmap::new(130);
        for id in 0..130 {
            assert_eq!(bitmap.alloc(), Some(id));
        }
        assert_eq!(bitmap.alloc(), None);

        bitmap.dealloc(100);
        assert!(!bitmap.is_set(100));
        assert!(bitmap.is_set(129));
        assert_eq!(bitmap.alloc(), Some(100));
    }

    #[test]
    #[should_panic(expected = "already free")]
    fn double_dealloc() {
        let mut bitmap = Bitmap::new(4);
        let id = bitmap.alloc().unwrap();
        bitmap.dealloc(id);
        bitmap.dealloc(id);
    }
}
