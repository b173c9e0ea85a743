//! # 打开文件表
//!
//! 槽位下标即文件描述符。表级位图负责槽位的分配与回收；
//! 每个槽位另有一把锁，同一描述符上的读、写、定位依次进行，
//! 不同描述符之间互不阻塞。

use alloc::vec::Vec;

use spin::Mutex;

use crate::layout::{Bitmap, InodeHandle};
use crate::{AccessMode, Usage};

/// 一次打开的文件实例
#[derive(Debug, Clone, Copy)]
pub struct OpenFile {
    pub mode: AccessMode,
    /// **文件**内的偏移量
    pub position: usize,
    pub inode: InodeHandle,
}

impl OpenFile {
    #[inline]
    pub fn new(mode: AccessMode, inode: InodeHandle) -> Self {
        Self {
            mode,
            position: 0,
            inode,
        }
    }
}

pub struct FdTable {
    bitmap: Mutex<Bitmap>,
    slots: Vec<Mutex<Option<OpenFile>>>,
}

impl FdTable {
    pub fn new(count: usize) -> Self {
        Self {
            bitmap: Mutex::new(Bitmap::new(count)),
            slots: (0..count).map(|_| Mutex::new(None)).collect(),
        }
    }

    /// 占用编号最小的空闲槽位，表满时返回空
    pub fn alloc(&self, file: OpenFile) -> Option<usize> {
        let mut bitmap = self.bitmap.lock();
        let fd = bitmap.alloc()?;
        *self.slots[fd].lock() = Some(file);
        Some(fd)
    }

    /// 归还槽位；越界或未使用的描述符返回空
    pub fn dealloc(&self, fd: usize) -> Option<OpenFile> {
        let mut bitmap = self.bitmap.lock();
        let file = self.slots.get(fd)?.lock().take()?;
        bitmap.dealloc(fd);
        Some(file)
    }

    /// 锁住槽位后处理其中的打开文件
    pub fn with<V>(&self, fd: usize, f: impl FnOnce(&mut OpenFile) -> V) -> Option<V> {
        self.slots.get(fd)?.lock().as_mut().map(f)
    }

    pub fn usage(&self) -> Usage {
        let bitmap = self.bitmap.lock();
        Usage {
            used: bitmap.used(),
            total: bitmap.capacity(),
        }
    }
}
