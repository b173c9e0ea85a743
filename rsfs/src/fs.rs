//! # 文件服务层
//!
//! [`RsFileSystem`] 持有全部存储区，各操作只获取自己需要的锁。
//! 跨存储区的加锁顺序固定为：
//! 目录 → 打开文件表位图 → 描述符槽位 → inode 表 → 数据块位图 → 数据块。

use alloc::borrow::ToOwned;

use enumflags2::BitFlags;
use spin::Mutex;

use crate::block_store::BlockStore;
use crate::directory::Directory;
use crate::fd_table::{FdTable, OpenFile};
use crate::inode_table::InodeTable;
use crate::layout::{Inode, InodeHandle};
use crate::report::Report;
use crate::{AccessMode, DirEntry, Error, OpenFlag, Result, Stat, Whence};
use crate::{BLOCK_SIZE, NUM_BLOCKS, NUM_INODES, NUM_OPEN_FILES, NUM_POINTER};

/// 文件描述符，即打开文件表的槽位下标
pub type Fd = usize;

pub struct RsFileSystem {
    blocks: BlockStore,
    inodes: InodeTable,
    directory: Directory,
    fd_table: FdTable,
    /// 状态报告彼此串行
    report_lock: Mutex<()>,
}

impl RsFileSystem {
    /// 建立一个空文件系统，数据块所需内存不足时失败
    pub fn init() -> Result<Self> {
        let fs = Self {
            blocks: BlockStore::new(NUM_BLOCKS)?,
            inodes: InodeTable::new(NUM_INODES),
            directory: Directory::new(),
            fd_table: FdTable::new(NUM_OPEN_FILES),
            report_lock: Mutex::new(()),
        };
        log::info!(
            "rsfs: {NUM_BLOCKS} blocks of {BLOCK_SIZE} bytes, {NUM_INODES} inodes, {NUM_OPEN_FILES} open files"
        );

        Ok(fs)
    }

    /// 创建空文件
    pub fn create(&self, name: &str) -> Result<()> {
        let mut entries = self.directory.lock();

        if entries.search(name).is_some() {
            log::warn!("create: {name:?} already exists");
            return Err(Error::AlreadyExists);
        }

        let entry = entries.insert(name);
        match self.inodes.alloc() {
            Some(inode) => {
                entry.bind(inode.id);
                log::debug!("create: {name:?} bound to inode {}", inode.id);
                Ok(())
            }
            None => {
                // 目录中不能留下没有 inode 的目录项
                entries.remove(name);
                log::warn!("create: out of inodes, {name:?} rolled back");
                Err(Error::AllocationFailed)
            }
        }
    }

    /// 以只读（空标志）或读写（[`OpenFlag::RDWR`]）方式打开文件，返回描述符
    pub fn open(&self, name: &str, flags: BitFlags<OpenFlag>) -> Result<Fd> {
        let mode = AccessMode::try_from(flags)?;

        let inode = {
            let entries = self.directory.lock();
            let entry = entries.search(name).ok_or(Error::NotFound)?;
            self.inodes
                .handle(entry.inode_id())
                .ok_or(Error::NotFound)?
        };

        let Some(fd) = self.fd_table.alloc(OpenFile::new(mode, inode)) else {
            log::warn!("open: no free slot for {name:?}");
            return Err(Error::TableFull);
        };
        log::debug!("open: {name:?} as fd {fd} ({mode:?})");

        Ok(fd)
    }

    /// 从当前位置读取至多 `buf.len()` 字节，不会越过文件末尾
    pub fn read(&self, fd: Fd, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Err(Error::InvalidArgument);
        }

        self.fd_table
            .with(fd, |file| {
                let read_size = self
                    .inodes
                    .map(file.inode, |inode| self.read_at(inode, file.position, buf))
                    .ok_or_else(|| stale(fd))?;
                file.position += read_size;
                Ok(read_size)
            })
            .unwrap_or(Err(Error::InvalidArgument))
    }

    /// 从当前位置写入 `buf`，按需分配数据块。
    ///
    /// 数据块耗尽或到达容量上限时提前结束，返回实际写入的字节数。
    pub fn write(&self, fd: Fd, buf: &[u8]) -> Result<usize> {
        if buf.is_empty() {
            return Err(Error::InvalidArgument);
        }

        self.fd_table
            .with(fd, |file| {
                if !file.mode.writable() {
                    log::warn!("write: fd {fd} is read-only");
                    return Err(Error::InvalidArgument);
                }
                let written_size = self
                    .write_at(file.inode, file.position, buf)
                    .map_err(|_| stale(fd))?;
                file.position += written_size;
                Ok(written_size)
            })
            .unwrap_or(Err(Error::InvalidArgument))
    }

    /// 重定位读写位置并返回结果位置；目标位置越出 `[0, length]` 时保持原位
    pub fn seek(&self, fd: Fd, offset: isize, whence: Whence) -> Result<usize> {
        self.fd_table
            .with(fd, |file| {
                let length = self
                    .inodes
                    .map(file.inode, |inode| inode.length)
                    .ok_or_else(|| stale(fd))?;

                let base = match whence {
                    Whence::Set => 0,
                    Whence::Cur => file.position,
                    Whence::End => length,
                };
                match (base as isize).checked_add(offset) {
                    Some(position) if (0..=length as isize).contains(&position) => {
                        file.position = position as usize;
                    }
                    _ => log::debug!("seek: fd {fd} keeps position {}", file.position),
                }

                Ok(file.position)
            })
            .unwrap_or(Err(Error::InvalidArgument))
    }

    pub fn close(&self, fd: Fd) -> Result<()> {
        self.fd_table.dealloc(fd).ok_or(Error::InvalidArgument)?;
        log::debug!("close: fd {fd}");
        Ok(())
    }

    /// 删除文件并释放其 inode 与数据块。
    ///
    /// 仍打开着该文件的描述符不会被关闭，此后经由它们的读写与定位均返回
    /// [`Error::InvalidArgument`]，关闭照常成功。
    pub fn delete(&self, name: &str) -> Result<()> {
        let mut entries = self.directory.lock();

        let Some(entry) = entries.search(name) else {
            log::warn!("delete: {name:?} not found");
            return Err(Error::NotFound);
        };
        let inode_id = entry.inode_id();

        self.inodes.dealloc(inode_id, &self.blocks);
        entries.remove(name);
        log::debug!("delete: {name:?}, inode {inode_id} freed");

        Ok(())
    }

    /// 生成状态报告。
    ///
    /// 报告之间互斥，但与其他操作并发时不保证是同一时刻的快照。
    pub fn stat(&self) -> Report {
        let _guard = self.report_lock.lock();

        let files = self
            .directory
            .lock()
            .iter()
            .filter_map(|entry| {
                let size = self.inodes.length(entry.inode_id())?;
                Some(DirEntry {
                    name: entry.name().to_owned(),
                    size: size as u64,
                    inode: entry.inode_id(),
                })
            })
            .collect();

        Report {
            files,
            blocks: self.blocks.usage(),
            inodes: self.inodes.usage(),
            open_files: self.fd_table.usage(),
        }
    }

    /// 描述符所指文件的元信息
    pub fn fstat(&self, fd: Fd) -> Result<Stat> {
        self.fd_table
            .with(fd, |file| {
                self.inodes
                    .map(file.inode, |inode| Stat {
                        inode: file.inode.id,
                        block_size: BLOCK_SIZE as u64,
                        blocks: inode.count_blocks() as u64,
                        size: inode.length as u64,
                    })
                    .ok_or_else(|| stale(fd))
            })
            .unwrap_or(Err(Error::InvalidArgument))
    }
}

impl RsFileSystem {
    fn read_at(&self, inode: &Inode, offset: usize, buf: &mut [u8]) -> usize {
        let mut start = offset;
        let end = (start + buf.len()).min(inode.length);

        if start >= end {
            return 0;
        }

        // 已读取多少字节
        let mut read_size = 0;
        loop {
            let block_index = start / BLOCK_SIZE;
            // 当前块的末地址(字节)
            let current_block_end = ((block_index + 1) * BLOCK_SIZE).min(end);
            let block_read_size = current_block_end - start;
            let dest = &mut buf[read_size..read_size + block_read_size];

            // 长度以内的字节必有数据块
            let Some(block_id) = inode.block_id(block_index) else {
                break;
            };
            self.blocks.map(block_id, |data_block| {
                // 绝对地址 % 块大小 = 块内偏移
                let src = &data_block[start % BLOCK_SIZE..start % BLOCK_SIZE + block_read_size];
                dest.copy_from_slice(src);
            });
            log::trace!("read {block_read_size} bytes from block {block_id}");

            read_size += block_read_size;

            if current_block_end == end {
                break;
            }

            start = current_block_end;
        }

        read_size
    }

    fn write_at(&self, handle: InodeHandle, offset: usize, buf: &[u8]) -> Result<usize> {
        let mut start = offset;
        let mut written_size = 0;

        while written_size < buf.len() {
            let block_index = start / BLOCK_SIZE;
            if block_index >= NUM_POINTER {
                log::debug!("write: inode {} reached its capacity", handle.id);
                break;
            }

            let Some(block_id) = self.inodes.block_or_alloc(handle, block_index, &self.blocks)?
            else {
                log::warn!("write: out of data blocks");
                break;
            };

            let block_offset = start % BLOCK_SIZE;
            let block_write_size = (BLOCK_SIZE - block_offset).min(buf.len() - written_size);
            let src = &buf[written_size..written_size + block_write_size];

            // 持有 inode 表的读锁拷贝，删除无法在途中释放这一块
            self.inodes
                .map(handle, |_| {
                    self.blocks.map_mut(block_id, |data_block| {
                        data_block[block_offset..block_offset + block_write_size]
                            .copy_from_slice(src);
                    })
                })
                .ok_or(Error::InvalidArgument)?;
            log::trace!("wrote {block_write_size} bytes to block {block_id}");

            written_size += block_write_size;
            start += block_write_size;
        }

        self.inodes
            .map_mut(handle, |inode| inode.length = inode.length.max(start));

        Ok(written_size)
    }
}

/// 描述符所指的文件已被删除
fn stale(fd: Fd) -> Error {
    log::warn!("fd {fd} refers to a deleted file");
    Error::InvalidArgument
}
