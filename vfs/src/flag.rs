use enumflags2::{BitFlags, bitflags};

use crate::Error;

#[rustfmt::skip]
#[allow(clippy::upper_case_acronyms)]
#[bitflags]
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenFlag {
    /// 只写，本文件系统不支持
    WRONLY = 0b0001,
    /// 读写兼备
    RDWR   = 0b0010,
}

impl OpenFlag {
    // enumflags2拒绝值为0的标志
    /// 只读
    pub const RDONLY: u32 = 0b0000;

    #[inline]
    pub fn read_only() -> BitFlags<OpenFlag> {
        BitFlags::from_bits_truncate(Self::RDONLY)
    }

    #[inline]
    pub fn read_write() -> BitFlags<OpenFlag> {
        BitFlags::from_flag(Self::RDWR)
    }
}

/// 打开文件表项记录的访问模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
}

impl AccessMode {
    #[inline]
    pub fn writable(self) -> bool {
        self == Self::ReadWrite
    }
}

impl TryFrom<BitFlags<OpenFlag>> for AccessMode {
    type Error = Error;

    fn try_from(flags: BitFlags<OpenFlag>) -> Result<Self, Error> {
        if flags.is_empty() {
            Ok(Self::ReadOnly)
        } else if flags == BitFlags::from_flag(OpenFlag::RDWR) {
            Ok(Self::ReadWrite)
        } else {
            Err(Error::InvalidArgument)
        }
    }
}

impl TryFrom<u32> for AccessMode {
    type Error = Error;

    fn try_from(raw: u32) -> Result<Self, Error> {
        BitFlags::<OpenFlag>::from_bits(raw)
            .map_err(|_| Error::InvalidArgument)
            .and_then(Self::try_from)
    }
}

/// 重定位的基准
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// 文件开头
    Set = 0,
    /// 当前位置
    Cur = 1,
    /// 文件末尾
    End = 2,
}

impl TryFrom<u32> for Whence {
    type Error = Error;

    fn try_from(raw: u32) -> Result<Self, Error> {
        match raw {
            0 => Ok(Self::Set),
            1 => Ok(Self::Cur),
            2 => Ok(Self::End),
            _ => Err(Error::InvalidArgument),
        }
    }
}
