#![no_std]

extern crate alloc;

mod dirent;
mod error;
mod flag;
mod stat;

pub use self::{
    dirent::DirEntry,
    error::{Error, Result},
    flag::{AccessMode, OpenFlag, Whence},
    stat::{Stat, Usage},
};
