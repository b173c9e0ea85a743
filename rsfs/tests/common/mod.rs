#![allow(dead_code)]

use rsfs::RsFileSystem;

/// 日志级别由环境变量 `LOG` 控制，如 `LOG=debug`
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::new().filter("LOG"))
        .is_test(true)
        .try_init();
}

pub fn new_fs() -> RsFileSystem {
    init_logger();
    RsFileSystem::init().unwrap()
}

/// 可辨认的测试数据：第 i 个字节为 `i % 251`
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
