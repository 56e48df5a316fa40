//! 配置管理：配置文件 + 环境变量，进程内只初始化一次

mod loader;
mod structs;

pub use structs::*;
