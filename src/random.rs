//! 随机数模块：哈希链 CSPRNG 与种子吸收接口

pub mod engine;
pub mod seed;

pub use self::engine::{OPTIMAL_SEED_SIZE, RandomEngine};
pub use self::seed::{ByteSink, absorb_integer, absorb_iter, absorb_slice};
