//! # bwt-index
//!
//! Burrows-Wheeler 变换与 FM 索引。
//!
//! 本 crate 提供：
//!
//! - **后缀数组**：倍增法构建，附直接比较排序的对照实现
//! - **BWT**：由后缀数组导出，或直接对旋转起点做循环比较排序
//! - **Occ / C 表**：分块采样的前缀计数与首次出现位置
//! - **反向搜索**：精确匹配，返回原序列中的全部起始位置
//! - **逆变换**：仅凭 BWT，通过 LF 映射恢复原序列
//!
//! 序列必须以唯一的哨兵（默认 `$`）结尾；哨兵在字母表中的次序最小。
//!
//! ## 快速示例
//!
//! ```rust
//! use bwt_index::build_index;
//!
//! let idx = build_index(b"mississippi$").unwrap();
//! assert_eq!(idx.search(b"ssi"), vec![2, 5]);
//! assert_eq!(idx.transform(), b"ipssm$pissii");
//! assert_eq!(idx.invert(), b"mississippi$");
//!
//! // 仅凭 BWT 逆变换
//! assert_eq!(bwt_index::invert(b"annb$aa", b'$').unwrap(), b"banana$");
//! ```
//!
//! ## 模块说明
//!
//! - [`index`] — 后缀数组、BWT、Occ 表、FM 索引、逆变换
//! - [`util`] — 字母表编码 / 解码与输入校验
//! - [`error`] — 校验错误类型

pub mod error;
pub mod index;
pub mod util;

pub use error::{Result, ValidationError};
pub use index::fm::{build_index, build_index_with_opt, FMIndex, IndexOpt, DEFAULT_OCC_BLOCK};
pub use index::inverse::invert;
pub use util::alphabet::{Alphabet, DEFAULT_SENTINEL};
