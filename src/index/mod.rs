//! 索引构建：后缀数组 → BWT → Occ/C 表 → FM 索引，以及 LF 映射逆变换。

pub mod bwt;
pub mod fm;
pub mod inverse;
pub mod occ;
pub mod sa;
