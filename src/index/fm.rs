use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::index::bwt::build_bwt;
use crate::index::inverse::lf_walk;
use crate::index::occ::OccIndex;
use crate::index::sa::build_sa;
use crate::util::alphabet::{Alphabet, DEFAULT_SENTINEL};

pub const DEFAULT_OCC_BLOCK: usize = 64;

/// 索引构建参数
#[derive(Debug, Clone)]
pub struct IndexOpt {
    /// 哨兵符号；声明了 alphabet 时以其哨兵为准
    pub sentinel: u8,
    /// Occ 采样间隔，1 表示完整表
    pub occ_block: usize,
    /// 声明的字母表；None 时取序列中出现的符号
    pub alphabet: Option<Alphabet>,
}

impl Default for IndexOpt {
    fn default() -> Self {
        Self { sentinel: DEFAULT_SENTINEL, occ_block: DEFAULT_OCC_BLOCK, alphabet: None }
    }
}

/// 以 `$` 为哨兵、字母表取自序列本身，构建 FM 索引。
pub fn build_index(seq: &[u8]) -> Result<FMIndex> {
    FMIndex::build(seq, &IndexOpt::default())
}

pub fn build_index_with_opt(seq: &[u8], opt: &IndexOpt) -> Result<FMIndex> {
    FMIndex::build(seq, opt)
}

/// 单序列 FM 索引：
/// - 文本按 [`Alphabet`] 编码为 [0..sigma)，0 为哨兵。
/// - Occ / C 表见 [`OccIndex`]。
/// - 保存完整 SA，区间可直接换算为文本位置。
/// - 位置与计数为 u32，文本长度上限见 [`MAX_TEXT_LEN`](crate::util::alphabet::MAX_TEXT_LEN)。
///
/// 构建后只读，多个线程可以不加锁地并发查询。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FMIndex {
    alphabet: Alphabet,
    occ: OccIndex,
    sa: Vec<u32>,
}

impl FMIndex {
    pub fn build(seq: &[u8], opt: &IndexOpt) -> Result<Self> {
        let alphabet = match &opt.alphabet {
            Some(a) => a.clone(),
            None => Alphabet::from_sequence(seq, opt.sentinel)?,
        };
        let text = alphabet.encode(seq)?;

        // SA -> BWT -> Occ/C
        let sa = build_sa(&text);
        let bwt = build_bwt(&text, &sa);
        let occ = OccIndex::build(bwt, alphabet.sigma(), opt.occ_block);
        log::debug!(
            "built FM index: n={}, sigma={}, occ_block={}",
            text.len(),
            alphabet.sigma(),
            occ.block()
        );

        Ok(Self { alphabet, occ, sa })
    }

    /// 文本长度（含哨兵）
    pub fn len(&self) -> usize {
        self.sa.len()
    }

    /// 合法索引至少包含哨兵，恒为 false
    pub fn is_empty(&self) -> bool {
        self.sa.is_empty()
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn occurrences(&self) -> &OccIndex {
        &self.occ
    }

    pub fn suffix_array(&self) -> &[u32] {
        &self.sa
    }

    /// BWT 串（原始符号）
    pub fn transform(&self) -> Vec<u8> {
        self.alphabet.decode(self.occ.bwt())
    }

    /// 反向搜索精确匹配，pat 为编码后的字母表。
    /// 返回半开的 SA 区间 [l, r)；未命中返回 None。
    pub fn backward_search(&self, pat: &[u8]) -> Option<(usize, usize)> {
        let sigma = self.alphabet.sigma();
        let mut l = 0usize;
        let mut r = self.occ.len();
        for &a in pat.iter().rev() {
            if a as usize >= sigma {
                return None;
            }
            let (nl, nr) = self.occ.rank_range(a, l, r);
            if nl >= nr {
                return None;
            }
            l = nl;
            r = nr;
        }
        Some((l, r))
    }

    /// 原始符号形式的模式串对应的 SA 区间。
    /// 字母表外的符号，或哨兵出现在模式串末位以外，都不可能在线性文本中出现。
    fn interval(&self, pattern: &[u8]) -> Option<(usize, usize)> {
        let pat = self.alphabet.encode_pattern(pattern)?;
        if let Some((_, body)) = pat.split_last() {
            if body.contains(&0) {
                return None;
            }
        }
        let hit = self.backward_search(&pat);
        log::trace!("pattern of length {} -> interval {:?}", pat.len(), hit);
        hit
    }

    /// 模式串在原序列中的全部起始位置，升序；未命中返回空表。
    /// 空模式串返回全部 n 个位置。
    pub fn search(&self, pattern: &[u8]) -> Vec<usize> {
        match self.interval(pattern) {
            Some((l, r)) => {
                let mut pos: Vec<usize> = self.sa_interval_positions(l, r).iter().map(|&p| p as usize).collect();
                pos.sort_unstable();
                pos
            }
            None => Vec::new(),
        }
    }

    pub fn count(&self, pattern: &[u8]) -> usize {
        self.interval(pattern).map_or(0, |(l, r)| r - l)
    }

    pub fn contains(&self, pattern: &[u8]) -> bool {
        self.interval(pattern).is_some()
    }

    /// 并发查询多个模式串，结果与输入顺序一致。
    pub fn search_many<P>(&self, patterns: &[P]) -> Vec<Vec<usize>>
    where
        P: AsRef<[u8]> + Sync,
    {
        patterns.par_iter().map(|p| self.search(p.as_ref())).collect()
    }

    /// 取出 SA 区间对应的文本位置（按 SA 顺序）。
    pub fn sa_interval_positions(&self, l: usize, r: usize) -> &[u32] {
        &self.sa[l..r]
    }

    /// 仅凭 BWT 恢复原序列。
    pub fn invert(&self) -> Vec<u8> {
        self.alphabet.decode(&lf_walk(self.occ.bwt(), self.alphabet.sigma()))
    }
}
