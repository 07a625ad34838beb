use serde::{Deserialize, Serialize};

/// BWT 上的 Occ / C 表。
/// - 字母以 [0..sigma) 编码，0 为哨兵。
/// - Occ 按定长分块采样（块内顺扫补偿），block = 1 即完整的 (n+1)×sigma 表。
/// - 构建后只读，可在多个线程间共享。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccIndex {
    sigma: u8,
    block: u32,
    /// C[a] = BWT 中字母 < a 的累计数量，也是 a 在第一列中首次出现的下标
    c: Vec<u32>,
    /// BWT 序列
    bwt: Vec<u8>,
    /// Occ 采样（按块存储，行优先展平）：occ_samples[block_id * sigma + a]
    occ_samples: Vec<u32>,
}

impl OccIndex {
    /// block 会被限制在 [1, max(n, 1)]；超出 [0..sigma) 的字母不计数。
    pub fn build(bwt: Vec<u8>, sigma: usize, block: usize) -> Self {
        let n = bwt.len();
        let block = block.clamp(1, n.max(1)).min(u32::MAX as usize);

        let mut freq = vec![0u32; sigma];
        for &ch in &bwt {
            let ci = ch as usize;
            if ci < sigma {
                freq[ci] += 1;
            }
        }
        let mut c = vec![0u32; sigma];
        let mut acc = 0u32;
        for (slot, &f) in c.iter_mut().zip(&freq) {
            *slot = acc;
            acc += f;
        }

        let num_blocks = n.div_ceil(block);
        let mut occ_samples = vec![0u32; num_blocks * sigma];
        let mut running = vec![0u32; sigma];
        for bi in 0..num_blocks {
            // 记录到块起始位置的累计
            occ_samples[bi * sigma..(bi + 1) * sigma].copy_from_slice(&running);
            let start = bi * block;
            let end = ((bi + 1) * block).min(n);
            for &ch in &bwt[start..end] {
                let ci = ch as usize;
                if ci < sigma {
                    running[ci] += 1;
                }
            }
        }

        Self { sigma: sigma as u8, block: block as u32, c, bwt, occ_samples }
    }

    /// BWT[0..pos) 中 a 的出现次数，pos ∈ [0, n]
    #[inline]
    pub fn occ(&self, a: u8, pos: usize) -> u32 {
        let sigma = self.sigma as usize;
        if pos == 0 || a as usize >= sigma {
            return 0;
        }
        let block = self.block as usize;
        let bi = (pos - 1) / block;
        let base = self.occ_samples[bi * sigma + a as usize];
        let add = self.bwt[bi * block..pos].iter().filter(|&&ch| ch == a).count() as u32;
        base + add
    }

    /// 在区间 [l, r) 前扩展字符 a 后的新区间
    #[inline]
    pub fn rank_range(&self, a: u8, l: usize, r: usize) -> (usize, usize) {
        let c0 = self.first_occurrence(a);
        (c0 + self.occ(a, l) as usize, c0 + self.occ(a, r) as usize)
    }

    #[inline]
    pub fn first_occurrence(&self, a: u8) -> usize {
        self.c.get(a as usize).map_or(self.bwt.len(), |&c0| c0 as usize)
    }

    pub fn total(&self, a: u8) -> usize {
        self.occ(a, self.bwt.len()) as usize
    }

    pub fn bwt(&self) -> &[u8] {
        &self.bwt
    }

    pub fn len(&self) -> usize {
        self.bwt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bwt.is_empty()
    }

    pub fn sigma(&self) -> usize {
        self.sigma as usize
    }

    pub fn block(&self) -> usize {
        self.block as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::bwt::first_column;

    // banana$ 的 BWT：annb$aa，编码 $=0 a=1 b=2 n=3
    const BANANA_BWT: [u8; 7] = [1, 3, 3, 2, 0, 1, 1];

    fn naive_occ(bwt: &[u8], a: u8, pos: usize) -> u32 {
        bwt[..pos].iter().filter(|&&ch| ch == a).count() as u32
    }

    #[test]
    fn c_table_of_banana() {
        let idx = OccIndex::build(BANANA_BWT.to_vec(), 4, 1);
        let c: Vec<usize> = (0..4).map(|a| idx.first_occurrence(a)).collect();
        assert_eq!(c, vec![0, 1, 4, 5]);
        assert_eq!(idx.total(1), 3);
        assert_eq!(idx.occ(3, 3), 2);
    }

    #[test]
    fn occ_is_independent_of_block_size() {
        let mut x: u32 = 99;
        let mut bwt: Vec<u8> = (0..200)
            .map(|_| {
                x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                ((x >> 16) % 5) as u8 + 1
            })
            .collect();
        bwt[77] = 0;
        for block in [1, 2, 3, 16, 64, 500] {
            let idx = OccIndex::build(bwt.clone(), 6, block);
            for a in 0..6u8 {
                for pos in 0..=bwt.len() {
                    assert_eq!(idx.occ(a, pos), naive_occ(&bwt, a, pos), "block={} a={} pos={}", block, a, pos);
                }
            }
        }
    }

    #[test]
    fn c_table_matches_first_column() {
        let idx = OccIndex::build(BANANA_BWT.to_vec(), 4, 2);
        let col = first_column(&BANANA_BWT, 4);
        for a in 0..4u8 {
            let first = col.iter().position(|&ch| ch == a).unwrap();
            assert_eq!(idx.first_occurrence(a), first);
        }
    }

    #[test]
    fn absent_symbol_gets_empty_range() {
        // 字母表 {$,A,C,G,T}，BWT 中没有 C
        let bwt = vec![1u8, 3, 0, 4, 1];
        let idx = OccIndex::build(bwt, 5, 2);
        assert_eq!(idx.total(2), 0);
        assert_eq!(idx.first_occurrence(2), idx.first_occurrence(3));
    }

    #[test]
    fn zero_block_is_clamped() {
        let idx = OccIndex::build(BANANA_BWT.to_vec(), 4, 0);
        assert_eq!(idx.block(), 1);
        assert_eq!(idx.occ(1, 7), 3);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn oversized_block_is_clamped_to_text_length() {
        // 1<<32 截断为 u32 后会变成 0，(1<<32)+1 会变成 1
        for block in [1usize << 32, (1usize << 32) + 1, usize::MAX] {
            let idx = OccIndex::build(BANANA_BWT.to_vec(), 4, block);
            assert_eq!(idx.block(), BANANA_BWT.len());
            for a in 0..4u8 {
                for pos in 0..=BANANA_BWT.len() {
                    assert_eq!(idx.occ(a, pos), naive_occ(&BANANA_BWT, a, pos));
                }
            }
        }
    }

    #[test]
    fn symbols_outside_sigma_are_ignored() {
        // 7 与 9 不在 [0..4) 内
        let bwt = vec![1u8, 7, 3, 0, 9, 1];
        let idx = OccIndex::build(bwt, 4, 2);
        assert_eq!(idx.total(1), 2);
        assert_eq!(idx.first_occurrence(3), 3);
        assert_eq!(idx.occ(7, 6), 0);
        assert_eq!(idx.first_occurrence(9), 6);
    }
}
