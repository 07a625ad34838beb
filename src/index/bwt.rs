use std::cmp::Ordering;

use crate::error::Result;
use crate::index::sa::build_sa;
use crate::util::alphabet::Alphabet;

/// 校验序列并返回其 BWT（原始字节形式）。
pub fn transform(seq: &[u8], sentinel: u8) -> Result<Vec<u8>> {
    let alphabet = Alphabet::from_sequence(seq, sentinel)?;
    let text = alphabet.encode(seq)?;
    let sa = build_sa(&text);
    Ok(alphabet.decode(&build_bwt(&text, &sa)))
}

/// 根据后缀数组构建 BWT：bwt[i] = text[(sa[i] - 1) mod n]。
pub fn build_bwt(text: &[u8], sa: &[u32]) -> Vec<u8> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    let mut bwt = Vec::with_capacity(n);
    for &p in sa {
        let i = p as usize;
        let prev = if i == 0 { text[n - 1] } else { text[i - 1] };
        bwt.push(prev);
    }
    bwt
}

/// 不借助后缀数组：按循环比较排序 n 个旋转的起点，取每个旋转的最后一个符号。
/// 只保存起点下标，不生成 n×n 旋转矩阵。文本含唯一哨兵时与 [`build_bwt`] 结果一致。
pub fn build_bwt_from_rotations(text: &[u8]) -> Vec<u8> {
    let n = text.len();
    let mut rotations: Vec<usize> = (0..n).collect();
    rotations.sort_by(|&a, &b| cmp_rotations(text, a, b));
    rotations.into_iter().map(|r| text[(r + n - 1) % n]).collect()
}

fn cmp_rotations(text: &[u8], a: usize, b: usize) -> Ordering {
    let n = text.len();
    for k in 0..n {
        let ord = text[(a + k) % n].cmp(&text[(b + k) % n]);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// 排序后的 BWT，即旋转矩阵的第一列（计数排序）。
pub fn first_column(bwt: &[u8], sigma: usize) -> Vec<u8> {
    let mut freq = vec![0usize; sigma];
    for &ch in bwt {
        freq[ch as usize] += 1;
    }
    let mut col = Vec::with_capacity(bwt.len());
    for (ch, &cnt) in freq.iter().enumerate() {
        col.extend(std::iter::repeat(ch as u8).take(cnt));
    }
    col
}
