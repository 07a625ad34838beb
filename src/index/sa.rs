use crate::error::Result;
use crate::util::alphabet::Alphabet;

/// 校验序列并构建其后缀数组。字母表取序列中出现的符号。
pub fn suffix_array(seq: &[u8], sentinel: u8) -> Result<Vec<u32>> {
    let alphabet = Alphabet::from_sequence(seq, sentinel)?;
    let text = alphabet.encode(seq)?;
    Ok(build_sa(&text))
}

/// 构建后缀数组（倍增法，每轮一次比较排序）。
/// 输入为 rank 编码后的文本（0 为哨兵）。哨兵唯一，
/// 任何后缀都不是另一个后缀的前缀，因此不存在并列。
pub fn build_sa(text: &[u8]) -> Vec<u32> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    let mut sa: Vec<usize> = (0..n).collect();
    let mut rank: Vec<i32> = text.iter().map(|&b| i32::from(b)).collect();
    let mut tmp: Vec<i32> = vec![0; n];

    let mut k = 1usize;
    while k < n {
        let key = |i: usize| (rank[i], if i + k < n { rank[i + k] } else { -1 });
        sa.sort_unstable_by(|&i, &j| key(i).cmp(&key(j)));

        tmp[sa[0]] = 0;
        for w in sa.windows(2) {
            let (a, b) = (w[0], w[1]);
            tmp[b] = tmp[a] + i32::from(key(a) != key(b));
        }

        rank.copy_from_slice(&tmp);
        // 所有 rank 互不相同即已完全排序
        if rank[sa[n - 1]] as usize == n - 1 {
            break;
        }
        k <<= 1;
    }

    sa.into_iter().map(|x| x as u32).collect()
}

/// 直接比较全部后缀排序，O(n² log n)。作为倍增法的对照实现。
pub fn build_sa_naive(text: &[u8]) -> Vec<u32> {
    let mut sa: Vec<u32> = (0..text.len() as u32).collect();
    sa.sort_by(|&a, &b| text[a as usize..].cmp(&text[b as usize..]));
    sa
}
