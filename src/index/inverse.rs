use crate::error::{Result, ValidationError};
use crate::index::bwt::first_column;
use crate::util::alphabet::Alphabet;

/// 仅凭 BWT 串恢复原序列（含哨兵，哨兵位于末尾）。
/// 字母表取 BWT 中出现的符号；哨兵必须恰好出现一次。
pub fn invert(bwt: &[u8], sentinel: u8) -> Result<Vec<u8>> {
    let alphabet = Alphabet::from_sequence(bwt, sentinel)?;
    let ranks = alphabet.encode_transform(bwt)?;
    Ok(alphabet.decode(&invert_ranks(&ranks, alphabet.sigma())?))
}

/// 对 rank 编码的 BWT 做逆变换。输入须恰有一个 0（哨兵）。
pub fn invert_ranks(bwt: &[u8], sigma: usize) -> Result<Vec<u8>> {
    let text = lf_walk(bwt, sigma);
    if text.len() != bwt.len() {
        return Err(ValidationError::MalformedTransform { covered: text.len(), len: bwt.len() });
    }
    Ok(text)
}

/// LF 映射：第一列中第 k 个 a 与最后一列中第 k 个 a 是同一个字符。
///
/// 从第一列的哨兵行（第 0 行）出发，输出该行首字符，再跳到最后一列中
/// 同一字符所在的行，如此往复直到回到第 0 行。得到的 "$s" 左旋一位即为 "s$"。
/// 对合法 BWT 走完 n 步；否则返回的长度小于 n。
pub(crate) fn lf_walk(bwt: &[u8], sigma: usize) -> Vec<u8> {
    let n = bwt.len();
    if n == 0 {
        return Vec::new();
    }
    let first = first_column(bwt, sigma);

    // 每个字母在第一列的起始行
    let mut start = vec![0usize; sigma];
    let mut acc = 0usize;
    for (a, slot) in start.iter_mut().enumerate() {
        *slot = acc;
        acc += first[acc..].iter().take_while(|&&ch| ch as usize == a).count();
    }

    // to_last[第一列行号] = 最后一列中同一字符的行号；计数器只在本次调用内有效
    let mut seen = vec![0usize; sigma];
    let mut to_last = vec![0usize; n];
    for (j, &a) in bwt.iter().enumerate() {
        let a = a as usize;
        to_last[start[a] + seen[a]] = j;
        seen[a] += 1;
    }

    let mut text = Vec::with_capacity(n);
    let mut row = 0usize;
    loop {
        text.push(first[row]);
        row = to_last[row];
        if row == 0 || text.len() == n {
            break;
        }
    }
    log::trace!("LF walk covered {} of {} rows", text.len(), n);
    text.rotate_left(1);
    text
}
