use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

pub const DEFAULT_SENTINEL: u8 = b'$';

/// 含哨兵在内最多 255 个符号；u8::MAX 留作“不在字母表中”的标记。
pub const MAX_SIGMA: usize = 255;

/// 索引以 u32 保存位置与计数，文本（含哨兵）长度不得超过 u32::MAX。
pub const MAX_TEXT_LEN: usize = u32::MAX as usize;

const ABSENT: u8 = u8::MAX;

/// 定长字母表：符号按字节序排列，哨兵固定为 rank 0。
///
/// 文本在建索引前被编码为 rank 序列（0 = 哨兵，1.. = 其余符号），
/// 因此无论哨兵的字节值是多少，它都小于字母表中的所有符号。
/// 查表使用 256 项的数组，避免逐字符哈希。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alphabet {
    /// rank -> 符号，symbols[0] 为哨兵
    symbols: Vec<u8>,
    /// 符号 -> rank，长度 256
    ranks: Vec<u8>,
}

impl Alphabet {
    /// 声明一个字母表。symbols 会被排序去重，不得包含哨兵。
    pub fn new(symbols: &[u8], sentinel: u8) -> Result<Self> {
        let mut sorted = symbols.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.binary_search(&sentinel).is_ok() {
            return Err(ValidationError::InvalidAlphabet(format!(
                "sentinel {:?} is also listed as a symbol",
                char::from(sentinel)
            )));
        }
        if sorted.len() + 1 > MAX_SIGMA {
            return Err(ValidationError::InvalidAlphabet(format!(
                "{} symbols plus the sentinel exceed the limit of {}",
                sorted.len(),
                MAX_SIGMA
            )));
        }
        Ok(Self::from_sorted(sentinel, &sorted))
    }

    /// 取序列中出现过的全部非哨兵字节作为字母表。
    pub fn from_sequence(seq: &[u8], sentinel: u8) -> Result<Self> {
        let mut seen = [false; 256];
        for &b in seq {
            seen[b as usize] = true;
        }
        seen[sentinel as usize] = false;
        let symbols: Vec<u8> = (0..=u8::MAX).filter(|&b| seen[b as usize]).collect();
        Self::new(&symbols, sentinel)
    }

    /// {$, A, C, G, T}
    pub fn dna() -> Self {
        Self::from_sorted(DEFAULT_SENTINEL, b"ACGT")
    }

    fn from_sorted(sentinel: u8, sorted: &[u8]) -> Self {
        let mut symbols = Vec::with_capacity(sorted.len() + 1);
        symbols.push(sentinel);
        symbols.extend_from_slice(sorted);
        let mut ranks = vec![ABSENT; 256];
        for (r, &s) in symbols.iter().enumerate() {
            ranks[s as usize] = r as u8;
        }
        Self { symbols, ranks }
    }

    #[inline]
    pub fn sentinel(&self) -> u8 {
        self.symbols[0]
    }

    /// 含哨兵在内的符号数
    #[inline]
    pub fn sigma(&self) -> usize {
        self.symbols.len()
    }

    /// 按 rank 排列的全部符号（首位为哨兵）
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    #[inline]
    pub fn rank(&self, symbol: u8) -> Option<u8> {
        match self.ranks[symbol as usize] {
            ABSENT => None,
            r => Some(r),
        }
    }

    #[inline]
    pub fn symbol(&self, rank: u8) -> u8 {
        self.symbols[rank as usize]
    }

    /// 校验并编码待建索引的序列：非空、所有符号属于字母表、
    /// 哨兵恰好出现一次且位于末尾。
    pub fn encode(&self, seq: &[u8]) -> Result<Vec<u8>> {
        let (text, sentinel_pos) = self.encode_with_single_sentinel(seq)?;
        if sentinel_pos != text.len() - 1 {
            return Err(ValidationError::SentinelNotTerminal {
                sentinel: char::from(self.sentinel()),
                position: sentinel_pos,
            });
        }
        Ok(text)
    }

    /// 校验并编码 BWT 串：哨兵恰好出现一次，位置不限。
    pub fn encode_transform(&self, bwt: &[u8]) -> Result<Vec<u8>> {
        self.encode_with_single_sentinel(bwt).map(|(text, _)| text)
    }

    /// 编码模式串；含字母表外符号时返回 None（必然无匹配，不是错误）。
    pub fn encode_pattern(&self, pattern: &[u8]) -> Option<Vec<u8>> {
        pattern.iter().map(|&b| self.rank(b)).collect()
    }

    pub fn decode(&self, ranks: &[u8]) -> Vec<u8> {
        ranks.iter().map(|&r| self.symbol(r)).collect()
    }

    fn encode_with_single_sentinel(&self, seq: &[u8]) -> Result<(Vec<u8>, usize)> {
        if seq.is_empty() {
            return Err(ValidationError::EmptySequence);
        }
        check_len(seq.len())?;
        let mut text = Vec::with_capacity(seq.len());
        let mut count = 0usize;
        let mut first = 0usize;
        for (i, &b) in seq.iter().enumerate() {
            let r = self.rank(b).ok_or(ValidationError::UnknownSymbol {
                symbol: char::from(b),
                position: i,
            })?;
            if r == 0 {
                if count == 0 {
                    first = i;
                }
                count += 1;
            }
            text.push(r);
        }
        let sentinel = char::from(self.sentinel());
        match count {
            0 => Err(ValidationError::MissingSentinel { sentinel }),
            1 => Ok((text, first)),
            _ => Err(ValidationError::AmbiguousSentinel { sentinel, count }),
        }
    }
}

fn check_len(len: usize) -> Result<()> {
    if len > MAX_TEXT_LEN {
        return Err(ValidationError::SequenceTooLong { len, max: MAX_TEXT_LEN });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_ranks_lowest_regardless_of_byte_value() {
        // '~' 的字节值大于所有字母，但仍是 rank 0
        let a = Alphabet::new(b"ba", b'~').unwrap();
        assert_eq!(a.symbols(), b"~ab");
        assert_eq!(a.rank(b'~'), Some(0));
        assert_eq!(a.rank(b'a'), Some(1));
        assert_eq!(a.rank(b'b'), Some(2));
        assert_eq!(a.rank(b'c'), None);
    }

    #[test]
    fn from_sequence_collects_distinct_symbols() {
        let a = Alphabet::from_sequence(b"banana$", b'$').unwrap();
        assert_eq!(a.symbols(), b"$abn");
        assert_eq!(a.sigma(), 4);
        assert_eq!(a.encode(b"banana$").unwrap(), vec![2, 1, 3, 1, 3, 1, 0]);
    }

    #[test]
    fn dna_preset() {
        let a = Alphabet::dna();
        assert_eq!(a.symbols(), b"$ACGT");
        assert_eq!(a.decode(&[4, 1, 3, 0]), b"TAG$");
    }

    #[test]
    fn encode_rejects_bad_sequences() {
        let a = Alphabet::dna();
        assert_eq!(a.encode(b""), Err(ValidationError::EmptySequence));
        assert_eq!(a.encode(b"ACGT"), Err(ValidationError::MissingSentinel { sentinel: '$' }));
        assert_eq!(
            a.encode(b"AC$GT$"),
            Err(ValidationError::AmbiguousSentinel { sentinel: '$', count: 2 })
        );
        assert_eq!(
            a.encode(b"AC$GT"),
            Err(ValidationError::SentinelNotTerminal { sentinel: '$', position: 2 })
        );
        assert_eq!(
            a.encode(b"ACNT$"),
            Err(ValidationError::UnknownSymbol { symbol: 'N', position: 2 })
        );
    }

    #[test]
    fn transform_may_hold_sentinel_anywhere() {
        let a = Alphabet::from_sequence(b"annb$aa", b'$').unwrap();
        assert!(a.encode_transform(b"annb$aa").is_ok());
        assert!(matches!(
            a.encode_transform(b"an$b$aa"),
            Err(ValidationError::AmbiguousSentinel { count: 2, .. })
        ));
    }

    #[test]
    fn invalid_alphabets() {
        assert!(matches!(Alphabet::new(b"a$b", b'$'), Err(ValidationError::InvalidAlphabet(_))));
        let all: Vec<u8> = (0..=u8::MAX).collect();
        assert!(matches!(Alphabet::from_sequence(&all, 0), Err(ValidationError::InvalidAlphabet(_))));
        let most: Vec<u8> = (0..254u8).collect();
        assert_eq!(Alphabet::from_sequence(&most, 254).unwrap().sigma(), MAX_SIGMA);
    }

    #[test]
    fn length_limit_fits_u32_positions() {
        assert!(check_len(MAX_TEXT_LEN).is_ok());
        assert_eq!(u32::try_from(MAX_TEXT_LEN - 1).ok(), Some(u32::MAX - 1));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn overlong_sequence_is_rejected() {
        assert_eq!(
            check_len(MAX_TEXT_LEN + 1),
            Err(ValidationError::SequenceTooLong { len: MAX_TEXT_LEN + 1, max: MAX_TEXT_LEN })
        );
    }

    #[test]
    fn pattern_outside_alphabet_is_none() {
        let a = Alphabet::dna();
        assert_eq!(a.encode_pattern(b"GA"), Some(vec![3, 1]));
        assert_eq!(a.encode_pattern(b"GXA"), None);
        assert_eq!(a.encode_pattern(b""), Some(vec![]));
    }
}
