//! 演示如何在 library 模式下使用 bwt-index。
//!
//! 运行方式：
//! ```bash
//! cargo run --example simple_search
//! ```

use bwt_index::index::{bwt, sa};
use bwt_index::{build_index, Alphabet};

fn main() -> bwt_index::Result<()> {
    // 1. 序列，末尾为唯一哨兵
    let seq = b"TAGACAGAGA$";
    println!("序列: {}", String::from_utf8_lossy(seq));

    // 2. 后缀数组与 BWT
    let alphabet = Alphabet::from_sequence(seq, b'$')?;
    let text = alphabet.encode(seq)?;
    let sa_arr = sa::build_sa(&text);
    let bwt_arr = bwt::build_bwt(&text, &sa_arr);
    println!("后缀数组: {:?}", sa_arr);
    println!("BWT: {}", String::from_utf8_lossy(&alphabet.decode(&bwt_arr)));
    println!("第一列: {}", String::from_utf8_lossy(&alphabet.decode(&bwt::first_column(&bwt_arr, alphabet.sigma()))));

    // 3. FM 索引与精确匹配
    let idx = build_index(seq)?;
    for pat in ["AGA", "T", "A", "TAG", "GACAG", "CC"] {
        println!("search({}) = {:?}", pat, idx.search(pat.as_bytes()));
    }

    // 4. 并发查询
    let batch = ["AG", "GA", "CA"];
    for (pat, hits) in batch.iter().zip(idx.search_many(&batch)) {
        println!("search_many: {} -> {:?}", pat, hits);
    }

    // 5. 逆变换
    let transform = idx.transform();
    let original = bwt_index::invert(&transform, b'$')?;
    println!("invert({}) = {}", String::from_utf8_lossy(&transform), String::from_utf8_lossy(&original));

    Ok(())
}
