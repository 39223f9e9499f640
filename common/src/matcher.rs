//! ブランド照合
//!
//! オペレーターが入力したブランド名を参照シートの行に対応付ける。
//! 以下の順に試し、最初に一致した方式で確定する（方式間のスコア比較はしない）:
//! 1. EXACT: 小文字名が完全一致
//! 2. CONTAINS: 行の名前がクエリに含まれる（"TD Bank" ⊃ "td"）
//! 3. PARTIAL: クエリが行の名前に含まれる
//! 4. FUZZY(n): 空白区切りの単語の共通数が最大の行（2語以上）
//!
//! どれにも該当しなければ NOT_FOUND（エラーではない）。

use crate::types::{MatchKind, MatchResult, ReferenceBrandRow};
use std::collections::HashSet;

/// FUZZYとみなす最低共通単語数
pub const MIN_FUZZY_WORDS: usize = 2;

/// クエリに最も合う参照行を探す
///
/// 各段階は表の順に線形走査し、同点は先に見つかった行を採用する。
pub fn find_best_match<'a>(query: &str, rows: &'a [ReferenceBrandRow]) -> MatchResult<'a> {
    let query = query.trim().to_lowercase();

    if let Some(row) = rows.iter().find(|r| r.name_lower == query) {
        return MatchResult::found(row, MatchKind::Exact);
    }

    if let Some(row) = rows.iter().find(|r| query.contains(r.name_lower.as_str())) {
        return MatchResult::found(row, MatchKind::Contains);
    }

    if let Some(row) = rows.iter().find(|r| r.name_lower.contains(query.as_str())) {
        return MatchResult::found(row, MatchKind::Partial);
    }

    match best_word_overlap(&query, rows) {
        Some((row, score)) => MatchResult::found(row, MatchKind::Fuzzy(score)),
        None => MatchResult::not_found(),
    }
}

/// 複数クエリをまとめて照合（入力順）
pub fn match_all<'a, S: AsRef<str>>(
    queries: &[S],
    rows: &'a [ReferenceBrandRow],
) -> Vec<MatchResult<'a>> {
    queries
        .iter()
        .map(|q| find_best_match(q.as_ref(), rows))
        .collect()
}

fn words(text: &str) -> HashSet<&str> {
    text.split_whitespace().collect()
}

/// 共通単語数が最大の行（MIN_FUZZY_WORDS 未満は対象外）
fn best_word_overlap<'a>(
    query: &str,
    rows: &'a [ReferenceBrandRow],
) -> Option<(&'a ReferenceBrandRow, usize)> {
    let query_words = words(query);
    let mut best: Option<(&ReferenceBrandRow, usize)> = None;

    for row in rows {
        let score = words(&row.name_lower).intersection(&query_words).count();
        let best_score = best.map(|(_, s)| s).unwrap_or(0);
        if score >= MIN_FUZZY_WORDS && score > best_score {
            best = Some((row, score));
        }
    }

    best
}
