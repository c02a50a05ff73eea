//! コンテントネゴシエーション
//!
//! ## 概要
//!
//! クライアントの重み付き希望リストと、サーバーが提供できる候補リストを突き合わせて
//! 1 つを選ぶ汎用アルゴリズムです。[`Accept`](crate::accept::Accept) と
//! [`Languages`](crate::language::Languages) がこのアルゴリズムを使います。
//!
//! - 希望リストは品質値の降順、同じ品質値なら特定度の降順に並べます (安定ソート)
//! - 希望を優先順に 1 つずつ取り出し、候補を与えられた順に試します
//! - 最初に一致した候補を返します
//!
//! 外側のループは希望リストです。そのため優先度の高いワイルドカードは、
//! 優先度の低い完全一致が候補リストの先頭にあっても、そちらより先に一致します。

use core::cmp::Ordering;

use crate::quality::{Quality, Specificity};

/// 重み付きの希望
pub trait Preference {
    /// 品質値
    fn quality(&self) -> Quality;

    /// 特定度
    fn specificity(&self) -> Specificity;

    /// 候補がこの希望に一致するか
    fn matches(&self, candidate: &str) -> bool;
}

/// 優先順の比較 (優先度の高いものが `Less`)
pub fn priority_order<P: Preference>(a: &P, b: &P) -> Ordering {
    b.quality()
        .cmp(&a.quality())
        .then_with(|| b.specificity().cmp(&a.specificity()))
}

/// 優先順に安定ソート
pub fn sort_by_priority<P: Preference>(items: &mut [P]) {
    items.sort_by(priority_order);
}

/// 希望リストと候補リストから 1 つを選ぶ
///
/// `preferences` は優先順に並んでいる必要があります。
/// 希望が 1 つもない場合は最初の候補を返します。
pub fn negotiate<'a, P, C>(preferences: &[P], supported: &'a [C]) -> Option<&'a C>
where
    P: Preference,
    C: AsRef<str>,
{
    if preferences.is_empty() {
        return supported.first();
    }

    preferences.iter().find_map(|preference| {
        supported
            .iter()
            .find(|candidate| preference.matches(candidate.as_ref()))
    })
}
