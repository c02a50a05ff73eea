/// ヘッダー値パースの制限設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLimits {
    /// 最大ヘッダー値長 (デフォルト: 8KB)
    pub max_value_size: usize,
    /// カンマ区切りリストの最大要素数 (デフォルト: 64)
    pub max_list_items: usize,
    /// Range ヘッダーの最大レンジ数 (デフォルト: 16)
    ///
    /// レンジ 1 つごとに multipart/byteranges のパートが 1 つ生成される。
    pub max_range_specs: usize,
    /// クエリ文字列の最大フィールド数 (デフォルト: 1000)
    pub max_query_fields: usize,
}

impl Default for HeaderLimits {
    fn default() -> Self {
        Self {
            max_value_size: 8 * 1024, // 8KB
            max_list_items: 64,
            max_range_specs: 16,
            max_query_fields: 1000,
        }
    }
}

impl HeaderLimits {
    /// 制限なしの設定を作成
    pub fn unlimited() -> Self {
        Self {
            max_value_size: usize::MAX,
            max_list_items: usize::MAX,
            max_range_specs: usize::MAX,
            max_query_fields: usize::MAX,
        }
    }

    /// ヘッダー値長を検査 (超過時は `(size, limit)` を返す)
    pub(crate) fn check_value_size(&self, input: &str) -> Result<(), (usize, usize)> {
        if input.len() > self.max_value_size {
            return Err((input.len(), self.max_value_size));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let limits = HeaderLimits::default();
        assert_eq!(limits.max_value_size, 8192);
        assert_eq!(limits.max_list_items, 64);
        assert_eq!(limits.max_range_specs, 16);
        assert_eq!(limits.max_query_fields, 1000);
    }

    #[test]
    fn test_check_value_size() {
        let limits = HeaderLimits {
            max_value_size: 4,
            ..Default::default()
        };
        assert!(limits.check_value_size("abcd").is_ok());
        assert_eq!(limits.check_value_size("abcde"), Err((5, 4)));
        assert!(HeaderLimits::unlimited().check_value_size("abcde").is_ok());
    }
}
