// パス: src/strpool.rs
// 役割: 出力三系統で共有する重複排除済み文字列プールを実装する
// 意図: 名前・型文字列を単一のバッファに集約し、安定なオフセットで参照させる
// 関連ファイル: src/emit/builtins.rs, src/emit/mod.rs

use std::collections::HashMap;
use std::fmt::Write as _;

/// NUL 区切りの文字列プール。オフセット 0 は常に空文字列。
///
/// 構築後は読み出し専用で、挿入順がそのまま出力順になる。
#[derive(Debug)]
pub struct StringPool {
    entries: Vec<String>,
    offsets: HashMap<String, u32>,
    len: u32,
}

impl StringPool {
    pub fn new() -> Self {
        let mut pool = Self {
            entries: Vec::new(),
            offsets: HashMap::new(),
            len: 0,
        };
        // オフセット 0 を空文字列に予約する
        pool.get_or_add("");
        pool
    }

    /// 文字列を登録しオフセットを返す。既登録なら既存のオフセット。
    pub fn get_or_add(&mut self, s: &str) -> u32 {
        if let Some(&offset) = self.offsets.get(s) {
            return offset;
        }
        let offset = self.len;
        self.entries.push(s.to_string());
        self.offsets.insert(s.to_string(), offset);
        self.len += s.len() as u32 + 1; // 終端 NUL の分
        offset
    }

    /// 既登録文字列のオフセット。
    pub fn offset_of(&self, s: &str) -> Option<u32> {
        self.offsets.get(s).copied()
    }

    /// プール全体を C の文字列定数として書き出す。
    pub fn emit_table(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "static const char {name}[] =");
        for entry in &self.entries {
            let _ = writeln!(out, "  \"{}\\0\"", escape_c(entry));
        }
        out.push_str(";\n");
    }
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_c(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
