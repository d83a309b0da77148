// パス: src/errors.rs
// 役割: 生成処理全体で共有するエラー型とエイリアスを定義する
// 意図: 致命的エラー（設定不整合・内部不変条件違反）を一箇所に集約し部分出力を防ぐ
// 関連ファイル: src/expand.rs, src/emit/mod.rs, src/record.rs

use std::io;

use thiserror::Error;

/// ディスクリプタ展開・テーブル生成で発生しうるエラー種別。
///
/// いずれも致命的であり、リトライや部分出力は行わない。決定的なバッチ変換で
/// 失敗するのは入力データまたはロジックの欠陥のみ。
#[derive(Debug, Error)]
pub enum GenError {
    /// 同名 builtin を生成した二つの宣言が構造的に一致しない（設定不整合）。
    #[error(
        "[GEN001] builtin `{builtin}` の宣言が一致しません（{field} が相違）: {first} / {second}"
    )]
    Inconsistent {
        builtin: String,
        field: &'static str,
        first: String,
        second: String,
    },
    /// 圧縮テーブルに存在するはずのシグネチャが見つからない（内部不変条件違反）。
    #[error("[GEN002] シグネチャがテーブルに存在しません: {what}")]
    SignatureNotFound { what: String },
    /// ポリシー operand を要求するファミリが tail/mask いずれのポリシーも持たない。
    #[error(
        "[GEN003] ファミリ `{name}` はポリシー operand を要求しますが tail/mask ポリシーを持ちません"
    )]
    UnsupportedPolicyConfig { name: String },
    #[error("[GEN004] IO error: {0}")]
    Io(#[from] io::Error),
    #[error("[GEN005] レコード読み込みに失敗しました: {0}")]
    Load(#[from] serde_json::Error),
    /// レコードの内容が値域外（ディスクリプタの範囲・operand 数・NF）。
    #[error("[GEN006] レコード `{name}` が不正です: {what}")]
    InvalidRecord { name: String, what: String },
}

/// 生成処理の結果を表す型。
pub type GenResult<T> = Result<T, GenError>;
