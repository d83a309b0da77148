// パス: src/emit/mod.rs
// 役割: 四つの出力モード（ヘッダ宣言・builtin メタデータ・codegen 表・意味解析表）を束ねるファサード
// 意図: 同一のインスタンス列から各出力を独立に導出し、バイト同一の再現性を保つ
// 関連ファイル: src/emit/header.rs, src/emit/builtins.rs, src/emit/codegen.rs, src/emit/sema.rs
//! 出力モジュール群
//!
//! - `header`: 型エイリアスと関数宣言
//! - `builtins`: 列挙子・文字列プール・builtin 情報表
//! - `codegen`: case ラベルと共有 codegen 本体
//! - `sema`: 圧縮シグネチャテーブルと per-family コンパクトレコード

pub mod builtins;
pub mod codegen;
pub mod header;
pub mod sema;

use crate::errors::GenResult;
use crate::expand::expand_all;
use crate::record::FamilyRecord;
use crate::resolve::TypeResolver;

/// 出力モード。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmitMode {
    Header,
    Builtins,
    Codegen,
    Sema,
}

/// 指定モードの出力を文字列として生成する。
pub fn emit<R: TypeResolver>(
    mode: EmitMode,
    records: &[FamilyRecord],
    resolver: &mut R,
) -> GenResult<String> {
    // 読み込みを迂回して構築されたレコードもここで値域を検査する
    for record in records {
        record.validate()?;
    }
    match mode {
        EmitMode::Header => {
            let instances = expand_all(records, resolver)?;
            header::emit(&instances, resolver)
        }
        EmitMode::Builtins => {
            let instances = expand_all(records, resolver)?;
            builtins::emit(&instances)
        }
        EmitMode::Codegen => {
            let instances = expand_all(records, resolver)?;
            codegen::emit(&instances)
        }
        EmitMode::Sema => sema::emit(records),
    }
}
