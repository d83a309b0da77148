// パス: src/lib.rs
// 役割: Crate root wiring modules and exports
// 意図: Expose minimal API surface for descriptor compilation components
// 関連ファイル: src/expand.rs, src/emit/mod.rs, src/record.rs
//! rvvgen ルートモジュール
//!
//! 目的:
//! - 少数の宣言的 intrinsic ファミリ仕様を 型 × LMUL × masked × ポリシー の
//!   直積に展開し、ホストコンパイラ front end 向けの四系統の出力
//!   （宣言・メタデータ・codegen 表・意味解析表）を生成する。
//!
//! 方針:
//! - 単一スレッド・一回走査の決定的バッチ変換（同一入力 ⇒ バイト同一出力）。
//! - 失敗は全て致命的。部分出力やベストエフォートは行わない。
//! - 型解決は外部能力（`resolve::TypeResolver`）として差し替え可能にする。

pub mod descriptor;
pub mod emit;
pub mod errors;
pub mod expand;
pub mod policy;
pub mod record;
pub mod resolve;
pub mod sigtable;
pub mod strpool;

pub use crate::errors::{GenError, GenResult};
pub use crate::record::{load_records, load_records_from_path, FamilyRecord};

/// レコード列から指定モードの出力を生成する。
pub fn generate<R: resolve::TypeResolver>(
    records: &[FamilyRecord],
    resolver: &mut R,
    mode: emit::EmitMode,
) -> GenResult<String> {
    emit::emit(mode, records, resolver)
}
