// パス: src/record.rs
// 役割: 宣言的な intrinsic ファミリレコードと要素型・LMUL のビット集合を定義する
// 意図: 外部ローダから受け取る不変の入力スキーマを型で固定し、順序依存の再現性を保つ
// 関連ファイル: src/descriptor.rs, src/policy.rs, src/expand.rs, src/emit/sema.rs
//! ファミリレコード
//!
//! 入力は順序付きの `Vec<FamilyRecord>`。順序は安定ソートのタイブレークと
//! テーブル挿入順を決めるため意味を持つ（同一入力 ⇒ バイト同一出力）。
//! レコード源泉フォーマットの構文解析は対象外で、ここでは serde による
//! 構造的な読み込みのみを提供する。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::descriptor::{BasicType, PrototypeDescriptor, Signature, VectorModifier};
use crate::errors::{GenError, GenResult};
use crate::policy::PolicyScheme;

/// 対応要素型のビット集合。ビット位置は `BasicType` の判別値。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRangeSet(pub u8);

impl TypeRangeSet {
    pub fn from_types(types: &[BasicType]) -> Self {
        let mut set = Self::default();
        for &t in types {
            set.insert(t);
        }
        set
    }

    pub fn insert(&mut self, t: BasicType) {
        self.0 |= t.bit();
    }

    pub fn contains(self, t: BasicType) -> bool {
        self.0 & t.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// 永続形式のマスク値。
    pub fn mask(self) -> u8 {
        self.0
    }

    /// ビット位置昇順の列挙。
    pub fn iter(self) -> impl Iterator<Item = BasicType> {
        BasicType::ALL.into_iter().filter(move |t| self.contains(*t))
    }
}

/// 対応 LMUL のビット集合。ビット位置は log2(LMUL) + 3（mf8 = bit0 .. m8 = bit6）。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LmulSet(pub u8);

impl LmulSet {
    /// log2(LMUL) 値のリストから構築する（-3..=3 以外は無視しない前提の入力）。
    pub fn from_log2_list(list: &[i8]) -> Self {
        let mut set = Self::default();
        for &l in list {
            set.insert(l);
        }
        set
    }

    pub fn insert(&mut self, log2_lmul: i8) {
        self.0 |= 1 << (log2_lmul + 3);
    }

    pub fn contains(self, log2_lmul: i8) -> bool {
        self.0 & (1 << (log2_lmul + 3)) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn mask(self) -> u8 {
        self.0
    }

    /// log2(LMUL) 昇順（-3..=3）の列挙。
    pub fn iter(self) -> impl Iterator<Item = i8> {
        (-3i8..=3).filter(move |l| self.contains(*l))
    }
}

/// 一つの intrinsic ファミリを表す宣言的レコード。読み込み後は不変。
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FamilyRecord {
    pub name: String,
    /// 空なら `name` から導出する。
    #[serde(default)]
    pub overloaded_name: String,
    /// 基本シグネチャ。operand 0 は結果型。
    pub prototype: Signature,
    #[serde(default)]
    pub suffix: Signature,
    #[serde(default)]
    pub overloaded_suffix: Signature,
    pub type_range: TypeRangeSet,
    pub lmuls: LmulSet,
    #[serde(default)]
    pub required_extensions: Vec<String>,
    /// セグメント load/store のフィールド数。1 より大きければセグメント形式。
    #[serde(default = "default_nf")]
    pub nf: u8,
    #[serde(default)]
    pub is_tuple: bool,
    #[serde(default)]
    pub has_masked: bool,
    #[serde(default)]
    pub has_vl: bool,
    #[serde(default)]
    pub has_masked_off_operand: bool,
    #[serde(default)]
    pub has_tail_policy: bool,
    #[serde(default)]
    pub has_mask_policy: bool,
    #[serde(default)]
    pub has_frm_round_mode_op: bool,
    #[serde(default)]
    pub support_overloading: bool,
    #[serde(default)]
    pub has_builtin_alias: bool,
    #[serde(default)]
    pub unmasked_policy_scheme: PolicyScheme,
    #[serde(default)]
    pub masked_policy_scheme: PolicyScheme,
    /// 低レベル intrinsic 名。直接の対応がなければ空。
    #[serde(default)]
    pub ir_name: String,
    #[serde(default)]
    pub masked_ir_name: String,
    /// 手書き codegen 片。空でなければ自動 operand 並べ替えを迂回する。
    #[serde(default)]
    pub manual_codegen: String,
    /// オーバーロード解決に型を具象化する operand 番号（-1 は結果型）。
    #[serde(default)]
    pub intrinsic_types: Vec<i32>,
}

fn default_nf() -> u8 {
    1
}

impl FamilyRecord {
    /// オーバーロード名（未指定なら基本名）。
    pub fn overloaded_or_name(&self) -> &str {
        if self.overloaded_name.is_empty() {
            &self.name
        } else {
            &self.overloaded_name
        }
    }

    /// マクロ定義専用の擬似ファミリか（型×LMUL の直積を持たない）。
    pub fn is_pseudo(&self) -> bool {
        self.name == "vsetvli" || self.name == "vsetvlimax"
    }

    /// レコード内容の値域検査。展開・出力の前に必ず通す。
    ///
    /// serde を通過した後でもディスクリプタの値域外や operand 不足はありうる
    /// ため、パニックではなく設定エラーとして報告する。
    pub fn validate(&self) -> GenResult<()> {
        let invalid = |what: String| {
            Err(GenError::InvalidRecord {
                name: self.name.clone(),
                what,
            })
        };
        for (label, sig) in [
            ("prototype", &self.prototype),
            ("suffix", &self.suffix),
            ("overloaded_suffix", &self.overloaded_suffix),
        ] {
            for desc in sig {
                if let Err(what) = check_descriptor(desc) {
                    return invalid(format!("{label}: {what}"));
                }
            }
        }
        if !(1..=8).contains(&self.nf) {
            return invalid(format!("NF {} は 1..=8 の範囲外です", self.nf));
        }
        if !self.is_pseudo() && self.prototype.is_empty() {
            return invalid("prototype が空です".to_string());
        }
        if (self.nf > 1 || self.is_tuple) && self.prototype.len() < 2 {
            return invalid(
                "セグメント/タプル形式には結果とアドレスの 2 operand 以上が必要です".to_string(),
            );
        }
        Ok(())
    }
}

/// ディスクリプタ単体の値域検査。
fn check_descriptor(desc: &PrototypeDescriptor) -> Result<(), String> {
    match desc.vector {
        VectorModifier::Tuple(nf) if !(2..=8).contains(&nf) => {
            Err(format!("タプル NF {nf} は 2..=8 の範囲外です"))
        }
        VectorModifier::FixedLog2Lmul(l) if !(-3..=3).contains(&l) => {
            Err(format!("固定 log2(LMUL) {l} は -3..=3 の範囲外です"))
        }
        VectorModifier::Log2Eew(k) if !(3..=6).contains(&k) => {
            Err(format!("log2(EEW) {k} は 3..=6 の範囲外です"))
        }
        _ => Ok(()),
    }
}

/// JSON 文字列から順序付きレコード列を読み込み、値域を検査する。
pub fn load_records(json: &str) -> GenResult<Vec<FamilyRecord>> {
    let records: Vec<FamilyRecord> = serde_json::from_str(json)?;
    for record in &records {
        record.validate()?;
    }
    Ok(records)
}

/// ファイルから順序付きレコード列を読み込む。
pub fn load_records_from_path(path: &Path) -> GenResult<Vec<FamilyRecord>> {
    load_records(&fs::read_to_string(path)?)
}
