// パス: src/descriptor.rs
// 役割: operand 形状を表す型ディスクリプタ（PrototypeDescriptor）と要素型・修飾子を定義する
// 意図: intrinsic ファミリの型構築規則を不変の値型として表し、辞書キー・圧縮検索に使えるようにする
// 関連ファイル: src/record.rs, src/resolve.rs, src/sigtable.rs
//! ディスクリプタモデル
//!
//! 各 operand は `(基本種別, ベクトル修飾子, 要素修飾子)` の三つ組で表す。
//! 実際の型（`vint32m1_t` など）への解決は `resolve` モジュールの責務であり、
//! ここでは純粋なデータ表現と構造的な等価・順序付けのみを提供する。

use serde::{Deserialize, Serialize};

/// intrinsic が対応しうる要素型の閉じた集合。
///
/// 判別値はビット位置としてそのまま永続形式（TypeRangeSet のマスク）に使う。
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BasicType {
    Int8 = 0,
    Int16 = 1,
    Int32 = 2,
    Int64 = 3,
    Float16 = 4,
    Float32 = 5,
    Float64 = 6,
    BFloat16 = 7,
}

impl BasicType {
    /// ビット位置順の全要素型。
    pub const ALL: [BasicType; 8] = [
        BasicType::Int8,
        BasicType::Int16,
        BasicType::Int32,
        BasicType::Int64,
        BasicType::Float16,
        BasicType::Float32,
        BasicType::Float64,
        BasicType::BFloat16,
    ];

    /// マスク永続形式におけるビット値。
    pub fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// SEW（要素ビット幅）。
    pub fn element_bits(self) -> u32 {
        match self {
            BasicType::Int8 => 8,
            BasicType::Int16 | BasicType::Float16 | BasicType::BFloat16 => 16,
            BasicType::Int32 | BasicType::Float32 => 32,
            BasicType::Int64 | BasicType::Float64 => 64,
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            BasicType::Int8 | BasicType::Int16 | BasicType::Int32 | BasicType::Int64
        )
    }

    pub fn is_float(self) -> bool {
        matches!(
            self,
            BasicType::Float16 | BasicType::Float32 | BasicType::Float64
        )
    }

    pub fn is_bfloat(self) -> bool {
        self == BasicType::BFloat16
    }
}

/// operand の基本種別。
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BaseKind {
    Vector,
    Scalar,
    Pointer,
    Mask,
    Void,
    /// VL operand 等に使う `size_t`。
    SizeT,
    /// ストライド operand 等に使う `ptrdiff_t`。
    Ptrdiff,
}

/// ベクトル形状がインスタンスの基底 (要素型, LMUL) からどう導出されるか。
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VectorModifier {
    NoModifier,
    /// SEW・LMUL を 2 倍に広げる。
    Widen2,
    Widen4,
    Widen8,
    /// SEW・LMUL を半分に狭める。
    Narrow2,
    /// NF 本のサブベクトルを束ねたタプル（2..=8）。
    Tuple(u8),
    /// LMUL を固定値 log2(LMUL) に差し替える（-3..=3）。
    FixedLog2Lmul(i8),
    /// 要素幅を 2^k ビットに固定し LMUL 比を保つ（k = 3..=6、インデックス operand 用）。
    Log2Eew(u8),
}

impl VectorModifier {
    /// NF からタプル修飾子を得る。NF の妥当性（2..=8）は型解決側で検査する。
    pub fn tuple(nf: u8) -> Self {
        VectorModifier::Tuple(nf)
    }
}

/// 要素型の上書き規則。
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ElementModifier {
    /// インスタンスの基底要素型をそのまま使う。
    SameAsBase,
    SignedInteger,
    UnsignedInteger,
    Float,
    BFloat,
}

/// 一つの operand の型構築規則を表す不変の三つ組。
///
/// operand 0 は常に結果型。等価・順序は構造的で、圧縮テーブルの
/// 部分列検索と辞書キーの双方に用いる。
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrototypeDescriptor {
    pub base: BaseKind,
    pub vector: VectorModifier,
    pub element: ElementModifier,
}

impl PrototypeDescriptor {
    pub const fn new(base: BaseKind, vector: VectorModifier, element: ElementModifier) -> Self {
        Self {
            base,
            vector,
            element,
        }
    }

    /// 無修飾のベクトル operand。
    pub const VECTOR: Self = Self::new(
        BaseKind::Vector,
        VectorModifier::NoModifier,
        ElementModifier::SameAsBase,
    );

    /// マスク operand。
    pub const MASK: Self = Self::new(
        BaseKind::Mask,
        VectorModifier::NoModifier,
        ElementModifier::SameAsBase,
    );

    /// 末尾に付く vector-length operand。
    pub const VL: Self = Self::new(
        BaseKind::SizeT,
        VectorModifier::NoModifier,
        ElementModifier::SameAsBase,
    );

    /// ポインタ operand から被参照ベクトル型の規則を導出する（maskedoff 生成用）。
    pub fn to_vector(self) -> Self {
        Self {
            base: BaseKind::Vector,
            ..self
        }
    }

    /// 永続形式（シグネチャテーブル出力）で使う整数エンコード。
    pub fn codes(self) -> (u8, u8, u8) {
        let base = match self.base {
            BaseKind::Vector => 0,
            BaseKind::Scalar => 1,
            BaseKind::Pointer => 2,
            BaseKind::Mask => 3,
            BaseKind::Void => 4,
            BaseKind::SizeT => 5,
            BaseKind::Ptrdiff => 6,
        };
        let vector = match self.vector {
            VectorModifier::NoModifier => 0,
            VectorModifier::Widen2 => 1,
            VectorModifier::Widen4 => 2,
            VectorModifier::Widen8 => 3,
            VectorModifier::Narrow2 => 4,
            VectorModifier::Tuple(nf) => 5 + (nf - 2),
            VectorModifier::FixedLog2Lmul(l) => 12 + (l + 3) as u8,
            VectorModifier::Log2Eew(k) => 19 + (k - 3),
        };
        let element = match self.element {
            ElementModifier::SameAsBase => 0,
            ElementModifier::SignedInteger => 1,
            ElementModifier::UnsignedInteger => 2,
            ElementModifier::Float => 3,
            ElementModifier::BFloat => 4,
        };
        (base, vector, element)
    }
}

/// operand 列。先頭（index 0）は結果型。
pub type Signature = Vec<PrototypeDescriptor>;
