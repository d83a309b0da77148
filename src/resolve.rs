// パス: src/resolve.rs
// 役割: ディスクリプタから具象型（ベクトル/スカラ/マスク等）への解決インタフェースと既定実装
// 意図: 型解決を外部能力として trait で切り離し、展開エンジンからは不透明に扱えるようにする
// 関連ファイル: src/descriptor.rs, src/expand.rs, src/emit/header.rs
//! 型解決
//!
//! 解決の失敗（`None`）は「無効な組み合わせ」を意味し、展開側では該当
//! (要素型, LMUL) 対のスキップとして扱う。エラーではない。
//!
//! 既定実装 `RvvTypeResolver` は標準的な RVV の妥当性規則のみを実装する:
//! - SEW / LMUL 比は 64 以下（レジスタグループ上限）
//! - 要素幅は要素種別が許す範囲（整数 8..64、浮動 16/32/64、bfloat 16）
//! - タプルは NF × LMUL ≤ 8

use std::collections::HashMap;

use crate::descriptor::{
    BaseKind, BasicType, ElementModifier, PrototypeDescriptor, Signature, VectorModifier,
};

/// 解決済みの一つの operand 型。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedType {
    /// 公開ヘッダに書く C の型名（例: `vint32m1_t`）。
    pub c_name: String,
    /// メタデータ型文字列に使う圧縮コード（例: `Vi32m1`）。
    pub builtin_code: String,
    /// 名前サフィックスの構成要素（例: `i32m1`）。
    pub short_name: String,
    pub is_pointer: bool,
}

/// 型解決の外部能力。
pub trait TypeResolver {
    /// 一つのディスクリプタを解決する。`None` は無効な組み合わせ。
    fn resolve_one(
        &mut self,
        base: BasicType,
        log2_lmul: i8,
        desc: PrototypeDescriptor,
    ) -> Option<ResolvedType>;

    /// シグネチャ全体を解決する。いずれかの operand が無効なら全体が無効。
    fn resolve(
        &mut self,
        base: BasicType,
        log2_lmul: i8,
        nf: u8,
        signature: &Signature,
    ) -> Option<Vec<ResolvedType>> {
        let _ = nf; // タプル形状は記述子側に折り込まれている
        signature
            .iter()
            .map(|d| self.resolve_one(base, log2_lmul, *d))
            .collect()
    }

    /// サフィックスシグネチャから名前サフィックス文字列を作る。
    fn suffix(&mut self, base: BasicType, log2_lmul: i8, signature: &Signature) -> String {
        let parts: Vec<String> = signature
            .iter()
            .filter_map(|d| self.resolve_one(base, log2_lmul, *d))
            .map(|t| t.short_name)
            .collect();
        parts.join("_")
    }
}

/// 解決後の要素種別。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ElemKind {
    Signed,
    Unsigned,
    Float,
    BFloat,
}

impl ElemKind {
    fn of(base: BasicType, modifier: ElementModifier) -> ElemKind {
        match modifier {
            ElementModifier::SignedInteger => ElemKind::Signed,
            ElementModifier::UnsignedInteger => ElemKind::Unsigned,
            ElementModifier::Float => ElemKind::Float,
            ElementModifier::BFloat => ElemKind::BFloat,
            ElementModifier::SameAsBase => {
                if base.is_bfloat() {
                    ElemKind::BFloat
                } else if base.is_float() {
                    ElemKind::Float
                } else {
                    ElemKind::Signed
                }
            }
        }
    }

    fn valid_bits(self, bits: u32) -> bool {
        match self {
            ElemKind::Signed | ElemKind::Unsigned => matches!(bits, 8 | 16 | 32 | 64),
            ElemKind::Float => matches!(bits, 16 | 32 | 64),
            ElemKind::BFloat => bits == 16,
        }
    }
}

fn log2_bits(bits: u32) -> i8 {
    bits.trailing_zeros() as i8
}

fn lmul_str(log2_lmul: i8) -> &'static str {
    match log2_lmul {
        -3 => "mf8",
        -2 => "mf4",
        -1 => "mf2",
        0 => "m1",
        1 => "m2",
        2 => "m4",
        3 => "m8",
        _ => unreachable!("log2_lmul out of range"),
    }
}

fn scalar_names(kind: ElemKind, bits: u32) -> (String, String) {
    match kind {
        ElemKind::Signed => (format!("int{bits}_t"), {
            let c = match bits {
                8 => "c",
                16 => "s",
                32 => "i",
                _ => "l",
            };
            c.to_string()
        }),
        ElemKind::Unsigned => (format!("uint{bits}_t"), {
            let c = match bits {
                8 => "Uc",
                16 => "Us",
                32 => "Ui",
                _ => "Ul",
            };
            c.to_string()
        }),
        ElemKind::Float => match bits {
            16 => ("_Float16".to_string(), "x".to_string()),
            32 => ("float".to_string(), "f".to_string()),
            _ => ("double".to_string(), "d".to_string()),
        },
        ElemKind::BFloat => ("__bf16".to_string(), "y".to_string()),
    }
}

fn vector_elem_name(kind: ElemKind, bits: u32) -> (String, String) {
    // (C 名の要素部, short 名の要素部)
    match kind {
        ElemKind::Signed => (format!("int{bits}"), format!("i{bits}")),
        ElemKind::Unsigned => (format!("uint{bits}"), format!("u{bits}")),
        ElemKind::Float => (format!("float{bits}"), format!("f{bits}")),
        ElemKind::BFloat => ("bfloat16".to_string(), "bf16".to_string()),
    }
}

/// 既定の型リゾルバ。解決結果を (要素型, LMUL, 記述子) 単位でメモ化する。
#[derive(Default)]
pub struct RvvTypeResolver {
    cache: HashMap<(BasicType, i8, PrototypeDescriptor), Option<ResolvedType>>,
}

impl RvvTypeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// ベクトル修飾子を (要素ビット幅, log2LMUL, NF) へ適用する。
    fn apply_modifier(
        base_bits: u32,
        log2_lmul: i8,
        modifier: VectorModifier,
    ) -> Option<(u32, i8, u8)> {
        match modifier {
            VectorModifier::NoModifier => Some((base_bits, log2_lmul, 1)),
            VectorModifier::Widen2 => Some((base_bits * 2, log2_lmul + 1, 1)),
            VectorModifier::Widen4 => Some((base_bits * 4, log2_lmul + 2, 1)),
            VectorModifier::Widen8 => Some((base_bits * 8, log2_lmul + 3, 1)),
            VectorModifier::Narrow2 => {
                if base_bits < 16 {
                    return None;
                }
                Some((base_bits / 2, log2_lmul - 1, 1))
            }
            VectorModifier::Tuple(nf) => {
                if !(2..=8).contains(&nf) {
                    return None;
                }
                Some((base_bits, log2_lmul, nf))
            }
            VectorModifier::FixedLog2Lmul(l) => Some((base_bits, l, 1)),
            VectorModifier::Log2Eew(k) => {
                if !(3..=6).contains(&k) {
                    return None;
                }
                let bits = 1u32 << k;
                let shift = log2_bits(bits) - log2_bits(base_bits);
                Some((bits, log2_lmul + shift, 1))
            }
        }
    }

    fn compute(
        &self,
        base: BasicType,
        log2_lmul: i8,
        desc: PrototypeDescriptor,
    ) -> Option<ResolvedType> {
        let kind = ElemKind::of(base, desc.element);
        match desc.base {
            BaseKind::Void => Some(ResolvedType {
                c_name: "void".to_string(),
                builtin_code: "v".to_string(),
                short_name: String::new(),
                is_pointer: false,
            }),
            BaseKind::SizeT => Some(ResolvedType {
                c_name: "size_t".to_string(),
                builtin_code: "z".to_string(),
                short_name: String::new(),
                is_pointer: false,
            }),
            BaseKind::Ptrdiff => Some(ResolvedType {
                c_name: "ptrdiff_t".to_string(),
                builtin_code: "t".to_string(),
                short_name: String::new(),
                is_pointer: false,
            }),
            BaseKind::Scalar => {
                let (bits, _, _) =
                    Self::apply_modifier(base.element_bits(), log2_lmul, desc.vector)?;
                if !kind.valid_bits(bits) {
                    return None;
                }
                let (c_name, code) = scalar_names(kind, bits);
                Some(ResolvedType {
                    short_name: code.clone(),
                    c_name,
                    builtin_code: code,
                    is_pointer: false,
                })
            }
            BaseKind::Pointer => {
                let (bits, _, _) =
                    Self::apply_modifier(base.element_bits(), log2_lmul, desc.vector)?;
                if !kind.valid_bits(bits) {
                    return None;
                }
                let (c_name, code) = scalar_names(kind, bits);
                Some(ResolvedType {
                    c_name: format!("{c_name} *"),
                    builtin_code: format!("P{code}"),
                    short_name: String::new(),
                    is_pointer: true,
                })
            }
            BaseKind::Mask => {
                let (bits, l, _) =
                    Self::apply_modifier(base.element_bits(), log2_lmul, desc.vector)?;
                if !(-3..=3).contains(&l) {
                    return None;
                }
                let log2_ratio = log2_bits(bits) - l;
                if !(0..=6).contains(&log2_ratio) {
                    return None;
                }
                let ratio = 1u32 << log2_ratio;
                Some(ResolvedType {
                    c_name: format!("vbool{ratio}_t"),
                    builtin_code: format!("Vb{ratio}"),
                    short_name: format!("b{ratio}"),
                    is_pointer: false,
                })
            }
            BaseKind::Vector => {
                let (bits, l, nf) =
                    Self::apply_modifier(base.element_bits(), log2_lmul, desc.vector)?;
                if !(-3..=3).contains(&l) || !kind.valid_bits(bits) {
                    return None;
                }
                // SEW / LMUL ≤ 64: 群あたりの要素数が 1 を下回る構成を除外する
                if log2_bits(bits) - l > 6 {
                    return None;
                }
                // タプルはレジスタグループ合計が m8 を超えない
                if nf > 1 && l > 0 && (u32::from(nf) << l) > 8 {
                    return None;
                }
                let (c_elem, short_elem) = vector_elem_name(kind, bits);
                let lmul = lmul_str(l);
                let tuple = if nf > 1 {
                    format!("x{nf}")
                } else {
                    String::new()
                };
                Some(ResolvedType {
                    c_name: format!("v{c_elem}{lmul}{tuple}_t"),
                    builtin_code: format!("V{short_elem}{lmul}{tuple}"),
                    short_name: format!("{short_elem}{lmul}{tuple}"),
                    is_pointer: false,
                })
            }
        }
    }
}

impl TypeResolver for RvvTypeResolver {
    fn resolve_one(
        &mut self,
        base: BasicType,
        log2_lmul: i8,
        desc: PrototypeDescriptor,
    ) -> Option<ResolvedType> {
        if let Some(cached) = self.cache.get(&(base, log2_lmul, desc)) {
            return cached.clone();
        }
        let resolved = self.compute(base, log2_lmul, desc);
        self.cache
            .insert((base, log2_lmul, desc), resolved.clone());
        resolved
    }
}
