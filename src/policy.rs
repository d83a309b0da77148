// パス: src/policy.rs
// 役割: tail/mask ポリシーの値型と、ファミリごとのポリシー供給方式（スキーム）を定義する
// 意図: ポリシー変種の展開規則と属性ビット・名前サフィックスの対応を一箇所で管理する
// 関連ファイル: src/expand.rs, src/emit/codegen.rs, src/record.rs

use serde::{Deserialize, Serialize};

/// アクティブ範囲外要素の扱い。Undisturbed が属性ビットのゼロ値。
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PolicyValue {
    Undisturbed,
    Agnostic,
}

/// tail × mask の 2 ビットポリシー対。
///
/// サフィックスなしの既定インスタンスは tail-agnostic / mask-agnostic。
/// 属性ビットは bit0 = tail-agnostic, bit1 = mask-agnostic で、
/// 両 undisturbed がゼロ値になる。
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Policy {
    pub tail: PolicyValue,
    pub mask: PolicyValue,
}

impl Policy {
    pub const fn new(tail: PolicyValue, mask: PolicyValue) -> Self {
        Self { tail, mask }
    }

    /// サフィックスなしインスタンスに与える既定ポリシー（TAMA）。
    pub const DEFAULT: Self = Self::new(PolicyValue::Agnostic, PolicyValue::Agnostic);
    /// `_tu`（unmasked 変種）。
    pub const TU: Self = Self::new(PolicyValue::Undisturbed, PolicyValue::Agnostic);
    /// `_tum`。
    pub const TUM: Self = Self::new(PolicyValue::Undisturbed, PolicyValue::Agnostic);
    /// `_tumu`。
    pub const TUMU: Self = Self::new(PolicyValue::Undisturbed, PolicyValue::Undisturbed);
    /// `_mu`。
    pub const MU: Self = Self::new(PolicyValue::Agnostic, PolicyValue::Undisturbed);

    pub fn is_ta(self) -> bool {
        self.tail == PolicyValue::Agnostic
    }

    pub fn is_tu(self) -> bool {
        self.tail == PolicyValue::Undisturbed
    }

    pub fn is_tama(self) -> bool {
        self.tail == PolicyValue::Agnostic && self.mask == PolicyValue::Agnostic
    }

    pub fn is_tuma(self) -> bool {
        self.tail == PolicyValue::Undisturbed && self.mask == PolicyValue::Agnostic
    }

    pub fn is_tamu(self) -> bool {
        self.tail == PolicyValue::Agnostic && self.mask == PolicyValue::Undisturbed
    }

    pub fn is_tumu(self) -> bool {
        self.tail == PolicyValue::Undisturbed && self.mask == PolicyValue::Undisturbed
    }

    /// codegen に渡す属性ビット（bit0 = tail-agnostic, bit1 = mask-agnostic）。
    pub fn attrs_bits(self) -> u8 {
        let mut bits = 0;
        if self.tail == PolicyValue::Agnostic {
            bits |= 0x1;
        }
        if self.mask == PolicyValue::Agnostic {
            bits |= 0x2;
        }
        bits
    }
}

/// ポリシーを operand 列へどう織り込むかの方式。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyScheme {
    /// ポリシーを一切受け取らない。
    None,
    /// ポリシー属性を定数 operand として末尾に渡す。
    HasPolicyOperand,
    /// undisturbed 用の passthru operand を先頭引数として受け取る。
    HasPassthruOperand,
}

impl PolicyScheme {
    /// 永続形式用のコード値。
    pub fn code(self) -> u8 {
        match self {
            PolicyScheme::None => 0,
            PolicyScheme::HasPolicyOperand => 1,
            PolicyScheme::HasPassthruOperand => 2,
        }
    }
}

impl Default for PolicyScheme {
    fn default() -> Self {
        PolicyScheme::None
    }
}

/// unmasked 側で既定以外に展開するポリシー集合。
pub fn supported_unmasked_policies() -> Vec<Policy> {
    vec![Policy::TU]
}

/// masked 側で既定以外に展開するポリシー集合。
///
/// tail/mask どちらのポリシーも持たないファミリは空集合を返し、スキームが
/// ポリシーを要求していれば呼び出し側で設定不整合として扱う。
pub fn supported_masked_policies(has_tail_policy: bool, has_mask_policy: bool) -> Vec<Policy> {
    match (has_tail_policy, has_mask_policy) {
        (true, true) => vec![Policy::TUM, Policy::TUMU, Policy::MU],
        (true, false) => vec![Policy::TUM],
        (false, true) => vec![Policy::MU],
        (false, false) => Vec::new(),
    }
}

/// ポリシーと FRM operand の有無から名前サフィックスを決める。
///
/// `_rm` と masked 既定の `_m` は builtin 名のみに付き、オーバーロード名には
/// 付かない。`_tu` 系の変種サフィックスは両方に付く。
pub fn name_suffixes(masked: bool, policy: Policy, has_frm: bool) -> (String, String) {
    let mut builtin = String::new();
    let mut overloaded = String::new();
    if has_frm {
        builtin.push_str("_rm");
    }
    if masked {
        if policy.is_tumu() {
            builtin.push_str("_tumu");
            overloaded.push_str("_tumu");
        } else if policy.is_tuma() {
            builtin.push_str("_tum");
            overloaded.push_str("_tum");
        } else if policy.is_tamu() {
            builtin.push_str("_mu");
            overloaded.push_str("_mu");
        } else {
            builtin.push_str("_m");
        }
    } else if policy.is_tu() {
        builtin.push_str("_tu");
        overloaded.push_str("_tu");
    }
    (builtin, overloaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// 属性ビットの符号化規約（bit0 = TA, bit1 = MA）を固定する。
    fn policy_attrs_bits_convention() {
        assert_eq!(Policy::DEFAULT.attrs_bits(), 0x3);
        assert_eq!(Policy::TU.attrs_bits(), 0x2);
        assert_eq!(Policy::TUMU.attrs_bits(), 0x0);
        assert_eq!(Policy::MU.attrs_bits(), 0x1);
    }

    #[test]
    fn masked_policy_sets_depend_on_capabilities() {
        assert_eq!(supported_masked_policies(true, true).len(), 3);
        assert_eq!(supported_masked_policies(true, false), vec![Policy::TUM]);
        assert_eq!(supported_masked_policies(false, true), vec![Policy::MU]);
        assert!(supported_masked_policies(false, false).is_empty());
    }
}
