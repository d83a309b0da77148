// パス: tests/test_support.rs
// 役割: 統合テスト共通のレコードビルダと展開補助を提供する
// 意図: 繰り返しがちなファミリレコード構築・展開・検索を一元化しテストを簡潔に保つ
// 関連ファイル: tests/expand.rs, tests/codegen_emit.rs, tests/emission.rs
#![allow(dead_code)]
use rvvgen::descriptor::{BaseKind, BasicType, PrototypeDescriptor, Signature};
use rvvgen::expand::{expand_all, Instance};
use rvvgen::policy::{Policy, PolicyScheme};
use rvvgen::record::{FamilyRecord, LmulSet, TypeRangeSet};
use rvvgen::resolve::RvvTypeResolver;

/// 被参照要素型つきポインタ operand。
pub fn pointer_desc() -> PrototypeDescriptor {
    PrototypeDescriptor {
        base: BaseKind::Pointer,
        ..PrototypeDescriptor::VECTOR
    }
}

/// 全フィールドが無難な既定値のファミリ。テスト側で必要な項目だけ上書きする。
pub fn base_record(name: &str) -> FamilyRecord {
    FamilyRecord {
        name: name.to_string(),
        overloaded_name: String::new(),
        prototype: vec![PrototypeDescriptor::VECTOR; 3],
        suffix: vec![PrototypeDescriptor::VECTOR],
        overloaded_suffix: Signature::new(),
        type_range: TypeRangeSet::from_types(&[BasicType::Int32]),
        lmuls: LmulSet::from_log2_list(&[0]),
        required_extensions: Vec::new(),
        nf: 1,
        is_tuple: false,
        has_masked: false,
        has_vl: false,
        has_masked_off_operand: false,
        has_tail_policy: false,
        has_mask_policy: false,
        has_frm_round_mode_op: false,
        support_overloading: false,
        has_builtin_alias: false,
        unmasked_policy_scheme: PolicyScheme::None,
        masked_policy_scheme: PolicyScheme::None,
        ir_name: String::new(),
        masked_ir_name: String::new(),
        manual_codegen: String::new(),
        intrinsic_types: Vec::new(),
    }
}

/// ポリシー一式を備えた二項演算ファミリ。展開系テストの基準レコード。
///
/// (Int8, Int32) × (m1, m2) の 4 対それぞれが
/// unmasked 既定 / `_tu` / `_m` / `_tum` / `_tumu` / `_mu` の 6 変種に展開される。
pub fn full_policy_record(name: &str) -> FamilyRecord {
    let mut rec = base_record(name);
    rec.type_range = TypeRangeSet::from_types(&[BasicType::Int8, BasicType::Int32]);
    rec.lmuls = LmulSet::from_log2_list(&[0, 1]);
    rec.has_masked = true;
    rec.has_vl = true;
    rec.has_masked_off_operand = true;
    rec.has_tail_policy = true;
    rec.has_mask_policy = true;
    rec.unmasked_policy_scheme = PolicyScheme::HasPassthruOperand;
    rec.masked_policy_scheme = PolicyScheme::HasPolicyOperand;
    rec.ir_name = name.to_string();
    rec.masked_ir_name = format!("{name}_mask");
    rec.intrinsic_types = vec![-1, 2];
    rec
}

pub fn expand_records(records: &[FamilyRecord]) -> Vec<Instance> {
    let mut resolver = RvvTypeResolver::new();
    expand_all(records, &mut resolver).expect("expand records")
}

pub fn names(instances: &[Instance]) -> Vec<&str> {
    instances.iter().map(|i| i.builtin_name.as_str()).collect()
}

pub fn find<'a>(instances: &'a [Instance], name: &str) -> &'a Instance {
    instances
        .iter()
        .find(|i| i.builtin_name == name)
        .unwrap_or_else(|| panic!("instance {name} not found"))
}

/// codegen グルーパ用の最小インスタンス。型解決を経由せず直接組み立てる。
pub fn bare_instance(seq: u32, builtin: &str, ir: &str, policy: Policy) -> Instance {
    Instance {
        seq,
        builtin_name: builtin.to_string(),
        overloaded_name: builtin.to_string(),
        ir_name: ir.to_string(),
        masked: false,
        policy,
        types: Vec::new(),
        intrinsic_types: vec![-1],
        manual_codegen: String::new(),
        nf: 1,
        has_frm: false,
        has_vl: true,
        scheme: PolicyScheme::None,
        has_masked_off_operand: false,
        has_builtin_alias: false,
    }
}
