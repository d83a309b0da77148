// パス: tests/expand.rs
// 役割: 展開エンジン（直積展開・命名・シグネチャ変形・不整合検査）の統合テスト
// 意図: レコード一つから生まれるインスタンス集合の件数・名前・operand 形状を固定する
// 関連ファイル: src/expand.rs, src/policy.rs, tests/test_support.rs
#[path = "test_support.rs"]
mod support;

use rvvgen::descriptor::BasicType;
use rvvgen::errors::GenError;
use rvvgen::expand::expand_all;
use rvvgen::policy::PolicyScheme;
use rvvgen::record::{LmulSet, TypeRangeSet};
use rvvgen::resolve::RvvTypeResolver;
use support::{base_record, expand_records, find, full_policy_record, names};

#[test]
/// 型 × LMUL × masked × ポリシーの直積が期待どおりの件数と順序で展開される。
fn full_policy_family_expands_to_all_variants() {
    let instances = expand_records(&[full_policy_record("vadd")]);
    // 4 対 × 6 変種
    assert_eq!(instances.len(), 24);

    // Int8 m1 の 6 変種が宣言順で連続する
    assert_eq!(
        &names(&instances)[0..6],
        &[
            "vadd_i8m1",
            "vadd_i8m1_tu",
            "vadd_i8m1_m",
            "vadd_i8m1_tum",
            "vadd_i8m1_tumu",
            "vadd_i8m1_mu",
        ]
    );

    // 通し番号は入力順で厳密に単調増加
    for (i, inst) in instances.iter().enumerate() {
        assert_eq!(inst.seq, i as u32);
    }
}

#[test]
/// ポリシーごとの operand 増減（passthru / maskedoff / mask / VL）を検証する。
fn signatures_follow_policy_shape_rules() {
    let instances = expand_records(&[full_policy_record("vadd")]);

    // unmasked 既定: (結果, src, src, VL)
    assert_eq!(find(&instances, "vadd_i32m1").types.len(), 4);
    // _tu: passthru が先頭引数に入る
    assert_eq!(find(&instances, "vadd_i32m1_tu").types.len(), 5);
    // _m: mask が先頭引数に入る（TAMA なので maskedoff なし）
    let m = find(&instances, "vadd_i32m1_m");
    assert_eq!(m.types.len(), 5);
    assert_eq!(m.types[1].c_name, "vbool32_t");
    // _tum: mask と maskedoff の両方
    let tum = find(&instances, "vadd_i32m1_tum");
    assert_eq!(tum.types.len(), 6);
    assert_eq!(tum.types[1].c_name, "vbool32_t");
    assert_eq!(tum.types[2].c_name, "vint32m1_t");
}

#[test]
/// passthru/maskedoff が先頭に入る形式では intrinsic-type 番号が NF 分ずれる。
fn intrinsic_type_indices_shift_with_leading_operand() {
    let instances = expand_records(&[full_policy_record("vadd")]);
    // -1（結果型）はそのまま、operand 番号は +1
    assert_eq!(find(&instances, "vadd_i32m1").intrinsic_types, vec![-1, 3]);
    assert_eq!(find(&instances, "vadd_i32m1_m").intrinsic_types, vec![-1, 3]);
}

#[test]
/// masked 変種は masked 用の低レベル名を持つ。
fn masked_variants_use_masked_ir_name() {
    let instances = expand_records(&[full_policy_record("vadd")]);
    assert_eq!(find(&instances, "vadd_i32m1").ir_name, "vadd");
    assert_eq!(find(&instances, "vadd_i32m1_tumu").ir_name, "vadd_mask");
}

#[test]
/// 無効な (要素型, LMUL) 対は黙ってスキップされ、エラーにならない。
fn invalid_type_lmul_pairs_are_skipped() {
    let mut rec = base_record("vadd");
    rec.type_range = TypeRangeSet::from_types(&[BasicType::Int64]);
    // SEW=64 と mf2 は比の上限超過で無効、m1 は有効
    rec.lmuls = LmulSet::from_log2_list(&[-1, 0]);
    let instances = expand_records(&[rec]);
    assert_eq!(names(&instances), vec!["vadd_i64m1"]);
}

#[test]
/// 同名 builtin に構造の異なる宣言が展開されたら致命的エラーになる。
fn conflicting_builtin_names_are_fatal() {
    let mut rec = base_record("vadd");
    // サフィックスなしで二つの LMUL に展開すると同名で型文字列が食い違う
    rec.suffix.clear();
    rec.type_range = TypeRangeSet::from_types(&[BasicType::Int8]);
    rec.lmuls = LmulSet::from_log2_list(&[0, 1]);
    let mut resolver = RvvTypeResolver::new();
    let err = expand_all(&[rec], &mut resolver).expect_err("collision must fail");
    match err {
        GenError::Inconsistent {
            builtin, field, ..
        } => {
            assert_eq!(builtin, "vadd");
            assert_eq!(field, "type string");
        }
        other => panic!("expected Inconsistent, got {other:?}"),
    }
}

#[test]
/// ポリシー・masked 展開前の基本インスタンスは (型数 × LMUL 数) 件になる。
fn base_instances_cover_the_full_cross_product() {
    let mut rec = base_record("vadd");
    rec.type_range = TypeRangeSet::from_types(&[BasicType::Int8, BasicType::Int32]);
    rec.lmuls = LmulSet::from_log2_list(&[0, 1]);
    let instances = expand_records(&[rec]);
    assert_eq!(
        names(&instances),
        vec!["vadd_i8m1", "vadd_i8m2", "vadd_i32m1", "vadd_i32m2"]
    );
}

#[test]
/// 同名 builtin で低レベル名だけが食い違う二つのレコードも不整合として検出される。
fn conflicting_ir_names_are_fatal() {
    let mut first = base_record("vadd");
    first.ir_name = "vadd".to_string();
    let mut second = base_record("vadd");
    second.ir_name = "vadd_other".to_string();
    let mut resolver = RvvTypeResolver::new();
    let err = expand_all(&[first, second], &mut resolver).expect_err("collision must fail");
    assert!(matches!(
        err,
        GenError::Inconsistent { field: "ir_name", .. }
    ));
}

#[test]
/// 擬似ファミリ（vsetvli 系）は直積を持たず、展開結果は空になる。
fn pseudo_families_produce_no_instances() {
    assert!(expand_records(&[base_record("vsetvli")]).is_empty());
    assert!(expand_records(&[base_record("vsetvlimax")]).is_empty());
}

#[test]
/// スキームがポリシーを要求するのに供給可能なポリシーがない設定は不整合。
fn policy_scheme_without_policies_is_rejected() {
    let mut rec = base_record("vcompress");
    rec.has_masked = true;
    rec.masked_policy_scheme = PolicyScheme::HasPolicyOperand;
    // has_tail_policy / has_mask_policy がどちらも偽
    let mut resolver = RvvTypeResolver::new();
    let err = expand_all(&[rec], &mut resolver).expect_err("must fail");
    assert!(matches!(
        err,
        GenError::UnsupportedPolicyConfig { name } if name == "vcompress"
    ));
}

#[test]
/// FRM operand を持つファミリは builtin 名にのみ `_rm` が付く。
/// オーバーロード名はオーバーロードサフィックスだけで構成され、
/// 型サフィックスへのフォールバックはしない。
fn frm_suffix_applies_to_builtin_name_only() {
    let mut rec = base_record("vfadd");
    rec.has_frm_round_mode_op = true;
    rec.has_masked = true;
    let instances = expand_records(&[rec]);
    let unmasked = find(&instances, "vfadd_i32m1_rm");
    assert_eq!(unmasked.overloaded_name, "vfadd");
    let masked = find(&instances, "vfadd_i32m1_rm_m");
    assert_eq!(masked.overloaded_name, "vfadd");
}

#[test]
/// 複数レコードの展開でも通し番号は全体で一意に振られる。
fn sequence_numbers_are_global() {
    let instances = expand_records(&[base_record("vadd"), base_record("vsub")]);
    assert_eq!(names(&instances), vec!["vadd_i32m1", "vsub_i32m1"]);
    assert_eq!(instances[0].seq, 0);
    assert_eq!(instances[1].seq, 1);
}
