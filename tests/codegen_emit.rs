// パス: tests/codegen_emit.rs
// 役割: codegen グルーパ（整列・本体共有・operand 並べ替え規則）の統合テスト
// 意図: 同一状態の連続区間が本体を共有すること、並べ替え文が条件どおり出ることを固定する
// 関連ファイル: src/emit/codegen.rs, src/expand.rs, tests/test_support.rs
#[path = "test_support.rs"]
mod support;

use rvvgen::emit::codegen::{self, indexed_ptr_idx, seg_inst_log2_sew, UNKNOWN_SEW};
use rvvgen::policy::{Policy, PolicyScheme};
use support::bare_instance;

#[test]
/// 同一 (低レベル名, ポリシー) の連続区間は一つの本体を共有する。
fn adjacent_same_state_instances_share_one_body() {
    let instances = vec![
        bare_instance(0, "vadd_i8m1", "vadd", Policy::DEFAULT),
        bare_instance(1, "vadd_i16m1", "vadd", Policy::DEFAULT),
        bare_instance(2, "vsub_i8m1", "vsub", Policy::DEFAULT),
    ];
    let out = codegen::emit(&instances).expect("emit");

    // 本体は 2 つ（vadd 共有 + vsub）
    assert_eq!(out.matches("  break;\n").count(), 2);
    assert_eq!(out.matches("ID = Intrinsic::riscv_vadd;").count(), 1);
    assert_eq!(out.matches("ID = Intrinsic::riscv_vsub;").count(), 1);

    // 共有区間の case ラベルは本体の前に並ぶ
    let a = out.find("case RISCVVector::BI__builtin_rvv_vadd_i8m1:").expect("label");
    let b = out.find("case RISCVVector::BI__builtin_rvv_vadd_i16m1:").expect("label");
    let body = out.find("ID = Intrinsic::riscv_vadd;").expect("body");
    assert!(a < b && b < body);
}

#[test]
/// ポリシーが違えば同じ低レベル名でも本体は分かれる。
fn policy_change_starts_new_body() {
    let instances = vec![
        bare_instance(0, "vadd_i8m1", "vadd", Policy::DEFAULT),
        bare_instance(1, "vadd_i8m1_tu", "vadd", Policy::TU),
    ];
    let out = codegen::emit(&instances).expect("emit");
    assert_eq!(out.matches("  break;\n").count(), 2);
    // 属性ビット昇順（TU=2 → TAMA=3）で並ぶ
    let tu = out.find("PolicyAttrs = 2;").expect("tu attrs");
    let tama = out.find("PolicyAttrs = 3;").expect("tama attrs");
    assert!(tu < tama);
}

#[test]
/// masked + VL: マスク operand を先頭から VL 直前へ回す。
fn masked_with_vl_rotates_mask_before_vl() {
    let mut inst = bare_instance(0, "vadd_i8m1_m", "vadd_mask", Policy::DEFAULT);
    inst.masked = true;
    let out = codegen::emit(&[inst]).expect("emit");
    assert!(out.contains("std::rotate(Ops.begin(), Ops.begin() + 1, Ops.end() - 1);"));
}

#[test]
/// masked で VL なし: マスク operand を末尾へ回す。
fn masked_without_vl_rotates_mask_to_end() {
    let mut inst = bare_instance(0, "vmv_x_s_i8m1_m", "vmv_mask", Policy::DEFAULT);
    inst.masked = true;
    inst.has_vl = false;
    let out = codegen::emit(&[inst]).expect("emit");
    assert!(out.contains("std::rotate(Ops.begin(), Ops.begin() + 1, Ops.end());"));
}

#[test]
/// ポリシー operand 方式はポリシー定数を末尾に積み、TAMA の maskedoff 位置には
/// placeholder を差し込む。
fn policy_operand_and_tama_placeholder() {
    let mut inst = bare_instance(0, "vadd_i8m1_m", "vadd_mask", Policy::DEFAULT);
    inst.masked = true;
    inst.scheme = PolicyScheme::HasPolicyOperand;
    inst.has_masked_off_operand = true;
    let out = codegen::emit(&[inst]).expect("emit");
    assert!(out.contains("Ops.push_back(ConstantInt::get(Ops.back()->getType(), PolicyAttrs));"));
    assert!(out.contains("Ops.insert(Ops.begin(), llvm::PoisonValue::get(ResultType));"));
}

#[test]
/// unmasked の passthru 方式は tail-agnostic のとき placeholder を先頭に差し込む。
fn unmasked_passthru_gets_placeholder_when_tail_agnostic() {
    let mut inst = bare_instance(0, "vadd_i8m1", "vadd", Policy::DEFAULT);
    inst.scheme = PolicyScheme::HasPassthruOperand;
    let out = codegen::emit(&[inst]).expect("emit");
    assert!(out.contains("Ops.insert(Ops.begin(), llvm::PoisonValue::get(ResultType));"));

    // _tu（undisturbed）は実引数の passthru が既にあるので差し込まない
    let mut tu = bare_instance(0, "vadd_i8m1_tu", "vadd", Policy::TU);
    tu.scheme = PolicyScheme::HasPassthruOperand;
    let out = codegen::emit(&[tu]).expect("emit");
    assert!(!out.contains("PoisonValue"));
}

#[test]
/// IntrinsicTypes は -1 を結果型、それ以外を operand 型に写し、VL 型を必ず足す。
fn intrinsic_types_list_is_concretized() {
    let mut inst = bare_instance(0, "vadd_i8m1", "vadd", Policy::DEFAULT);
    inst.intrinsic_types = vec![-1, 2];
    let out = codegen::emit(&[inst]).expect("emit");
    assert!(out.contains("IntrinsicTypes = {ResultType, Ops[2]->getType(), Ops.back()->getType()};"));
}

#[test]
/// 手書き codegen は自動並べ替えを迂回し、本文がそのまま転記される。
fn manual_codegen_bypasses_reordering() {
    let mut inst = bare_instance(0, "vlm_v_b8", "vlm", Policy::DEFAULT);
    inst.manual_codegen = "  return EmitSpecialLoad(Ops);".to_string();
    let out = codegen::emit(&[inst]).expect("emit");
    assert!(out.contains("IsMasked = false;"));
    assert!(out.contains("  return EmitSpecialLoad(Ops);\n"));
    assert!(!out.contains("std::rotate"));
    assert!(!out.contains("IntrinsicTypes = {"));
}

#[test]
/// セグメント要素幅の表引き: 通常セグメントは固定値、インデックス付きは番兵、それ以外は 0。
fn segment_sew_lookup() {
    assert_eq!(seg_inst_log2_sew("vlseg2e32"), 5);
    assert_eq!(seg_inst_log2_sew("vlseg4e8ff_tu"), 3);
    assert_eq!(seg_inst_log2_sew("vssseg3e64_mu"), 6);
    assert_eq!(seg_inst_log2_sew("vloxseg2ei16"), UNKNOWN_SEW);
    assert_eq!(seg_inst_log2_sew("vsuxseg2ei8"), UNKNOWN_SEW);
    assert_eq!(seg_inst_log2_sew("vadd"), 0);
}

#[test]
/// インデックス付きセグメント load のポインタ位置は passthru の有無で決まる。
fn indexed_segment_pointer_position() {
    // masked TAMA → passthru なし → mask の直後
    let mut inst = bare_instance(0, "vloxseg2ei16_v_i8m1_m", "vloxseg2", Policy::DEFAULT);
    inst.masked = true;
    assert_eq!(indexed_ptr_idx(&inst), 1);

    // masked TUMU → passthru あり → 一つ後ろ
    inst.policy = Policy::TUMU;
    assert_eq!(indexed_ptr_idx(&inst), 2);

    // unmasked TAMA → 先頭
    let inst = bare_instance(0, "vloxseg2ei16_v_i8m1", "vloxseg2", Policy::DEFAULT);
    assert_eq!(indexed_ptr_idx(&inst), 0);

    // store は passthru を持たない
    let mut store = bare_instance(0, "vsoxseg2ei16_v_i8m1_m", "vsoxseg2", Policy::DEFAULT);
    store.masked = true;
    assert_eq!(indexed_ptr_idx(&store), 1);

    // 非セグメント命令は対象外
    let other = bare_instance(0, "vadd_i8m1", "vadd", Policy::DEFAULT);
    assert_eq!(indexed_ptr_idx(&other), -1);
}

#[test]
/// インデックス付きセグメント形式の要素幅は番兵値がそのまま数値で出力される。
fn indexed_segment_prints_numeric_sentinel() {
    let mut inst = bare_instance(0, "vloxseg2ei16_v_i8m1_m", "vloxseg2", Policy::DEFAULT);
    inst.masked = true;
    let out = codegen::emit(&[inst]).expect("emit");
    assert!(out.contains("  SegInstSEW = 4294967295;\n"));

    let plain = bare_instance(0, "vadd_i8m1", "vadd", Policy::DEFAULT);
    let out = codegen::emit(&[plain]).expect("emit");
    assert!(out.contains("  SegInstSEW = 0;\n"));
}

#[test]
/// インスタンスが空なら出力も空。
fn empty_input_yields_empty_output() {
    let out = codegen::emit(&[]).expect("emit");
    assert!(out.is_empty());
}
