// パス: src/emit/codegen.rs
// 役割: インスタンス列を整列・バッチ化し、builtin → 低レベル intrinsic 呼び出しの codegen 表を生成する
// 意図: codegen 関連状態が同一の連続区間で本体を共有し、operand 並べ替え規則を一箇所に閉じ込める
// 関連ファイル: src/expand.rs, src/policy.rs, src/emit/mod.rs
//! codegen グルーパ
//!
//! (低レベル名, ポリシー) で安定ソートし、低レベル名・手書き codegen・
//! ポリシー・セグメント要素幅のいずれかが変わる境界で新しい本体を開始する。
//! 安定性が宣言順のタイブレークを保存する点が重要で、通し番号で明示的に
//! 固定している。最後の区間の本体も必ず出力する。

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use once_cell::sync::Lazy;

use crate::errors::GenResult;
use crate::expand::Instance;

/// インデックス付きセグメント形式の番兵。要素幅は呼び出し時に
/// ポインタ operand の被参照型から導出する。
pub const UNKNOWN_SEW: u32 = u32::MAX;

/// セグメント load/store の低レベル名 → log2(要素幅) の固定表。
///
/// 新しいセグメント形式を導入する際は手動で同期が必要（自動導出はない）。
static SEG_INST_SEW: Lazy<HashMap<String, u32>> = Lazy::new(|| {
    let mut map = HashMap::new();
    let policy_suffixes = ["", "_tu", "_tum", "_tumu", "_mu"];
    let forms: [(&str, bool); 5] = [
        ("vlseg", false),
        ("vlseg", true), // fault-only-first
        ("vlsseg", false),
        ("vsseg", false),
        ("vssseg", false),
    ];
    for (name, ff) in forms {
        for (sew, log2) in [(8u32, 3u32), (16, 4), (32, 5), (64, 6)] {
            for nf in 2..=8 {
                for suffix in policy_suffixes {
                    let ff_part = if ff { "ff" } else { "" };
                    map.insert(format!("{name}{nf}e{sew}{ff_part}{suffix}"), log2);
                }
            }
        }
    }
    map
});

/// オーバーロード名からセグメント要素幅（log2）を引く。
///
/// インデックス付きセグメント形式は番兵 `UNKNOWN_SEW`、非セグメント命令は 0。
pub fn seg_inst_log2_sew(overloaded_name: &str) -> u32 {
    for prefix in ["vloxseg", "vluxseg", "vsoxseg", "vsuxseg"] {
        if overloaded_name.starts_with(prefix) {
            return UNKNOWN_SEW;
        }
    }
    SEG_INST_SEW.get(overloaded_name).copied().unwrap_or(0)
}

/// インデックス付きセグメント load/store で要素幅の導出に使うポインタ operand の位置。
///
/// passthru の有無が operand の並びを変えるため、ポリシー属性から位置を逆算する。
pub fn indexed_ptr_idx(inst: &Instance) -> i64 {
    const RVV_VTA: u8 = 0x1;
    const RVV_VMA: u8 = 0x2;
    let bits = inst.policy.attrs_bits();
    let ir = inst.ir_name.as_str();
    if ir.starts_with("vloxseg") || ir.starts_with("vluxseg") {
        let no_passthru = (inst.masked && bits & RVV_VTA != 0 && bits & RVV_VMA != 0)
            || (!inst.masked && bits & RVV_VTA != 0);
        return match (inst.masked, no_passthru) {
            (true, true) => 1,
            (true, false) => 2,
            (false, true) => 0,
            (false, false) => 1,
        };
    }
    if ir.starts_with("vsoxseg") || ir.starts_with("vsuxseg") {
        return if inst.masked { 1 } else { 0 };
    }
    -1
}

/// 一つの共有 codegen 本体を書き出す。
fn emit_switch_body(inst: &Instance, out: &mut String) {
    if !inst.ir_name.is_empty() {
        let _ = writeln!(out, "  ID = Intrinsic::riscv_{};", inst.ir_name);
    }
    let _ = writeln!(out, "  PolicyAttrs = {};", inst.policy.attrs_bits());
    // 番兵 UNKNOWN_SEW もそのまま数値で出す
    let _ = writeln!(
        out,
        "  SegInstSEW = {};",
        seg_inst_log2_sew(&inst.overloaded_name)
    );

    if !inst.manual_codegen.is_empty() {
        // 手書き codegen は自動並べ替えと排他。要素幅だけ解決して本体を転記する。
        let _ = writeln!(out, "  IsMasked = {};", inst.masked);
        out.push_str("  if (SegInstSEW == (unsigned)-1) {\n");
        let _ = writeln!(
            out,
            "    auto PointeeType = E->getArg({})->getType()->getPointeeType();",
            indexed_ptr_idx(inst)
        );
        out.push_str("    SegInstSEW = llvm::Log2_64(getContext().getTypeSize(PointeeType));\n");
        out.push_str("  }\n");
        out.push_str(&inst.manual_codegen);
        if !inst.manual_codegen.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("  break;\n");
        return;
    }

    if inst.masked {
        if inst.has_vl {
            // マスク operand を先頭から末尾二番目（VL の直前）へ回す
            out.push_str("  std::rotate(Ops.begin(), Ops.begin() + 1, Ops.end() - 1);\n");
            if inst.has_policy_operand() {
                out.push_str(
                    "  Ops.push_back(ConstantInt::get(Ops.back()->getType(), PolicyAttrs));\n",
                );
            }
            if inst.has_masked_off_operand && inst.policy.is_tama() {
                out.push_str("  Ops.insert(Ops.begin(), llvm::PoisonValue::get(ResultType));\n");
            }
            // masked リダクション: maskedoff を持たず passthru を持つ形式
            if !inst.has_masked_off_operand && inst.has_passthru_operand() && inst.policy.is_ta() {
                out.push_str("  Ops.insert(Ops.begin(), llvm::PoisonValue::get(ResultType));\n");
            }
        } else {
            out.push_str("  std::rotate(Ops.begin(), Ops.begin() + 1, Ops.end());\n");
        }
    } else if inst.has_policy_operand() {
        out.push_str("  Ops.push_back(ConstantInt::get(Ops.back()->getType(), PolicyAttrs));\n");
    } else if inst.has_passthru_operand() && inst.policy.is_ta() {
        out.push_str("  Ops.insert(Ops.begin(), llvm::PoisonValue::get(ResultType));\n");
    }

    let mut parts: Vec<String> = inst
        .intrinsic_types
        .iter()
        .map(|&idx| {
            if idx == -1 {
                "ResultType".to_string()
            } else {
                format!("Ops[{idx}]->getType()")
            }
        })
        .collect();
    // VL は i32 / i64 のどちらもありうるため必ず型を具象化する（常に最終 operand）
    if inst.has_vl {
        parts.push("Ops.back()->getType()".to_string());
    }
    let _ = writeln!(out, "  IntrinsicTypes = {{{}}};", parts.join(", "));
    out.push_str("  break;\n");
}

/// codegen 出力（モード 3）を生成する。
pub fn emit(instances: &[Instance]) -> GenResult<String> {
    let mut out = String::new();
    let mut defs: Vec<&Instance> = instances.iter().collect();
    // 低レベル名は空のこともある。安定ソートが宣言順を保存する。
    defs.sort_by(|a, b| {
        a.ir_name
            .cmp(&b.ir_name)
            .then_with(|| a.policy.attrs_bits().cmp(&b.policy.attrs_bits()))
            .then_with(|| a.seq.cmp(&b.seq))
    });

    let Some(mut prev) = defs.first().copied() else {
        return Ok(out);
    };
    let mut labeled: HashSet<&str> = HashSet::new();
    for &def in &defs {
        if def.ir_name != prev.ir_name
            || def.manual_codegen != prev.manual_codegen
            || def.policy != prev.policy
            || seg_inst_log2_sew(&def.overloaded_name) != seg_inst_log2_sew(&prev.overloaded_name)
        {
            emit_switch_body(prev, &mut out);
        }
        prev = def;
        if labeled.insert(def.builtin_name.as_str()) {
            let _ = writeln!(out, "case RISCVVector::BI__builtin_rvv_{}:", def.builtin_name);
        }
    }
    // 最後の区間を落とさない
    emit_switch_body(prev, &mut out);
    out.push('\n');
    Ok(out)
}
