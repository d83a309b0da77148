// パス: src/emit/sema.rs
// 役割: 意味解析用の圧縮シグネチャテーブルと per-family コンパクトレコードを生成する
// 意図: 同一レコード集合から構築したテーブルへの参照欠落を内部不変条件違反として即座に失敗させる
// 関連ファイル: src/sigtable.rs, src/record.rs, src/emit/mod.rs

use std::fmt::Write as _;

use crate::descriptor::Signature;
use crate::errors::{GenError, GenResult};
use crate::record::FamilyRecord;
use crate::sigtable::SignatureTable;

fn index_of(
    table: &SignatureTable,
    sig: &Signature,
    name: &str,
    what: &'static str,
) -> GenResult<usize> {
    table
        .index_of(sig)
        .ok_or_else(|| GenError::SignatureNotFound {
            what: format!("{name} の {what}"),
        })
}

/// 意味解析出力（モード 4）を生成する。
pub fn emit(records: &[FamilyRecord]) -> GenResult<String> {
    let active: Vec<&FamilyRecord> = records.iter().filter(|r| !r.is_pseudo()).collect();
    let table = SignatureTable::build(active.iter().copied());

    let mut out = String::new();
    out.push_str("#ifdef DECL_SIGNATURE_TABLE\n");
    table.print(&mut out);
    out.push_str("#endif\n");

    out.push_str("#ifdef DECL_INTRINSIC_RECORDS\n");
    for rec in &active {
        let prototype_index = index_of(&table, &rec.prototype, &rec.name, "prototype")?;
        let suffix_index = index_of(&table, &rec.suffix, &rec.name, "suffix")?;
        let overloaded_suffix_index =
            index_of(&table, &rec.overloaded_suffix, &rec.name, "overloaded suffix")?;
        let _ = writeln!(
            out,
            "{{\"{}\", \"{}\", {}, {}, {}, {}, {}, {}, \"{}\", 0x{:02x}, 0x{:02x}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}}},",
            rec.name,
            rec.overloaded_or_name(),
            prototype_index,
            suffix_index,
            overloaded_suffix_index,
            rec.prototype.len(),
            rec.suffix.len(),
            rec.overloaded_suffix.len(),
            rec.required_extensions.join(","),
            rec.type_range.mask(),
            rec.lmuls.mask(),
            rec.nf,
            u8::from(rec.has_masked),
            u8::from(rec.has_vl),
            u8::from(rec.has_masked_off_operand),
            u8::from(rec.has_tail_policy),
            u8::from(rec.has_mask_policy),
            rec.unmasked_policy_scheme.code(),
            rec.masked_policy_scheme.code(),
            u8::from(rec.is_tuple),
            u8::from(rec.has_frm_round_mode_op),
        );
    }
    out.push_str("#endif\n");
    Ok(out)
}
