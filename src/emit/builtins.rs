// パス: src/emit/builtins.rs
// 役割: builtin 列挙子・共有文字列プール・builtin 情報表を生成する
// 意図: 三系統の出力が参照する文字列を単一プールに集約し、オフセット参照で表を圧縮する
// 関連ファイル: src/strpool.rs, src/expand.rs, src/emit/mod.rs

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::errors::GenResult;
use crate::expand::Instance;
use crate::strpool::StringPool;

/// メタデータ出力（モード 2）を生成する。
///
/// 列挙子は builtin 名の初出順。純粋なエイリアスは型文字列の代わりに
/// 番兵（オフセット 0 = 空文字列）を持つ。
pub fn emit(instances: &[Instance]) -> GenResult<String> {
    let mut pool = StringPool::new();
    // 情報表が固定で参照する補助文字列
    pool.get_or_add("n");
    pool.get_or_add("zve32x");

    let mut seen: HashSet<&str> = HashSet::new();
    let mut unique: Vec<&Instance> = Vec::new();
    for inst in instances {
        if !seen.insert(inst.builtin_name.as_str()) {
            continue;
        }
        pool.get_or_add(&inst.builtin_name);
        if !inst.has_builtin_alias {
            pool.get_or_add(&inst.builtin_type_str());
        }
        unique.push(inst);
    }

    let mut out = String::new();
    out.push_str("// RVV builtin enumerators\n");
    out.push_str("#ifdef GET_RVV_BUILTIN_ENUMERATORS\n");
    for inst in &unique {
        let _ = writeln!(out, "  BI__builtin_rvv_{},", inst.builtin_name);
    }
    out.push_str("#endif // GET_RVV_BUILTIN_ENUMERATORS\n\n");

    out.push_str("// RVV builtin string table\n");
    out.push_str("#ifdef GET_RVV_BUILTIN_STR_TABLE\n");
    pool.emit_table("BuiltinStrings", &mut out);
    out.push_str("#endif // GET_RVV_BUILTIN_STR_TABLE\n\n");

    let attr_offset = pool.offset_of("n").unwrap_or(0);
    let feature_offset = pool.offset_of("zve32x").unwrap_or(0);
    out.push_str("// RVV builtin infos\n");
    out.push_str("#ifdef GET_RVV_BUILTIN_INFOS\n");
    for inst in &unique {
        let name_offset = pool.offset_of(&inst.builtin_name).unwrap_or(0);
        let _ = write!(
            out,
            "    Builtin::Info{{Builtin::Info::StrOffsets{{{name_offset} /* {} */, ",
            inst.builtin_name
        );
        if inst.has_builtin_alias {
            out.push_str("0, ");
        } else {
            let type_str = inst.builtin_type_str();
            let type_offset = pool.offset_of(&type_str).unwrap_or(0);
            let _ = write!(out, "{type_offset} /* {type_str} */, ");
        }
        let _ = writeln!(
            out,
            "{attr_offset} /* n */, {feature_offset} /* zve32x */}}, HeaderDesc::NO_HEADER, ALL_LANGUAGES}},"
        );
    }
    out.push_str("#endif // GET_RVV_BUILTIN_INFOS\n");
    Ok(out)
}
