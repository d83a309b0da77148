// パス: src/emit/header.rs
// 役割: 公開ヘッダ（型エイリアスと builtin ごとの関数宣言）を生成する
// 意図: 有効な (要素型, LMUL[, NF]) の組み合わせだけを型リゾルバで列挙して出力する
// 関連ファイル: src/emit/mod.rs, src/resolve.rs, src/expand.rs

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::descriptor::{BasicType, ElementModifier, PrototypeDescriptor, VectorModifier};
use crate::errors::GenResult;
use crate::expand::Instance;
use crate::resolve::{ResolvedType, TypeResolver};

const LOG2_LMULS: [i8; 7] = [-3, -2, -1, 0, 1, 2, 3];

fn print_type_alias(t: &ResolvedType, out: &mut String) {
    // vint32m1_t → __rvv_int32m1_t を正準名として typedef する
    let _ = writeln!(out, "typedef __rvv_{} {};", &t.c_name[1..], t.c_name);
}

fn tuple_desc(nf: u8, element: ElementModifier) -> PrototypeDescriptor {
    PrototypeDescriptor {
        vector: VectorModifier::tuple(nf),
        element,
        ..PrototypeDescriptor::VECTOR
    }
}

/// ヘッダ全体を生成する。
pub fn emit<R: TypeResolver>(instances: &[Instance], resolver: &mut R) -> GenResult<String> {
    let mut out = String::new();
    out.push_str("#ifndef __RVV_VECTOR_H\n");
    out.push_str("#define __RVV_VECTOR_H\n\n");
    out.push_str("#include <stdint.h>\n");
    out.push_str("#include <stddef.h>\n\n");
    out.push_str("#ifdef __cplusplus\n");
    out.push_str("extern \"C\" {\n");
    out.push_str("#endif\n\n");

    // マスク型: 比ごとに一つ
    for log2_lmul in LOG2_LMULS {
        if let Some(t) = resolver.resolve_one(BasicType::Int8, log2_lmul, PrototypeDescriptor::MASK)
        {
            print_type_alias(&t, &mut out);
        }
    }

    // 整数ベクトル型（符号付き・符号なし）とタプル
    for base in [
        BasicType::Int8,
        BasicType::Int16,
        BasicType::Int32,
        BasicType::Int64,
    ] {
        for log2_lmul in LOG2_LMULS {
            let Some(signed) = resolver.resolve_one(base, log2_lmul, PrototypeDescriptor::VECTOR)
            else {
                continue;
            };
            print_type_alias(&signed, &mut out);
            let unsigned_desc = PrototypeDescriptor {
                element: ElementModifier::UnsignedInteger,
                ..PrototypeDescriptor::VECTOR
            };
            if let Some(t) = resolver.resolve_one(base, log2_lmul, unsigned_desc) {
                print_type_alias(&t, &mut out);
            }
            for nf in 2..=8 {
                if let Some(t) =
                    resolver.resolve_one(base, log2_lmul, tuple_desc(nf, ElementModifier::SignedInteger))
                {
                    print_type_alias(&t, &mut out);
                }
                if let Some(t) = resolver.resolve_one(
                    base,
                    log2_lmul,
                    tuple_desc(nf, ElementModifier::UnsignedInteger),
                ) {
                    print_type_alias(&t, &mut out);
                }
            }
        }
    }

    // 浮動小数点・bfloat ベクトル型とタプル
    for base in [
        BasicType::Float16,
        BasicType::Float32,
        BasicType::Float64,
        BasicType::BFloat16,
    ] {
        for log2_lmul in LOG2_LMULS {
            let Some(t) = resolver.resolve_one(base, log2_lmul, PrototypeDescriptor::VECTOR) else {
                continue;
            };
            print_type_alias(&t, &mut out);
            for nf in 2..=8 {
                if let Some(t) =
                    resolver.resolve_one(base, log2_lmul, tuple_desc(nf, ElementModifier::SameAsBase))
                {
                    print_type_alias(&t, &mut out);
                }
            }
        }
    }
    out.push('\n');

    // builtin ごとの関数宣言（初出順で一意化）
    let mut declared: HashSet<&str> = HashSet::new();
    for inst in instances {
        if !declared.insert(inst.builtin_name.as_str()) {
            continue;
        }
        let result = &inst.types[0].c_name;
        let args: Vec<&str> = inst.types[1..].iter().map(|t| t.c_name.as_str()).collect();
        let arg_list = if args.is_empty() {
            "void".to_string()
        } else {
            args.join(", ")
        };
        let _ = writeln!(
            out,
            "extern {result} __riscv_{}({arg_list});",
            inst.builtin_name
        );
    }

    out.push_str("\n#ifdef __cplusplus\n");
    out.push_str("}\n");
    out.push_str("#endif // __cplusplus\n");
    out.push_str("#endif // __RVV_VECTOR_H\n");
    Ok(out)
}
