// パス: src/expand.rs
// 役割: ファミリレコードを 型 × LMUL × masked × ポリシー の直積で具象インスタンスに展開する
// 意図: シグネチャ変形と命名規則を一箇所に集約し、同名 builtin の構造的一致を必ず検査する
// 関連ファイル: src/record.rs, src/policy.rs, src/resolve.rs, src/emit/codegen.rs
//! 展開エンジン
//!
//! 型解決が「無効な組み合わせ」を返した (要素型, LMUL) 対は黙ってスキップする。
//! これは想定内のフィルタリングでありエラーではない。一方、同じ builtin 名に
//! 展開された二つの宣言が構造的に一致しない場合は致命的な設定不整合であり、
//! 黙って片方を採ることはしない。

use std::collections::HashMap;

use crate::descriptor::{BaseKind, PrototypeDescriptor, Signature, VectorModifier};
use crate::errors::{GenError, GenResult};
use crate::policy::{
    name_suffixes, supported_masked_policies, supported_unmasked_policies, Policy, PolicyScheme,
};
use crate::record::FamilyRecord;
use crate::resolve::{ResolvedType, TypeResolver};

/// 展開済みの具象 intrinsic インスタンス。構築後は不変。
#[derive(Clone, Debug)]
pub struct Instance {
    /// 入力順を明示するための通し番号（コンテナの列挙順には依存しない）。
    pub seq: u32,
    /// 解決済み builtin 名（型サフィックス・ポリシーサフィックス込み）。
    pub builtin_name: String,
    pub overloaded_name: String,
    /// 低レベル intrinsic 名。直接の対応がなければ空。
    pub ir_name: String,
    pub masked: bool,
    pub policy: Policy,
    /// 解決済み型列。index 0 は結果型。
    pub types: Vec<ResolvedType>,
    /// オーバーロード解決に型を具象化する operand 番号（-1 は結果型）。
    pub intrinsic_types: Vec<i32>,
    pub manual_codegen: String,
    pub nf: u8,
    pub has_frm: bool,
    pub has_vl: bool,
    pub scheme: PolicyScheme,
    pub has_masked_off_operand: bool,
    pub has_builtin_alias: bool,
}

impl Instance {
    pub fn has_policy_operand(&self) -> bool {
        self.scheme == PolicyScheme::HasPolicyOperand
    }

    pub fn has_passthru_operand(&self) -> bool {
        self.scheme == PolicyScheme::HasPassthruOperand
    }

    /// メタデータ出力に使う型シグネチャ文字列（結果型 + 引数型の連接）。
    pub fn builtin_type_str(&self) -> String {
        self.types
            .iter()
            .map(|t| t.builtin_code.as_str())
            .collect()
    }

    fn summary(&self) -> String {
        format!(
            "{} (seq={}, masked={}, ir={})",
            self.builtin_name, self.seq, self.masked, self.ir_name
        )
    }
}

/// タプルファミリの maskedoff/passthru 型（ポインタ operand から導出）。
fn tuple_passthru(record: &FamilyRecord) -> PrototypeDescriptor {
    let base_ptr = record.prototype[1];
    PrototypeDescriptor {
        base: BaseKind::Vector,
        vector: VectorModifier::tuple(record.nf),
        element: base_ptr.element,
    }
}

/// レコードの基本シグネチャへ PrototypeDescriptor 変形規則を適用する。
///
/// masked か否か・ポリシー・NF・スキーム・タプルの各条件で operand の
/// 増減と位置が変わる（例: undisturbed 系は passthru/maskedoff を持つ）。
pub fn build_signature(record: &FamilyRecord, masked: bool, policy: Policy) -> Signature {
    let mut sig = record.prototype.clone();
    let nf = record.nf as usize;
    if masked {
        if record.has_masked_off_operand && !policy.is_tama() {
            if nf == 1 {
                let result = sig[0];
                sig.insert(1, result);
            } else if record.is_tuple {
                sig.insert(1, tuple_passthru(record));
            } else {
                // (void, addr0.., ) → (void, addr0.., maskedoff0..)
                let maskedoff = sig[1].to_vector();
                for _ in 0..nf {
                    sig.insert(1 + nf, maskedoff);
                }
            }
        }
        if record.has_masked_off_operand && nf > 1 {
            sig.insert(1 + nf, PrototypeDescriptor::MASK);
        } else {
            sig.insert(1, PrototypeDescriptor::MASK);
        }
    } else if policy.is_tu() && record.unmasked_policy_scheme == PolicyScheme::HasPassthruOperand {
        if nf == 1 {
            let result = sig[0];
            sig.insert(1, result);
        } else if record.is_tuple {
            sig.insert(1, tuple_passthru(record));
        } else {
            let passthru = sig[1].to_vector();
            for _ in 0..nf {
                sig.insert(1 + nf, passthru);
            }
        }
    }
    if record.has_vl {
        sig.push(PrototypeDescriptor::VL);
    }
    sig
}

/// 同名 builtin の構造的一致を検査する。相違は致命的な設定不整合。
fn check_consistency(first: &Instance, second: &Instance) -> GenResult<()> {
    let mismatch = |field: &'static str| {
        Err(GenError::Inconsistent {
            builtin: second.builtin_name.clone(),
            field,
            first: first.summary(),
            second: second.summary(),
        })
    };
    if first.has_builtin_alias != second.has_builtin_alias {
        return mismatch("has_builtin_alias");
    }
    if !first.has_builtin_alias && first.builtin_type_str() != second.builtin_type_str() {
        return mismatch("type string");
    }
    if first.ir_name != second.ir_name {
        return mismatch("ir_name");
    }
    if first.manual_codegen != second.manual_codegen {
        return mismatch("manual_codegen");
    }
    if first.masked != second.masked {
        return mismatch("masked");
    }
    if first.has_vl != second.has_vl {
        return mismatch("has_vl");
    }
    if first.scheme != second.scheme {
        return mismatch("policy_scheme");
    }
    if first.intrinsic_types != second.intrinsic_types {
        return mismatch("intrinsic_types");
    }
    Ok(())
}

struct Expander<'a, R: TypeResolver> {
    resolver: &'a mut R,
    out: Vec<Instance>,
    seen: HashMap<String, usize>,
    next_seq: u32,
}

impl<'a, R: TypeResolver> Expander<'a, R> {
    fn new(resolver: &'a mut R) -> Self {
        Self {
            resolver,
            out: Vec::new(),
            seen: HashMap::new(),
            next_seq: 0,
        }
    }

    fn push(
        &mut self,
        record: &FamilyRecord,
        masked: bool,
        policy: Policy,
        suffix: &str,
        osuffix: &str,
        types: Vec<ResolvedType>,
    ) -> GenResult<()> {
        let mut builtin_name = record.name.clone();
        if !suffix.is_empty() {
            builtin_name.push('_');
            builtin_name.push_str(suffix);
        }
        let mut overloaded_name = record.overloaded_or_name().to_string();
        if !osuffix.is_empty() {
            overloaded_name.push('_');
            overloaded_name.push_str(osuffix);
        }
        let (policy_suffix, overloaded_policy_suffix) =
            name_suffixes(masked, policy, record.has_frm_round_mode_op);
        builtin_name.push_str(&policy_suffix);
        overloaded_name.push_str(&overloaded_policy_suffix);

        let scheme = if masked {
            record.masked_policy_scheme
        } else {
            record.unmasked_policy_scheme
        };

        // intrinsic-type 番号は unmasked・tail-agnostic 基準。先頭に
        // passthru/maskedoff が差し込まれる形式では NF 分ずらす。
        let mut intrinsic_types = record.intrinsic_types.clone();
        if (masked && record.has_masked_off_operand)
            || (!masked && scheme == PolicyScheme::HasPassthruOperand)
        {
            for idx in &mut intrinsic_types {
                if *idx >= 0 {
                    *idx += i32::from(record.nf);
                }
            }
        }

        let instance = Instance {
            seq: self.next_seq,
            builtin_name,
            overloaded_name,
            ir_name: if masked {
                record.masked_ir_name.clone()
            } else {
                record.ir_name.clone()
            },
            masked,
            policy,
            types,
            intrinsic_types,
            manual_codegen: record.manual_codegen.clone(),
            nf: record.nf,
            has_frm: record.has_frm_round_mode_op,
            has_vl: record.has_vl,
            scheme,
            has_masked_off_operand: record.has_masked_off_operand,
            has_builtin_alias: record.has_builtin_alias,
        };
        self.next_seq += 1;

        if let Some(&first) = self.seen.get(&instance.builtin_name) {
            check_consistency(&self.out[first], &instance)?;
        } else {
            self.seen
                .insert(instance.builtin_name.clone(), self.out.len());
        }
        self.out.push(instance);
        Ok(())
    }

    fn expand_record(&mut self, record: &FamilyRecord) -> GenResult<()> {
        // マクロ定義専用の擬似ファミリは直積を持たない
        if record.is_pseudo() {
            return Ok(());
        }

        let unmasked_sig = build_signature(record, false, Policy::DEFAULT);
        let masked_sig = record
            .has_masked
            .then(|| build_signature(record, true, Policy::DEFAULT));

        for base in record.type_range.iter() {
            for log2_lmul in record.lmuls.iter() {
                let Some(types) =
                    self.resolver
                        .resolve(base, log2_lmul, record.nf, &unmasked_sig)
                else {
                    // 無効な組み合わせ: この (要素型, LMUL) 対は展開しない
                    continue;
                };
                let suffix = self.resolver.suffix(base, log2_lmul, &record.suffix);
                let osuffix = self
                    .resolver
                    .suffix(base, log2_lmul, &record.overloaded_suffix);

                self.push(record, false, Policy::DEFAULT, &suffix, &osuffix, types)?;

                if record.unmasked_policy_scheme != PolicyScheme::None {
                    for policy in supported_unmasked_policies() {
                        let sig = build_signature(record, false, policy);
                        let Some(types) =
                            self.resolver.resolve(base, log2_lmul, record.nf, &sig)
                        else {
                            continue;
                        };
                        self.push(record, false, policy, &suffix, &osuffix, types)?;
                    }
                }

                let Some(masked_sig) = masked_sig.as_ref() else {
                    continue;
                };
                let Some(types) = self.resolver.resolve(base, log2_lmul, record.nf, masked_sig)
                else {
                    continue;
                };
                self.push(record, true, Policy::DEFAULT, &suffix, &osuffix, types)?;

                if record.masked_policy_scheme != PolicyScheme::None {
                    let policies =
                        supported_masked_policies(record.has_tail_policy, record.has_mask_policy);
                    if policies.is_empty() {
                        return Err(GenError::UnsupportedPolicyConfig {
                            name: record.name.clone(),
                        });
                    }
                    for policy in policies {
                        let sig = build_signature(record, true, policy);
                        let Some(types) =
                            self.resolver.resolve(base, log2_lmul, record.nf, &sig)
                        else {
                            continue;
                        };
                        self.push(record, true, policy, &suffix, &osuffix, types)?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// 単一レコードを展開する。
pub fn expand<R: TypeResolver>(
    record: &FamilyRecord,
    resolver: &mut R,
) -> GenResult<Vec<Instance>> {
    let mut expander = Expander::new(resolver);
    expander.expand_record(record)?;
    Ok(expander.out)
}

/// 順序付きレコード列全体を展開する。通し番号は全体で一意。
pub fn expand_all<R: TypeResolver>(
    records: &[FamilyRecord],
    resolver: &mut R,
) -> GenResult<Vec<Instance>> {
    let mut expander = Expander::new(resolver);
    for record in records {
        expander.expand_record(record)?;
    }
    Ok(expander.out)
}
