// パス: src/sigtable.rs
// 役割: 全ファミリのシグネチャを一本の共有列に圧縮するテーブルを実装する
// 意図: 重複の多い operand 形状列を (オフセット, 長さ) 参照で共有しメタデータ量を抑える
// 関連ファイル: src/descriptor.rs, src/record.rs, src/emit/sema.rs
//! シグネチャ圧縮テーブル
//!
//! 構築は一回きりで、以後は読み出し専用（追記のみの裏バッファなので、
//! 一度返したオフセットは永続的に有効）。挿入順は「長さ降順 → 辞書順」。
//! 長い列を先に入れるほど、短い列が既存の連続部分列として見つかりやすい。
//! 圧縮の最適性は要求しない。正しさと決定性（同一入力 ⇒ 同一テーブル）のみ。

use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::descriptor::{PrototypeDescriptor, Signature};
use crate::record::FamilyRecord;

/// 「長さ降順 → 辞書順」で並ぶシグネチャキー。
#[derive(Clone, PartialEq, Eq)]
struct SigKey(Signature);

impl Ord for SigKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .0
            .len()
            .cmp(&self.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for SigKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// 追記専用の共有ディスクリプタ列。
#[derive(Debug, Default)]
pub struct SignatureTable {
    table: Vec<PrototypeDescriptor>,
}

impl SignatureTable {
    /// 全ファミリレコードの prototype / suffix / overloaded-suffix から構築する。
    pub fn build<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a FamilyRecord>,
    {
        let mut signatures: BTreeSet<SigKey> = BTreeSet::new();
        let mut add = |sig: &Signature| {
            if !sig.is_empty() {
                signatures.insert(SigKey(sig.clone()));
            }
        };
        for rec in records {
            add(&rec.prototype);
            add(&rec.suffix);
            add(&rec.overloaded_suffix);
        }

        let mut table = Self::default();
        for sig in &signatures {
            table.insert(&sig.0);
        }
        table
    }

    fn insert(&mut self, signature: &[PrototypeDescriptor]) {
        if self.index_of(signature).is_some() {
            return;
        }
        self.table.extend_from_slice(signature);
    }

    /// シグネチャの開始オフセットを返す。
    ///
    /// 空シグネチャは内容に依らず常にオフセット 0（呼び出し側が長さ 0 を
    /// 併記するため曖昧にならない）。
    pub fn index_of(&self, signature: &[PrototypeDescriptor]) -> Option<usize> {
        if signature.is_empty() {
            return Some(0);
        }
        if signature.len() > self.table.len() {
            return None;
        }
        self.table
            .windows(signature.len())
            .position(|window| window == signature)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn as_slice(&self) -> &[PrototypeDescriptor] {
        &self.table
    }

    /// 永続形式のディスクリプタ列を書き出す。
    pub fn print(&self, out: &mut String) {
        for desc in &self.table {
            let (base, vector, element) = desc.codes();
            let _ = writeln!(out, "PrototypeDescriptor({base}, {vector}, {element}),");
        }
    }
}
