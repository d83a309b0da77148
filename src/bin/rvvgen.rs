// パス: src/bin/rvvgen.rs
// 役割: Binary entrypoint that runs one batch descriptor compilation
// 意図: Offer a CLI executable selecting input records and emission mode
// 関連ファイル: src/lib.rs, src/emit/mod.rs, src/record.rs

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use rvvgen::emit::EmitMode;
use rvvgen::resolve::RvvTypeResolver;
use rvvgen::{generate, load_records_from_path, GenResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// 型エイリアスと関数宣言
    Header,
    /// builtin 列挙子・文字列プール・情報表
    Builtins,
    /// case ラベルと共有 codegen 本体
    Codegen,
    /// 圧縮シグネチャテーブルと per-family レコード
    Sema,
}

impl From<Mode> for EmitMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Header => EmitMode::Header,
            Mode::Builtins => EmitMode::Builtins,
            Mode::Codegen => EmitMode::Codegen,
            Mode::Sema => EmitMode::Sema,
        }
    }
}

/// RVV intrinsic descriptor compiler.
#[derive(Parser, Debug)]
#[command(name = "rvvgen", version, about)]
struct Cli {
    /// 順序付きファミリレコード（JSON）
    #[arg(short, long)]
    input: PathBuf,
    /// 出力モード
    #[arg(short, long, value_enum)]
    emit: Mode,
    /// 出力先（省略時は標準出力）
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn run(cli: &Cli) -> GenResult<()> {
    let records = load_records_from_path(&cli.input)?;
    let mut resolver = RvvTypeResolver::new();
    let text = generate(&records, &mut resolver, cli.emit.into())?;
    match &cli.output {
        Some(path) => fs::write(path, text)?,
        None => print!("{text}"),
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("rvvgen: {err}");
            ExitCode::FAILURE
        }
    }
}
