use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "citylookup")]
#[command(about = "市区町村リストに緯度経度を付加してINSERT文を生成するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 設定ファイル（省略時: ~/.config/citylookup/config.json）
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// スプレッドシートを読み込み、緯度経度を付加してINSERT文を出力
    Run {
        /// 入力スプレッドシート（xlsx/xls/ods）
        #[arg(required = true)]
        input: PathBuf,

        /// 出力SQLファイル
        #[arg(short, long, default_value = "insert.sql")]
        output: PathBuf,

        /// テーブル名
        #[arg(short, long)]
        table: Option<String>,

        /// 検索語に付ける地域（州略称）
        #[arg(short, long)]
        region: Option<String>,

        /// リクエスト間隔（ミリ秒）
        #[arg(long)]
        delay_ms: Option<u64>,

        /// リクエストのタイムアウト（秒）
        #[arg(long)]
        timeout: Option<u64>,

        /// 先頭N行のみ処理
        #[arg(short, long)]
        limit: Option<usize>,

        /// チェックに失敗した検索結果を採用しない
        #[arg(long)]
        reject_mismatches: bool,

        /// 進捗バーを表示しない
        #[arg(long)]
        no_progress: bool,
    },

    /// 列設定を検証して出力列を表示（通信なし）
    Check,

    /// 設定を表示/初期化
    Config {
        /// デフォルト設定をファイルに書き出す
        #[arg(long)]
        init: bool,

        /// 既存ファイルを上書き
        #[arg(long)]
        force: bool,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
