use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use metronav_lib::{
    navigate, refresh_map, render_outcome, render_station_list, Error as LibError, MapStore,
    MetroMap, NavigateQuery, DEFAULT_DATA_URL,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "地铁导航工具")]
struct Cli {
    /// 指定本地地铁数据文件路径。
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// 开启调试模式。
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 输入起点和终点坐标: 可以是两组坐标，也可以用站名代替任意一组坐标。
    Navigate {
        /// 2 到 4 个位置参数，坐标或站名。
        #[arg(required = true, num_args = 2..=4, allow_negative_numbers = true)]
        query: Vec<String>,
    },
    /// 列出所有地铁站名称。
    Stations,
    /// 更新地铁站数据，可选自定义 URL。
    Update {
        /// 数据源 URL。
        #[arg(long)]
        url: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let store = open_store(cli.data_file)?;
    match cli.command {
        Command::Navigate { query } => handle_navigate(&store, &query),
        Command::Stations => handle_stations(&store),
        Command::Update { url } => handle_update(&store, url.as_deref()),
    }
}

fn open_store(path: Option<PathBuf>) -> Result<MapStore> {
    match path {
        Some(path) => Ok(MapStore::new(path)),
        None => MapStore::default_location().context("failed to resolve the map data directory"),
    }
}

fn load_map(store: &MapStore) -> Result<MetroMap> {
    store.load().with_context(|| {
        format!(
            "failed to load map data from {}; run `metronav update` to download it",
            store.path().display()
        )
    })
}

fn handle_navigate(store: &MapStore, tokens: &[String]) -> Result<()> {
    let map = load_map(store)?;
    let query = NavigateQuery::parse_tokens(tokens)?;
    let outcome = navigate(&map, &query)?;
    println!("{}", render_outcome(&outcome));
    Ok(())
}

fn handle_stations(store: &MapStore) -> Result<()> {
    let map = load_map(store)?;
    println!("{}", render_station_list(&map));
    Ok(())
}

fn handle_update(store: &MapStore, url: Option<&str>) -> Result<()> {
    println!("正在检查更新地铁数据");
    let outcome = match refresh_map(store, url.unwrap_or(DEFAULT_DATA_URL)) {
        Ok(outcome) => outcome,
        Err(err @ LibError::Http(_)) => {
            return Err(anyhow::Error::new(err).context("更新失败：请求出错"))
        }
        Err(err @ LibError::Json(_)) => {
            return Err(anyhow::Error::new(err).context("更新失败：解析 JSON 出错"))
        }
        Err(err) => return Err(err.into()),
    };
    println!("{outcome}");
    Ok(())
}

fn init_tracing(debug: bool) {
    let env_filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
