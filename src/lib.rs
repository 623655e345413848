use std::io;
use std::path::PathBuf;

use anyhow::Result;
use structopt::{clap::AppSettings, StructOpt};
use tokio::runtime;

pub mod config;
pub mod output;
pub mod scraper;
pub mod supost;

pub use config::ScrapConfig;
pub use scraper::{scrape_post, walk_index, Fetch, HttpFetcher, Match, SearchState};

/// Search supost.com posts for keywords
#[derive(Debug, StructOpt)]
pub struct ScrapOpts {
    /// Optional yaml configuration file
    #[structopt(long, env = "SUPOST_CONFIG", parse(from_os_str))]
    pub config: Option<PathBuf>,
    /// Keyword to look for, can be repeated (overrides config keywords)
    #[structopt(long = "keyword", short = "k")]
    pub keywords: Vec<String>,
    /// Number of days back to search
    #[structopt(long)]
    pub days: Option<u32>,
    /// Give up after this many index pages
    #[structopt(long)]
    pub max_pages: Option<usize>,
    /// Override the user agent
    #[structopt(long)]
    pub user_agent: Option<String>,
    /// Also write matches to this tsv file
    #[structopt(long, parse(from_os_str))]
    pub tsv: Option<PathBuf>,
    /// When quiet no logs are outputted
    #[structopt(long, short)]
    pub quiet: bool,
}

/// Scrape a single post and print its matches
#[derive(Debug, StructOpt)]
pub struct PostOpts {
    /// Url of the post page
    pub url: String,
    /// Optional yaml configuration file
    #[structopt(long, env = "SUPOST_CONFIG", parse(from_os_str))]
    pub config: Option<PathBuf>,
    /// Keyword to look for, can be repeated (overrides config keywords)
    #[structopt(long = "keyword", short = "k")]
    pub keywords: Vec<String>,
}

#[derive(Debug, StructOpt)]
#[structopt()]
pub enum Command {
    #[structopt(name = "scrap")]
    Scrap(ScrapOpts),
    #[structopt(name = "post")]
    Post(PostOpts),
    #[structopt(setting(AppSettings::Hidden))]
    Completion,
}

/// Supost keyword watcher
#[derive(Debug, StructOpt)]
pub struct Opts {
    #[structopt(subcommand)]
    pub command: Command,
}

fn load_config(file: Option<&PathBuf>, keywords: &[String]) -> Result<ScrapConfig> {
    let mut conf = match file {
        Some(file) => ScrapConfig::from_yaml(file)?,
        None => ScrapConfig::default(),
    };
    if !keywords.is_empty() {
        conf.keywords = keywords.to_vec();
    }
    Ok(conf)
}

impl TryFrom<&ScrapOpts> for ScrapConfig {
    type Error = anyhow::Error;

    fn try_from(opts: &ScrapOpts) -> Result<Self, Self::Error> {
        let mut conf = load_config(opts.config.as_ref(), &opts.keywords)?;
        if let Some(days) = opts.days {
            conf.days_to_check = days;
        }
        if let Some(max_pages) = opts.max_pages {
            conf.max_pages = Some(max_pages);
        }
        if let Some(user_agent) = &opts.user_agent {
            conf.user_agent = user_agent.to_string();
        }
        conf.validate()?;
        Ok(conf)
    }
}

pub fn run_scrap(opts: ScrapOpts) -> Result<()> {
    let conf = ScrapConfig::try_from(&opts)?;
    let cutoff = supost::cutoff_marker(chrono::Local::now().date_naive(), conf.days_to_check)?;
    log::info!("Looking for {:?} until {cutoff}", conf.keywords);

    let fetcher = HttpFetcher::new(conf.user_agent.as_str());
    let rt = runtime::Builder::new_current_thread().enable_all().build()?;
    let matches = rt.block_on(walk_index(&fetcher, &conf, &cutoff))?;

    output::print_matches(&mut io::stdout(), &matches)?;
    if let Some(tsv) = opts.tsv {
        output::write_tsv(tsv, &matches)?;
    }

    Ok(())
}

pub fn run_post(opts: PostOpts) -> Result<()> {
    let conf = load_config(opts.config.as_ref(), &opts.keywords)?;
    conf.validate()?;

    let fetcher = HttpFetcher::new(conf.user_agent.as_str());
    let rt = runtime::Builder::new_current_thread().enable_all().build()?;
    let matches = rt.block_on(scrape_post(&fetcher, &opts.url, &conf.keywords))?;

    output::print_matches(&mut io::stdout(), &matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_defaults() {
        let opts = Opts::from_iter(vec![
            "supost", "scrap", "-k", "Bike", "-k", "desk", "--days", "3", "--max-pages", "2",
        ]);
        let Command::Scrap(opts) = opts.command else {
            panic!("expected scrap command");
        };

        let conf = ScrapConfig::try_from(&opts).unwrap();
        assert_eq!(conf.keywords, vec!["Bike", "desk"]);
        assert_eq!(conf.days_to_check, 3);
        assert_eq!(conf.max_pages, Some(2));
        assert_eq!(conf.offset_step, 99);
    }

    #[test]
    fn zero_max_pages_is_rejected() {
        let opts = Opts::from_iter(vec!["supost", "scrap", "--max-pages", "0"]);
        let Command::Scrap(opts) = opts.command else {
            panic!("expected scrap command");
        };

        assert!(ScrapConfig::try_from(&opts).is_err());
    }
}
