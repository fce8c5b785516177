use std::path::PathBuf;

use clap::{Parser, Subcommand};
use webstrar_site::{Deployer, SiteBrowser, SlotLayout, StaticDirectory};

use crate::settings::Settings;

mod cat;
mod deploy;
mod overview;
mod status;
mod tree;

#[derive(Debug, Parser)]
#[command(name = "webstrar", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    /// Settings file; missing files fall back to defaults.
    #[arg(long, short, global = true, default_value = "webstrar.toml")]
    pub config: PathBuf,

    /// Print machine-readable JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "d", name = "deploy", about = "Replace a page slot with a zip archive")]
    Deploy(deploy::DeployArg),
    #[command(alias = "st", name = "status", about = "Show the page slots of a site")]
    Status(status::StatusArg),
    #[command(alias = "ov", name = "overview", about = "Summarize every assigned site")]
    Overview(overview::OverviewArg),
    #[command(alias = "ls", name = "tree", about = "List the files of a page slot")]
    Tree(tree::TreeArg),
    #[command(name = "cat", about = "Print one file of a page slot")]
    Cat(cat::CatArg),
}

impl Commands {
    pub fn run(self, ctx: &Context) -> anyhow::Result<()> {
        match self {
            Self::Deploy(arg) => arg.run(ctx),
            Self::Status(arg) => arg.run(ctx),
            Self::Overview(arg) => arg.run(ctx),
            Self::Tree(arg) => arg.run(ctx),
            Self::Cat(arg) => arg.run(ctx),
        }
    }
}

/// Components shared by every command, built once from settings.
pub struct Context {
    pub settings: Settings,
    pub layout: SlotLayout,
    pub directory: StaticDirectory,
    pub json: bool,
}

impl Context {
    pub fn new(settings: Settings, json: bool) -> anyhow::Result<Self> {
        let layout = SlotLayout::new(settings.deploy.clone())?;
        let directory = StaticDirectory::new(settings.assignments.iter().map(|(u, s)| (u, *s)));
        Ok(Self {
            settings,
            layout,
            directory,
            json,
        })
    }

    pub fn deployer(&self) -> Deployer {
        Deployer::new(self.layout.clone())
    }

    pub fn browser(&self) -> SiteBrowser {
        SiteBrowser::new(self.layout.clone())
    }

    pub fn print_json<T: serde::Serialize>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

pub(crate) fn format_time(time: Option<chrono::DateTime<chrono::Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_deploy_by_user() {
        let app = App::try_parse_from(["webstrar", "deploy", "--user", "jdoe", "--page", "Page3", "site.zip"]).unwrap();
        assert!(matches!(app.cmd, Commands::Deploy(_)));
        assert_eq!(app.config, PathBuf::from("webstrar.toml"));
    }

    #[test]
    fn deploy_requires_user_or_site() {
        assert!(App::try_parse_from(["webstrar", "deploy", "--page", "Page3", "site.zip"]).is_err());
        assert!(
            App::try_parse_from(["webstrar", "deploy", "--user", "a", "--site", "3", "--page", "Page3", "x.zip"])
                .is_err()
        );
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let app = App::try_parse_from(["webstrar", "tree", "--site", "7", "--page", "Page3", "--json", "-c", "x.toml"]).unwrap();
        assert!(app.json);
        assert_eq!(app.config, PathBuf::from("x.toml"));
    }

    #[test]
    fn missing_time_renders_dash() {
        assert_eq!(format_time(None), "-");
    }
}
