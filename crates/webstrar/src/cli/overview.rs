use tabled::Tabled;
use webstrar_site::{SiteOverview, overviews};

use super::{Context, format_time};
use crate::ui::table::Formatter;

#[derive(Debug, clap::Args)]
pub struct OverviewArg {
    /// Include staff sites.
    #[arg(long)]
    pub all: bool,
}

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "Site")]
    site: u32,
    #[tabled(rename = "Users")]
    users: String,
    #[tabled(rename = "Pages")]
    pages: usize,
    #[tabled(rename = "Files")]
    files: usize,
    #[tabled(rename = "Last activity")]
    last_activity: String,
}

impl From<&SiteOverview> for SiteRow {
    fn from(site: &SiteOverview) -> Self {
        Self {
            site: site.site_number,
            users: site.users.join(", "),
            pages: site.pages.iter().filter(|p| p.has_content).count(),
            files: site.total_files(),
            last_activity: format_time(site.last_activity()),
        }
    }
}

impl OverviewArg {
    pub fn run(self, ctx: &Context) -> anyhow::Result<()> {
        let excluded = if self.all {
            Default::default()
        } else {
            ctx.settings.staff_sites.clone()
        };
        let sites = overviews(&ctx.layout, &ctx.directory, &excluded);
        if ctx.json {
            return ctx.print_json(&sites);
        }

        let table = Formatter::default()
            .footer(format!("{} site(s)", sites.len()))
            .build(sites.iter().map(SiteRow::from));
        println!("{table}");
        Ok(())
    }
}
