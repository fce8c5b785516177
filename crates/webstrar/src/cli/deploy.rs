use std::fs::File;
use std::path::PathBuf;

use anyhow::Context as _;

use super::Context;

#[derive(Debug, clap::Args)]
pub struct DeployArg {
    /// Deploy to the site assigned to this user.
    #[arg(long, conflicts_with = "site", required_unless_present = "site")]
    pub user: Option<String>,

    /// Deploy to this site number directly.
    #[arg(long)]
    pub site: Option<u32>,

    /// Target slot, `Page0` to `Page10`.
    #[arg(long, short)]
    pub page: String,

    /// Zip archive to deploy.
    pub archive: PathBuf,
}

impl DeployArg {
    pub fn run(self, ctx: &Context) -> anyhow::Result<()> {
        let upload = File::open(&self.archive)
            .with_context(|| format!("failed to open {}", self.archive.display()))?;

        let deployer = ctx.deployer();
        let report = match (&self.user, self.site) {
            (Some(user), _) => deployer.deploy_for_user(&ctx.directory, user, &self.page, upload),
            (None, Some(site)) => deployer.deploy(site, &self.page, upload),
            (None, None) => anyhow::bail!("either --user or --site is required"),
        }
        .with_context(|| format!("failed to deploy {} to {}", self.archive.display(), self.page))?;

        if ctx.json {
            return ctx.print_json(&report);
        }
        println!(
            "Deployed {} file(s) to {} of website{} successfully.",
            report.extracted, report.page, report.site_number
        );
        Ok(())
    }
}
