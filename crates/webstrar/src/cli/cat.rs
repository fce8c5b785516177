use super::Context;

#[derive(Debug, clap::Args)]
pub struct CatArg {
    #[arg(long)]
    pub site: u32,

    #[arg(long, short)]
    pub page: String,

    /// Path relative to the page slot.
    pub path: String,
}

impl CatArg {
    pub fn run(self, ctx: &Context) -> anyhow::Result<()> {
        let Some(view) = ctx.browser().file(self.site, &self.page, &self.path)? else {
            anyhow::bail!("{}: file not found or access denied", self.path);
        };

        if ctx.json {
            return ctx.print_json(&view);
        }
        eprintln!("{}", view.language);
        print!("{}", view.content);
        Ok(())
    }
}
