use super::Context;
use crate::ui;

#[derive(Debug, clap::Args)]
pub struct TreeArg {
    #[arg(long)]
    pub site: u32,

    #[arg(long, short)]
    pub page: String,
}

impl TreeArg {
    pub fn run(self, ctx: &Context) -> anyhow::Result<()> {
        let nodes = ctx.browser().tree(self.site, &self.page)?;
        if ctx.json {
            return ctx.print_json(&nodes);
        }
        if nodes.is_empty() {
            println!("website{}/{}: nothing deployed", self.site, self.page);
            return Ok(());
        }
        let root = format!("website{}/{}", self.site, self.page);
        println!("{}", ui::tree::render(&root, &nodes));
        Ok(())
    }
}
